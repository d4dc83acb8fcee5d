//! Per-step record of a project build.
//!
//! Optional build steps never abort the build. Each one records whether it
//! was applied or skipped, and why, so callers can log or assert on it.

use std::fmt;

/// A step of the project build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStep {
    /// Loading a vector table.
    LoadLayer,
    /// Applying a default style.
    Style,
    /// Registering an XYZ basemap.
    Basemap,
    /// Adding the boundary bookmark.
    Bookmark,
    /// Setting the initial view extent.
    ViewExtent,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LoadLayer => "load layer",
            Self::Style => "style",
            Self::Basemap => "basemap",
            Self::Bookmark => "bookmark",
            Self::ViewExtent => "view extent",
        })
    }
}

/// What happened to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step took effect.
    Applied,
    /// The step was skipped.
    Skipped {
        /// Human-readable cause.
        reason: String,
    },
}

/// One line of a [`BuildReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Step kind.
    pub step: BuildStep,
    /// Layer or bookmark the step acted on.
    pub subject: String,
    /// Result of the step.
    pub outcome: StepOutcome,
}

impl StepRecord {
    /// Whether the step was skipped.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self.outcome, StepOutcome::Skipped { .. })
    }
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            StepOutcome::Applied => write!(f, "{} {:?}: applied", self.step, self.subject),
            StepOutcome::Skipped { reason } => {
                write!(f, "{} {:?}: skipped ({reason})", self.step, self.subject)
            }
        }
    }
}

/// Ordered record of every optional build step.
///
/// # Examples
///
/// ```
/// use bangalore_core::{BuildReport, BuildStep};
///
/// let mut report = BuildReport::default();
/// report.applied(BuildStep::LoadLayer, "Roads");
/// report.skipped(BuildStep::LoadLayer, "Buildings", "table not found");
///
/// assert_eq!(report.records().len(), 2);
/// assert_eq!(report.skipped_records().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildReport {
    records: Vec<StepRecord>,
}

impl BuildReport {
    /// Record a step that took effect.
    pub fn applied(&mut self, step: BuildStep, subject: impl Into<String>) {
        self.records.push(StepRecord {
            step,
            subject: subject.into(),
            outcome: StepOutcome::Applied,
        });
    }

    /// Record a skipped step.
    pub fn skipped(
        &mut self,
        step: BuildStep,
        subject: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.records.push(StepRecord {
            step,
            subject: subject.into(),
            outcome: StepOutcome::Skipped {
                reason: reason.into(),
            },
        });
    }

    /// All records in build order.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Records of skipped steps.
    pub fn skipped_records(&self) -> impl Iterator<Item = &StepRecord> {
        self.records.iter().filter(|record| record.is_skipped())
    }
}
