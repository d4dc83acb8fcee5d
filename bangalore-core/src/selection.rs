//! Boundary-selection heuristic for geocoding results.
//!
//! Candidates outside the target region are dropped, the rest are scored by
//! administrative relevance and the highest score wins. Ties keep the order
//! the provider returned them in.

use std::cmp::Reverse;

use thiserror::Error;

use crate::PlaceCandidate;

/// Score for administrative boundaries.
pub const SCORE_BOUNDARY: u8 = 2;
/// Score for city or town places.
pub const SCORE_SETTLEMENT: u8 = 1;
/// Score for everything else, including the unfiltered fallback.
pub const SCORE_OTHER: u8 = 0;

/// Country and state a candidate must belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFilter {
    /// Exact country name.
    pub country: String,
    /// Substring the state (or state district) must contain, when present.
    pub state: String,
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self::new("India", "Karnataka")
    }
}

impl RegionFilter {
    /// Build a filter for the given country and state.
    pub fn new(country: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            state: state.into(),
        }
    }

    /// Whether `candidate` lies in the configured region.
    ///
    /// The country must match exactly. A missing state passes; a present
    /// state must contain the configured state name.
    #[must_use]
    pub fn accepts(&self, candidate: &PlaceCandidate) -> bool {
        if candidate.country() != Some(self.country.as_str()) {
            return false;
        }
        candidate
            .region()
            .is_none_or(|region| region.contains(self.state.as_str()))
    }
}

/// A candidate paired with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// Relevance score; higher is better.
    pub score: u8,
    /// The scored candidate.
    pub candidate: PlaceCandidate,
}

/// Errors returned by [`select_best`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The provider returned no candidates at all.
    #[error("no geocoding candidates to choose from")]
    NoCandidates,
}

/// Score a candidate by administrative relevance.
///
/// # Examples
///
/// ```
/// use bangalore_core::PlaceCandidate;
/// use bangalore_core::selection::relevance_score;
///
/// let candidate = PlaceCandidate {
///     class: Some("place".into()),
///     kind: Some("town".into()),
///     ..PlaceCandidate::default()
/// };
/// assert_eq!(relevance_score(&candidate), 1);
/// ```
#[must_use]
pub fn relevance_score(candidate: &PlaceCandidate) -> u8 {
    let class = candidate.class.as_deref();
    let kind = candidate.kind.as_deref();
    if class == Some("boundary") || kind == Some("administrative") {
        SCORE_BOUNDARY
    } else if class == Some("place") && matches!(kind, Some("city" | "town")) {
        SCORE_SETTLEMENT
    } else {
        SCORE_OTHER
    }
}

/// Filter and score raw candidates, best first.
///
/// When the filter rejects everything but `raw` is non-empty, the first raw
/// candidate is returned alone with [`SCORE_OTHER`].
#[must_use]
pub fn rank_candidates(raw: Vec<PlaceCandidate>, filter: &RegionFilter) -> Vec<ScoredCandidate> {
    let fallback = raw.first().cloned();
    let mut ranked: Vec<ScoredCandidate> = raw
        .into_iter()
        .filter(|candidate| filter.accepts(candidate))
        .map(|candidate| ScoredCandidate {
            score: relevance_score(&candidate),
            candidate,
        })
        .collect();

    if ranked.is_empty() {
        return fallback
            .map(|candidate| ScoredCandidate {
                score: SCORE_OTHER,
                candidate,
            })
            .into_iter()
            .collect();
    }

    // `sort_by_key` is stable, so equal scores keep provider order.
    ranked.sort_by_key(|scored| Reverse(scored.score));
    ranked
}

/// Pick the best candidate from a raw provider response.
pub fn select_best(
    raw: Vec<PlaceCandidate>,
    filter: &RegionFilter,
) -> Result<ScoredCandidate, SelectionError> {
    rank_candidates(raw, filter)
        .into_iter()
        .next()
        .ok_or(SelectionError::NoCandidates)
}
