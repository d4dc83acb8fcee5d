//! Error types emitted by the Bangalore map binaries.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use bangalore_core::FetchError;
use bangalore_data::{PersistBoundaryError, ProviderBuildError};
use bangalore_qgis::ProjectWriteError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Exit code for environment and configuration failures.
pub const EXIT_ENVIRONMENT: u8 = 1;
/// Exit code for fetch and write failures.
pub const EXIT_FAILURE: u8 = 2;

/// Errors emitted by the Bangalore map binaries.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The project root is unusable.
    #[error("project root {path:?} is unusable: {reason}")]
    EnvironmentMissing { path: Utf8PathBuf, reason: String },
    /// The Nominatim client could not be constructed.
    #[error("failed to build Nominatim client for {endpoint:?}: {source}")]
    BuildGeocoder {
        endpoint: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Every boundary query failed.
    #[error("failed to fetch boundary via Nominatim: {0}")]
    Fetch(#[source] FetchError),
    /// Writing the boundary GeoJSON failed.
    #[error(transparent)]
    PersistBoundary(#[from] PersistBoundaryError),
    /// Writing the QGIS project failed.
    #[error("failed to write project to {path:?}: {source}")]
    WriteProject {
        path: Utf8PathBuf,
        #[source]
        source: ProjectWriteError,
    },
}

impl CliError {
    /// Process exit code for the error.
    ///
    /// Configuration and environment problems exit with 1; everything that
    /// fails after the environment was resolved exits with 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ArgumentParsing(err) => u8::try_from(err.exit_code()).unwrap_or(EXIT_FAILURE),
            Self::Configuration(_) | Self::EnvironmentMissing { .. } => EXIT_ENVIRONMENT,
            Self::BuildGeocoder { .. }
            | Self::Fetch(_)
            | Self::PersistBoundary(_)
            | Self::WriteProject { .. } => EXIT_FAILURE,
        }
    }
}
