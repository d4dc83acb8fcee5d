//! Command-line entry points for the Bangalore map tooling.
//!
//! Two binaries share this crate: `fetch-boundary` saves the city boundary
//! from Nominatim as GeoJSON, and `build-project` assembles the QGIS project
//! from the processed GeoPackage. Both run with no arguments; flags,
//! configuration files and `BANGALORE_MAP_*` environment variables override
//! the defaults through `ortho_config`.
#![forbid(unsafe_code)]

pub mod build;
mod error;
pub mod fetch;

pub use error::{CliError, EXIT_ENVIRONMENT, EXIT_FAILURE};

pub(crate) const ARG_ROOT: &str = "root";
pub(crate) const DEFAULT_ROOT: &str = ".";

/// Install the stderr log subscriber; `RUST_LOG` overrides the `info` default.
///
/// `log` records from the library crates are forwarded to the subscriber. A
/// subscriber already installed by an embedding process is kept.
pub fn init_logging() {
    if let Err(err) = install_subscriber() {
        log::debug!("keeping the existing log subscriber: {err}");
    }
}

fn install_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}

#[cfg(test)]
mod tests;
