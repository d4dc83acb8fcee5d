//! `fetch-boundary`: look the city boundary up on Nominatim and save it.

use std::time::Duration;

use bangalore_core::{Geocoder, RegionFilter, fetch_first_boundary};
use bangalore_data::nominatim::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use bangalore_data::{NominatimConfig, NominatimGeocoder, write_boundary};
use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_ROOT, CliError, DEFAULT_ROOT};

pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_ENDPOINT: &str = "endpoint";
pub(crate) const ARG_USER_AGENT: &str = "user-agent";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";

/// Queries tried in order until one yields a boundary.
pub const BOUNDARY_QUERIES: [&str; 3] = [
    "Bengaluru, Karnataka, India",
    "Bangalore, Karnataka, India",
    "Bruhat Bengaluru Mahanagara Palike, Karnataka, India",
];

/// Output path relative to the project root.
pub const BOUNDARY_FILE: &str = "data/raw/bbmp-boundary.geojson";

/// CLI arguments for `fetch-boundary`.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "fetch-boundary",
    long_about = "Search Nominatim for the Bangalore administrative boundary \
                 and save it as a single-feature GeoJSON collection. Every \
                 option can also come from configuration files or \
                 BANGALORE_MAP_* environment variables.",
    about = "Fetch the Bangalore boundary as GeoJSON",
    version
)]
#[ortho_config(prefix = "BANGALORE_MAP")]
pub struct FetchArgs {
    /// Project root; defaults to the current directory.
    #[arg(long = ARG_ROOT, value_name = "dir")]
    #[serde(default)]
    pub root: Option<Utf8PathBuf>,
    /// Override the GeoJSON output path.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub output: Option<Utf8PathBuf>,
    /// Base URL of the Nominatim instance.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default)]
    pub endpoint: Option<String>,
    /// User-Agent header sent with each request.
    #[arg(long = ARG_USER_AGENT, value_name = "text")]
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl FetchArgs {
    fn into_config(self) -> Result<FetchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(FetchConfig::from(merged))
    }
}

/// Resolved `fetch-boundary` configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Where the GeoJSON is written.
    pub output: Utf8PathBuf,
    /// Nominatim client settings.
    pub nominatim: NominatimConfig,
    /// Queries in the order they are tried.
    pub queries: Vec<String>,
}

impl From<FetchArgs> for FetchConfig {
    fn from(args: FetchArgs) -> Self {
        let root = args.root.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_ROOT));
        let output = args.output.unwrap_or_else(|| root.join(BOUNDARY_FILE));
        let nominatim = NominatimConfig::new(args.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()))
            .with_user_agent(args.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()))
            .with_timeout(Duration::from_secs(
                args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ));
        Self {
            output,
            nominatim,
            queries: BOUNDARY_QUERIES.iter().map(|query| (*query).to_owned()).collect(),
        }
    }
}

/// Run `fetch-boundary` with the process arguments; returns the saved path.
pub fn run() -> Result<Utf8PathBuf, CliError> {
    let args = FetchArgs::try_parse().map_err(CliError::ArgumentParsing)?;
    let config = args.into_config()?;
    let geocoder = NominatimGeocoder::with_config(config.nominatim.clone()).map_err(|source| {
        CliError::BuildGeocoder {
            endpoint: config.nominatim.endpoint.clone(),
            source,
        }
    })?;
    run_with(&config, &geocoder)
}

/// Fetch with an explicit geocoder and write the boundary.
///
/// The output file is only touched once a boundary has been selected.
pub fn run_with<G>(config: &FetchConfig, geocoder: &G) -> Result<Utf8PathBuf, CliError>
where
    G: Geocoder + ?Sized,
{
    let outcome = fetch_first_boundary(geocoder, &config.queries, &RegionFilter::default())
        .map_err(CliError::Fetch)?;
    info!("using result of {:?} (score {})", outcome.query, outcome.score);
    write_boundary(&config.output, &outcome.boundary)?;
    Ok(config.output.clone())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<FetchConfig, CliError> {
    let merged = FetchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    Ok(FetchConfig::from(merged))
}
