//! `build-project`: assemble the QGIS project from the processed GeoPackage.

use bangalore_fs::{DirState, dir_state};
use bangalore_qgis::{BuildOptions, BuildOutcome, build_and_write};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_ROOT, CliError, DEFAULT_ROOT};

pub(crate) const ARG_GPKG: &str = "gpkg";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_TITLE: &str = "title";

/// GeoPackage path relative to the project root.
pub const GPKG_FILE: &str = "data/processed/bangalore.gpkg";

/// Project path relative to the project root.
pub const PROJECT_FILE: &str = "project/bangalore_map.qgz";

/// CLI arguments for `build-project`.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "build-project",
    long_about = "Build the Bangalore QGIS project from the processed \
                 GeoPackage: styled vector layers, XYZ basemaps and a \
                 bookmark on the city boundary. A .qgz output is zipped; \
                 a .qgs output is plain XML.",
    about = "Build the Bangalore QGIS project",
    version
)]
#[ortho_config(prefix = "BANGALORE_MAP")]
pub struct BuildArgs {
    /// Project root; also the project's home path.
    #[arg(long = ARG_ROOT, value_name = "dir")]
    #[serde(default)]
    pub root: Option<Utf8PathBuf>,
    /// Override the GeoPackage path.
    #[arg(long = ARG_GPKG, value_name = "path")]
    #[serde(default)]
    pub gpkg: Option<Utf8PathBuf>,
    /// Override the project output path (.qgz or .qgs).
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub output: Option<Utf8PathBuf>,
    /// Override the project title.
    #[arg(long = ARG_TITLE, value_name = "text")]
    #[serde(default)]
    pub title: Option<String>,
}

impl BuildArgs {
    fn into_config(self) -> Result<BuildConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(BuildConfig::from(merged))
    }
}

/// Resolved `build-project` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Project root.
    pub root: Utf8PathBuf,
    /// GeoPackage to read.
    pub gpkg: Utf8PathBuf,
    /// Project file to write.
    pub output: Utf8PathBuf,
    /// Title written into the project.
    pub title: Option<String>,
}

impl From<BuildArgs> for BuildConfig {
    fn from(args: BuildArgs) -> Self {
        let root = args.root.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_ROOT));
        let gpkg = args.gpkg.unwrap_or_else(|| root.join(GPKG_FILE));
        let output = args.output.unwrap_or_else(|| root.join(PROJECT_FILE));
        Self {
            root,
            gpkg,
            output,
            title: args.title,
        }
    }
}

impl BuildConfig {
    /// Check the root is usable and resolve the build options.
    ///
    /// A missing root is fine: the build skips vector layers and the writer
    /// creates the output directories. A root that exists but is not a
    /// directory is fatal.
    pub fn resolve_environment(&self) -> Result<BuildOptions, CliError> {
        let unusable = |reason: String| CliError::EnvironmentMissing {
            path: self.root.clone(),
            reason,
        };
        let home = match dir_state(&self.root).map_err(|err| unusable(err.to_string()))? {
            DirState::Directory => self
                .root
                .canonicalize_utf8()
                .map_err(|err| unusable(err.to_string()))?,
            DirState::Missing => {
                warn!("project root {} does not exist", self.root);
                self.root.clone()
            }
            DirState::NotDirectory => return Err(unusable("not a directory".to_owned())),
        };
        let mut options = BuildOptions {
            home_path: Some(home.into_std_path_buf()),
            ..BuildOptions::default()
        };
        if let Some(title) = &self.title {
            options.title.clone_from(title);
        }
        Ok(options)
    }
}

/// Run `build-project` with the process arguments; returns the written path.
pub fn run() -> Result<Utf8PathBuf, CliError> {
    let args = BuildArgs::try_parse().map_err(CliError::ArgumentParsing)?;
    let config = args.into_config()?;
    run_with(&config).map(|_| config.output)
}

/// Build and write the project for a resolved configuration.
pub fn run_with(config: &BuildConfig) -> Result<BuildOutcome, CliError> {
    let options = config.resolve_environment()?;
    let gpkg = absolute_in(&config.root, &config.gpkg);
    let outcome = build_and_write(&gpkg, &config.output, &options).map_err(|source| {
        CliError::WriteProject {
            path: config.output.clone(),
            source,
        }
    })?;
    let skipped = outcome.report.skipped_records().count();
    info!(
        "built {} layer(s); {skipped} step(s) skipped",
        outcome.project.layers().len()
    );
    Ok(outcome)
}

/// Re-anchor a root-relative `path` on the canonical root, matching the
/// project's home path.
fn absolute_in(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    root.canonicalize_utf8()
        .ok()
        .and_then(|abs_root| {
            path.strip_prefix(root)
                .ok()
                .map(|relative| abs_root.join(relative))
        })
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<BuildConfig, CliError> {
    let merged = BuildArgs::merge_from_layers(layers).map_err(CliError::from)?;
    Ok(BuildConfig::from(merged))
}
