//! QGIS project assembly for the Bangalore map.
//!
//! The crate provides two complementary capabilities:
//! - **Project building** loads the catalogued GeoPackage tables into an
//!   owned [`Project`](bangalore_core::Project), applies default styles,
//!   registers XYZ basemaps flagged with `isBasemap`, bookmarks the city
//!   boundary and sets the initial view. Optional steps never fail the
//!   build; each is recorded in a [`BuildReport`](bangalore_core::BuildReport).
//! - **Project writing** serialises the project as a `.qgs` XML document or
//!   a `.qgz` archive, replacing the target atomically.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use bangalore_qgis::{BuildOptions, build_and_write};
//!
//! let outcome = build_and_write(
//!     Utf8Path::new("data/bangalore.gpkg"),
//!     Utf8Path::new("bangalore.qgz"),
//!     &BuildOptions::default(),
//! )
//! .expect("write project");
//! assert!(outcome.project.layers().len() >= 3);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
pub mod catalogue;
mod writer;

pub use builder::{
    BASEMAP_PROPERTY, BuildOptions, BuildOutcome, build_and_write, build_from_geopackage,
    build_project,
};
pub use writer::{ProjectFormat, ProjectWriteError, read_project_document, write_project};
