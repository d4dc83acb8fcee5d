//! Facade crate for the Bangalore map tooling.
//!
//! This crate re-exports the boundary-fetching and project-building APIs so
//! callers can depend on a single crate.

#![forbid(unsafe_code)]

pub use bangalore_core::{
    BoundaryResult, BuildReport, BuildStep, FetchError, FetchOutcome, GeocodeError, Geocoder,
    LayerSource, PlaceCandidate, Project, RegionFilter, StepOutcome, fetch_boundary,
    fetch_first_boundary, select_best,
};
pub use bangalore_data::{
    GeoPackageSource, NominatimConfig, NominatimGeocoder, PersistBoundaryError, read_boundary,
    write_boundary,
};
pub use bangalore_qgis::{
    BuildOptions, BuildOutcome, ProjectFormat, ProjectWriteError, build_and_write,
    build_from_geopackage, build_project, write_project,
};
