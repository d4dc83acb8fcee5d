//! Adapters for the Bangalore map tooling.
//!
//! Responsibilities:
//! - Implement the core traits against real services and files: the
//!   Nominatim geocoder and the GeoPackage layer source.
//! - Persist the selected boundary as GeoJSON.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `bangalore-core`).
//! - Keep blocking I/O off async executors; the geocoder owns its runtime.
//!
//! Invariants:
//! - Output files are replaced atomically.
//! - No global mutable state.

pub mod boundary_file;
pub mod geopackage;
pub mod nominatim;

pub use boundary_file::{PersistBoundaryError, read_boundary, write_boundary};
pub use geopackage::GeoPackageSource;
pub use nominatim::{NominatimConfig, NominatimGeocoder, ProviderBuildError};
