//! Read-only GeoPackage layer source.
//!
//! [`GeoPackageSource`] opens a GeoPackage with `rusqlite` and implements
//! [`bangalore_core::LayerSource`]: a table loads when it is registered as
//! `features` in `gpkg_contents` and has a `gpkg_geometry_columns` entry.
//! Its extent is computed from the stored geometries.

mod reader;
mod wkb;

#[doc(hidden)]
pub mod test_support;

pub use reader::GeoPackageSource;
pub use wkb::{BlobError, blob_extent};
