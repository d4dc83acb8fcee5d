//! Test helpers for laying out project roots and scripted geocoders.

use bangalore_core::test_support::{ScriptedGeocoder, candidate_in};
use bangalore_data::geopackage::test_support::{GeoPackageBuilder, gpkg, multi, rectangle};
use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use serde_json::json;
use tempfile::TempDir;

pub(super) const CITY_MIN: Coord<f64> = Coord { x: 77.46, y: 12.83 };
pub(super) const CITY_MAX: Coord<f64> = Coord { x: 77.78, y: 13.14 };

/// Temporary project root.
pub(super) struct ProjectRoot {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl ProjectRoot {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 root");
        Self { _dir: dir, path }
    }

    pub(super) fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Write a GeoPackage holding only the boundary table at the default path.
    pub(super) fn write_boundary_gpkg(&self) -> Utf8PathBuf {
        let gpkg_path = self.path.join(crate::build::GPKG_FILE);
        std::fs::create_dir_all(gpkg_path.parent().expect("parent")).expect("create data dir");
        GeoPackageBuilder::create(gpkg_path.as_std_path())
            .and_then(|b| {
                b.feature_table(
                    "bangalore_boundary",
                    "MULTIPOLYGON",
                    &[gpkg(&multi(6, &[rectangle(CITY_MIN, CITY_MAX)]))],
                )
            })
            .expect("write GeoPackage fixture");
        gpkg_path
    }
}

/// Write `bytes` to `path`, creating parents.
pub(super) fn write_utf8(path: &Utf8Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, bytes).expect("write file");
}

/// Geocoder that knows Bangalore under its second query only.
pub(super) fn geocoder_answering_second_query() -> ScriptedGeocoder {
    let mut boundary = candidate_in(
        "Bengaluru, Bangalore North, Karnataka, India",
        "boundary",
        "administrative",
        "India",
        "Karnataka",
    );
    boundary.geometry = Some(json!({
        "type": "Polygon",
        "coordinates": [[[77.46, 12.83], [77.78, 12.83], [77.78, 13.14], [77.46, 12.83]]]
    }));
    ScriptedGeocoder::default().with_candidates(
        crate::fetch::BOUNDARY_QUERIES
            .get(1)
            .copied()
            .expect("three queries"),
        vec![boundary],
    )
}
