//! Persisting the selected boundary as GeoJSON.

use std::io::{self, Read, Write};

use bangalore_core::BoundaryResult;
use bangalore_fs::{open_utf8_file, write_atomically};
use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use thiserror::Error;

/// Errors raised while writing or reading a boundary file.
#[derive(Debug, Error)]
pub enum PersistBoundaryError {
    /// The boundary could not be encoded as JSON.
    #[error("failed to encode boundary for {path}")]
    Encode {
        /// Target path.
        path: Utf8PathBuf,
        /// Encoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The file could not be written or read.
    #[error("failed to access boundary file {path}")]
    Io {
        /// File path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not a boundary FeatureCollection.
    #[error("failed to parse boundary file {path}")]
    Parse {
        /// File path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Atomically write `boundary` to `path` as compact GeoJSON.
///
/// Parent directories are created. When the boundary has no geometry the
/// file is still written, with a `null` geometry, and a warning is logged.
///
/// # Examples
///
/// ```
/// use bangalore_core::{BoundaryResult, PlaceCandidate};
/// use bangalore_data::{read_boundary, write_boundary};
/// use camino::Utf8PathBuf;
///
/// let dir = tempfile::tempdir()?;
/// let path = Utf8PathBuf::from_path_buf(dir.path().join("raw/boundary.geojson"))
///     .expect("utf-8 temp dir");
/// let boundary = BoundaryResult::from_candidate(PlaceCandidate::default());
///
/// write_boundary(&path, &boundary)?;
/// assert_eq!(read_boundary(&path)?, boundary);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_boundary(
    path: &Utf8Path,
    boundary: &BoundaryResult,
) -> Result<(), PersistBoundaryError> {
    if !boundary.has_geometry() {
        warn!("boundary for {path} has no geometry; writing a null geometry");
    }
    let bytes = serde_json::to_vec(boundary).map_err(|source| PersistBoundaryError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomically(path, |file| file.write_all(&bytes)).map_err(|source| {
        PersistBoundaryError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!("wrote {} bytes to {path}", bytes.len());
    Ok(())
}

/// Read a boundary file written by [`write_boundary`].
pub fn read_boundary(path: &Utf8Path) -> Result<BoundaryResult, PersistBoundaryError> {
    let io_error = |source| PersistBoundaryError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut text = String::new();
    open_utf8_file(path)
        .and_then(|mut file| file.read_to_string(&mut text))
        .map_err(io_error)?;
    serde_json::from_str(&text).map_err(|source| PersistBoundaryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bangalore_core::PlaceCandidate;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temporary directory")
    }

    fn target(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join("data/raw/bbmp-boundary.geojson"))
            .expect("utf-8 temp dir")
    }

    fn boundary(name: &str) -> BoundaryResult {
        BoundaryResult::from_candidate(PlaceCandidate {
            display_name: Some(name.to_owned()),
            geometry: Some(json!({"type": "Point", "coordinates": [77.59, 12.97]})),
            ..PlaceCandidate::default()
        })
    }

    #[rstest]
    fn writes_one_feature_with_verbatim_name(temp_dir: TempDir) {
        let path = target(&temp_dir);
        let name = "Bengaluru, Bangalore North, Karnataka, 560001, India";

        write_boundary(&path, &boundary(name)).expect("write succeeds");

        let text = std::fs::read_to_string(&path).expect("read back");
        let value: Value = serde_json::from_str(&text).expect("valid json");
        let features = value["features"].as_array().expect("features array");
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["display_name"], name);
    }

    #[rstest]
    fn overwrites_previous_boundary(temp_dir: TempDir) {
        let path = target(&temp_dir);
        write_boundary(&path, &boundary("first")).expect("first write");

        write_boundary(&path, &boundary("second")).expect("second write");

        let read = read_boundary(&path).expect("read back");
        let feature = read.feature().expect("feature");
        assert_eq!(feature.properties.display_name.as_deref(), Some("second"));
    }

    #[rstest]
    fn reading_garbage_is_a_parse_error(temp_dir: TempDir) {
        let path = target(&temp_dir);
        bangalore_fs::ensure_parent_dir(&path).expect("create parent");
        std::fs::write(&path, "not json").expect("seed file");

        let err = read_boundary(&path).expect_err("should fail");

        assert!(matches!(err, PersistBoundaryError::Parse { .. }));
    }

    #[rstest]
    fn reading_missing_file_is_an_io_error(temp_dir: TempDir) {
        let err = read_boundary(&target(&temp_dir)).expect_err("should fail");

        assert!(matches!(err, PersistBoundaryError::Io { .. }));
    }
}
