//! `LayerSource` over a GeoPackage file.

use std::path::{Path, PathBuf};

use bangalore_core::{GeometryKind, LayerData, LayerLoadError, LayerSource};
use geo::{Coord, Rect};
use log::{debug, warn};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use super::wkb::{Bounds, blob_extent};

/// A GeoPackage opened read-only.
#[derive(Debug)]
pub struct GeoPackageSource {
    path: PathBuf,
    conn: Connection,
}

struct Contents {
    data_type: String,
    extent: Option<Rect<f64>>,
}

struct GeometryColumn {
    name: String,
    type_name: String,
    srs_id: i32,
}

impl GeoPackageSource {
    /// Open the GeoPackage at `path` without write access.
    ///
    /// # Errors
    ///
    /// Returns [`LayerLoadError::Unavailable`] when the file cannot be opened
    /// as an SQLite database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LayerLoadError> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| LayerLoadError::Unavailable {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    fn contents(&self, table: &str) -> Result<Contents, LayerLoadError> {
        self.conn
            .query_row(
                "SELECT data_type, min_x, min_y, max_x, max_y
                 FROM gpkg_contents WHERE table_name = ?1",
                params![table],
                |row| {
                    let bounds: [Option<f64>; 4] =
                        [row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?];
                    Ok(Contents {
                        data_type: row.get(0)?,
                        extent: declared_extent(bounds),
                    })
                },
            )
            .optional()
            .map_err(|err| query_error(table, &err))?
            .ok_or_else(|| LayerLoadError::MissingTable {
                table: table.to_owned(),
            })
    }

    fn geometry_column(&self, table: &str) -> Result<GeometryColumn, LayerLoadError> {
        self.conn
            .query_row(
                "SELECT column_name, geometry_type_name, srs_id
                 FROM gpkg_geometry_columns WHERE table_name = ?1",
                params![table],
                |row| {
                    Ok(GeometryColumn {
                        name: row.get(0)?,
                        type_name: row.get(1)?,
                        srs_id: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|err| query_error(table, &err))?
            .ok_or_else(|| LayerLoadError::MissingGeometryColumn {
                table: table.to_owned(),
            })
    }

    fn scan(&self, table: &str, column: &str) -> Result<(u64, Bounds), LayerLoadError> {
        let sql = format!(
            "SELECT {} FROM {}",
            quote_identifier(column),
            quote_identifier(table)
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|err| query_error(table, &err))?;
        let mut rows = stmt.query([]).map_err(|err| query_error(table, &err))?;

        let mut count = 0_u64;
        let mut bounds = Bounds::default();
        while let Some(row) = rows.next().map_err(|err| query_error(table, &err))? {
            count += 1;
            let blob: Option<Vec<u8>> = row.get(0).map_err(|err| query_error(table, &err))?;
            let Some(blob) = blob else { continue };
            match blob_extent(&blob) {
                Ok(Some(rect)) => bounds.include_rect(rect),
                Ok(None) => {}
                Err(err) => warn!("{table}: skipping extent of feature {count}: {err}"),
            }
        }
        Ok((count, bounds))
    }
}

impl LayerSource for GeoPackageSource {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load_layer(&self, table: &str) -> Result<LayerData, LayerLoadError> {
        let contents = self.contents(table)?;
        if contents.data_type != "features" {
            return Err(LayerLoadError::NotFeatures {
                table: table.to_owned(),
                data_type: contents.data_type,
            });
        }
        let column = self.geometry_column(table)?;
        let (feature_count, bounds) = self.scan(table, &column.name)?;
        // Undecodable geometries fall back to the extent the file declares.
        let extent = bounds.rect().or(contents.extent);
        debug!(
            "loaded {table}: {feature_count} feature(s) of {}",
            column.type_name
        );
        Ok(LayerData {
            geometry: GeometryKind::from_type_name(&column.type_name),
            feature_count,
            extent,
            srs_id: column.srs_id,
        })
    }
}

fn query_error(table: &str, err: &rusqlite::Error) -> LayerLoadError {
    LayerLoadError::Query {
        table: table.to_owned(),
        message: err.to_string(),
    }
}

fn declared_extent(bounds: [Option<f64>; 4]) -> Option<Rect<f64>> {
    let [Some(min_x), Some(min_y), Some(max_x), Some(max_y)] = bounds else {
        return None;
    };
    if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
        return None;
    }
    Some(Rect::new(
        Coord { x: min_x, y: min_y },
        Coord { x: max_x, y: max_y },
    ))
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
