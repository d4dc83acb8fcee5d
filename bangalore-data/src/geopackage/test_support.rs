//! Builders for small GeoPackage fixtures.
//!
//! [`GeoPackageBuilder`] writes just enough of the GeoPackage schema for
//! [`GeoPackageSource`](super::GeoPackageSource) to treat a table as a layer.
//! The free functions encode little-endian WKB and GeoPackage blobs.

use std::path::Path;

use geo::Coord;
use rusqlite::{Connection, params};

/// Writes a minimal GeoPackage.
///
/// # Example
///
/// ```
/// use bangalore_data::geopackage::test_support::{GeoPackageBuilder, gpkg, point};
/// use geo::Coord;
///
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("fixture.gpkg");
/// GeoPackageBuilder::create(&path)?
///     .feature_table("pois", "POINT", &[gpkg(&point(Coord { x: 1.0, y: 2.0 }))])?;
/// assert!(path.exists());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct GeoPackageBuilder {
    conn: Connection,
}

impl GeoPackageBuilder {
    /// Create the metadata tables at `path`.
    pub fn create(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA application_id = 1196444487;
             CREATE TABLE gpkg_spatial_ref_sys (
                 srs_name TEXT NOT NULL,
                 srs_id INTEGER PRIMARY KEY,
                 organization TEXT NOT NULL,
                 organization_coordsys_id INTEGER NOT NULL,
                 definition TEXT NOT NULL,
                 description TEXT
             );
             INSERT INTO gpkg_spatial_ref_sys VALUES
                 ('WGS 84 geodetic', 4326, 'EPSG', 4326, 'GEOGCS[\"WGS 84\"]', NULL);
             CREATE TABLE gpkg_contents (
                 table_name TEXT NOT NULL PRIMARY KEY,
                 data_type TEXT NOT NULL,
                 identifier TEXT UNIQUE,
                 description TEXT DEFAULT '',
                 last_change DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
                 min_x DOUBLE, min_y DOUBLE, max_x DOUBLE, max_y DOUBLE,
                 srs_id INTEGER
             );
             CREATE TABLE gpkg_geometry_columns (
                 table_name TEXT NOT NULL,
                 column_name TEXT NOT NULL,
                 geometry_type_name TEXT NOT NULL,
                 srs_id INTEGER NOT NULL,
                 z TINYINT NOT NULL,
                 m TINYINT NOT NULL,
                 CONSTRAINT pk_geom_cols PRIMARY KEY (table_name, column_name)
             );",
        )?;
        Ok(Self { conn })
    }

    /// Add a feature table whose `geom` column holds `blobs`.
    pub fn feature_table(
        self,
        table: &str,
        geometry_type: &str,
        blobs: &[Vec<u8>],
    ) -> rusqlite::Result<Self> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE \"{table}\" (fid INTEGER PRIMARY KEY AUTOINCREMENT, geom BLOB, name TEXT);"
        ))?;
        self.conn.execute(
            "INSERT INTO gpkg_contents (table_name, data_type, identifier, srs_id)
             VALUES (?1, 'features', ?1, 4326)",
            params![table],
        )?;
        self.conn.execute(
            "INSERT INTO gpkg_geometry_columns VALUES (?1, 'geom', ?2, 4326, 0, 0)",
            params![table, geometry_type],
        )?;
        for blob in blobs {
            self.conn.execute(
                &format!("INSERT INTO \"{table}\" (geom) VALUES (?1)"),
                params![blob],
            )?;
        }
        Ok(self)
    }

    /// Record the extent `gpkg_contents` declares for `table`.
    pub fn contents_extent(
        self,
        table: &str,
        min: Coord<f64>,
        max: Coord<f64>,
    ) -> rusqlite::Result<Self> {
        self.conn.execute(
            "UPDATE gpkg_contents SET min_x = ?2, min_y = ?3, max_x = ?4, max_y = ?5
             WHERE table_name = ?1",
            params![table, min.x, min.y, max.x, max.y],
        )?;
        Ok(self)
    }

    /// Add a non-spatial table registered as `attributes`.
    pub fn attribute_table(self, table: &str) -> rusqlite::Result<Self> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE \"{table}\" (id INTEGER PRIMARY KEY, value TEXT);"
        ))?;
        self.conn.execute(
            "INSERT INTO gpkg_contents (table_name, data_type, identifier)
             VALUES (?1, 'attributes', ?1)",
            params![table],
        )?;
        Ok(self)
    }

    /// Register `table` as features without a geometry column entry.
    pub fn unregistered_geometry(self, table: &str) -> rusqlite::Result<Self> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE \"{table}\" (fid INTEGER PRIMARY KEY, geom BLOB);"
        ))?;
        self.conn.execute(
            "INSERT INTO gpkg_contents (table_name, data_type, identifier)
             VALUES (?1, 'features', ?1)",
            params![table],
        )?;
        Ok(self)
    }
}

/// Little-endian WKB point.
#[must_use]
pub fn point(coord: Coord<f64>) -> Vec<u8> {
    let mut out = header(1);
    push_coord(&mut out, coord);
    out
}

/// Little-endian WKB line string.
#[must_use]
pub fn line_string(coords: &[Coord<f64>]) -> Vec<u8> {
    let mut out = header(2);
    push_sequence(&mut out, coords);
    out
}

/// Little-endian WKB polygon with a single ring.
#[must_use]
pub fn polygon(ring: &[Coord<f64>]) -> Vec<u8> {
    let mut out = header(3);
    out.extend_from_slice(&1_u32.to_le_bytes());
    push_sequence(&mut out, ring);
    out
}

/// Little-endian WKB collection of type `code` (4 to 7, or 9 to 12) wrapping `parts`.
#[must_use]
pub fn multi(code: u32, parts: &[Vec<u8>]) -> Vec<u8> {
    let mut out = header(code);
    push_len(&mut out, parts.len());
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// Rectangle polygon spanning `min` to `max`.
#[must_use]
pub fn rectangle(min: Coord<f64>, max: Coord<f64>) -> Vec<u8> {
    polygon(&[
        min,
        Coord { x: max.x, y: min.y },
        max,
        Coord { x: min.x, y: max.y },
        min,
    ])
}

/// GeoPackage blob wrapping `wkb` without an envelope.
#[must_use]
pub fn gpkg(wkb: &[u8]) -> Vec<u8> {
    let mut out = gpkg_header(0x01);
    out.extend_from_slice(wkb);
    out
}

/// GeoPackage blob with an XY envelope.
#[must_use]
pub fn gpkg_with_envelope(wkb: &[u8], min: Coord<f64>, max: Coord<f64>) -> Vec<u8> {
    let mut out = gpkg_header(0x03);
    for value in [min.x, max.x, min.y, max.y] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(wkb);
    out
}

/// GeoPackage blob flagged as an empty geometry.
#[must_use]
pub fn gpkg_empty() -> Vec<u8> {
    let mut out = gpkg_header(0x11);
    out.extend_from_slice(&point(Coord {
        x: f64::NAN,
        y: f64::NAN,
    }));
    out
}

fn gpkg_header(flags: u8) -> Vec<u8> {
    let mut out = vec![b'G', b'P', 0, flags];
    out.extend_from_slice(&4326_u32.to_le_bytes());
    out
}

fn header(code: u32) -> Vec<u8> {
    let mut out = vec![1];
    out.extend_from_slice(&code.to_le_bytes());
    out
}

fn push_len(out: &mut Vec<u8>, len: usize) {
    out.extend_from_slice(&u32::try_from(len).unwrap_or(u32::MAX).to_le_bytes());
}

fn push_sequence(out: &mut Vec<u8>, coords: &[Coord<f64>]) {
    push_len(out, coords.len());
    for coord in coords {
        push_coord(out, *coord);
    }
}

fn push_coord(out: &mut Vec<u8>, coord: Coord<f64>) {
    out.extend_from_slice(&coord.x.to_le_bytes());
    out.extend_from_slice(&coord.y.to_le_bytes());
}
