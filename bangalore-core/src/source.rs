//! Layer source trait for reading vector tables from a data container.

use std::path::Path;

use geo::Rect;
use thiserror::Error;

use crate::GeometryKind;

/// Metadata describing one vector table.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerData {
    /// Geometry class of the table.
    pub geometry: GeometryKind,
    /// Number of rows.
    pub feature_count: u64,
    /// Bounding box of all non-empty geometries.
    pub extent: Option<Rect<f64>>,
    /// Spatial reference system id of the geometry column.
    pub srs_id: i32,
}

/// Errors raised when a table cannot be loaded as a layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerLoadError {
    /// The container could not be opened.
    #[error("failed to open {path}: {message}")]
    Unavailable {
        /// Container path.
        path: String,
        /// Backend message.
        message: String,
    },
    /// The table is not registered in the container.
    #[error("table {table:?} not found")]
    MissingTable {
        /// Requested table.
        table: String,
    },
    /// The table is registered but does not hold features.
    #[error("table {table:?} holds {data_type:?} rather than features")]
    NotFeatures {
        /// Requested table.
        table: String,
        /// Registered content type.
        data_type: String,
    },
    /// The table has no registered geometry column.
    #[error("table {table:?} has no geometry column")]
    MissingGeometryColumn {
        /// Requested table.
        table: String,
    },
    /// A query against the container failed.
    #[error("reading table {table:?} failed: {message}")]
    Query {
        /// Requested table.
        table: String,
        /// Backend message.
        message: String,
    },
}

/// Read-only access to the vector tables of a data container.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use bangalore_core::{GeometryKind, LayerData, LayerLoadError, LayerSource};
///
/// struct Empty;
///
/// impl LayerSource for Empty {
///     fn location(&self) -> &Path {
///         Path::new("empty.gpkg")
///     }
///
///     fn load_layer(&self, table: &str) -> Result<LayerData, LayerLoadError> {
///         Err(LayerLoadError::MissingTable { table: table.to_owned() })
///     }
/// }
///
/// assert!(Empty.load_layer("roads").is_err());
/// ```
pub trait LayerSource {
    /// Path of the container, used to build layer datasource URIs.
    fn location(&self) -> &Path;

    /// Load metadata for `table`.
    fn load_layer(&self, table: &str) -> Result<LayerData, LayerLoadError>;
}

impl<S: LayerSource + ?Sized> LayerSource for &S {
    fn location(&self) -> &Path {
        (**self).location()
    }

    fn load_layer(&self, table: &str) -> Result<LayerData, LayerLoadError> {
        (**self).load_layer(table)
    }
}
