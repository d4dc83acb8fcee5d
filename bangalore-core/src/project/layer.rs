//! Map layers held by a [`Project`](super::Project).

use std::fmt;
use std::path::PathBuf;

use geo::Rect;
use thiserror::Error;
use url::Url;

use crate::{LayerData, Symbol};

/// Broad geometry class of a vector layer, as QGIS sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// Points and multi-points.
    Point,
    /// Line strings, curves and their multi variants.
    Line,
    /// Polygons, surfaces and their multi variants.
    Polygon,
    /// Generic or unrecognised geometry columns.
    Unknown,
}

impl GeometryKind {
    /// Classify a GeoPackage `geometry_type_name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bangalore_core::GeometryKind;
    ///
    /// assert_eq!(GeometryKind::from_type_name("MULTIPOLYGON"), GeometryKind::Polygon);
    /// assert_eq!(GeometryKind::from_type_name("linestring"), GeometryKind::Line);
    /// assert_eq!(GeometryKind::from_type_name("GEOMETRY"), GeometryKind::Unknown);
    /// ```
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "POINT" | "MULTIPOINT" => Self::Point,
            "LINESTRING" | "MULTILINESTRING" | "CIRCULARSTRING" | "COMPOUNDCURVE" | "CURVE"
            | "MULTICURVE" => Self::Line,
            "POLYGON" | "MULTIPOLYGON" | "CURVEPOLYGON" | "SURFACE" | "MULTISURFACE" => {
                Self::Polygon
            }
            _ => Self::Unknown,
        }
    }

    /// Name used by QGIS in `<maplayer geometry="...">`.
    #[must_use]
    pub const fn qgis_name(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Line => "Line",
            Self::Polygon => "Polygon",
            Self::Unknown => "Unknown geometry",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qgis_name())
    }
}

/// Stable identifier of a layer within one project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(String);

impl LayerId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A table inside a GeoPackage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorSource {
    /// GeoPackage file.
    pub path: PathBuf,
    /// Feature table name.
    pub table: String,
}

impl VectorSource {
    /// OGR datasource URI, `<path>|layername=<table>`.
    #[must_use]
    pub fn uri(&self) -> String {
        format!("{}|layername={}", self.path.display(), self.table)
    }
}

/// A vector layer loaded from a GeoPackage table.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorLayer {
    /// Layer identifier.
    pub id: LayerId,
    /// Display title.
    pub name: String,
    /// Where the features live.
    pub source: VectorSource,
    /// Metadata read from the table.
    pub data: LayerData,
    /// Renderer symbol; `None` keeps the QGIS default.
    pub symbol: Option<Symbol>,
}

/// Reasons an XYZ source is not usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XyzSourceError {
    /// The template is not a URL.
    #[error("tile template {template:?} is not a valid URL: {message}")]
    InvalidUrl {
        /// Offending template.
        template: String,
        /// Parser message.
        message: String,
    },
    /// The URL scheme is not HTTP(S).
    #[error("tile template {template:?} uses unsupported scheme {scheme:?}")]
    UnsupportedScheme {
        /// Offending template.
        template: String,
        /// Scheme found.
        scheme: String,
    },
    /// A tile placeholder is missing.
    #[error("tile template {template:?} is missing the {placeholder} placeholder")]
    MissingPlaceholder {
        /// Offending template.
        template: String,
        /// Placeholder that was not found.
        placeholder: &'static str,
    },
}

/// An XYZ tile source addressed by `{z}/{x}/{y}` URL templating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XyzSource {
    /// URL template containing `{z}`, `{x}` and `{y}`.
    pub url_template: String,
    /// Minimum zoom level.
    pub zmin: u8,
    /// Maximum zoom level.
    pub zmax: u8,
}

impl XyzSource {
    /// Build a source with the default zoom range 0..=19.
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            zmin: 0,
            zmax: 19,
        }
    }

    /// Check the template is an HTTP(S) URL carrying every tile placeholder.
    ///
    /// # Examples
    ///
    /// ```
    /// use bangalore_core::XyzSource;
    ///
    /// let osm = XyzSource::new("https://tile.openstreetmap.org/{z}/{x}/{y}.png");
    /// assert!(osm.validate().is_ok());
    /// assert!(XyzSource::new("https://example.com/{z}/{x}.png").validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), XyzSourceError> {
        let template = &self.url_template;
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !template.contains(placeholder) {
                return Err(XyzSourceError::MissingPlaceholder {
                    template: template.clone(),
                    placeholder,
                });
            }
        }
        let parsed = Url::parse(template).map_err(|err| XyzSourceError::InvalidUrl {
            template: template.clone(),
            message: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(XyzSourceError::UnsupportedScheme {
                template: template.clone(),
                scheme: parsed.scheme().to_owned(),
            });
        }
        Ok(())
    }

    /// WMS-provider datasource URI understood by QGIS.
    #[must_use]
    pub fn uri(&self) -> String {
        format!(
            "type=xyz&url={}&zmax={}&zmin={}",
            self.url_template, self.zmax, self.zmin
        )
    }
}

/// A raster basemap layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterLayer {
    /// Layer identifier.
    pub id: LayerId,
    /// Display title.
    pub name: String,
    /// Tile source.
    pub source: XyzSource,
}

/// Any layer a project can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum MapLayer {
    /// GeoPackage-backed vector layer.
    Vector(VectorLayer),
    /// XYZ raster basemap.
    Raster(RasterLayer),
}

impl MapLayer {
    /// Layer identifier.
    #[must_use]
    pub const fn id(&self) -> &LayerId {
        match self {
            Self::Vector(layer) => &layer.id,
            Self::Raster(layer) => &layer.id,
        }
    }

    /// Display title.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Vector(layer) => &layer.name,
            Self::Raster(layer) => &layer.name,
        }
    }

    /// Bounding extent; rasters report none.
    #[must_use]
    pub const fn extent(&self) -> Option<Rect<f64>> {
        match self {
            Self::Vector(layer) => layer.data.extent,
            Self::Raster(_) => None,
        }
    }

    /// The vector layer, if this is one.
    #[must_use]
    pub const fn as_vector(&self) -> Option<&VectorLayer> {
        match self {
            Self::Vector(layer) => Some(layer),
            Self::Raster(_) => None,
        }
    }
}

impl From<VectorLayer> for MapLayer {
    fn from(layer: VectorLayer) -> Self {
        Self::Vector(layer)
    }
}

impl From<RasterLayer> for MapLayer {
    fn from(layer: RasterLayer) -> Self {
        Self::Raster(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("POINT", GeometryKind::Point)]
    #[case("MultiPoint", GeometryKind::Point)]
    #[case("MULTILINESTRING", GeometryKind::Line)]
    #[case("COMPOUNDCURVE", GeometryKind::Line)]
    #[case("POLYGON", GeometryKind::Polygon)]
    #[case("MULTISURFACE", GeometryKind::Polygon)]
    #[case("GEOMETRYCOLLECTION", GeometryKind::Unknown)]
    fn classifies_type_names(#[case] name: &str, #[case] expected: GeometryKind) {
        assert_eq!(GeometryKind::from_type_name(name), expected);
    }

    #[rstest]
    fn vector_source_uri_names_table() {
        let source = VectorSource {
            path: PathBuf::from("/data/bangalore.gpkg"),
            table: "roads".into(),
        };

        assert_eq!(source.uri(), "/data/bangalore.gpkg|layername=roads");
    }

    #[rstest]
    #[case("https://tile.openstreetmap.org/{z}/{x}/{y}.png")]
    #[case("https://services.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}")]
    #[case("http://localhost:8080/{z}/{x}/{y}.png")]
    fn accepts_tile_templates(#[case] template: &str) {
        assert_eq!(XyzSource::new(template).validate(), Ok(()));
    }

    #[rstest]
    fn rejects_missing_placeholder() {
        let err = XyzSource::new("https://tile.example.com/{z}/{x}.png")
            .validate()
            .expect_err("missing {y}");

        assert!(matches!(
            err,
            XyzSourceError::MissingPlaceholder { placeholder: "{y}", .. }
        ));
    }

    #[rstest]
    fn rejects_non_http_scheme() {
        let err = XyzSource::new("file:///tiles/{z}/{x}/{y}.png")
            .validate()
            .expect_err("file scheme");

        assert!(matches!(err, XyzSourceError::UnsupportedScheme { .. }));
    }

    #[rstest]
    fn rejects_relative_template() {
        let err = XyzSource::new("tiles/{z}/{x}/{y}.png")
            .validate()
            .expect_err("not a URL");

        assert!(matches!(err, XyzSourceError::InvalidUrl { .. }));
    }

    #[rstest]
    fn uri_carries_zoom_range() {
        let source = XyzSource::new("https://tile.openstreetmap.org/{z}/{x}/{y}.png");

        assert_eq!(
            source.uri(),
            "type=xyz&url=https://tile.openstreetmap.org/{z}/{x}/{y}.png&zmax=19&zmin=0"
        );
    }
}
