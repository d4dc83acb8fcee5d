//! Fixed catalogue of layers, styles and basemaps for the Bangalore project.

use bangalore_core::{LayerStyle, Rgba};

/// Project title written into the document.
pub const PROJECT_TITLE: &str = "Bangalore Map";

/// Title of the layer the bookmark is taken from.
pub const BOUNDARY_TITLE: &str = "Bangalore Boundary";

/// Name of the bookmark covering the city boundary.
pub const BOOKMARK_NAME: &str = "Bangalore";

/// A GeoPackage table and the title it is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerEntry {
    /// Table name inside the GeoPackage.
    pub table: &'static str,
    /// Display title.
    pub title: &'static str,
}

/// Vector layers in load order; the first is drawn on top.
pub const VECTOR_LAYERS: [LayerEntry; 6] = [
    LayerEntry {
        table: "bangalore_boundary",
        title: BOUNDARY_TITLE,
    },
    LayerEntry {
        table: "bbmp_wards",
        title: "BBMP Wards",
    },
    LayerEntry {
        table: "roads",
        title: "Roads",
    },
    LayerEntry {
        table: "waterways",
        title: "Waterways",
    },
    LayerEntry {
        table: "landuse",
        title: "Landuse",
    },
    LayerEntry {
        table: "buildings",
        title: "Buildings",
    },
];

/// An XYZ basemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasemapEntry {
    /// Display name.
    pub name: &'static str,
    /// Tile URL template.
    pub url_template: &'static str,
}

/// Basemaps in registration order.
pub const BASEMAPS: [BasemapEntry; 3] = [
    BasemapEntry {
        name: "OpenStreetMap",
        url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
    },
    BasemapEntry {
        name: "ESRI Satellite",
        url_template: "https://services.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
    },
    BasemapEntry {
        name: "Carto Light",
        url_template: "https://cartodb-basemaps-a.global.ssl.fastly.net/light_all/{z}/{x}/{y}.png",
    },
];

const DEFAULT_STYLES: [(&str, LayerStyle); 6] = [
    (BOUNDARY_TITLE, LayerStyle::new(Rgba::new(0, 0, 0, 0))),
    ("BBMP Wards", LayerStyle::new(Rgba::new(255, 165, 0, 50))),
    (
        "Roads",
        LayerStyle::with_width(Rgba::new(60, 60, 60, 255), 0.8),
    ),
    (
        "Waterways",
        LayerStyle::with_width(Rgba::new(30, 144, 255, 255), 0.9),
    ),
    ("Landuse", LayerStyle::new(Rgba::new(34, 139, 34, 60))),
    ("Buildings", LayerStyle::new(Rgba::new(105, 105, 105, 120))),
];

/// Default style for a layer title, if the catalogue defines one.
///
/// # Examples
///
/// ```
/// use bangalore_core::Rgba;
/// use bangalore_qgis::catalogue::default_style;
///
/// let roads = default_style("Roads").expect("roads are styled");
/// assert_eq!(roads.color, Rgba::new(60, 60, 60, 255));
/// assert_eq!(roads.line_width, Some(0.8));
/// assert!(default_style("Unknown").is_none());
/// ```
#[must_use]
pub fn default_style(title: &str) -> Option<LayerStyle> {
    DEFAULT_STYLES
        .iter()
        .find(|(name, _)| *name == title)
        .map(|(_, style)| *style)
}
