//! Core domain types for the Bangalore map tooling.
//!
//! The crate holds everything that does not touch the network or the
//! filesystem: geocoding results and the boundary-selection heuristic, the
//! owned QGIS project model, layer styles and the build report used by the
//! project builder. Adapters live in `bangalore-data`; the build pipeline and
//! project writers live in `bangalore-qgis`.

pub mod boundary;
pub mod geocoder;
pub mod place;
pub mod project;
pub mod report;
pub mod selection;
pub mod source;
pub mod style;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use boundary::{BoundaryFeature, BoundaryProperties, BoundaryResult};
pub use geocoder::{
    FetchError, FetchOutcome, GeocodeError, Geocoder, fetch_boundary, fetch_first_boundary,
};
pub use place::{Address, PlaceCandidate};
pub use project::{
    Bookmark, BookmarkError, Crs, GeometryKind, LayerId, LayerTree, LayerTreeNode, MapLayer,
    Project, ProjectError, PropertyValue, RasterLayer, VectorLayer, VectorSource, XyzSource,
    XyzSourceError,
};
pub use report::{BuildReport, BuildStep, StepOutcome, StepRecord};
pub use selection::{RegionFilter, ScoredCandidate, SelectionError, rank_candidates, select_best};
pub use source::{LayerData, LayerLoadError, LayerSource};
pub use style::{LayerStyle, Rgba, StyleError, Symbol};
