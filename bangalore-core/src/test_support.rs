//! Test doubles for the geocoder and layer source traits, used by unit and
//! behaviour tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use geo::Rect;

use crate::{
    Address, GeocodeError, Geocoder, GeometryKind, LayerData, LayerLoadError, LayerSource,
    PlaceCandidate,
};

/// Build a candidate with the given name, OSM class/type and address.
pub fn candidate_in(
    name: &str,
    class: &str,
    kind: &str,
    country: &str,
    state: &str,
) -> PlaceCandidate {
    PlaceCandidate {
        display_name: Some(name.to_owned()),
        osm_type: Some("relation".to_owned()),
        osm_id: None,
        class: Some(class.to_owned()),
        kind: Some(kind.to_owned()),
        address: Some(Address {
            country: Some(country.to_owned()),
            state: Some(state.to_owned()),
            state_district: None,
        }),
        geometry: None,
    }
}

/// `Geocoder` answering from a fixed script and recording every query.
///
/// Queries without a scripted answer return an empty result list.
#[derive(Debug, Default)]
pub struct ScriptedGeocoder {
    answers: HashMap<String, Result<Vec<PlaceCandidate>, GeocodeError>>,
    queries: RefCell<Vec<String>>,
}

impl ScriptedGeocoder {
    /// Answer `query` with `candidates`.
    #[must_use]
    pub fn with_candidates(mut self, query: &str, candidates: Vec<PlaceCandidate>) -> Self {
        self.answers.insert(query.to_owned(), Ok(candidates));
        self
    }

    /// Answer `query` with `error`.
    #[must_use]
    pub fn with_error(mut self, query: &str, error: GeocodeError) -> Self {
        self.answers.insert(query.to_owned(), Err(error));
        self
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

impl Geocoder for ScriptedGeocoder {
    fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        if query.trim().is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        self.queries.borrow_mut().push(query.to_owned());
        self.answers
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Layer metadata with one feature covering `extent`.
pub fn layer_data(geometry: GeometryKind, extent: Option<Rect<f64>>) -> LayerData {
    LayerData {
        geometry,
        feature_count: u64::from(extent.is_some()),
        extent,
        srs_id: 4326,
    }
}

/// In-memory `LayerSource` keyed by table name.
#[derive(Debug, Clone)]
pub struct MemoryLayerSource {
    path: PathBuf,
    tables: HashMap<String, LayerData>,
}

impl MemoryLayerSource {
    /// Create an empty source reporting `path` as its location.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tables: HashMap::new(),
        }
    }

    /// Add a table.
    #[must_use]
    pub fn with_table(mut self, table: &str, data: LayerData) -> Self {
        self.tables.insert(table.to_owned(), data);
        self
    }
}

impl LayerSource for MemoryLayerSource {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load_layer(&self, table: &str) -> Result<LayerData, LayerLoadError> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| LayerLoadError::MissingTable {
                table: table.to_owned(),
            })
    }
}
