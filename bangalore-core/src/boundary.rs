//! GeoJSON representation of a selected boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PlaceCandidate;

/// Properties copied from the winning candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundaryProperties {
    /// Candidate display name, verbatim.
    pub display_name: Option<String>,
    /// OSM element type.
    pub osm_type: Option<String>,
    /// OSM element identifier.
    pub osm_id: Option<u64>,
    /// Main OSM tag key.
    pub class: Option<String>,
    /// Main OSM tag value.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// The single feature of a [`BoundaryResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct BoundaryFeature {
    /// Display metadata.
    pub properties: BoundaryProperties,
    /// Geometry from the provider. Serialised as `null` when absent.
    pub geometry: Option<Value>,
}

/// A GeoJSON `FeatureCollection` holding exactly one boundary feature.
///
/// # Examples
///
/// ```
/// use bangalore_core::{BoundaryResult, PlaceCandidate};
///
/// let candidate = PlaceCandidate {
///     display_name: Some("Bengaluru".into()),
///     ..PlaceCandidate::default()
/// };
/// let result = BoundaryResult::from_candidate(candidate);
/// let json = serde_json::to_value(&result).unwrap();
/// assert_eq!(json["type"], "FeatureCollection");
/// assert_eq!(json["features"][0]["properties"]["display_name"], "Bengaluru");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct BoundaryResult {
    /// Features of the collection. Results built by
    /// [`BoundaryResult::from_candidate`] hold exactly one.
    pub features: Vec<BoundaryFeature>,
}

impl BoundaryResult {
    /// Wrap a selected candidate as a one-feature collection.
    #[must_use]
    pub fn from_candidate(candidate: PlaceCandidate) -> Self {
        let PlaceCandidate {
            display_name,
            osm_type,
            osm_id,
            class,
            kind,
            geometry,
            ..
        } = candidate;
        Self {
            features: vec![BoundaryFeature {
                properties: BoundaryProperties {
                    display_name,
                    osm_type,
                    osm_id,
                    class,
                    kind,
                },
                geometry,
            }],
        }
    }

    /// The boundary feature, if the collection is not empty.
    #[must_use]
    pub fn feature(&self) -> Option<&BoundaryFeature> {
        self.features.first()
    }

    /// Whether the boundary carries a geometry.
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.feature()
            .is_some_and(|feature| feature.geometry.is_some())
    }
}
