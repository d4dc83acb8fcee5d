//! Place candidates returned by a geocoding search.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Address details attached to a candidate when `addressdetails=1` is
/// requested.
///
/// Only the fields used for region filtering are kept; everything else in the
/// provider payload is ignored during deserialisation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    /// Country name in the provider's display language.
    #[serde(default)]
    pub country: Option<String>,
    /// State or province.
    #[serde(default)]
    pub state: Option<String>,
    /// State district, used when `state` is absent.
    #[serde(default)]
    pub state_district: Option<String>,
}

impl Address {
    /// Return the state, falling back to the state district.
    ///
    /// Empty strings count as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bangalore_core::Address;
    ///
    /// let address = Address {
    ///     country: Some("India".into()),
    ///     state: Some(String::new()),
    ///     state_district: Some("Bangalore Urban".into()),
    /// };
    /// assert_eq!(address.region(), Some("Bangalore Urban"));
    /// ```
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        [self.state.as_deref(), self.state_district.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
    }
}

/// A single result record from a geocoding search.
///
/// Every field is optional because providers omit keys freely. The record
/// is transient: it lives for one fetch call and is either discarded or
/// turned into a [`BoundaryResult`](crate::BoundaryResult).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Human-readable label, e.g. `"Bengaluru, Karnataka, India"`.
    #[serde(default)]
    pub display_name: Option<String>,
    /// OSM element type (`node`, `way` or `relation`).
    #[serde(default)]
    pub osm_type: Option<String>,
    /// OSM element identifier.
    #[serde(default)]
    pub osm_id: Option<u64>,
    /// Main OSM tag key. The `jsonv2` format calls this `category`.
    #[serde(default, alias = "category")]
    pub class: Option<String>,
    /// Main OSM tag value, e.g. `administrative` or `city`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Structured address, present when address details were requested.
    #[serde(default)]
    pub address: Option<Address>,
    /// GeoJSON geometry of the place, kept verbatim.
    #[serde(default, rename = "geojson")]
    pub geometry: Option<Value>,
}

impl PlaceCandidate {
    /// Country from the address block, if any.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.address
            .as_ref()
            .and_then(|address| address.country.as_deref())
    }

    /// State (or state district) from the address block, if any.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.address.as_ref().and_then(Address::region)
    }
}
