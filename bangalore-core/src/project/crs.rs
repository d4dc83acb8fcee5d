//! Coordinate reference systems identified by EPSG code.

use std::fmt;

/// A coordinate reference system identified by its EPSG code.
///
/// # Examples
///
/// ```
/// use bangalore_core::Crs;
///
/// assert_eq!(Crs::WGS84.auth_id(), "EPSG:4326");
/// assert!(Crs::WGS84.is_geographic());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    /// WGS 84 geographic coordinates (EPSG:4326).
    pub const WGS84: Self = Self::from_epsg(4326);

    /// Build a CRS from an EPSG code.
    #[must_use]
    pub const fn from_epsg(epsg: u32) -> Self {
        Self { epsg }
    }

    /// The EPSG code.
    #[must_use]
    pub const fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Authority identifier, e.g. `EPSG:4326`.
    #[must_use]
    pub fn auth_id(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }

    /// Whether the CRS uses degrees rather than projected units.
    #[must_use]
    pub const fn is_geographic(&self) -> bool {
        matches!(self.epsg, 4326 | 4269 | 4258)
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::WGS84
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}
