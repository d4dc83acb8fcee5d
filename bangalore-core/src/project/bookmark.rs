//! Spatial bookmarks stored with a project.

use geo::Rect;
use thiserror::Error;

use super::crs::Crs;

/// Errors raised when registering a bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookmarkError {
    /// A bookmark with the same name already exists.
    #[error("bookmark {name:?} already exists")]
    DuplicateName {
        /// Name that clashed.
        name: String,
    },
    /// The extent contains NaN or infinite coordinates.
    #[error("bookmark {name:?} has a non-finite extent")]
    NonFiniteExtent {
        /// Bookmark name.
        name: String,
    },
    /// The layer to bookmark has no features with coordinates.
    #[error("layer {layer:?} has no extent to bookmark")]
    MissingExtent {
        /// Layer title.
        layer: String,
    },
}

/// A named extent in a given CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    name: String,
    extent: Rect<f64>,
    crs: Crs,
}

impl Bookmark {
    /// Create a bookmark, rejecting non-finite extents.
    ///
    /// # Examples
    ///
    /// ```
    /// use bangalore_core::{Bookmark, Crs};
    /// use geo::{Rect, coord};
    ///
    /// let extent = Rect::new(coord! { x: 77.4, y: 12.8 }, coord! { x: 77.8, y: 13.1 });
    /// let bookmark = Bookmark::new("Bangalore", extent, Crs::WGS84)?;
    /// assert_eq!(bookmark.name(), "Bangalore");
    /// # Ok::<(), bangalore_core::BookmarkError>(())
    /// ```
    pub fn new(name: impl Into<String>, extent: Rect<f64>, crs: Crs) -> Result<Self, BookmarkError> {
        let name = name.into();
        let (min, max) = (extent.min(), extent.max());
        if [min.x, min.y, max.x, max.y].iter().any(|v| !v.is_finite()) {
            return Err(BookmarkError::NonFiniteExtent { name });
        }
        Ok(Self { name, extent, crs })
    }

    /// Bookmark name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bookmarked extent.
    #[must_use]
    pub const fn extent(&self) -> Rect<f64> {
        self.extent
    }

    /// CRS of the extent.
    #[must_use]
    pub const fn crs(&self) -> Crs {
        self.crs
    }
}
