//! Owned in-memory QGIS project.
//!
//! [`Project`] replaces a process-wide project singleton: the builder owns
//! one value, mutates it step by step and hands it to a writer.

mod bookmark;
mod crs;
mod layer;
mod tree;

use std::path::{Path, PathBuf};

use geo::{Rect, coord};
use thiserror::Error;

pub use bookmark::{Bookmark, BookmarkError};
pub use crs::Crs;
pub use layer::{
    GeometryKind, LayerId, MapLayer, RasterLayer, VectorLayer, VectorSource, XyzSource,
    XyzSourceError,
};
pub use tree::{LayerTree, LayerTreeNode, PropertyValue};

/// Errors raised while editing a [`Project`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    /// A layer with the same identifier is already registered.
    #[error("layer {id} is already part of the project")]
    DuplicateLayer {
        /// Clashing identifier.
        id: LayerId,
    },
}

/// A QGIS project: layers, layer tree, bookmarks and view state.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    title: String,
    crs: Crs,
    home_path: Option<PathBuf>,
    layers: Vec<MapLayer>,
    tree: LayerTree,
    bookmarks: Vec<Bookmark>,
    dirty: bool,
    view_extent: Option<Rect<f64>>,
    next_ordinal: usize,
}

impl Project {
    /// Create an empty project in WGS 84.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            crs: Crs::WGS84,
            home_path: None,
            layers: Vec::new(),
            tree: LayerTree::default(),
            bookmarks: Vec::new(),
            dirty: false,
            view_extent: None,
            next_ordinal: 0,
        }
    }

    /// Project title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Project CRS.
    #[must_use]
    pub const fn crs(&self) -> Crs {
        self.crs
    }

    /// Replace the project CRS.
    pub fn set_crs(&mut self, crs: Crs) {
        self.crs = crs;
    }

    /// Directory relative paths resolve against.
    #[must_use]
    pub fn home_path(&self) -> Option<&Path> {
        self.home_path.as_deref()
    }

    /// Set the home path.
    pub fn set_home_path(&mut self, path: impl Into<PathBuf>) {
        self.home_path = Some(path.into());
    }

    /// Allocate a deterministic identifier for a layer titled `name`.
    ///
    /// Identifiers are a lower-case slug of the title plus an ordinal, so the
    /// same build always produces the same document.
    ///
    /// # Examples
    ///
    /// ```
    /// use bangalore_core::Project;
    ///
    /// let mut project = Project::new("demo");
    /// assert_eq!(project.next_layer_id("BBMP Wards").as_str(), "bbmp_wards_0");
    /// assert_eq!(project.next_layer_id("Roads").as_str(), "roads_1");
    /// ```
    pub fn next_layer_id(&mut self, name: &str) -> LayerId {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        LayerId::new(format!("{}_{ordinal}", slug(name)))
    }

    /// Register a layer and append it to the bottom of the layer tree.
    pub fn add_map_layer(&mut self, layer: impl Into<MapLayer>) -> Result<LayerId, ProjectError> {
        let layer = layer.into();
        let id = layer.id().clone();
        if self.layer(&id).is_some() {
            return Err(ProjectError::DuplicateLayer { id });
        }
        self.tree.push(id.clone(), layer.name());
        self.layers.push(layer);
        Ok(id)
    }

    /// Layers in registration order.
    #[must_use]
    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    /// Look a layer up by identifier.
    #[must_use]
    pub fn layer(&self, id: &LayerId) -> Option<&MapLayer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    /// Look a layer up by identifier, mutably.
    pub fn layer_mut(&mut self, id: &LayerId) -> Option<&mut MapLayer> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }

    /// First layer whose title equals `name`.
    #[must_use]
    pub fn find_layer_by_name(&self, name: &str) -> Option<&MapLayer> {
        self.layers.iter().find(|layer| layer.name() == name)
    }

    /// Layer tree.
    #[must_use]
    pub const fn layer_tree(&self) -> &LayerTree {
        &self.tree
    }

    /// Layer tree, mutably.
    pub fn layer_tree_mut(&mut self) -> &mut LayerTree {
        &mut self.tree
    }

    /// Register a bookmark; names must be unique.
    pub fn add_bookmark(&mut self, bookmark: Bookmark) -> Result<(), BookmarkError> {
        if self.bookmarks.iter().any(|b| b.name() == bookmark.name()) {
            return Err(BookmarkError::DuplicateName {
                name: bookmark.name().to_owned(),
            });
        }
        self.bookmarks.push(bookmark);
        Ok(())
    }

    /// Registered bookmarks.
    #[must_use]
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Flag the project as modified.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Whether the project has unsaved modifications.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Union of every layer extent, or `None` when no layer has one.
    #[must_use]
    pub fn full_extent(&self) -> Option<Rect<f64>> {
        self.layers
            .iter()
            .filter_map(MapLayer::extent)
            .reduce(union)
    }

    /// Initial map view.
    #[must_use]
    pub const fn view_extent(&self) -> Option<Rect<f64>> {
        self.view_extent
    }

    /// Set the initial map view.
    pub fn set_view_extent(&mut self, extent: Rect<f64>) {
        self.view_extent = Some(extent);
    }
}

fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("layer");
    }
    out
}
