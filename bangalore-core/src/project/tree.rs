//! Layer tree: display order and per-node custom properties.

use std::collections::BTreeMap;

use super::layer::LayerId;

/// Value of a custom layer-tree property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Boolean flag.
    Bool(bool),
    /// Free text.
    Text(String),
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// A layer entry in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerTreeNode {
    /// Layer this node shows.
    pub layer_id: LayerId,
    /// Display title.
    pub name: String,
    /// Whether the layer is checked.
    pub visible: bool,
    /// Custom properties, e.g. `isBasemap`.
    pub custom_properties: BTreeMap<String, PropertyValue>,
}

impl LayerTreeNode {
    /// Set a custom property on the node.
    pub fn set_custom_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.custom_properties.insert(key.into(), value.into());
    }

    /// Read a custom property.
    #[must_use]
    pub fn custom_property(&self, key: &str) -> Option<&PropertyValue> {
        self.custom_properties.get(key)
    }
}

/// Flat layer tree. Nodes are listed top to bottom in drawing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayerTree {
    nodes: Vec<LayerTreeNode>,
}

impl LayerTree {
    /// Append a visible node below the existing ones.
    pub fn push(&mut self, layer_id: LayerId, name: impl Into<String>) {
        self.nodes.push(LayerTreeNode {
            layer_id,
            name: name.into(),
            visible: true,
            custom_properties: BTreeMap::new(),
        });
    }

    /// Find the node for `layer_id`.
    #[must_use]
    pub fn find_layer(&self, layer_id: &LayerId) -> Option<&LayerTreeNode> {
        self.nodes.iter().find(|node| &node.layer_id == layer_id)
    }

    /// Find the node for `layer_id`, mutably.
    pub fn find_layer_mut(&mut self, layer_id: &LayerId) -> Option<&mut LayerTreeNode> {
        self.nodes.iter_mut().find(|node| &node.layer_id == layer_id)
    }

    /// Nodes from top to bottom.
    #[must_use]
    pub fn nodes(&self) -> &[LayerTreeNode] {
        &self.nodes
    }
}
