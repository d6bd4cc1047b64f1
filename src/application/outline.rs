//! Outline files: TOML descriptions of a model tree.
//!
//! ```toml
//! [[node]]
//! label = "docs"
//! icon = "folder"
//!
//!   [[node.children]]
//!   label = "intro.md"
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{ChildList, Icon, ModelRef, NodeId, TreeModel, TreeModelRegistry};

/// Model built from an outline entry.
#[derive(Debug)]
pub struct OutlineNode {
    label: String,
    icon: Option<Icon>,
    children: ChildList,
}

impl OutlineNode {
    pub fn new(label: impl Into<String>, icon: Option<Icon>) -> Self {
        Self {
            label: label.into(),
            icon,
            children: ChildList::new(),
        }
    }

    pub fn shared(label: impl Into<String>, icon: Option<Icon>) -> ModelRef {
        Arc::new(Self::new(label, icon))
    }
}

impl TreeModel for OutlineNode {
    fn display_icon(&self) -> Option<Icon> {
        self.icon.clone()
    }

    fn display_label(&self) -> String {
        self.label.clone()
    }

    fn child_list(&self) -> &ChildList {
        &self.children
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineEntry>,
}

impl OutlineEntry {
    /// Builds the model for this entry with all descendants attached.
    pub fn build(&self) -> ModelRef {
        let node = OutlineNode::new(&self.label, self.icon.as_deref().map(Icon::named));
        for child in &self.children {
            node.children.push(child.build());
        }
        Arc::new(node)
    }
}

/// Forest of outline entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default, rename = "node")]
    pub nodes: Vec<OutlineEntry>,
}

impl Outline {
    /// Parses an outline from TOML text. `origin` only labels errors.
    pub fn from_toml_str(content: &str, origin: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::Outline {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = std::fs::read_to_string(path).with_path_context("read outline", path)?;
        let outline = Self::from_toml_str(&content, path)?;
        debug!(top_level = outline.nodes.len(), "outline loaded");
        Ok(outline)
    }

    /// Builds one model tree per top-level entry.
    pub fn build(&self) -> Vec<ModelRef> {
        self.nodes.iter().map(OutlineEntry::build).collect()
    }

    /// Registers every top-level tree under the root and returns their ids.
    ///
    /// Descendants are picked up by cascading registration.
    #[instrument(level = "debug", skip_all)]
    pub fn register(&self, registry: &TreeModelRegistry) -> ApplicationResult<Vec<NodeId>> {
        let mut ids = Vec::with_capacity(self.nodes.len());
        for model in self.build() {
            ids.push(registry.add_child(&NodeId::ROOT, model)?);
        }
        debug!(registered = registry.len(), "outline registered");
        Ok(ids)
    }

    /// Number of entries at every level.
    pub fn count(&self) -> usize {
        fn count_entry(entry: &OutlineEntry) -> usize {
            1 + entry.children.iter().map(count_entry).sum::<usize>()
        }
        self.nodes.iter().map(count_entry).sum()
    }
}
