//! Text rendering of a registry with `termtree`.

use termtree::Tree;
use tracing::instrument;

use crate::domain::{ModelRef, NodeId, TreeModelRegistry};

/// Controls what each rendered row shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Append the node id to each row
    pub show_ids: bool,
    /// Number of id characters shown when `show_ids` is set
    pub id_width: usize,
    /// Prefix rows with `[icon-name]`
    pub show_icons: bool,
    /// Text of the root row
    pub root_label: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_ids: false,
            id_width: 8,
            show_icons: true,
            root_label: ".".to_string(),
        }
    }
}

impl DisplayOptions {
    /// Row text for a registered node.
    pub fn row(&self, id: &NodeId, node: &ModelRef) -> String {
        let mut label = node.display_label();
        if label.is_empty() {
            label = "<unnamed>".to_string();
        }
        if self.show_icons {
            if let Some(icon) = node.display_icon() {
                label = format!("[{}] {}", icon.name(), label);
            }
        }
        if self.show_ids {
            label = format!("{} ({})", label, id.short(self.id_width));
        }
        label
    }
}

pub trait TreeDisplay {
    fn to_tree_string(&self, opts: &DisplayOptions) -> Tree<String>;
}

impl TreeDisplay for TreeModelRegistry {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, opts: &DisplayOptions) -> Tree<String> {
        fn build_tree(
            registry: &TreeModelRegistry,
            opts: &DisplayOptions,
            id: &NodeId,
            parent_tree: &mut Tree<String>,
        ) {
            for child_id in registry.children_of(id) {
                if let Some(child) = registry.node_for_id(&child_id) {
                    let mut child_tree = Tree::new(opts.row(&child_id, &child));
                    build_tree(registry, opts, &child_id, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        let mut tree = Tree::new(opts.root_label.clone());
        build_tree(self, opts, &NodeId::ROOT, &mut tree);
        tree
    }
}
