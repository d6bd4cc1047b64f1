//! Depth-first traversal over a [`TreeModelRegistry`].

use tracing::instrument;

use crate::domain::id::NodeId;
use crate::domain::model::ModelRef;
use crate::domain::registry::{RegistryState, TreeModelRegistry};

/// One visited position of a walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub parent_id: NodeId,
    /// `None` when the parent is the root sentinel
    pub parent: Option<ModelRef>,
    pub id: NodeId,
    pub node: ModelRef,
    /// 1 for top-level nodes
    pub depth: usize,
}

impl RegistryState {
    fn preorder(&self) -> Vec<WalkEntry> {
        let mut entries = Vec::with_capacity(self.models.len().saturating_sub(1));
        let mut stack: Vec<(NodeId, usize)> = self
            .child_ids(&NodeId::ROOT)
            .iter()
            .rev()
            .map(|id| (id.clone(), 1))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.model(&id).cloned() else {
                continue;
            };
            let parent_id = self.parent_of(&id);
            // Push children in reverse order for left-to-right traversal
            for child in self.child_ids(&id).iter().rev() {
                stack.push((child.clone(), depth + 1));
            }
            entries.push(WalkEntry {
                parent: self.model(&parent_id).cloned(),
                parent_id,
                id,
                node,
                depth,
            });
        }
        entries
    }
}

impl TreeModelRegistry {
    /// Preorder list of every registered id, taken under the shared lock.
    ///
    /// The lock is released before returning; later mutations are not
    /// reflected.
    #[instrument(level = "trace", skip(self))]
    pub fn snapshot(&self) -> Vec<WalkEntry> {
        self.state.read().preorder()
    }

    /// Visits every non-root id once, parents before children, siblings in
    /// [`children_of`](Self::children_of) order.
    ///
    /// `visit` receives the parent id, the parent model (`None` for the
    /// root), the id, and its model. It runs on a snapshot without holding
    /// the registry lock, so it may mutate the registry; those changes do
    /// not affect the ongoing walk.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&NodeId, Option<&ModelRef>, &NodeId, &ModelRef),
    {
        for entry in self.snapshot() {
            visit(&entry.parent_id, entry.parent.as_ref(), &entry.id, &entry.node);
        }
    }

    /// Length of the longest chain of ids below the root; 0 when empty.
    pub fn depth(&self) -> usize {
        self.snapshot().iter().map(|e| e.depth).max().unwrap_or(0)
    }

    /// Ids without children, in walk order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let state = self.state.read();
        state
            .preorder()
            .into_iter()
            .filter(|e| !state.children.contains_key(&e.id))
            .map(|e| e.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BaseTreeModel;

    #[test]
    fn given_empty_registry_when_walking_then_nothing_is_visited() {
        let reg = TreeModelRegistry::new();
        let mut visited = 0;
        reg.walk(|_, _, _, _| visited += 1);
        assert_eq!(visited, 0);
        assert_eq!(reg.depth(), 0);
        assert!(reg.leaves().is_empty());
    }

    #[test]
    fn given_chain_when_snapshotting_then_depths_increase() {
        let reg = TreeModelRegistry::new();
        let a = reg.add_child(&NodeId::ROOT, BaseTreeModel::shared()).unwrap();
        let b = reg.add_child(&a, BaseTreeModel::shared()).unwrap();
        let c = reg.add_child(&b, BaseTreeModel::shared()).unwrap();

        let entries = reg.snapshot();
        let depths: Vec<(NodeId, usize)> =
            entries.iter().map(|e| (e.id.clone(), e.depth)).collect();
        assert_eq!(depths, vec![(a, 1), (b, 2), (c.clone(), 3)]);
        assert_eq!(reg.depth(), 3);
        assert_eq!(reg.leaves(), vec![c]);
    }

    #[test]
    fn given_top_level_entry_when_walking_then_parent_model_is_none() {
        let reg = TreeModelRegistry::new();
        let top = BaseTreeModel::shared();
        let id = reg.add_child(&NodeId::ROOT, top.clone()).unwrap();
        reg.add_child(&id, BaseTreeModel::shared()).unwrap();

        let entries = reg.snapshot();
        assert!(entries[0].parent.is_none());
        assert!(entries[0].parent_id.is_root());
        let parent = entries[1].parent.as_ref().expect("child has a parent model");
        assert_eq!(parent.children().len(), 1);
        assert_eq!(entries[1].parent_id, id);
    }
}
