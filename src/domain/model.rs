//! Model capability implemented by user types, plus the reference child list.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::error::{DomainError, DomainResult};

/// Shared handle to a model participating in a registry.
pub type ModelRef = Arc<dyn TreeModel>;

/// Named binary resource displayed next to a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    name: String,
    content: Arc<[u8]>,
}

impl Icon {
    pub fn new(name: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Icon without content, identified by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Vec::<u8>::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Capability required of every type held in a [`TreeModelRegistry`].
///
/// Implementors embed a [`ChildList`] and return it from [`child_list`];
/// every child operation defaults to delegating there. Override
/// [`add_child`] / [`add_child_at`] to reject additions, and the display
/// accessors to present the node.
///
/// [`TreeModelRegistry`]: crate::domain::TreeModelRegistry
/// [`child_list`]: TreeModel::child_list
/// [`add_child`]: TreeModel::add_child
/// [`add_child_at`]: TreeModel::add_child_at
pub trait TreeModel: Send + Sync + fmt::Debug {
    /// Icon shown by the tree row. `None` for no icon.
    fn display_icon(&self) -> Option<Icon> {
        None
    }

    /// Label shown by the tree row. Empty for no label.
    fn display_label(&self) -> String {
        String::new()
    }

    /// Storage backing the default child operations.
    fn child_list(&self) -> &ChildList;

    /// Shallow copy of the children.
    fn children(&self) -> Vec<ModelRef> {
        self.child_list().children()
    }

    /// Appends a child. An error means the addition was rejected.
    fn add_child(&self, child: ModelRef) -> DomainResult<()> {
        self.child_list().push(child);
        Ok(())
    }

    /// Inserts a child at `index`. An error means the addition was rejected.
    fn add_child_at(&self, index: usize, child: ModelRef) -> DomainResult<()> {
        self.child_list().insert(index, child)
    }

    /// Removes the last child, if any.
    fn remove_child(&self) -> Option<ModelRef> {
        self.child_list().pop()
    }

    /// Removes the child at `index`. `None` when nothing is there.
    fn remove_child_at(&self, index: usize) -> Option<ModelRef> {
        self.child_list().remove_at(index)
    }

    /// Removes `child` (by identity) wherever it currently sits.
    fn remove_child_model(&self, child: &ModelRef) -> Option<ModelRef> {
        self.child_list().remove_model(child)
    }
}

/// Address-based identity of a model, ignoring vtable metadata.
pub(crate) fn model_key(model: &ModelRef) -> *const () {
    Arc::as_ptr(model) as *const ()
}

/// True when both handles point at the same model object.
pub fn same_model(a: &ModelRef, b: &ModelRef) -> bool {
    model_key(a) == model_key(b)
}

/// Thread-safe ordered list of child models.
///
/// Guarded by its own lock, independent of any registry lock.
#[derive(Default)]
pub struct ChildList {
    children: RwLock<Vec<ModelRef>>,
}

impl ChildList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> Vec<ModelRef> {
        self.children.read().clone()
    }

    pub fn len(&self) -> usize {
        self.children.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.read().is_empty()
    }

    pub fn push(&self, child: ModelRef) {
        self.children.write().push(child);
    }

    pub fn insert(&self, index: usize, child: ModelRef) -> DomainResult<()> {
        let mut children = self.children.write();
        if index > children.len() {
            return Err(DomainError::InvalidIndex {
                index,
                len: children.len(),
            });
        }
        children.insert(index, child);
        Ok(())
    }

    pub fn pop(&self) -> Option<ModelRef> {
        self.children.write().pop()
    }

    /// Removes the first entry that is `child` by identity.
    pub fn remove_model(&self, child: &ModelRef) -> Option<ModelRef> {
        let mut children = self.children.write();
        let position = children.iter().position(|c| same_model(c, child))?;
        Some(children.remove(position))
    }

    pub fn remove_at(&self, index: usize) -> Option<ModelRef> {
        let mut children = self.children.write();
        if index >= children.len() {
            return None;
        }
        Some(children.remove(index))
    }
}

impl fmt::Debug for ChildList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildList")
            .field("len", &self.len())
            .finish()
    }
}

/// Model with no label, no icon, and a plain child list.
#[derive(Debug, Default)]
pub struct BaseTreeModel {
    children: ChildList,
}

impl BaseTreeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> ModelRef {
        Arc::new(Self::new())
    }
}

impl TreeModel for BaseTreeModel {
    fn child_list(&self) -> &ChildList {
        &self.children
    }
}
