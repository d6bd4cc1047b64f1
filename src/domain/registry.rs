//! Identifier registry: stable opaque ids over user-owned model trees.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::id::NodeId;
use crate::domain::model::{model_key, same_model, ModelRef};

/// Id-indexed structure mirroring the models' own child lists.
#[derive(Debug)]
pub(crate) struct RegistryState {
    /// id -> model; the root sentinel maps to `None`
    pub(crate) models: HashMap<NodeId, Option<ModelRef>>,
    /// parent id -> child ids in display order; never holds empty lists
    pub(crate) children: HashMap<NodeId, Vec<NodeId>>,
    /// child id -> parent id
    pub(crate) parents: HashMap<NodeId, NodeId>,
}

impl RegistryState {
    fn new() -> Self {
        let mut models = HashMap::new();
        models.insert(NodeId::ROOT, None);
        Self {
            models,
            children: HashMap::new(),
            parents: HashMap::new(),
        }
    }

    pub(crate) fn model(&self, id: &NodeId) -> Option<&ModelRef> {
        self.models.get(id).and_then(Option::as_ref)
    }

    pub(crate) fn parent_of(&self, id: &NodeId) -> NodeId {
        self.parents.get(id).cloned().unwrap_or_default()
    }

    pub(crate) fn child_ids(&self, id: &NodeId) -> &[NodeId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Registers `model` under `parent` at `position` (append when `None`),
    /// then cascades over the children the model already holds.
    fn register(&mut self, parent: &NodeId, position: Option<usize>, model: ModelRef) -> NodeId {
        let top = self.record(parent, position, model);

        let mut pending = vec![top.clone()];
        while let Some(id) = pending.pop() {
            let Some(model) = self.model(&id).cloned() else {
                continue;
            };
            for child in model.children() {
                pending.push(self.record(&id, None, child));
            }
        }
        top
    }

    /// Adds a single fresh id for `model` to all three maps.
    fn record(&mut self, parent: &NodeId, position: Option<usize>, model: ModelRef) -> NodeId {
        let id = NodeId::generate();
        trace!(%parent, %id, "register");

        self.models.insert(id.clone(), Some(model));
        let siblings = self.children.entry(parent.clone()).or_default();
        match position {
            Some(index) => siblings.insert(index, id.clone()),
            None => siblings.push(id.clone()),
        }
        self.parents.insert(id.clone(), parent.clone());
        id
    }

    /// Detaches `id` from `parent`, in the registry and in the parent
    /// model's own child list, then does the same for every descendant
    /// while dropping each from all three maps.
    fn teardown(&mut self, parent: &NodeId, id: &NodeId) {
        trace!(%parent, %id, "teardown");
        self.detach_model(parent, id);
        self.unlink(parent, id);

        let mut pending = vec![id.clone()];
        while let Some(id) = pending.pop() {
            let child_ids = self.children.remove(&id).unwrap_or_default();
            if let Some(model) = self.models.remove(&id).flatten() {
                for child in &child_ids {
                    if let Some(child_model) = self.model(child) {
                        model.remove_child_model(child_model);
                    }
                }
            }
            self.parents.remove(&id);
            pending.extend(child_ids);
        }
    }

    /// Drops `id` and its subtree from the maps without touching any model.
    /// The caller has already unlinked `id` from its parent.
    fn forget(&mut self, id: &NodeId) {
        trace!(%id, "forget");
        let mut pending = vec![id.clone()];
        while let Some(id) = pending.pop() {
            if let Some(child_ids) = self.children.remove(&id) {
                pending.extend(child_ids);
            }
            self.models.remove(&id);
            self.parents.remove(&id);
        }
    }

    /// Removes the model of `id` from the own child list of `parent`'s model.
    fn detach_model(&self, parent: &NodeId, id: &NodeId) {
        if let (Some(parent_model), Some(model)) = (self.model(parent), self.model(id)) {
            parent_model.remove_child_model(model);
        }
    }

    fn unlink(&mut self, parent: &NodeId, id: &NodeId) {
        if let Some(siblings) = self.children.get_mut(parent) {
            if let Some(pos) = siblings.iter().position(|c| c == id) {
                siblings.remove(pos);
            }
            if siblings.is_empty() {
                self.children.remove(parent);
            }
        }
    }

    /// Models registered on the path from `id` up to the root, `id` included.
    fn ancestor_keys(&self, id: &NodeId) -> Vec<*const ()> {
        let mut keys = Vec::new();
        let mut current = id.clone();
        while !current.is_root() {
            if let Some(model) = self.model(&current) {
                keys.push(model_key(model));
            }
            match self.parents.get(&current) {
                Some(parent) => current = parent.clone(),
                None => break,
            }
        }
        keys
    }

    fn check_parent(&self, parent: &NodeId) -> DomainResult<Option<ModelRef>> {
        match self.models.get(parent) {
            Some(model) => Ok(model.clone()),
            None => Err(DomainError::NoSuchParent(parent.clone())),
        }
    }

    fn resync(&mut self, id: &NodeId) {
        let mut pending = vec![id.clone()];
        while let Some(id) = pending.pop() {
            let Some(model) = self.model(&id).cloned() else {
                pending.extend(self.child_ids(&id).iter().cloned());
                continue;
            };

            let mut pool: Vec<NodeId> = self.children.remove(&id).unwrap_or_default();
            for child in model.children() {
                let reused = pool
                    .iter()
                    .position(|cid| self.model(cid).is_some_and(|m| same_model(m, &child)));
                match reused {
                    Some(pos) => {
                        let cid = pool.remove(pos);
                        self.children.entry(id.clone()).or_default().push(cid.clone());
                        pending.push(cid);
                    }
                    None => {
                        self.register(&id, None, child);
                    }
                }
            }
            for stale in &pool {
                self.forget(stale);
            }
        }
    }
}

/// Walks the model graph below `model`, failing if it reaches one of
/// `ancestors` or revisits a model already on the current path.
fn ensure_acyclic(model: &ModelRef, mut ancestors: Vec<*const ()>) -> DomainResult<()> {
    // entries carry their depth; truncating `ancestors` to it restores the path
    let base = ancestors.len();
    let mut pending: Vec<(ModelRef, usize)> = vec![(model.clone(), base)];
    while let Some((node, depth)) = pending.pop() {
        ancestors.truncate(depth);
        let key = model_key(&node);
        if ancestors.contains(&key) {
            return Err(DomainError::CycleDetected {
                label: node.display_label(),
            });
        }
        ancestors.push(key);
        for child in node.children().into_iter().rev() {
            pending.push((child, depth + 1));
        }
    }
    Ok(())
}

/// Thread-safe registry mapping opaque ids to models.
///
/// Starts with only the root sentinel. All state sits behind one
/// reader/writer lock; mutations are exclusive, reads are shared. The lock
/// is taken before any model lock.
#[derive(Debug)]
pub struct TreeModelRegistry {
    pub(crate) state: RwLock<RegistryState>,
}

impl Default for TreeModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeModelRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::new()),
        }
    }

    /// Registers `data` as the last child of `parent` and returns its id.
    ///
    /// Children that `data` already holds are registered too, each under
    /// its own fresh id. When `parent` is a real node, `data` is also
    /// appended to that node's own child list; if the node rejects it the
    /// error is returned and nothing changes.
    ///
    /// # Errors
    /// * [`DomainError::NoSuchParent`] if `parent` is not registered
    /// * [`DomainError::NilData`] if `data` is `None`
    /// * [`DomainError::CycleDetected`] if attaching would make the model graph cyclic
    /// * whatever the parent model's `add_child` returns
    #[instrument(level = "trace", skip(self, data))]
    pub fn add_child(
        &self,
        parent: &NodeId,
        data: impl Into<Option<ModelRef>>,
    ) -> DomainResult<NodeId> {
        let mut state = self.state.write();
        let parent_model = state.check_parent(parent)?;
        let data = data.into().ok_or(DomainError::NilData)?;
        ensure_acyclic(&data, state.ancestor_keys(parent))?;

        if let Some(parent_model) = &parent_model {
            parent_model.add_child(data.clone())?;
        }
        Ok(state.register(parent, None, data))
    }

    /// Registers `data` as child number `index` of `parent`.
    ///
    /// Same semantics as [`add_child`](Self::add_child), with the node
    /// placed at `index` in both the registry and the parent's own list.
    ///
    /// # Errors
    /// As `add_child`, plus [`DomainError::InvalidIndex`] when `index`
    /// exceeds the number of children of `parent`.
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_child(
        &self,
        parent: &NodeId,
        index: usize,
        data: impl Into<Option<ModelRef>>,
    ) -> DomainResult<NodeId> {
        let mut state = self.state.write();
        let parent_model = state.check_parent(parent)?;
        let data = data.into().ok_or(DomainError::NilData)?;
        let len = state.child_ids(parent).len();
        if index > len {
            return Err(DomainError::InvalidIndex { index, len });
        }
        ensure_acyclic(&data, state.ancestor_keys(parent))?;

        if let Some(parent_model) = &parent_model {
            parent_model.add_child_at(index, data.clone())?;
        }
        Ok(state.register(parent, Some(index), data))
    }

    /// Removes `id` and every id below it.
    ///
    /// Each removed model is also taken out of its parent model's own
    /// child list. Unknown ids and the root sentinel are ignored.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child(&self, id: &NodeId) {
        let mut state = self.state.write();
        let Some(parent) = state.parents.get(id).cloned() else {
            return;
        };
        state.teardown(&parent, id);
    }

    /// Reconciles the registry with the current child lists of the model
    /// at `id` and of every registered descendant.
    ///
    /// Use after mutating a registered model's children directly. Ids whose
    /// model survived are kept, new models are registered (cascading), and
    /// ids of models no longer present are removed with their subtrees.
    ///
    /// # Errors
    /// * [`DomainError::UnknownId`] if `id` is not registered
    /// * [`DomainError::CycleDetected`] if the model graph became cyclic
    #[instrument(level = "trace", skip(self))]
    pub fn sync(&self, id: &NodeId) -> DomainResult<()> {
        let mut state = self.state.write();
        if !state.models.contains_key(id) {
            return Err(DomainError::UnknownId(id.clone()));
        }
        match state.model(id).cloned() {
            Some(model) => {
                let ancestors = state.ancestor_keys(&state.parent_of(id));
                ensure_acyclic(&model, ancestors)?;
            }
            None => {
                for child in state.child_ids(id).to_vec() {
                    if let Some(model) = state.model(&child) {
                        ensure_acyclic(model, Vec::new())?;
                    }
                }
            }
        }
        state.resync(id);
        Ok(())
    }

    /// Model registered under `id`; `None` for the root and unknown ids.
    pub fn node_for_id(&self, id: &NodeId) -> Option<ModelRef> {
        self.state.read().model(id).cloned()
    }

    /// Parent of `id`; the root sentinel for top-level, root, and unknown ids.
    pub fn parent_of(&self, id: &NodeId) -> NodeId {
        self.state.read().parent_of(id)
    }

    /// Child ids of `id` in display order; empty if none.
    pub fn children_of(&self, id: &NodeId) -> Vec<NodeId> {
        self.state.read().child_ids(id).to_vec()
    }

    pub fn has_children(&self, id: &NodeId) -> bool {
        self.state.read().children.contains_key(id)
    }

    /// True for the root sentinel and every registered id.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.state.read().models.contains_key(id)
    }

    /// Number of registered ids, root excluded.
    pub fn len(&self) -> usize {
        self.state.read().models.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
