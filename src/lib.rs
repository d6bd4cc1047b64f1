//! Stable opaque-id registry over user-owned model trees.
//!
//! A [`TreeModelRegistry`](domain::TreeModelRegistry) mirrors the child
//! lists of [`TreeModel`](domain::TreeModel) objects into an id-indexed
//! structure that lazy tree views can query with `children_of`,
//! `has_children` and `node_for_id`.

pub mod application;
pub mod cli;
pub mod config;
pub mod display;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    same_model, BaseTreeModel, ChildList, DomainError, DomainResult, Icon, ModelRef, NodeId, TreeModel,
    TreeModelRegistry, WalkEntry,
};
