//! Domain layer: model capability, identifier registry, traversal
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod id;
pub mod model;
pub mod registry;
pub mod walk;

pub use error::{DomainError, DomainResult};
pub use id::NodeId;
pub use model::{same_model, BaseTreeModel, ChildList, Icon, ModelRef, TreeModel};
pub use registry::TreeModelRegistry;
pub use walk::WalkEntry;
