//! Application layer: outline loading on top of the domain registry
//!
//! This layer reads files and wires them into domain types.

pub mod error;
pub mod error_ext;
pub mod outline;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use outline::{Outline, OutlineEntry, OutlineNode};
