//! Opaque node identifiers.

use std::borrow::Borrow;
use std::fmt;

use uuid::Uuid;

/// Opaque identifier handed out by the registry.
///
/// The empty identifier is the root sentinel. It is never assigned to a
/// model and never returned from a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// The implicit forest root.
    pub const ROOT: NodeId = NodeId(String::new());

    /// Generates a fresh random identifier.
    ///
    /// Panics (via `uuid`/`getrandom`) if the OS entropy source is unavailable.
    pub(crate) fn generate() -> Self {
        NodeId(Uuid::new_v4().to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `width` characters, for compact display.
    pub fn short(&self, width: usize) -> &str {
        match self.0.char_indices().nth(width) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId(value)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
