//! Typed identifier for timeline nodes.
//!
//! Node IDs are a plain monotonic counter owned by the timeline. They are
//! never reused, not even after the timeline is cleared, so an ID observed
//! in a log line always refers to exactly one authored input.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A node identifier (monotonic, starts at 1).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// The first ID a fresh timeline hands out.
    pub const FIRST: NodeId = NodeId(1);

    /// Wrap a raw counter value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The ID issued after this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> u64 {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId(#{})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_starts_at_one() {
        assert_eq!(NodeId::default().get(), 1);
        assert_eq!(NodeId::FIRST.next().get(), 2);
    }

    #[test]
    fn test_node_id_ordering_follows_counter() {
        let a = NodeId::new(3);
        let b = a.next();
        assert!(b > a);
    }

    #[test]
    fn test_node_id_display_and_debug() {
        let id = NodeId::new(42);
        assert_eq!(id.to_string(), "#42");
        assert_eq!(format!("{:?}", id), "NodeId(#42)");
    }

    #[test]
    fn test_node_id_serializes_transparently() {
        let json = serde_json::to_string(&NodeId::new(9)).unwrap();
        assert_eq!(json, "9");
    }
}
