//! Shared node, direction, and connector types for Rensa.
//!
//! This crate is the vocabulary of a combo timeline: typed node IDs, numpad
//! directions, node modifier states, and the connectors written between
//! consecutive inputs. It has **no internal rensa dependencies**: a pure
//! leaf crate that the engine and front-end build on.
//!
//! # Model Overview
//!
//! ```text
//! Timeline (owned by rensa-core)
//!     └── Node (NodeId, monotonic, never reused)
//!           ├── time       seconds in [0, length)
//!           ├── dir        numpad Direction, 5 = neutral
//!           ├── buttons    ordered, de-duplicated labels
//!           ├── state      Option<NodeState>
//!           └── connector  Option<Connector> → gap toward the next node
//! ```
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`NodeId`]        | Which authored input (monotonic counter)     |
//! | [`Direction`]     | Numpad direction code `1..=9`                |
//! | [`NodeState`]     | Modifier or marker tag on a node             |
//! | [`Connector`]     | Transition written after a node (xx , ~)     |
//! | [`Node`]          | One timed direction + buttons event          |
//! |-------------------|----------------------------------------------|

pub mod direction;
pub mod ids;
pub mod node;

// Re-export primary types at crate root for convenience.
pub use direction::Direction;
pub use ids::NodeId;
pub use node::{Connector, DEFAULT_CONNECTOR_SYMBOL, Node, NodeState, dedup_labels};
