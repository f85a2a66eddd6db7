//! Node types: one authored input on the combo timeline.
//!
//! ## Design: state is a single slot
//!
//! A node carries at most one [`NodeState`]. The modifiers (air, hold,
//! release, mash, jump cancel) are mutually exclusive by construction, and
//! the marker kinds (counter, electric, whiff) reuse the same slot so a
//! buttonless node can stand in for a hit-state annotation.

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::direction::Direction;
use crate::ids::NodeId;

/// Separator rendered between two nodes when the left node has no connector.
pub const DEFAULT_CONNECTOR_SYMBOL: &str = ">";

/// Modifier or marker tag carried by a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Performed airborne, written `j.`
    #[strum(serialize = "air")]
    Air,
    /// Jump-cancelled, written `j.C`
    #[strum(serialize = "j.C")]
    JumpCancel,
    /// Button held, written `[...]`
    #[strum(serialize = "hold")]
    Hold,
    /// Button released, written `]...[`
    #[strum(serialize = "release")]
    Release,
    /// Repeated input, written `Mash ...`
    #[strum(serialize = "mash")]
    Mash,
    /// Counter-hit marker
    #[strum(serialize = "counter")]
    Counter,
    /// Electric (frame-perfect) marker
    #[strum(serialize = "electric")]
    Electric,
    /// Whiff marker
    #[strum(serialize = "whiff")]
    Whiff,
}

impl NodeState {
    /// Short tag used in logs and in the trailing parenthetical for markers.
    pub fn tag(self) -> &'static str {
        self.into()
    }
}

/// Transition annotation written in the gap after a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
pub enum Connector {
    /// Special/super cancel, written `xx`
    #[strum(serialize = "xx")]
    Cancel,
    /// Link (the next input waits for recovery), written `,`
    #[strum(serialize = ",")]
    Link,
    /// Immediate follow-up, written `~`
    #[strum(serialize = "~")]
    Immediate,
}

impl Connector {
    /// Notation symbol.
    pub fn symbol(self) -> &'static str {
        self.into()
    }

    /// Symbol for an optional connector, falling back to the default arrow.
    pub fn symbol_or_default(connector: Option<Connector>) -> &'static str {
        connector.map_or(DEFAULT_CONNECTOR_SYMBOL, Connector::symbol)
    }
}

/// One timed input event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Monotonic identifier, never reused.
    pub id: NodeId,
    /// Stored time in seconds, `[0, length)`.
    pub time: f64,
    /// Numpad direction held with the buttons.
    pub dir: Direction,
    /// Button labels in press order, no duplicates.
    pub buttons: Vec<String>,
    /// Modifier or marker tag, `None` for a plain input.
    pub state: Option<NodeState>,
    /// Connector toward the next node in time order, `None` for the default arrow.
    pub connector: Option<Connector>,
}

impl Node {
    /// A plain input node. Labels are de-duplicated, first occurrence wins.
    pub fn input<I, S>(id: NodeId, time: f64, dir: Direction, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            time,
            dir,
            buttons: dedup_labels(labels),
            state: None,
            connector: None,
        }
    }

    /// A buttonless marker node (counter / electric / whiff).
    pub fn marker(id: NodeId, time: f64, kind: NodeState) -> Self {
        Self {
            id,
            time,
            dir: Direction::Neutral,
            buttons: Vec::new(),
            state: Some(kind),
            connector: None,
        }
    }

    /// Replace the button list, keeping first-occurrence order.
    pub fn set_buttons<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buttons = dedup_labels(labels);
    }

    /// Set `state` to `target`, or clear it if it already holds `target`.
    ///
    /// Returns the new state.
    pub fn toggle_state(&mut self, target: NodeState) -> Option<NodeState> {
        self.state = if self.state == Some(target) {
            None
        } else {
            Some(target)
        };
        self.state
    }
}

/// De-duplicate labels preserving first-occurrence order.
pub fn dedup_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.into();
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}
