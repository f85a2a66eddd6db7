//! Combo notation: the timeline as a readable string.
//!
//! A node renders as `dir + buttons` wrapped by its state:
//!
//! | State        | Example    |
//! |--------------|------------|
//! | none         | `2(L+M)`   |
//! | air          | `j.2H`     |
//! | jump cancel  | `j.C2H`    |
//! | hold         | `[2H]`     |
//! | release      | `]2H[`     |
//! | mash         | `Mash L`   |
//! | marker kinds | `(counter)`|
//!
//! Between consecutive nodes sits a connector token, `" > "` unless the
//! left node carries its own connector. At most one token per line is
//! highlighted.

use rensa_types::{Connector, Node, NodeId, NodeState};
use serde::Serialize;

use crate::render::NodeMarker;
use crate::timeline::Timeline;

/// Display string for a single node.
pub fn node_display(node: &Node) -> String {
    let dir = if node.dir.is_neutral() {
        String::new()
    } else {
        node.dir.to_string()
    };
    let buttons = match node.buttons.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        many => format!("({})", many.join("+")),
    };
    let body = format!("{dir}{buttons}");

    match node.state {
        None => body,
        Some(NodeState::Air) => format!("j.{body}"),
        Some(NodeState::JumpCancel) => format!("j.C{body}"),
        Some(NodeState::Hold) => format!("[{body}]"),
        Some(NodeState::Release) => format!("]{body}["),
        Some(NodeState::Mash) => format!("Mash {body}"),
        Some(marker) => format!("{body}({})", marker.tag()),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Node(NodeId),
    /// The gap after this node.
    Connector(NodeId),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NotationToken {
    pub kind: TokenKind,
    pub text: String,
    pub highlighted: bool,
}

/// A rendered combo line.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NotationLine {
    pub tokens: Vec<NotationToken>,
}

impl NotationLine {
    /// The copyable combo string.
    pub fn to_plain_string(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    pub fn highlighted(&self) -> Option<&NotationToken> {
        self.tokens.iter().find(|t| t.highlighted)
    }
}

fn connector_text(connector: Option<Connector>) -> String {
    format!(" {} ", Connector::symbol_or_default(connector))
}

/// Render the timeline into notation tokens.
///
/// Highlight goes to the first match of: the node being repositioned, the
/// first node within `tolerance` of the playhead, the gap containing the
/// playhead. A gap only lights up while paused, but it still claims the
/// highlight during playback.
pub fn render_notation(timeline: &Timeline, playing: bool, tolerance: f64) -> NotationLine {
    let placed = timeline.ordered();
    let playhead = timeline.playhead();

    let highlighted_node = timeline
        .reposition_target()
        .filter(|id| timeline.get(*id).is_some())
        .or_else(|| {
            placed
                .iter()
                .find(|p| (p.time - playhead).abs() < tolerance)
                .map(|p| p.node.id)
        });
    let mut claimed = highlighted_node.is_some();

    let mut tokens = Vec::with_capacity(placed.len() * 2);
    for (i, current) in placed.iter().enumerate() {
        tokens.push(NotationToken {
            kind: TokenKind::Node(current.node.id),
            text: node_display(current.node),
            highlighted: highlighted_node == Some(current.node.id),
        });

        let Some(next) = placed.get(i + 1) else {
            break;
        };
        let spans_playhead = !claimed && playhead > current.time && playhead < next.time;
        if spans_playhead {
            claimed = true;
        }
        tokens.push(NotationToken {
            kind: TokenKind::Connector(current.node.id),
            text: connector_text(current.node.connector),
            highlighted: spans_playhead && !playing,
        });
    }

    NotationLine { tokens }
}

/// Track markers, one per node in time order.
pub fn node_markers(timeline: &Timeline, tolerance: f64) -> Vec<NodeMarker> {
    let length = timeline.length();
    let playhead = timeline.playhead();
    let target = timeline.reposition_target();
    timeline
        .ordered()
        .into_iter()
        .map(|p| {
            let repositioning = target == Some(p.node.id);
            NodeMarker {
                id: p.node.id,
                fraction: p.time / length,
                label: node_display(p.node),
                highlighted: !repositioning && (p.time - playhead).abs() < tolerance,
                repositioning,
            }
        })
        .collect()
}

/// `"2.00s / 120f (of 10.00s / 600f)"`.
pub fn time_readout(playhead: f64, length: f64, frame_rate: u32) -> String {
    let fps = f64::from(frame_rate);
    let frames = (playhead * fps).floor() as i64;
    let total = (length * fps).floor() as i64;
    format!("{playhead:.2}s / {frames}f (of {length:.2}s / {total}f)")
}
