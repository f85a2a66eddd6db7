//! Timeline model: the node collection, playhead, and reposition handle.
//!
//! Nodes are stored in insertion order. Every consumer that cares about
//! time order goes through [`Timeline::ordered`] (stable, so equal times
//! keep insertion order) or the preceding/following queries.
//!
//! While a node is being repositioned its *effective* time is the live
//! playhead; its stored `time` only changes on commit.

use rensa_types::{Connector, Direction, Node, NodeId, NodeState};
use tracing::debug;

/// Insert collision window in seconds.
pub const COLLISION_TOLERANCE: f64 = 0.1;

/// Minimum timeline length in seconds.
pub const MIN_LENGTH: f64 = 1.0;

/// Wrap `t` into `[0, length)`. Non-finite input maps to 0.
pub fn wrap_time(t: f64, length: f64) -> f64 {
    if !t.is_finite() || !length.is_finite() || length <= 0.0 {
        return 0.0;
    }
    let wrapped = t.rem_euclid(length);
    // rem_euclid can round up to `length` for tiny negative inputs
    if wrapped >= length { 0.0 } else { wrapped }
}

/// A node paired with the time it should be drawn at.
#[derive(Clone, Copy, Debug)]
pub struct PlacedNode<'a> {
    pub node: &'a Node,
    /// Effective time: the playhead for the reposition target, stored time otherwise.
    pub time: f64,
}

/// The combo being authored.
#[derive(Clone, Debug)]
pub struct Timeline {
    nodes: Vec<Node>,
    next_id: NodeId,
    length: f64,
    playhead: f64,
    reposition: Option<NodeId>,
    collision_tolerance: f64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl Timeline {
    pub fn new(length: f64) -> Self {
        Self {
            nodes: Vec::new(),
            next_id: NodeId::FIRST,
            length: sanitize_length(length, 10.0),
            playhead: 0.0,
            reposition: None,
            collision_tolerance: COLLISION_TOLERANCE,
        }
    }

    pub fn with_collision_tolerance(mut self, tolerance: f64) -> Self {
        self.collision_tolerance = tolerance;
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    /// Playhead as a fraction of the length, for screen placement.
    pub fn playhead_fraction(&self) -> f64 {
        self.playhead / self.length
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// The most recently issued ID, if any was ever issued.
    pub fn last_issued(&self) -> Option<NodeId> {
        (self.next_id > NodeId::FIRST).then(|| NodeId::new(self.next_id.get() - 1))
    }

    // ── Playhead + length ───────────────────────────────────────────────

    pub fn wrap(&self, t: f64) -> f64 {
        wrap_time(t, self.length)
    }

    pub fn set_playhead(&mut self, t: f64) {
        self.playhead = self.wrap(t);
    }

    /// Move the playhead by a signed offset, wrapping at both ends.
    pub fn nudge_playhead(&mut self, delta: f64) {
        self.set_playhead(self.playhead + delta);
    }

    /// Change the length (floored at [`MIN_LENGTH`]); node times and the
    /// playhead are re-wrapped into the new range.
    pub fn set_length(&mut self, length: f64) {
        self.length = sanitize_length(length, self.length);
        let len = self.length;
        for node in &mut self.nodes {
            node.time = wrap_time(node.time, len);
        }
        self.playhead = wrap_time(self.playhead, len);
        debug!(length = len, "timeline length changed");
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn effective_time(&self, node: &Node) -> f64 {
        if self.reposition == Some(node.id) {
            self.playhead
        } else {
            node.time
        }
    }

    /// First node (insertion order) whose effective time is strictly within `tolerance` of `t`.
    pub fn node_at(&self, t: f64, tolerance: f64) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|n| (self.effective_time(n) - t).abs() < tolerance)
    }

    /// Node nearest to `t`, regardless of distance.
    pub fn closest_node(&self, t: f64) -> Option<&Node> {
        self.nodes.iter().min_by(|a, b| {
            let da = (self.effective_time(a) - t).abs();
            let db = (self.effective_time(b) - t).abs();
            da.total_cmp(&db)
        })
    }

    /// Nodes in ascending effective time; ties keep insertion order.
    pub fn ordered(&self) -> Vec<PlacedNode<'_>> {
        let mut placed: Vec<PlacedNode<'_>> = self
            .nodes
            .iter()
            .map(|node| PlacedNode {
                node,
                time: self.effective_time(node),
            })
            .collect();
        placed.sort_by(|a, b| a.time.total_cmp(&b.time));
        placed
    }

    /// Nodes in ascending stored time; ties keep insertion order.
    fn by_stored_time(&self) -> Vec<&Node> {
        let mut sorted: Vec<&Node> = self.nodes.iter().collect();
        sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
        sorted
    }

    /// Last node strictly before `t` in time order.
    pub fn preceding_node(&self, t: f64) -> Option<&Node> {
        self.by_stored_time()
            .into_iter()
            .take_while(|n| n.time < t)
            .last()
    }

    /// All nodes strictly after `t`, ascending.
    pub fn following_nodes(&self, t: f64) -> Vec<&Node> {
        self.by_stored_time()
            .into_iter()
            .filter(|n| n.time > t)
            .collect()
    }

    /// Is `t` inside a gap between two nodes?
    pub fn has_connector_at(&self, t: f64) -> bool {
        self.preceding_node(t).is_some() && !self.following_nodes(t).is_empty()
    }

    // ── Edits ───────────────────────────────────────────────────────────

    fn issue_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Insert an input at `time`, or overwrite the node already occupying
    /// its collision window.
    ///
    /// Returns the affected node, or `None` while a reposition is in progress.
    pub fn upsert_at(
        &mut self,
        time: f64,
        labels: &[String],
        dir: Option<Direction>,
    ) -> Option<NodeId> {
        if self.reposition.is_some() {
            return None;
        }
        let t = self.wrap(time);
        let tolerance = self.collision_tolerance;
        let existing = self.node_at(t, tolerance).map(|n| n.id);

        if let Some(id) = existing
            && let Some(node) = self.get_mut(id)
        {
            node.set_buttons(labels.iter().cloned());
            node.dir = dir.unwrap_or(node.dir);
            debug!(node = %id, buttons = ?node.buttons, dir = %node.dir, "overwrote node");
            return Some(id);
        }

        let id = self.issue_id();
        let node = Node::input(id, t, dir.unwrap_or_default(), labels.iter().cloned());
        debug!(node = %id, time = t, buttons = ?node.buttons, dir = %node.dir, "inserted node");
        self.nodes.push(node);
        Some(id)
    }

    /// Insert a buttonless marker at `time`. An occupied collision window
    /// gets its state overwritten instead.
    pub fn insert_marker(&mut self, time: f64, kind: NodeState) -> NodeId {
        let t = self.wrap(time);
        let tolerance = self.collision_tolerance;
        let existing = self.node_at(t, tolerance).map(|n| n.id);

        if let Some(id) = existing
            && let Some(node) = self.get_mut(id)
        {
            node.state = Some(kind);
            debug!(node = %id, state = kind.tag(), "marked existing node");
            return id;
        }

        let id = self.issue_id();
        debug!(node = %id, time = t, state = kind.tag(), "inserted marker");
        self.nodes.push(Node::marker(id, t, kind));
        id
    }

    /// Remove a node by ID. Clears the reposition handle if it pointed there.
    pub fn delete(&mut self, id: NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        if self.reposition == Some(id) {
            self.reposition = None;
        }
        let removed = self.nodes.remove(index);
        debug!(node = %id, "deleted node");
        Some(removed)
    }

    /// Remove the node nearest to `time` if it lies strictly within `tolerance`.
    pub fn delete_at(&mut self, time: f64, tolerance: f64) -> Option<Node> {
        let id = self
            .nodes
            .iter()
            .map(|n| (n.id, (self.effective_time(n) - time).abs()))
            .filter(|(_, distance)| *distance < tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)?;
        self.delete(id)
    }

    /// Empty the timeline and rewind. The ID counter keeps counting.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.reposition = None;
        self.playhead = 0.0;
        debug!(next_id = %self.next_id, "timeline cleared");
    }

    pub fn set_connector(&mut self, id: NodeId, connector: Option<Connector>) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        node.connector = connector;
        debug!(node = %id, connector = ?connector, "connector set");
        true
    }

    pub fn set_state(&mut self, id: NodeId, state: Option<NodeState>) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        node.state = state;
        true
    }

    /// Toggle `state` on a node. Returns the node's new state, or `None`
    /// if the node doesn't exist.
    pub fn toggle_state(&mut self, id: NodeId, state: NodeState) -> Option<Option<NodeState>> {
        let node = self.get_mut(id)?;
        let now = node.toggle_state(state);
        debug!(node = %id, state = ?now, "state toggled");
        Some(now)
    }

    // ── Reposition ──────────────────────────────────────────────────────

    pub fn reposition_target(&self) -> Option<NodeId> {
        self.reposition
    }

    pub fn is_repositioning(&self) -> bool {
        self.reposition.is_some()
    }

    pub fn begin_reposition(&mut self, id: NodeId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.reposition = Some(id);
        debug!(node = %id, "reposition started");
        true
    }

    /// Store `time` on the reposition target and release the handle.
    pub fn commit_reposition(&mut self, time: f64) -> Option<NodeId> {
        let id = self.reposition.take()?;
        let t = self.wrap(time);
        let node = self.get_mut(id)?;
        node.time = t;
        debug!(node = %id, time = t, "reposition committed");
        Some(id)
    }

    pub fn cancel_reposition(&mut self) {
        if let Some(id) = self.reposition.take() {
            debug!(node = %id, "reposition cancelled");
        }
    }
}

fn sanitize_length(length: f64, fallback: f64) -> f64 {
    if length.is_finite() {
        length.max(MIN_LENGTH)
    } else {
        fallback.max(MIN_LENGTH)
    }
}

/// Parse the duration field the way a lenient number input does: the
/// longest numeric prefix wins, trailing junk is ignored. Missing, zero,
/// or non-finite values give `default`; the result is floored at [`MIN_LENGTH`].
pub fn parse_duration_input(text: &str, default: f64) -> f64 {
    let text = text.trim_start();
    let parsed = (1..=text.len())
        .rev()
        .filter(|&end| text.is_char_boundary(end))
        .find_map(|end| text[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v != 0.0);
    parsed.unwrap_or(default).max(MIN_LENGTH)
}
