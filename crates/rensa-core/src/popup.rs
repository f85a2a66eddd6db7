//! Contextual popup menu.
//!
//! The popup is opened for one of three contexts and offers a fixed,
//! ordered list of [`PopupAction`]s for it. A single confirm input applies
//! the highlighted action to the [`Timeline`] and closes the menu.
//!
//! | Context     | Opened when                                       |
//! |-------------|---------------------------------------------------|
//! | `Node`      | a node sits at the playhead (or was right-clicked) |
//! | `Connector` | the playhead is in a gap between two nodes        |
//! | `Empty`     | anywhere else                                     |

use std::time::{Duration, Instant};

use rensa_types::{Connector, NodeId, NodeState};
use serde::Serialize;
use tracing::debug;

use crate::timeline::Timeline;

/// What the popup was opened for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PopupContext {
    Node(NodeId),
    Connector,
    Empty,
}

impl PopupContext {
    pub fn options(&self) -> &'static [PopupAction] {
        use PopupAction::*;
        match self {
            PopupContext::Node(_) => &[
                Move,
                ToggleAir,
                ToggleJumpCancel,
                ToggleHold,
                ToggleRelease,
                ToggleMash,
                Clear,
                Delete,
            ],
            PopupContext::Connector => &[
                RevertDefault,
                SetCancel,
                SetLink,
                SetImmediate,
                InsertCounter,
                InsertElectric,
                InsertWhiff,
                Clear,
            ],
            PopupContext::Empty => &[InsertCounter, InsertElectric, InsertWhiff, Clear],
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        match self {
            PopupContext::Node(id) => Some(*id),
            _ => None,
        }
    }
}

/// Visual grouping; the front-end draws a separator where the group changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PopupGroup {
    Reposition,
    State,
    Connector,
    Insert,
    Timeline,
}

/// Every action a popup can offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PopupAction {
    Move,
    ToggleAir,
    ToggleJumpCancel,
    ToggleHold,
    ToggleRelease,
    ToggleMash,
    Clear,
    Delete,
    RevertDefault,
    SetCancel,
    SetLink,
    SetImmediate,
    InsertCounter,
    InsertElectric,
    InsertWhiff,
}

impl PopupAction {
    pub fn label(&self) -> &'static str {
        match self {
            PopupAction::Move => "Move Node",
            PopupAction::ToggleAir => "Toggle In Air",
            PopupAction::ToggleJumpCancel => "Toggle Jump Cancel",
            PopupAction::ToggleHold => "Toggle Hold",
            PopupAction::ToggleRelease => "Toggle Release",
            PopupAction::ToggleMash => "Toggle Mash",
            PopupAction::Clear => "Clear Timeline",
            PopupAction::Delete => "Delete Node",
            PopupAction::RevertDefault => "Revert to Default (>)",
            PopupAction::SetCancel => "Set to Cancel (xx)",
            PopupAction::SetLink => "Set to Link (,)",
            PopupAction::SetImmediate => "Set to Immediate (~)",
            PopupAction::InsertCounter => "Insert Counter",
            PopupAction::InsertElectric => "Insert Electric",
            PopupAction::InsertWhiff => "Insert Whiff",
        }
    }

    pub fn group(&self) -> PopupGroup {
        match self {
            PopupAction::Move => PopupGroup::Reposition,
            PopupAction::ToggleAir
            | PopupAction::ToggleJumpCancel
            | PopupAction::ToggleHold
            | PopupAction::ToggleRelease
            | PopupAction::ToggleMash => PopupGroup::State,
            PopupAction::RevertDefault
            | PopupAction::SetCancel
            | PopupAction::SetLink
            | PopupAction::SetImmediate => PopupGroup::Connector,
            PopupAction::InsertCounter | PopupAction::InsertElectric | PopupAction::InsertWhiff => {
                PopupGroup::Insert
            }
            PopupAction::Clear | PopupAction::Delete => PopupGroup::Timeline,
        }
    }

    /// Node state this action toggles, if it is a state toggle.
    fn toggled_state(&self) -> Option<NodeState> {
        match self {
            PopupAction::ToggleAir => Some(NodeState::Air),
            PopupAction::ToggleJumpCancel => Some(NodeState::JumpCancel),
            PopupAction::ToggleHold => Some(NodeState::Hold),
            PopupAction::ToggleRelease => Some(NodeState::Release),
            PopupAction::ToggleMash => Some(NodeState::Mash),
            _ => None,
        }
    }

    /// Marker kind this action inserts, if it is an insertion.
    fn inserted_marker(&self) -> Option<NodeState> {
        match self {
            PopupAction::InsertCounter => Some(NodeState::Counter),
            PopupAction::InsertElectric => Some(NodeState::Electric),
            PopupAction::InsertWhiff => Some(NodeState::Whiff),
            _ => None,
        }
    }

    /// Connector this action writes, if it is a connector action.
    /// `Some(None)` reverts to the default arrow.
    fn connector(&self) -> Option<Option<Connector>> {
        match self {
            PopupAction::RevertDefault => Some(None),
            PopupAction::SetCancel => Some(Some(Connector::Cancel)),
            PopupAction::SetLink => Some(Some(Connector::Link)),
            PopupAction::SetImmediate => Some(Some(Connector::Immediate)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
struct OpenPopup {
    context: PopupContext,
    selected: usize,
    /// Playhead fraction at open time, for placing the panel.
    anchor: f64,
    last_nav: Instant,
}

/// Popup state machine: closed, or open for a context with a selection.
#[derive(Clone, Debug)]
pub struct Popup {
    open: Option<OpenPopup>,
    nav_debounce: Duration,
}

impl Default for Popup {
    fn default() -> Self {
        Self::new(Duration::from_millis(150))
    }
}

impl Popup {
    pub fn new(nav_debounce: Duration) -> Self {
        Self {
            open: None,
            nav_debounce,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn context(&self) -> Option<PopupContext> {
        self.open.as_ref().map(|p| p.context)
    }

    pub fn selected(&self) -> Option<usize> {
        self.open.as_ref().map(|p| p.selected)
    }

    pub fn anchor(&self) -> Option<f64> {
        self.open.as_ref().map(|p| p.anchor)
    }

    pub fn options(&self) -> &'static [PopupAction] {
        match self.context() {
            Some(ctx) => ctx.options(),
            None => &[],
        }
    }

    /// Open (or re-open) for `context`. Selection resets to the first option
    /// and the navigation debounce starts counting from `now`.
    pub fn open(&mut self, context: PopupContext, anchor: f64, now: Instant) {
        debug!(context = ?context, anchor, "popup opened");
        self.open = Some(OpenPopup {
            context,
            selected: 0,
            anchor,
            last_nav: now,
        });
    }

    pub fn close(&mut self) {
        if self.open.take().is_some() {
            debug!("popup closed");
        }
    }

    /// Move the selection by `delta`, wrapping. Steps closer than the
    /// debounce interval to the previous one are dropped.
    ///
    /// Returns whether the selection moved.
    pub fn navigate(&mut self, delta: i32, now: Instant) -> bool {
        let debounce = self.nav_debounce;
        let Some(open) = self.open.as_mut() else {
            return false;
        };
        if now.saturating_duration_since(open.last_nav) < debounce {
            return false;
        }
        let count = open.context.options().len() as i64;
        if count == 0 {
            return false;
        }
        open.selected = (open.selected as i64 + i64::from(delta)).rem_euclid(count) as usize;
        open.last_nav = now;
        true
    }

    /// Apply the currently highlighted option.
    pub fn confirm_selected(&mut self, timeline: &mut Timeline) -> Option<PopupAction> {
        let index = self.selected()?;
        self.confirm(index, timeline)
    }

    /// Apply option `index` to `timeline` and close.
    ///
    /// An index outside the option list does nothing and leaves the popup open.
    pub fn confirm(&mut self, index: usize, timeline: &mut Timeline) -> Option<PopupAction> {
        let context = self.context()?;
        let action = *context.options().get(index)?;
        apply_action(action, context.node(), timeline);
        debug!(action = action.label(), "popup action applied");
        self.close();
        Some(action)
    }
}

fn apply_action(action: PopupAction, bound: Option<NodeId>, timeline: &mut Timeline) {
    if let Some(connector) = action.connector() {
        if let Some(target) = timeline.preceding_node(timeline.playhead()).map(|n| n.id) {
            timeline.set_connector(target, connector);
        }
        return;
    }
    if let Some(state) = action.toggled_state() {
        if let Some(id) = bound {
            timeline.toggle_state(id, state);
        }
        return;
    }
    if let Some(kind) = action.inserted_marker() {
        match bound {
            Some(id) => {
                timeline.set_state(id, Some(kind));
            }
            None => {
                let playhead = timeline.playhead();
                timeline.insert_marker(playhead, kind);
            }
        }
        return;
    }
    match action {
        PopupAction::Move => {
            if let Some(id) = bound {
                timeline.begin_reposition(id);
            }
        }
        PopupAction::Delete => {
            if let Some(id) = bound {
                timeline.delete(id);
            }
        }
        PopupAction::Clear => timeline.clear(),
        _ => {}
    }
}
