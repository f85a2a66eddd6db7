//! Editor commands and the per-tick queue.
//!
//! Everything that changes session state arrives as a [`Command`]: the
//! controller router emits them during the tick, front-ends push keyboard,
//! pointer, and media events between ticks. The session drains the queue
//! at the start of every tick, before routing the controller.

use std::collections::VecDeque;

use rensa_types::{Direction, NodeId};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    // ── Controller ──────────────────────────────────────────────────────
    /// A confirm button went down: commit a move, confirm the popup, or insert.
    Confirm { labels: Vec<String>, dir: Direction },
    /// A mapped attack button went down.
    Strike { labels: Vec<String>, dir: Direction },
    /// The menu button went down.
    MenuPress,
    /// The menu button has been held past the delete threshold.
    MenuHoldElapsed,
    TogglePlayback,
    ToggleTypingMode,

    // ── Popup ───────────────────────────────────────────────────────────
    NavigatePopup(i32),
    /// Explicit cancel or outside click. Also drops an uncommitted move.
    ClosePopup,
    ConfirmPopup(usize),
    ConfirmSelected,

    // ── Pointer ─────────────────────────────────────────────────────────
    /// Timeline click or playhead drag.
    SeekTo(f64),
    JumpToNode(NodeId),
    /// Double click: move the playhead there and open the contextual popup.
    OpenPopupAt(f64),
    OpenNodePopup(NodeId),

    // ── Timeline ────────────────────────────────────────────────────────
    ClearTimeline,
    /// Raw text from the duration field.
    SetDurationInput(String),
    SetLength(f64),
    CancelReposition,

    // ── Media ───────────────────────────────────────────────────────────
    MediaLoaded { duration: Option<f64> },
    MediaTimeUpdate(f64),
    MediaSeeking,
    MediaSeeked(f64),
}

/// FIFO of commands waiting for the next tick.
#[derive(Clone, Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    pub fn pop(&mut self) -> Option<Command> {
        self.pending.pop_front()
    }
}
