//! Input capture: gamepad snapshots and keyboard commands.
//!
//! ## Architecture
//!
//! ```text
//! Gamepad ──► poll_gamepad ──► ControllerState (resource, one snapshot)
//! Keyboard ─► capture_keyboard ─► EditorCommand / AppAction (messages)
//! Pointer ──► ui::timeline systems ─► EditorCommand
//!     │
//!     ▼
//! EditorPhase::Tick: editor::tick_session drains EditorCommand into the
//! session queue, then ticks with the current ControllerState
//!     │
//!     ▼
//! EditorPhase::Present: UI systems read CurrentFrame
//! ```
//!
//! Capture never touches the session; all edits happen inside the tick.

pub mod events;
pub mod gamepad;
pub mod keyboard;
pub mod systems;

pub use events::{AppAction, ControllerState, DurationDraft, EditorCommand};

use bevy::prelude::*;

/// Per-frame ordering: capture input, tick the session, paint.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditorPhase {
    /// Poll devices, translate raw input into commands
    Capture,
    /// Run the session tick
    Tick,
    /// Sync UI entities with the rendered frame
    Present,
}

/// Plugin that registers input capture and the phase ordering.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<EditorCommand>()
            .add_message::<AppAction>();

        app.init_resource::<ControllerState>()
            .init_resource::<DurationDraft>();

        app.configure_sets(
            Update,
            (
                EditorPhase::Capture,
                EditorPhase::Tick.after(EditorPhase::Capture),
                EditorPhase::Present.after(EditorPhase::Tick),
            ),
        );

        app.add_systems(
            Update,
            (gamepad::poll_gamepad, keyboard::capture_keyboard)
                .chain()
                .in_set(EditorPhase::Capture),
        );

        app.add_systems(
            Update,
            (
                systems::handle_quit,
                systems::handle_screenshot,
                systems::handle_frame_dump,
            )
                .after(EditorPhase::Tick),
        );
    }
}
