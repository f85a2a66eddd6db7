//! Input messages and resources: the output of the capture systems.

use bevy::prelude::*;
use rensa_core::{Command, ControllerSnapshot};

/// An editor command captured from keyboard or pointer.
///
/// Drained into the session queue at the start of the tick, in write order.
#[derive(Message, Clone, Debug)]
pub struct EditorCommand(pub Command);

/// App-level requests that don't touch the session.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Screenshot,
    /// Write the current frame to the log directory as RON.
    DumpFrame,
}

/// Snapshot of the first connected gamepad, or `None` when unplugged.
#[derive(Resource, Default, Debug)]
pub struct ControllerState(pub Option<ControllerSnapshot>);

/// Duration text being typed while typing mode is on.
#[derive(Resource, Default, Debug)]
pub struct DurationDraft(pub String);
