//! Gamepad polling into the standard-mapping snapshot the engine expects.

use bevy::prelude::*;
use rensa_core::ControllerSnapshot;

use super::events::ControllerState;

/// Bevy buttons in standard-mapping index order (0..=16).
///
/// Bevy calls the bumpers `LeftTrigger`/`RightTrigger` and the analog
/// triggers `LeftTrigger2`/`RightTrigger2`.
pub const STANDARD_BUTTONS: [GamepadButton; 17] = [
    GamepadButton::South,
    GamepadButton::East,
    GamepadButton::West,
    GamepadButton::North,
    GamepadButton::LeftTrigger,
    GamepadButton::RightTrigger,
    GamepadButton::LeftTrigger2,
    GamepadButton::RightTrigger2,
    GamepadButton::Select,
    GamepadButton::Start,
    GamepadButton::LeftThumb,
    GamepadButton::RightThumb,
    GamepadButton::DPadUp,
    GamepadButton::DPadDown,
    GamepadButton::DPadLeft,
    GamepadButton::DPadRight,
    GamepadButton::Mode,
];

/// Build a snapshot from a Bevy gamepad. Y axes are flipped to down-positive.
pub fn snapshot_from(gamepad: &Gamepad) -> ControllerSnapshot {
    let buttons = STANDARD_BUTTONS.iter().map(|b| gamepad.pressed(*b)).collect();
    let axis = |a: GamepadAxis| gamepad.get(a).unwrap_or(0.0);
    let axes = vec![
        axis(GamepadAxis::LeftStickX),
        -axis(GamepadAxis::LeftStickY),
        axis(GamepadAxis::RightStickX),
        -axis(GamepadAxis::RightStickY),
    ];
    ControllerSnapshot { buttons, axes }
}

/// Poll the first connected gamepad every frame; hot-plug shows up as
/// `None` → `Some` transitions.
pub fn poll_gamepad(gamepads: Query<&Gamepad>, mut state: ResMut<ControllerState>) {
    state.0 = gamepads.iter().next().map(snapshot_from);
}
