//! Controller snapshots and the physical button layout.
//!
//! The engine never talks to a gamepad API. Front-ends poll whatever device
//! they have and hand the router a [`ControllerSnapshot`] laid out in the
//! standard gamepad mapping (the W3C "standard" layout: 17 buttons, 4 axes,
//! Y axes positive *down*).

use serde::{Deserialize, Serialize};

/// Button indices of the standard gamepad mapping.
pub mod button {
    pub const SOUTH: usize = 0;
    pub const EAST: usize = 1;
    pub const WEST: usize = 2;
    pub const NORTH: usize = 3;
    pub const LEFT_BUMPER: usize = 4;
    pub const RIGHT_BUMPER: usize = 5;
    pub const LEFT_TRIGGER: usize = 6;
    pub const RIGHT_TRIGGER: usize = 7;
    pub const SELECT: usize = 8;
    pub const START: usize = 9;
    pub const LEFT_STICK: usize = 10;
    pub const RIGHT_STICK: usize = 11;
    pub const DPAD_UP: usize = 12;
    pub const DPAD_DOWN: usize = 13;
    pub const DPAD_LEFT: usize = 14;
    pub const DPAD_RIGHT: usize = 15;
    pub const HOME: usize = 16;

    /// Number of buttons in the standard mapping.
    pub const COUNT: usize = 17;
}

/// Axis indices of the standard gamepad mapping.
pub mod axis {
    pub const LEFT_X: usize = 0;
    pub const LEFT_Y: usize = 1;
    pub const RIGHT_X: usize = 2;
    pub const RIGHT_Y: usize = 3;

    /// Number of axes in the standard mapping.
    pub const COUNT: usize = 4;
}

/// One poll of a controller: pressed flags and axis values.
///
/// Out-of-range reads are "not pressed" / `0.0`, so a pad with fewer
/// buttons than the layout expects simply never triggers the missing roles.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub buttons: Vec<bool>,
    pub axes: Vec<f32>,
}

impl ControllerSnapshot {
    /// A standard-layout snapshot with nothing pressed and sticks centered.
    pub fn neutral() -> Self {
        Self {
            buttons: vec![false; button::COUNT],
            axes: vec![0.0; axis::COUNT],
        }
    }

    /// Builder: mark buttons as pressed.
    pub fn with_pressed(mut self, indices: &[usize]) -> Self {
        for &i in indices {
            if i >= self.buttons.len() {
                self.buttons.resize(i + 1, false);
            }
            self.buttons[i] = true;
        }
        self
    }

    /// Builder: set one axis value.
    pub fn with_axis(mut self, index: usize, value: f32) -> Self {
        if index >= self.axes.len() {
            self.axes.resize(index + 1, 0.0);
        }
        self.axes[index] = value;
        self
    }

    pub fn pressed(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }
}

/// Digital direction state read from the d-pad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DigitalPad {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Which physical index plays which role.
///
/// Defaults to the standard mapping: south/east confirm, select opens the
/// menu, start drives playback, d-pad navigates popups and feeds the
/// direction resolver, left stick is direction, right stick scrubs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonLayout {
    pub confirm: [usize; 2],
    pub menu: usize,
    pub start: usize,
    pub popup_up: usize,
    pub popup_down: usize,
    pub dpad_up: usize,
    pub dpad_down: usize,
    pub dpad_left: usize,
    pub dpad_right: usize,
    pub direction_stick: (usize, usize),
    pub scrub_stick: (usize, usize),
}

impl Default for ButtonLayout {
    fn default() -> Self {
        Self {
            confirm: [button::SOUTH, button::EAST],
            menu: button::SELECT,
            start: button::START,
            popup_up: button::DPAD_UP,
            popup_down: button::DPAD_DOWN,
            dpad_up: button::DPAD_UP,
            dpad_down: button::DPAD_DOWN,
            dpad_left: button::DPAD_LEFT,
            dpad_right: button::DPAD_RIGHT,
            direction_stick: (axis::LEFT_X, axis::LEFT_Y),
            scrub_stick: (axis::RIGHT_X, axis::RIGHT_Y),
        }
    }
}

impl ButtonLayout {
    pub fn is_confirm(&self, index: usize) -> bool {
        self.confirm.contains(&index)
    }

    pub fn dpad(&self, snapshot: &ControllerSnapshot) -> DigitalPad {
        DigitalPad {
            up: snapshot.pressed(self.dpad_up),
            down: snapshot.pressed(self.dpad_down),
            left: snapshot.pressed(self.dpad_left),
            right: snapshot.pressed(self.dpad_right),
        }
    }

    pub fn direction_axes(&self, snapshot: &ControllerSnapshot) -> (f32, f32) {
        (
            snapshot.axis(self.direction_stick.0),
            snapshot.axis(self.direction_stick.1),
        )
    }

    pub fn scrub_axes(&self, snapshot: &ControllerSnapshot) -> (f32, f32) {
        (
            snapshot.axis(self.scrub_stick.0),
            snapshot.axis(self.scrub_stick.1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_reads_are_neutral() {
        let snap = ControllerSnapshot::default();
        assert!(!snap.pressed(button::START));
        assert_eq!(snap.axis(axis::RIGHT_Y), 0.0);
    }

    #[test]
    fn test_with_pressed_grows_button_vec() {
        let snap = ControllerSnapshot::default().with_pressed(&[button::DPAD_LEFT]);
        assert_eq!(snap.button_count(), button::DPAD_LEFT + 1);
        assert!(snap.pressed(button::DPAD_LEFT));
    }

    #[test]
    fn test_default_layout_roles() {
        let layout = ButtonLayout::default();
        assert!(layout.is_confirm(button::SOUTH));
        assert!(layout.is_confirm(button::EAST));
        assert!(!layout.is_confirm(button::WEST));
        assert_eq!(layout.menu, button::SELECT);
    }

    #[test]
    fn test_dpad_reads_layout_indices() {
        let layout = ButtonLayout::default();
        let snap =
            ControllerSnapshot::neutral().with_pressed(&[button::DPAD_UP, button::DPAD_RIGHT]);
        let pad = layout.dpad(&snap);
        assert!(pad.up && pad.right);
        assert!(!pad.down && !pad.left);
    }
}
