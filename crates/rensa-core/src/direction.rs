//! Direction resolver: d-pad + left stick → numpad direction.
//!
//! Digital input always wins over the stick. Diagonals are checked before
//! cardinals, so a d-pad reporting up+down+left resolves to 7.

use rensa_types::Direction;

use crate::controller::{ButtonLayout, ControllerSnapshot, DigitalPad};

/// Resolve a direction from digital state and a stick pair.
///
/// `y` is positive *down*. Total: always returns one of the nine codes.
pub fn resolve_direction(pad: DigitalPad, x: f32, y: f32, deadzone: f32) -> Direction {
    let DigitalPad { up, down, left, right } = pad;

    if up && left {
        return Direction::UpBack;
    }
    if up && right {
        return Direction::UpForward;
    }
    if down && left {
        return Direction::DownBack;
    }
    if down && right {
        return Direction::DownForward;
    }
    if up {
        return Direction::Up;
    }
    if down {
        return Direction::Down;
    }
    if left {
        return Direction::Back;
    }
    if right {
        return Direction::Forward;
    }

    if x.abs() < deadzone && y.abs() < deadzone {
        return Direction::Neutral;
    }

    let horizontal = axis_sign(x, deadzone);
    let vertical = axis_sign(y, deadzone);
    Direction::from_signs(horizontal, vertical)
}

fn axis_sign(value: f32, deadzone: f32) -> i8 {
    if value > deadzone {
        1
    } else if value < -deadzone {
        -1
    } else {
        0
    }
}

/// Reads the direction roles of a [`ButtonLayout`] out of a snapshot.
#[derive(Clone, Copy, Debug)]
pub struct DirectionResolver {
    pub deadzone: f32,
}

impl Default for DirectionResolver {
    fn default() -> Self {
        Self { deadzone: 0.1 }
    }
}

impl DirectionResolver {
    pub fn new(deadzone: f32) -> Self {
        Self { deadzone }
    }

    pub fn resolve(&self, snapshot: &ControllerSnapshot, layout: &ButtonLayout) -> Direction {
        let (x, y) = layout.direction_axes(snapshot);
        resolve_direction(layout.dpad(snapshot), x, y, self.deadzone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{axis, button};

    const DZ: f32 = 0.1;

    fn pad(up: bool, down: bool, left: bool, right: bool) -> DigitalPad {
        DigitalPad { up, down, left, right }
    }

    #[test]
    fn test_digital_diagonal_beats_any_analog() {
        for (x, y) in [(0.0, 0.0), (1.0, 1.0), (-1.0, 0.0), (0.7, -0.7)] {
            let up_back = resolve_direction(pad(true, false, true, false), x, y, DZ);
            assert_eq!(up_back, Direction::UpBack);
            let down_forward = resolve_direction(pad(false, true, false, true), x, y, DZ);
            assert_eq!(down_forward, Direction::DownForward);
        }
    }

    #[test]
    fn test_digital_cardinals() {
        let cases = [
            (pad(true, false, false, false), 0.9, Direction::Up),
            (pad(false, true, false, false), 0.0, Direction::Down),
            (pad(false, false, true, false), 0.0, Direction::Back),
            (pad(false, false, false, true), 0.0, Direction::Forward),
        ];
        for (digital, analog, expected) in cases {
            assert_eq!(resolve_direction(digital, analog, analog, DZ), expected);
        }
    }

    #[test]
    fn test_conflicting_digital_uses_check_order() {
        let conflicted = resolve_direction(pad(true, true, true, false), 0.0, 0.0, DZ);
        assert_eq!(conflicted, Direction::UpBack);
        assert_eq!(resolve_direction(pad(true, true, false, false), 0.0, 0.0, DZ), Direction::Up);
    }

    #[test]
    fn test_analog_inside_deadzone_is_neutral() {
        assert_eq!(resolve_direction(DigitalPad::default(), 0.05, -0.09, DZ), Direction::Neutral);
    }

    #[test]
    fn test_analog_rows_and_columns() {
        let none = DigitalPad::default();
        assert_eq!(resolve_direction(none, 0.0, 0.8, DZ), Direction::Down);
        assert_eq!(resolve_direction(none, 0.5, 0.8, DZ), Direction::DownForward);
        assert_eq!(resolve_direction(none, -0.5, 0.8, DZ), Direction::DownBack);
        assert_eq!(resolve_direction(none, 0.0, -0.8, DZ), Direction::Up);
        assert_eq!(resolve_direction(none, 0.5, -0.8, DZ), Direction::UpForward);
        assert_eq!(resolve_direction(none, -0.5, -0.8, DZ), Direction::UpBack);
        assert_eq!(resolve_direction(none, 0.8, 0.0, DZ), Direction::Forward);
        assert_eq!(resolve_direction(none, -0.8, 0.05, DZ), Direction::Back);
    }

    #[test]
    fn test_resolver_reads_layout() {
        let layout = ButtonLayout::default();
        let resolver = DirectionResolver::default();
        let snap = ControllerSnapshot::neutral()
            .with_pressed(&[button::DPAD_DOWN])
            .with_axis(axis::LEFT_X, -1.0);
        assert_eq!(resolver.resolve(&snap, &layout), Direction::Down);

        let snap = ControllerSnapshot::neutral().with_axis(axis::LEFT_Y, -1.0);
        assert_eq!(resolver.resolve(&snap, &layout), Direction::Up);
    }
}
