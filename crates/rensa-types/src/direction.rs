//! Numpad direction notation.
//!
//! Fighting-game notation names directions by their position on a numeric
//! keypad, assuming the character faces right:
//!
//! ```text
//!   7 8 9      up-back    up    up-forward
//!   4 5 6      back     neutral forward
//!   1 2 3      down-back  down  down-forward
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the nine numpad directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "1")]
    DownBack,
    #[serde(rename = "2")]
    Down,
    #[serde(rename = "3")]
    DownForward,
    #[serde(rename = "4")]
    Back,
    #[default]
    #[serde(rename = "5")]
    Neutral,
    #[serde(rename = "6")]
    Forward,
    #[serde(rename = "7")]
    UpBack,
    #[serde(rename = "8")]
    Up,
    #[serde(rename = "9")]
    UpForward,
}

impl Direction {
    /// All nine directions in numpad order.
    pub const ALL: [Direction; 9] = [
        Direction::DownBack,
        Direction::Down,
        Direction::DownForward,
        Direction::Back,
        Direction::Neutral,
        Direction::Forward,
        Direction::UpBack,
        Direction::Up,
        Direction::UpForward,
    ];

    /// The numpad digit, `'1'..='9'`.
    pub fn digit(self) -> char {
        match self {
            Direction::DownBack => '1',
            Direction::Down => '2',
            Direction::DownForward => '3',
            Direction::Back => '4',
            Direction::Neutral => '5',
            Direction::Forward => '6',
            Direction::UpBack => '7',
            Direction::Up => '8',
            Direction::UpForward => '9',
        }
    }

    /// Build a direction from axis signs.
    ///
    /// `horizontal`: -1 back, 0 none, +1 forward.
    /// `vertical`: -1 up, 0 none, +1 down (screen convention, down is positive).
    pub fn from_signs(horizontal: i8, vertical: i8) -> Self {
        let h = horizontal.signum() as i32;
        let v = vertical.signum() as i32;
        let n = 5 + h - 3 * v;
        Self::ALL[(n - 1) as usize]
    }

    /// Neutral is suppressed in rendered notation.
    pub fn is_neutral(self) -> bool {
        self == Direction::Neutral
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digit())
    }
}
