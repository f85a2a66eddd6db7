//! Colors for the editor UI.

use bevy::prelude::*;

/// Theme resource, Tokyo Night based.
#[derive(Resource, Clone, Debug)]
pub struct Theme {
    // Base UI colors
    pub bg: Color,
    pub panel_bg: Color,
    pub fg: Color,
    pub fg_dim: Color,
    pub accent: Color,
    pub border: Color,
    pub selection_bg: Color,

    // Timeline
    pub track_bg: Color,
    pub marker: Color,
    /// Node or connector under the playhead
    pub highlight: Color,
    /// Node being moved
    pub repositioning: Color,
    pub playhead: Color,

    // Status line
    pub status_playing: Color,
    pub status_typing: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::srgb(0.10, 0.11, 0.15),           // #1a1b26
            panel_bg: Color::srgb(0.14, 0.15, 0.21),     // #24283b
            fg: Color::srgb(0.78, 0.80, 0.85),           // #c8ccd9
            fg_dim: Color::srgb(0.45, 0.48, 0.58),       // #737a94
            accent: Color::srgb(0.48, 0.64, 0.97),       // #7aa2f7
            border: Color::srgb(0.27, 0.29, 0.35),       // #444b59
            selection_bg: Color::srgb(0.20, 0.26, 0.42), // #33426b

            track_bg: Color::srgb(0.16, 0.17, 0.24),
            marker: Color::srgb(0.78, 0.80, 0.85),
            highlight: Color::srgb(0.89, 0.79, 0.49),     // #e0c97d
            repositioning: Color::srgb(0.97, 0.38, 0.45), // #f7616a
            playhead: Color::srgb(0.49, 0.85, 0.82),      // #7dd9d1

            status_playing: Color::srgb(0.62, 0.81, 0.42), // #9ece6a
            status_typing: Color::srgb(0.89, 0.79, 0.49),
        }
    }
}
