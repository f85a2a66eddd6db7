//! Layout and timing constants for the desktop front-end.

pub const DEFAULT_WINDOW_WIDTH: u32 = 1280;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 720;

/// Env var naming the directory for `rensa.log` and frame dumps.
pub const LOG_DIR_ENV: &str = "RENSA_LOG_DIR";
pub const DEFAULT_LOG_DIR: &str = "/tmp";
pub const LOG_FILE_NAME: &str = "rensa.log";

// ============================================================================
// TIMELINE TRACK GEOMETRY
// ============================================================================

/// Horizontal inset of the track from both window edges, in logical px.
pub const TRACK_MARGIN: f32 = 48.0;
/// Distance from the window top to the track.
pub const TRACK_TOP: f32 = 260.0;
pub const TRACK_HEIGHT: f32 = 56.0;
pub const MARKER_WIDTH: f32 = 6.0;
pub const PLAYHEAD_WIDTH: f32 = 2.0;

/// Gap between the track and the popup panel below it.
pub const POPUP_GAP: f32 = 36.0;
pub const POPUP_WIDTH: f32 = 220.0;

/// Two track clicks closer than this open the contextual popup.
pub const DOUBLE_CLICK_MS: u64 = 350;

// ============================================================================
// Z-INDEX LAYERS
// ============================================================================

/// Z-Index layers, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZLayer;

impl ZLayer {
    pub const CONTENT: i32 = 10;
    pub const TRACK: i32 = 20;
    pub const PLAYHEAD: i32 = 30;
    pub const POPUP: i32 = 100;
}
