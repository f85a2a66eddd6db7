//! Editor tuning: thresholds, tolerances, and the button layout.
//!
//! Every field has a default tuned for a standard pad, so an empty RON file
//! (or no file at all) yields a working editor. Config files use RON like
//! the rest of the front-end assets.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::controller::ButtonLayout;

/// Tunable constants for one editing session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Analog deadzone shared by the direction stick and the scrub stick.
    pub deadzone: f32,
    /// Scrub damping factor applied to every angular step.
    pub scrub_damping: f64,
    /// Width of the window in which an insert overwrites instead of appending.
    pub collision_tolerance: f64,
    /// Tolerance for "node exactly at the playhead" when opening a popup.
    pub popup_tolerance: f64,
    /// Tolerance for highlighting the node under the playhead.
    pub highlight_tolerance: f64,
    /// How long the menu button must be held to delete the node at the playhead.
    pub delete_hold_ms: u64,
    /// Start held at least this long toggles typing mode instead of playback.
    pub start_hold_ms: u64,
    /// Minimum spacing between two popup navigation steps.
    pub popup_nav_debounce_ms: u64,
    /// After a programmatic media seek, ignore media time updates this long.
    pub seek_guard_ms: u64,
    /// Frames per second used by the time readout.
    pub frame_rate: u32,
    /// Timeline length used at startup and when a duration entry is invalid.
    pub default_length: f64,
    pub layout: ButtonLayout,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.1,
            scrub_damping: 0.12,
            collision_tolerance: 0.1,
            popup_tolerance: 0.05,
            highlight_tolerance: 0.05,
            delete_hold_ms: 2500,
            start_hold_ms: 500,
            popup_nav_debounce_ms: 150,
            seek_guard_ms: 50,
            frame_rate: 60,
            default_length: 10.0,
            layout: ButtonLayout::default(),
        }
    }
}

impl EditorConfig {
    pub fn delete_hold(&self) -> Duration {
        Duration::from_millis(self.delete_hold_ms)
    }

    pub fn start_hold(&self) -> Duration {
        Duration::from_millis(self.start_hold_ms)
    }

    pub fn popup_nav_debounce(&self) -> Duration {
        Duration::from_millis(self.popup_nav_debounce_ms)
    }

    pub fn seek_guard(&self) -> Duration {
        Duration::from_millis(self.seek_guard_ms)
    }

    /// Parse a config from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Load a config file if given, falling back to defaults on any error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded editor config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring editor config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Errors that can occur when loading an editor config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_match_editor_feel() {
        let config = EditorConfig::default();
        assert_eq!(config.deadzone, 0.1);
        assert_eq!(config.scrub_damping, 0.12);
        assert_eq!(config.delete_hold(), Duration::from_millis(2500));
        assert_eq!(config.start_hold(), Duration::from_millis(500));
        assert_eq!(config.popup_nav_debounce(), Duration::from_millis(150));
    }

    #[test]
    fn test_partial_ron_keeps_other_defaults() {
        let config = EditorConfig::from_ron_str("(scrub_damping: 0.5, frame_rate: 30)").unwrap();
        assert_eq!(config.scrub_damping, 0.5);
        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.collision_tolerance, 0.1);
    }

    #[test]
    fn test_bad_ron_is_an_error() {
        assert!(matches!(
            EditorConfig::from_ron_str("(deadzone: \"wide\")"),
            Err(ConfigError::Ron(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(delete_hold_ms: 1000)").unwrap();
        let config = EditorConfig::load(file.path()).unwrap();
        assert_eq!(config.delete_hold_ms, 1000);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = EditorConfig::load_or_default(Some(Path::new("/nonexistent/rensa.ron")));
        assert_eq!(config, EditorConfig::default());
    }
}
