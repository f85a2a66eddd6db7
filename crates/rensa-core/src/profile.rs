//! Button-label profiles: physical index → notation label.
//!
//! A profile is a flat table. The engine only ever asks two questions of
//! it: "is this index an attack button?" and "which labels are held right
//! now?". Profiles load from `.profile.ron` files; the built-in `2xko`
//! table is used when none is given.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::controller::ControllerSnapshot;

/// Mapping from physical button index to a short label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonProfile {
    pub name: String,
    pub labels: BTreeMap<usize, String>,
}

impl Default for ButtonProfile {
    fn default() -> Self {
        Self::builtin_2xko()
    }
}

impl ButtonProfile {
    /// The 2XKO layout: light/medium/heavy, specials, tag, and assists.
    pub fn builtin_2xko() -> Self {
        let labels = [
            (0, "T"),
            (1, "H"),
            (2, "L"),
            (3, "M"),
            (4, "P"),
            (5, "D"),
            (6, "S1"),
            (7, "S2"),
            (10, "TH"),
            (11, "TA"),
        ]
        .into_iter()
        .map(|(i, l)| (i, l.to_string()))
        .collect();
        Self {
            name: "2xko".to_string(),
            labels,
        }
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(&index).map(String::as_str)
    }

    pub fn is_mapped(&self, index: usize) -> bool {
        self.labels.contains_key(&index)
    }

    /// Labels of every mapped button currently pressed, in ascending index order.
    pub fn labels_currently_held(&self, snapshot: &ControllerSnapshot) -> Vec<String> {
        self.labels
            .iter()
            .filter(|(index, _)| snapshot.pressed(**index))
            .map(|(_, label)| label.clone())
            .collect()
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ProfileError> {
        let profile: ButtonProfile = ron::from_str(text)?;
        if profile.labels.is_empty() {
            return Err(ProfileError::Empty(profile.name));
        }
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Load a profile file if given, falling back to the built-in table.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(profile) => {
                info!("Loaded button profile '{}' from {}", profile.name, path.display());
                profile
            }
            Err(e) => {
                warn!("Falling back to built-in profile, {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Errors that can occur when loading a button profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("profile '{0}' maps no buttons")]
    Empty(String),
}
