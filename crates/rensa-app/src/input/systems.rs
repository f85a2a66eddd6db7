//! App-level action handlers.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use rensa_core::RenderFrame;
use tracing::{info, warn};

use super::events::AppAction;
use crate::editor::{CurrentFrame, LogDir};

/// Errors that can occur when dumping a frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameDumpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON encode error: {0}")]
    Ron(#[from] ron::Error),
    #[error("no frame rendered yet")]
    NoFrame,
}

fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Serialize `frame` as pretty RON into `dir`. Returns the written path.
pub fn write_frame_dump(
    dir: &Path,
    frame: &RenderFrame,
    stamp: u64,
) -> Result<PathBuf, FrameDumpError> {
    let text = ron::ser::to_string_pretty(frame, ron::ser::PrettyConfig::default())?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("rensa-frame-{}.ron", stamp));
    std::fs::write(&path, text)?;
    Ok(path)
}

pub fn handle_quit(mut actions: MessageReader<AppAction>, mut exit: MessageWriter<AppExit>) {
    for action in actions.read() {
        if *action == AppAction::Quit {
            info!("Quitting...");
            exit.write(AppExit::Success);
        }
    }
}

pub fn handle_screenshot(mut commands: Commands, mut actions: MessageReader<AppAction>) {
    use bevy::render::view::screenshot::{Screenshot, save_to_disk};

    for action in actions.read() {
        if *action == AppAction::Screenshot {
            let path = format!("screenshots/rensa-{}.png", unix_timestamp());
            let _ = std::fs::create_dir_all("screenshots");

            info!("Saving screenshot to {}", path);
            commands
                .spawn(Screenshot::primary_window())
                .observe(save_to_disk(path));
        }
    }
}

pub fn handle_frame_dump(
    mut actions: MessageReader<AppAction>,
    frame: Res<CurrentFrame>,
    log_dir: Res<LogDir>,
) {
    for action in actions.read() {
        if *action != AppAction::DumpFrame {
            continue;
        }
        let result = frame
            .frame
            .as_ref()
            .ok_or(FrameDumpError::NoFrame)
            .and_then(|f| write_frame_dump(&log_dir.0, f, unix_timestamp()));
        match result {
            Ok(path) => info!("Frame dumped to {}", path.display()),
            Err(e) => warn!("Frame dump failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use rensa_core::{DetachedMedia, Session};

    use super::*;

    #[test]
    fn test_frame_dump_writes_ron() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::default();
        let frame = session.tick(None, std::time::Instant::now(), &mut DetachedMedia);
        let path = write_frame_dump(dir.path(), &frame, 42).unwrap();
        assert!(path.ends_with("rensa-frame-42.ron"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("readout"));
    }
}
