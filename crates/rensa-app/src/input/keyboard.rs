//! Keyboard → editor commands.
//!
//! | Key              | Command                                  |
//! |------------------|------------------------------------------|
//! | Escape           | close popup / cancel move                |
//! | Space            | toggle playback                          |
//! | Enter            | confirm highlighted popup option         |
//! | Up / Down        | navigate popup                           |
//! | J                | jump to the closest node                 |
//! | Ctrl+Delete      | clear timeline                           |
//! | `[` / `]`        | duration −1 s / +1 s                     |
//! | Tab              | toggle typing mode                       |
//! | Ctrl+Q           | quit                                     |
//! | F9 / F12         | dump frame / screenshot                  |
//!
//! In typing mode, digits and `.` go into the duration draft instead;
//! Enter submits it and Escape discards it.

use bevy::input::keyboard::KeyboardInput;
use bevy::prelude::*;
use rensa_core::Command;
use tracing::info;

use super::events::{AppAction, DurationDraft, EditorCommand};
use crate::editor::EditorSession;

fn ctrl_held(keys: &ButtonInput<KeyCode>) -> bool {
    keys.pressed(KeyCode::ControlLeft) || keys.pressed(KeyCode::ControlRight)
}

/// Characters accepted into the duration draft.
fn is_duration_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

pub fn capture_keyboard(
    mut keyboard: MessageReader<KeyboardInput>,
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<EditorSession>,
    mut draft: ResMut<DurationDraft>,
    mut commands: MessageWriter<EditorCommand>,
    mut actions: MessageWriter<AppAction>,
) {
    let typing = session.0.is_typing_mode();
    let timeline = session.0.timeline();
    let length = timeline.length();
    let closest = timeline.closest_node(timeline.playhead()).map(|n| n.id);

    for event in keyboard.read() {
        if !event.state.is_pressed() {
            continue;
        }
        let ctrl = ctrl_held(&keys);

        match event.key_code {
            KeyCode::KeyQ if ctrl => {
                actions.write(AppAction::Quit);
                continue;
            }
            KeyCode::F9 => {
                actions.write(AppAction::DumpFrame);
                continue;
            }
            KeyCode::F12 => {
                actions.write(AppAction::Screenshot);
                continue;
            }
            KeyCode::Tab => {
                draft.0.clear();
                commands.write(EditorCommand(Command::ToggleTypingMode));
                continue;
            }
            _ => {}
        }

        if typing {
            match event.key_code {
                KeyCode::Enter | KeyCode::NumpadEnter => {
                    if !draft.0.is_empty() {
                        let text = std::mem::take(&mut draft.0);
                        info!("Duration entered: {}", text);
                        commands.write(EditorCommand(Command::SetDurationInput(text)));
                    }
                }
                KeyCode::Backspace => {
                    draft.0.pop();
                }
                KeyCode::Escape => draft.0.clear(),
                _ => {
                    if let Some(ref text) = event.text {
                        draft.0.extend(text.chars().filter(|c| is_duration_char(*c)));
                    }
                }
            }
            continue;
        }

        let command = match event.key_code {
            KeyCode::Escape => Command::ClosePopup,
            KeyCode::Space => Command::TogglePlayback,
            KeyCode::Enter | KeyCode::NumpadEnter => Command::ConfirmSelected,
            KeyCode::ArrowUp => Command::NavigatePopup(-1),
            KeyCode::ArrowDown => Command::NavigatePopup(1),
            KeyCode::KeyJ => match closest {
                Some(id) => Command::JumpToNode(id),
                None => continue,
            },
            KeyCode::Delete if ctrl => Command::ClearTimeline,
            KeyCode::BracketLeft => Command::SetLength(length - 1.0),
            KeyCode::BracketRight => Command::SetLength(length + 1.0),
            _ => continue,
        };
        commands.write(EditorCommand(command));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_chars() {
        let typed: String = "12.5s x".chars().filter(|c| is_duration_char(*c)).collect();
        assert_eq!(typed, "12.5");
    }
}
