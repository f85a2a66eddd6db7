//! Timeline systems: pointer capture and frame presentation.

use std::time::{Duration, Instant};

use bevy::prelude::*;
use rensa_core::{
    Command, NodeMarker, NotationLine, PopupContext, PopupView, RenderFrame, TokenKind,
};

use super::components::*;
use super::components::PointerState;
use crate::constants::{
    DOUBLE_CLICK_MS, MARKER_WIDTH, POPUP_WIDTH, TRACK_HEIGHT, TRACK_MARGIN, TRACK_TOP,
};
use crate::editor::{CurrentFrame, EditorSession};
use crate::input::{DurationDraft, EditorCommand};
use crate::ui::theme::Theme;

// ============================================================================
// GEOMETRY
// ============================================================================

/// Horizontal position on the track as a fraction of its width, or `None`
/// when the cursor is left or right of it.
pub fn track_fraction(cursor_x: f32, window_width: f32) -> Option<f32> {
    let width = window_width - 2.0 * TRACK_MARGIN;
    if width <= 0.0 {
        return None;
    }
    let fraction = (cursor_x - TRACK_MARGIN) / width;
    (0.0..=1.0).contains(&fraction).then_some(fraction)
}

/// Like [`track_fraction`] but pinned to the track ends. Used while dragging.
fn track_fraction_clamped(cursor_x: f32, window_width: f32) -> f32 {
    let width = (window_width - 2.0 * TRACK_MARGIN).max(1.0);
    ((cursor_x - TRACK_MARGIN) / width).clamp(0.0, 1.0)
}

fn on_track_row(cursor_y: f32) -> bool {
    (TRACK_TOP..=TRACK_TOP + TRACK_HEIGHT).contains(&cursor_y)
}

/// Left edge of the popup panel, centered under `anchor` and kept inside
/// the window.
pub fn popup_left(anchor: f64, window_width: f32) -> f32 {
    let track_width = (window_width - 2.0 * TRACK_MARGIN).max(0.0);
    let center = TRACK_MARGIN + anchor.clamp(0.0, 1.0) as f32 * track_width;
    let max_left = (window_width - POPUP_WIDTH - 8.0).max(8.0);
    (center - POPUP_WIDTH / 2.0).clamp(8.0, max_left)
}

fn is_double_click(previous: Option<Instant>, now: Instant) -> bool {
    let window = Duration::from_millis(DOUBLE_CLICK_MS);
    previous.is_some_and(|at| now.saturating_duration_since(at) < window)
}

// ============================================================================
// POINTER CAPTURE
// ============================================================================

/// Popup option clicks.
pub fn handle_popup_clicks(
    rows: Query<(&Interaction, &PopupOptionRow), Changed<Interaction>>,
    mut writer: MessageWriter<EditorCommand>,
) {
    for (interaction, row) in rows.iter() {
        if *interaction == Interaction::Pressed {
            writer.write(EditorCommand(Command::ConfirmPopup(row.0)));
        }
    }
}

/// Left click on a marker jumps to it, right click opens its popup.
pub fn handle_marker_clicks(
    mouse: Res<ButtonInput<MouseButton>>,
    markers: Query<(&Interaction, &NodeMarkerView)>,
    mut writer: MessageWriter<EditorCommand>,
) {
    for (interaction, marker) in markers.iter() {
        match interaction {
            Interaction::Pressed if mouse.just_pressed(MouseButton::Left) => {
                writer.write(EditorCommand(Command::JumpToNode(marker.0)));
            }
            Interaction::Hovered | Interaction::Pressed
                if mouse.just_pressed(MouseButton::Right) =>
            {
                writer.write(EditorCommand(Command::OpenNodePopup(marker.0)));
            }
            _ => {}
        }
    }
}

/// Track clicks, drags, double clicks, and click-outside to close the popup.
pub fn handle_track_pointer(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    markers: Query<&Interaction, With<NodeMarkerView>>,
    panel: Query<&Interaction, Or<(With<PopupPanel>, With<PopupOptionRow>)>>,
    current: Res<CurrentFrame>,
    mut pointer: ResMut<PointerState>,
    mut writer: MessageWriter<EditorCommand>,
) {
    if mouse.just_released(MouseButton::Left) {
        pointer.dragging = false;
    }

    let Some(frame) = current.frame.as_ref() else {
        return;
    };
    let Some(window) = windows.iter().next() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let length = frame.length;

    if pointer.dragging && mouse.pressed(MouseButton::Left) {
        let fraction = track_fraction_clamped(cursor.x, window.width());
        writer.write(EditorCommand(Command::SeekTo(fraction as f64 * length)));
        return;
    }

    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    let over_panel = panel.iter().any(|i| *i != Interaction::None);
    if over_panel {
        return;
    }
    if frame.popup.is_some() {
        writer.write(EditorCommand(Command::ClosePopup));
        return;
    }
    if markers.iter().any(|i| *i != Interaction::None) {
        return;
    }
    if !on_track_row(cursor.y) {
        return;
    }
    let Some(fraction) = track_fraction(cursor.x, window.width()) else {
        return;
    };

    let time = fraction as f64 * length;
    let now = Instant::now();
    if is_double_click(pointer.last_track_click, now) {
        pointer.last_track_click = None;
        pointer.dragging = false;
        writer.write(EditorCommand(Command::OpenPopupAt(time)));
    } else {
        pointer.last_track_click = Some(now);
        pointer.dragging = true;
        writer.write(EditorCommand(Command::SeekTo(time)));
    }
}

// ============================================================================
// PRESENTATION
// ============================================================================

/// Rebuild the node markers on the track when they change.
///
/// Marker entities have to outlive playback frames, otherwise their
/// `Interaction` never leaves `None`.
pub fn sync_markers(
    mut commands: Commands,
    current: Res<CurrentFrame>,
    theme: Res<Theme>,
    track: Query<Entity, With<TimelineTrack>>,
    existing: Query<Entity, With<NodeMarkerView>>,
    mut shown: Local<Option<Vec<NodeMarker>>>,
) {
    let Some(frame) = current.frame.as_ref() else {
        return;
    };
    let Ok(track) = track.single() else {
        return;
    };
    if shown.as_ref() == Some(&frame.markers) {
        return;
    }
    *shown = Some(frame.markers.clone());

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    commands.entity(track).with_children(|track| {
        for marker in &frame.markers {
            let color = if marker.repositioning {
                theme.repositioning
            } else if marker.highlighted {
                theme.highlight
            } else {
                theme.marker
            };
            track
                .spawn((
                    NodeMarkerView(marker.id),
                    Name::new(format!("NodeMarker {}", marker.id)),
                    Button,
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Percent(marker.fraction as f32 * 100.0),
                        margin: UiRect::left(Val::Px(-MARKER_WIDTH / 2.0)),
                        width: Val::Px(MARKER_WIDTH),
                        height: Val::Percent(100.0),
                        border_radius: BorderRadius::all(Val::Px(2.0)),
                        ..default()
                    },
                    BackgroundColor(color),
                ))
                .with_children(|m| {
                    m.spawn((
                        Text::new(marker.label.clone()),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(color),
                        Node {
                            position_type: PositionType::Absolute,
                            top: Val::Px(-20.0),
                            ..default()
                        },
                    ));
                });
        }
    });
}

pub fn sync_playhead(
    current: Res<CurrentFrame>,
    mut playhead: Query<&mut Node, With<TimelinePlayhead>>,
) {
    let Some(frame) = current.frame.as_ref() else {
        return;
    };
    for mut node in playhead.iter_mut() {
        node.left = Val::Percent(frame.playhead_fraction as f32 * 100.0);
    }
}

/// Rebuild the notation line, one text span per token.
pub fn sync_notation(
    mut commands: Commands,
    current: Res<CurrentFrame>,
    theme: Res<Theme>,
    row: Query<Entity, With<NotationRow>>,
    existing: Query<Entity, With<NotationTokenView>>,
    mut shown: Local<Option<NotationLine>>,
) {
    let Some(frame) = current.frame.as_ref() else {
        return;
    };
    let Ok(row) = row.single() else {
        return;
    };
    if shown.as_ref() == Some(&frame.notation) {
        return;
    }
    *shown = Some(frame.notation.clone());

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    commands.entity(row).with_children(|row| {
        if frame.notation.tokens.is_empty() {
            row.spawn((
                NotationTokenView,
                Text::new("press a mapped button to record an input"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(theme.fg_dim),
            ));
            return;
        }

        for token in &frame.notation.tokens {
            let color = match (token.highlighted, token.kind) {
                (true, _) => theme.highlight,
                (false, TokenKind::Node(_)) => theme.fg,
                (false, TokenKind::Connector(_)) => theme.fg_dim,
            };
            let background = if token.highlighted {
                theme.selection_bg
            } else {
                Color::NONE
            };
            row.spawn((
                NotationTokenView,
                Text::new(token.text.clone()),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(color),
                BackgroundColor(background),
            ));
        }
    });
}

pub fn sync_readout(current: Res<CurrentFrame>, mut readout: Query<&mut Text, With<ReadoutText>>) {
    let Some(frame) = current.frame.as_ref() else {
        return;
    };
    for mut text in readout.iter_mut() {
        text.0 = frame.readout.clone();
    }
}

/// One-line summary of transport, input mode and controller.
pub fn status_line(frame: &RenderFrame, draft: &str, profile: &str) -> String {
    let mut parts = Vec::with_capacity(5);
    parts.push(if frame.playing { "playing" } else { "paused" }.to_string());
    if frame.typing_mode {
        parts.push(format!("length: {draft}_ (Enter to apply)"));
    }
    if frame.repositioning {
        parts.push("moving node: confirm to place, Esc to cancel".to_string());
    }
    parts.push(
        if frame.controller_connected {
            "pad connected"
        } else {
            "no pad"
        }
        .to_string(),
    );
    parts.push(format!("profile {profile}"));
    parts.join("  ·  ")
}

pub fn sync_status(
    current: Res<CurrentFrame>,
    draft: Res<DurationDraft>,
    session: Res<EditorSession>,
    theme: Res<Theme>,
    mut status: Query<(&mut Text, &mut TextColor), With<StatusText>>,
) {
    let Some(frame) = current.frame.as_ref() else {
        return;
    };
    let line = status_line(frame, &draft.0, &session.0.profile().name);
    let color = if frame.typing_mode {
        theme.status_typing
    } else if frame.playing {
        theme.status_playing
    } else {
        theme.fg_dim
    };
    for (mut text, mut text_color) in status.iter_mut() {
        text.0 = line.clone();
        text_color.0 = color;
    }
}

fn popup_title(context: PopupContext) -> String {
    match context {
        PopupContext::Node(id) => format!("Node {id}"),
        PopupContext::Connector => "Connector".to_string(),
        PopupContext::Empty => "Timeline".to_string(),
    }
}

/// Show, place and rebuild the popup panel.
pub fn sync_popup(
    mut commands: Commands,
    current: Res<CurrentFrame>,
    theme: Res<Theme>,
    windows: Query<&Window>,
    mut panel: Query<(Entity, &mut Node, &mut Visibility), With<PopupPanel>>,
    existing: Query<Entity, With<PopupContent>>,
    mut shown: Local<Option<PopupView>>,
) {
    let Some(frame) = current.frame.as_ref() else {
        return;
    };
    let Ok((panel, mut node, mut visibility)) = panel.single_mut() else {
        return;
    };
    if *shown == frame.popup {
        return;
    }
    *shown = frame.popup.clone();

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let Some(popup) = frame.popup.as_ref() else {
        *visibility = Visibility::Hidden;
        return;
    };
    *visibility = Visibility::Inherited;

    if let Some(window) = windows.iter().next() {
        node.left = Val::Px(popup_left(popup.anchor, window.width()));
    }

    commands.entity(panel).with_children(|panel| {
        panel.spawn((
            PopupContent,
            Text::new(popup_title(popup.context)),
            TextFont {
                font_size: 13.0,
                ..default()
            },
            TextColor(theme.fg_dim),
            Node {
                margin: UiRect::bottom(Val::Px(4.0)),
                ..default()
            },
        ));

        let mut previous_group = None;
        for (i, action) in popup.options.iter().enumerate() {
            let group = action.group();
            if previous_group.is_some_and(|g| g != group) {
                panel.spawn((
                    PopupContent,
                    Node {
                        height: Val::Px(1.0),
                        margin: UiRect::vertical(Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(theme.border),
                ));
            }
            previous_group = Some(group);

            let selected = i == popup.selected;
            panel
                .spawn((
                    PopupContent,
                    PopupOptionRow(i),
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
                        border_radius: BorderRadius::all(Val::Px(3.0)),
                        ..default()
                    },
                    BackgroundColor(if selected { theme.selection_bg } else { Color::NONE }),
                ))
                .with_children(|row| {
                    row.spawn((
                        Text::new(action.label()),
                        TextFont {
                            font_size: 15.0,
                            ..default()
                        },
                        TextColor(if selected { theme.accent } else { theme.fg }),
                    ));
                });
        }
    });
}
