//! Timeline plugin - spawns the editor view and registers its systems.

use bevy::prelude::*;

use super::components::*;
use super::components::PointerState;
use super::systems;
use crate::constants::{
    PLAYHEAD_WIDTH, POPUP_GAP, POPUP_WIDTH, TRACK_HEIGHT, TRACK_MARGIN, TRACK_TOP, ZLayer,
};
use crate::editor::CurrentFrame;
use crate::input::{DurationDraft, EditorPhase};
use crate::ui::theme::Theme;

/// Plugin for the timeline editor view.
pub struct TimelinePlugin;

impl Plugin for TimelinePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>();

        app.add_systems(Startup, spawn_editor_ui);

        // Pointer input feeds the same command stream as the keyboard
        app.add_systems(
            Update,
            (
                systems::handle_popup_clicks,
                systems::handle_marker_clicks,
                systems::handle_track_pointer,
            )
                .chain()
                .in_set(EditorPhase::Capture),
        );

        // Repaint only when the tick produced a different frame
        app.add_systems(
            Update,
            (
                systems::sync_markers,
                systems::sync_playhead,
                systems::sync_notation,
                systems::sync_readout,
                systems::sync_popup,
            )
                .in_set(EditorPhase::Present)
                .run_if(resource_changed::<CurrentFrame>),
        );

        app.add_systems(
            Update,
            systems::sync_status
                .in_set(EditorPhase::Present)
                .run_if(resource_changed::<CurrentFrame>.or(resource_changed::<DurationDraft>)),
        );
    }
}

/// Spawn the static part of the editor view. Markers, tokens and popup
/// rows are filled in by the present systems.
fn spawn_editor_ui(mut commands: Commands, theme: Res<Theme>) {
    commands
        .spawn((
            EditorRoot,
            Name::new("EditorRoot"),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            BackgroundColor(theme.bg),
            ZIndex(ZLayer::CONTENT),
        ))
        .with_children(|root| {
            root.spawn((
                Name::new("Title"),
                Text::new("連鎖 Rensa"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(theme.fg_dim),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(TRACK_MARGIN),
                    top: Val::Px(24.0),
                    ..default()
                },
            ));

            // Combo notation, above the track
            root.spawn((
                NotationRow,
                Name::new("NotationRow"),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(TRACK_MARGIN),
                    right: Val::Px(TRACK_MARGIN),
                    top: Val::Px(TRACK_TOP - 140.0),
                    min_height: Val::Px(48.0),
                    flex_direction: FlexDirection::Row,
                    flex_wrap: FlexWrap::Wrap,
                    align_items: AlignItems::Center,
                    padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                    border: UiRect::all(Val::Px(1.0)),
                    border_radius: BorderRadius::all(Val::Px(6.0)),
                    ..default()
                },
                BackgroundColor(theme.panel_bg),
                BorderColor::all(theme.border),
            ));

            root.spawn((
                TimelineTrack,
                Name::new("TimelineTrack"),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(TRACK_MARGIN),
                    right: Val::Px(TRACK_MARGIN),
                    top: Val::Px(TRACK_TOP),
                    height: Val::Px(TRACK_HEIGHT),
                    border_radius: BorderRadius::all(Val::Px(4.0)),
                    ..default()
                },
                BackgroundColor(theme.track_bg),
                ZIndex(ZLayer::TRACK),
            ))
            .with_children(|track| {
                track.spawn((
                    TimelinePlayhead,
                    Name::new("TimelinePlayhead"),
                    Node {
                        position_type: PositionType::Absolute,
                        width: Val::Px(PLAYHEAD_WIDTH),
                        top: Val::Px(-8.0),
                        height: Val::Px(TRACK_HEIGHT + 16.0),
                        left: Val::Percent(0.0), // Updated by system
                        ..default()
                    },
                    BackgroundColor(theme.playhead),
                    ZIndex(ZLayer::PLAYHEAD),
                ));
            });

            root.spawn((
                ReadoutText,
                Name::new("ReadoutText"),
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(theme.fg),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(TRACK_MARGIN),
                    top: Val::Px(TRACK_TOP + TRACK_HEIGHT + 8.0),
                    ..default()
                },
            ));

            root.spawn((
                StatusText,
                Name::new("StatusText"),
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(theme.fg_dim),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(TRACK_MARGIN),
                    bottom: Val::Px(16.0),
                    ..default()
                },
            ));

            // Contextual popup. Interaction lets the pointer systems tell
            // clicks inside the panel from clicks outside it.
            root.spawn((
                PopupPanel,
                Name::new("PopupPanel"),
                Interaction::default(),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(TRACK_TOP + TRACK_HEIGHT + POPUP_GAP),
                    left: Val::Px(TRACK_MARGIN), // Updated by system
                    width: Val::Px(POPUP_WIDTH),
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(Val::Px(6.0)),
                    border: UiRect::all(Val::Px(1.0)),
                    border_radius: BorderRadius::all(Val::Px(6.0)),
                    ..default()
                },
                BackgroundColor(theme.panel_bg),
                BorderColor::all(theme.accent),
                ZIndex(ZLayer::POPUP),
                Visibility::Hidden,
            ));
        });
}
