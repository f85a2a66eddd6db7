//! Timeline UI marker components.

use bevy::prelude::*;
use rensa_core::NodeId;

/// Root container of the editor view.
#[derive(Component)]
pub struct EditorRoot;

/// The clickable track the nodes sit on.
#[derive(Component)]
pub struct TimelineTrack;

#[derive(Component)]
pub struct TimelinePlayhead;

/// One node marker on the track. Respawned when the frame changes.
#[derive(Component, Debug, Clone, Copy)]
pub struct NodeMarkerView(pub NodeId);

/// Row that holds the notation tokens.
#[derive(Component)]
pub struct NotationRow;

#[derive(Component)]
pub struct ReadoutText;

#[derive(Component)]
pub struct StatusText;

/// Popup container; hidden while no popup is open.
#[derive(Component)]
pub struct PopupPanel;

/// Clickable popup option at this index.
#[derive(Component, Debug, Clone, Copy)]
pub struct PopupOptionRow(pub usize);

/// Pointer state carried between frames.
#[derive(Resource, Default, Debug)]
pub struct PointerState {
    /// Left button went down on the track and is still held.
    pub dragging: bool,
    /// Time of the previous track click, for double-click detection.
    pub last_track_click: Option<std::time::Instant>,
}

/// One span of the notation line, child of [`NotationRow`].
#[derive(Component)]
pub struct NotationTokenView;

/// Anything spawned inside [`PopupPanel`]; cleared on every rebuild.
#[derive(Component)]
pub struct PopupContent;
