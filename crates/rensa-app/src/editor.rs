//! Session resources and the tick system.

use std::path::PathBuf;
use std::time::Instant;

use bevy::prelude::*;
use rensa_core::{DetachedMedia, MediaSync, RenderFrame, RenderSink, Session};

use crate::input::{ControllerState, EditorCommand, EditorPhase};

/// The editing session. Only [`tick_session`] mutates it.
#[derive(Resource)]
pub struct EditorSession(pub Session);

/// Reference clip backend. Detached unless a player is wired in.
#[derive(Resource)]
pub struct MediaBackend(pub Box<dyn MediaSync + Send + Sync>);

impl Default for MediaBackend {
    fn default() -> Self {
        Self(Box::new(DetachedMedia))
    }
}

/// Where logs and frame dumps go.
#[derive(Resource, Debug, Clone)]
pub struct LogDir(pub PathBuf);

/// Newest rendered frame. Marked changed only when the frame differs.
#[derive(Resource, Default, Debug)]
pub struct CurrentFrame {
    pub frame: Option<RenderFrame>,
    pub revision: u64,
}

impl RenderSink for CurrentFrame {
    fn present(&mut self, frame: &RenderFrame) {
        if self.frame.as_ref() != Some(frame) {
            self.frame = Some(frame.clone());
            self.revision += 1;
        }
    }
}

/// Drain captured commands into the session, tick once, publish the frame.
pub fn tick_session(
    mut captured: MessageReader<EditorCommand>,
    controller: Res<ControllerState>,
    mut session: ResMut<EditorSession>,
    mut media: ResMut<MediaBackend>,
    mut current: ResMut<CurrentFrame>,
) {
    for EditorCommand(command) in captured.read() {
        session.0.push(command.clone());
    }

    let sink = current.bypass_change_detection();
    let before = sink.revision;
    session
        .0
        .tick_and_present(controller.0.as_ref(), Instant::now(), media.0.as_mut(), &mut *sink);
    if sink.revision != before {
        current.set_changed();
    }
}

/// Plugin owning the session resources and the tick.
pub struct EditorPlugin {
    /// Commands applied on the first tick (CLI overrides).
    pub startup: Vec<rensa_core::Command>,
}

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MediaBackend>()
            .init_resource::<CurrentFrame>();

        let startup = self.startup.clone();
        app.add_systems(Startup, move |mut session: ResMut<EditorSession>| {
            for command in &startup {
                session.0.push(command.clone());
            }
        });

        app.add_systems(Update, tick_session.in_set(EditorPhase::Tick));
    }
}
