//! Rensa App - combo input timeline editor
//!
//! Record fighting-game inputs from a gamepad onto a looping timeline,
//! annotate them, and read the result back as combo notation.

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;
use rensa_core::{ButtonProfile, Command, EditorConfig, Session};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod constants;
mod editor;
mod input;
mod ui;

use constants::{
    DEFAULT_LOG_DIR, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, LOG_DIR_ENV, LOG_FILE_NAME,
};

#[derive(Parser, Debug)]
#[command(name = "rensa")]
#[command(about = "Combo input timeline editor")]
struct Args {
    /// Timeline length in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Button profile (RON). Defaults to the built-in 2XKO layout.
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Editor tuning (RON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for rensa.log and frame dumps [env: RENSA_LOG_DIR]
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    // Set up file logging
    let log_dir = args
        .log_dir
        .clone()
        .or_else(|| std::env::var_os(LOG_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));
    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Debug for our crates, warn for others
            "rensa_app=debug,rensa_core=debug,warn".into()
        }))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting Rensa - logging to {}",
        log_dir.join(LOG_FILE_NAME).display()
    );

    let config = EditorConfig::load_or_default(args.config.as_deref());
    let profile = ButtonProfile::load_or_builtin(args.profile.as_deref());
    let startup: Vec<Command> = args.duration.map(Command::SetLength).into_iter().collect();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "連鎖 Rensa".into(),
                        resolution: (DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT).into(),
                        ..default()
                    }),
                    ..default()
                })
                // The subscriber above owns tracing
                .disable::<bevy::log::LogPlugin>(),
        )
        // Resources
        .init_resource::<ui::theme::Theme>()
        .insert_resource(editor::EditorSession(Session::new(config, profile)))
        .insert_resource(editor::LogDir(log_dir))
        // Input capture, session tick, presentation
        .add_plugins(input::InputPlugin)
        .add_plugins(editor::EditorPlugin { startup })
        .add_plugins(ui::timeline::TimelinePlugin)
        .add_systems(Startup, setup_camera)
        .run();
}

/// Setup 2D camera for UI
fn setup_camera(mut commands: Commands, theme: Res<ui::theme::Theme>) {
    commands.spawn((
        Camera2d,
        Camera {
            clear_color: ClearColorConfig::Custom(theme.bg),
            ..default()
        },
    ));
}
