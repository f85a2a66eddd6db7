//! Rensa's editing engine.
//!
//! Everything here is front-end agnostic: a front-end polls its controller
//! into a [`ControllerSnapshot`], pushes keyboard/pointer/media events as
//! [`Command`]s, calls [`Session::tick`] once per frame, and paints the
//! returned [`RenderFrame`].
//!
//! # Data Flow
//!
//! ```text
//! ControllerSnapshot ──► InputRouter ──► Command ─┐
//! keyboard / pointer / media ──► CommandQueue ────┤
//!                                                  ▼
//!                     Session ──► Timeline, Popup, ScrubEngine
//!                        │
//!                        └──► RenderFrame (notation, markers, readout, popup)
//! ```
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`Timeline`]      | Node collection, playhead, reposition handle |
//! | [`InputRouter`]   | Edge detection and hold gestures             |
//! | [`Popup`]         | Contextual menu state machine                |
//! | [`ScrubEngine`]   | Stick rotation → playhead displacement       |
//! | [`Session`]       | Owns all of the above, runs the tick         |
//! | [`MediaSync`]     | Reference clip seam                          |
//! | [`RenderSink`]    | Frame consumer                               |
//! |-------------------|----------------------------------------------|

pub mod command;
pub mod config;
pub mod controller;
pub mod direction;
pub mod media;
pub mod notation;
pub mod popup;
pub mod profile;
pub mod render;
pub mod router;
pub mod scrub;
pub mod session;
pub mod timeline;

pub use command::{Command, CommandQueue};
pub use config::{ConfigError, EditorConfig};
pub use controller::{ButtonLayout, ControllerSnapshot, DigitalPad};
pub use direction::{DirectionResolver, resolve_direction};
pub use media::{DetachedMedia, MediaSync, PlaybackError};
pub use notation::{NotationLine, NotationToken, TokenKind, node_display, render_notation};
pub use popup::{Popup, PopupAction, PopupContext, PopupGroup};
pub use profile::{ButtonProfile, ProfileError};
pub use render::{LatestFrame, NodeMarker, PopupView, RenderFrame, RenderSink};
pub use router::InputRouter;
pub use scrub::ScrubEngine;
pub use session::Session;
pub use timeline::{Timeline, parse_duration_input, wrap_time};

pub use rensa_types::{Connector, Direction, Node, NodeId, NodeState};
