//! Timeline editor UI: track, playhead, node markers, notation line,
//! readout, status line, and the contextual popup panel.
//!
//! Everything here is a view of `CurrentFrame`; pointer input goes back
//! out as `EditorCommand` messages.

mod components;
mod plugin;
mod systems;

pub use plugin::TimelinePlugin;
