//! What a tick hands to the painter.

use rensa_types::NodeId;
use serde::Serialize;

use crate::notation::NotationLine;
use crate::popup::{PopupAction, PopupContext};

/// One node on the timeline track.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeMarker {
    pub id: NodeId,
    /// Effective time over timeline length, in `[0, 1)`.
    pub fraction: f64,
    pub label: String,
    pub highlighted: bool,
    pub repositioning: bool,
}

/// The open popup, ready to draw.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PopupView {
    pub context: PopupContext,
    pub anchor: f64,
    pub selected: usize,
    pub options: Vec<PopupAction>,
}

/// Everything the front-end needs to paint one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderFrame {
    pub notation: NotationLine,
    pub markers: Vec<NodeMarker>,
    pub playhead: f64,
    pub playhead_fraction: f64,
    pub length: f64,
    pub readout: String,
    pub popup: Option<PopupView>,
    pub playing: bool,
    pub typing_mode: bool,
    pub repositioning: bool,
    pub controller_connected: bool,
}

/// Consumer of rendered frames.
pub trait RenderSink {
    fn present(&mut self, frame: &RenderFrame);
}

/// Sink that keeps only the newest frame.
#[derive(Debug, Default)]
pub struct LatestFrame(pub Option<RenderFrame>);

impl RenderSink for LatestFrame {
    fn present(&mut self, frame: &RenderFrame) {
        self.0 = Some(frame.clone());
    }
}
