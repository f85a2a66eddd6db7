//! Whole-session scenarios driven through `Session::tick` with synthetic time.

use std::time::{Duration, Instant};

use rensa_core::controller::{axis, button};
use rensa_core::{
    Command, ControllerSnapshot, DetachedMedia, Direction, LatestFrame, NodeState, PopupContext,
    RenderFrame, Session,
};

struct Harness {
    session: Session,
    media: DetachedMedia,
    t0: Instant,
}

impl Harness {
    fn new() -> Self {
        Self {
            session: Session::default(),
            media: DetachedMedia,
            t0: Instant::now(),
        }
    }

    fn now(&self, millis: u64) -> Instant {
        self.t0 + Duration::from_millis(millis)
    }

    fn tick(&mut self, millis: u64, snapshot: ControllerSnapshot) -> RenderFrame {
        let now = self.now(millis);
        self.session.tick(Some(&snapshot), now, &mut self.media)
    }

    fn press(&mut self, millis: u64, buttons: &[usize]) -> RenderFrame {
        self.tick(millis, ControllerSnapshot::neutral().with_pressed(buttons))
    }

    fn release(&mut self, millis: u64) -> RenderFrame {
        self.tick(millis, ControllerSnapshot::neutral())
    }

    fn seek(&mut self, t: f64) {
        self.session.push(Command::SeekTo(t));
    }
}

#[test]
fn strike_then_overwrite_within_collision_window() {
    let mut h = Harness::new();
    h.seek(2.0);
    h.release(0);

    h.press(16, &[button::WEST]);
    let nodes = h.session.timeline().nodes();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].time, 2.0);
    assert_eq!(nodes[0].dir, Direction::Neutral);
    assert_eq!(nodes[0].buttons, vec!["L".to_string()]);
    let id = nodes[0].id;

    h.release(32);
    h.seek(2.05);
    let frame = h.press(48, &[button::NORTH]);

    let nodes = h.session.timeline().nodes();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, id);
    assert_eq!(nodes[0].buttons, vec!["M".to_string()]);
    assert_eq!(nodes[0].time, 2.0);
    assert_eq!(frame.notation.to_plain_string(), "M");
}

#[test]
fn strike_uses_resolved_direction_and_all_held_labels() {
    let mut h = Harness::new();
    h.seek(1.0);
    let snap = ControllerSnapshot::neutral()
        .with_pressed(&[button::WEST, button::NORTH, button::DPAD_DOWN])
        .with_axis(axis::LEFT_X, -0.9);
    let frame = h.tick(0, snap);
    assert_eq!(frame.notation.to_plain_string(), "2(L+M)");
}

#[test]
fn node_popup_navigation_and_toggle_hold() {
    let mut h = Harness::new();
    h.seek(2.0);
    h.press(0, &[button::WEST]);
    h.release(16);

    let frame = h.press(100, &[button::SELECT]);
    let view = frame.popup.expect("popup should be open");
    assert!(matches!(view.context, PopupContext::Node(_)));
    assert_eq!(view.selected, 0);
    h.release(116);

    // Three steps, each at least 150ms after the previous one
    for (i, at) in [300, 450, 600].into_iter().enumerate() {
        let frame = h.press(at, &[button::DPAD_DOWN]);
        assert_eq!(frame.popup.map(|p| p.selected), Some(i + 1));
        h.release(at + 16);
    }

    let frame = h.press(700, &[button::SOUTH]);
    assert!(frame.popup.is_none());
    let node = &h.session.timeline().nodes()[0];
    assert_eq!(node.state, Some(NodeState::Hold));
    assert_eq!(frame.notation.to_plain_string(), "[L]");
    assert_eq!(h.session.timeline().len(), 1);
}

#[test]
fn two_navigation_steps_land_on_jump_cancel() {
    let mut h = Harness::new();
    h.seek(2.0);
    h.press(0, &[button::WEST]);
    h.release(16);
    h.press(100, &[button::SELECT]);
    h.release(116);
    h.press(300, &[button::DPAD_DOWN]);
    h.release(316);
    h.press(450, &[button::DPAD_DOWN]);
    h.release(466);
    h.press(600, &[button::EAST]);

    assert_eq!(h.session.timeline().nodes()[0].state, Some(NodeState::JumpCancel));
}

#[test]
fn rapid_navigation_is_coalesced() {
    let mut h = Harness::new();
    h.press(0, &[button::SELECT]);
    h.release(16);

    let mut last = None;
    for at in [200, 240, 280, 320] {
        last = h.press(at, &[button::DPAD_DOWN]).popup.map(|p| p.selected);
        h.release(at + 10);
    }
    assert_eq!(last, Some(1));
}

#[test]
fn clear_keeps_ids_monotonic() {
    let mut h = Harness::new();
    h.seek(1.0);
    h.press(0, &[button::WEST]);
    h.release(16);
    h.seek(3.0);
    h.press(32, &[button::NORTH]);
    h.release(48);
    let highest = h.session.timeline().last_issued().unwrap();

    h.session.push(Command::ClearTimeline);
    let frame = h.release(64);
    assert!(h.session.timeline().is_empty());
    assert_eq!(frame.playhead, 0.0);

    h.press(80, &[button::WEST]);
    let fresh = h.session.timeline().nodes()[0].id;
    assert!(fresh > highest);
}

#[test]
fn holding_menu_after_it_opened_a_popup_never_deletes() {
    let mut h = Harness::new();
    h.seek(4.0);
    h.press(0, &[button::WEST]);
    h.release(16);
    h.seek(0.5);
    h.release(20);

    // The press opens an empty-context popup; it closes while the button
    // stays down and the playhead moves onto the node
    h.press(100, &[button::SELECT]);
    h.session.push(Command::ClosePopup);
    h.seek(4.0);
    h.press(200, &[button::SELECT]);
    assert!(h.session.popup().context().is_none());

    let frame = h.press(2600, &[button::SELECT]);
    assert_eq!(h.session.timeline().len(), 1);
    assert_eq!(frame.markers.len(), 1);
    h.release(2700);
    assert_eq!(h.session.timeline().len(), 1);
}

#[test]
fn holding_menu_that_closed_a_popup_deletes_node_once() {
    let mut h = Harness::new();
    h.seek(4.0);
    h.press(0, &[button::WEST]);
    h.release(16);

    // Just past the node: empty-context popup, first option inserts a
    // counter marker onto the node
    h.seek(4.07);
    h.press(100, &[button::SELECT]);
    h.release(116);
    h.press(200, &[button::SELECT]);
    assert!(h.session.popup().context().is_none());
    assert_eq!(h.session.timeline().nodes()[0].state, Some(NodeState::Counter));

    let frame = h.press(2700, &[button::SELECT]);
    assert!(h.session.timeline().is_empty());
    assert!(frame.markers.is_empty());
    h.release(2800);
}

#[test]
fn start_short_and_long_press() {
    let mut h = Harness::new();
    h.press(0, &[button::START]);
    let frame = h.release(200);
    assert!(frame.playing);

    let frame = h.release(700);
    assert!((frame.playhead - 0.5).abs() < 1e-9);

    h.press(800, &[button::START]);
    let frame = h.press(1300, &[button::START]);
    assert!(frame.typing_mode);
    assert!(!frame.playing);
    let frame = h.release(1400);
    assert!(!frame.playing);
}

#[test]
fn scrubbing_moves_playhead_and_closes_popup() {
    let mut h = Harness::new();
    h.seek(5.0);
    h.press(0, &[button::SELECT]);
    h.release(16);
    assert!(h.session.popup().is_open());

    let stick = |x: f32, y: f32| {
        ControllerSnapshot::neutral()
            .with_axis(axis::RIGHT_X, x)
            .with_axis(axis::RIGHT_Y, y)
    };
    h.tick(32, stick(1.0, 0.0));
    assert!(h.session.popup().is_open());
    let frame = h.tick(48, stick(0.0, 1.0));
    assert!(frame.popup.is_none());
    // Quarter turn at full deflection: 0.25 * 10 * 0.12
    assert!((frame.playhead - 5.3).abs() < 1e-4, "playhead = {}", frame.playhead);
}

#[test]
fn move_node_follows_playhead_until_confirm() {
    let mut h = Harness::new();
    h.seek(1.0);
    h.press(0, &[button::WEST]);
    h.release(16);
    let id = h.session.timeline().nodes()[0].id;

    h.session.push(Command::OpenNodePopup(id));
    h.session.push(Command::ConfirmPopup(0));
    h.seek(6.0);
    let frame = h.release(32);
    assert!(frame.repositioning);
    assert_eq!(frame.markers[0].fraction, 0.6);
    assert!(frame.notation.tokens[0].highlighted);

    // Striking while moving is ignored
    h.press(48, &[button::NORTH]);
    assert_eq!(h.session.timeline().len(), 1);
    h.release(64);

    let frame = h.press(80, &[button::SOUTH]);
    assert!(!frame.repositioning);
    assert_eq!(h.session.timeline().get(id).unwrap().time, 6.0);
}

#[test]
fn missing_controller_is_harmless() {
    let mut h = Harness::new();
    let mut sink = LatestFrame::default();
    h.session.push(Command::SeekTo(3.0));
    let now = h.now(0);
    h.session.tick_and_present(None, now, &mut h.media, &mut sink);
    let frame = sink.0.expect("frame presented");
    assert!(!frame.controller_connected);
    assert_eq!(frame.readout, "3.00s / 180f (of 10.00s / 600f)");
}
