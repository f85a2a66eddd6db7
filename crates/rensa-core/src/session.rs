//! The editing session: all mutable editor state behind one tick.
//!
//! Order within a tick:
//!
//! 1. drain queued commands (keyboard, pointer, media events)
//! 2. route the controller snapshot and apply its commands
//! 3. scrub from the right stick
//! 4. advance playback
//! 5. render a [`RenderFrame`]
//!
//! Nothing here blocks or fails; lookups that miss are no-ops.

use std::time::Instant;

use rensa_types::Direction;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandQueue};
use crate::config::EditorConfig;
use crate::controller::ControllerSnapshot;
use crate::media::{MediaLink, MediaSync};
use crate::notation::{node_markers, render_notation, time_readout};
use crate::popup::{Popup, PopupContext};
use crate::profile::ButtonProfile;
use crate::render::{PopupView, RenderFrame, RenderSink};
use crate::router::InputRouter;
use crate::scrub::ScrubEngine;
use crate::timeline::{Timeline, parse_duration_input};

#[derive(Clone, Debug, Default)]
struct Transport {
    playing: bool,
    typing_mode: bool,
    /// Time of the previous playing tick.
    last_frame: Option<Instant>,
}

/// One editor instance.
pub struct Session {
    config: EditorConfig,
    profile: ButtonProfile,
    timeline: Timeline,
    popup: Popup,
    transport: Transport,
    router: InputRouter,
    scrub: ScrubEngine,
    media: MediaLink,
    queue: CommandQueue,
    controller_connected: bool,
    /// The current menu press may end in hold-to-delete. Cleared when the
    /// press left a popup open.
    menu_hold_armed: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorConfig::default(), ButtonProfile::default())
    }
}

impl Session {
    pub fn new(config: EditorConfig, profile: ButtonProfile) -> Self {
        let timeline = Timeline::new(config.default_length)
            .with_collision_tolerance(config.collision_tolerance);
        info!(
            profile = %profile.name,
            length = timeline.length(),
            "session started"
        );
        Self {
            popup: Popup::new(config.popup_nav_debounce()),
            scrub: ScrubEngine::new(config.deadzone, config.scrub_damping),
            media: MediaLink::new(config.seek_guard()),
            timeline,
            transport: Transport::default(),
            router: InputRouter::new(),
            queue: CommandQueue::default(),
            controller_connected: false,
            menu_hold_armed: false,
            config,
            profile,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn profile(&self) -> &ButtonProfile {
        &self.profile
    }

    /// Swap the button-label profile. Edge state is kept.
    pub fn set_profile(&mut self, profile: ButtonProfile) {
        info!(profile = %profile.name, "button profile changed");
        self.profile = profile;
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn is_playing(&self) -> bool {
        self.transport.playing
    }

    pub fn is_typing_mode(&self) -> bool {
        self.transport.typing_mode
    }

    pub fn is_media_seeking(&self) -> bool {
        self.media.is_seeking()
    }

    // ── Commands ────────────────────────────────────────────────────────

    /// Queue a command for the next tick.
    pub fn push(&mut self, command: Command) {
        self.queue.push(command);
    }

    /// Apply one command immediately.
    pub fn apply(&mut self, command: Command, now: Instant, media: &mut dyn MediaSync) {
        match command {
            Command::Confirm { labels, dir } => {
                if self.timeline.is_repositioning() {
                    let playhead = self.timeline.playhead();
                    self.timeline.commit_reposition(playhead);
                } else if self.popup.is_open() {
                    self.popup.confirm_selected(&mut self.timeline);
                } else {
                    self.insert_held(&labels, dir);
                }
            }
            Command::Strike { labels, dir } => {
                if !self.popup.is_open() && !self.timeline.is_repositioning() {
                    self.insert_held(&labels, dir);
                }
            }
            Command::MenuPress => {
                if self.popup.is_open() {
                    self.popup.confirm_selected(&mut self.timeline);
                } else {
                    self.open_contextual_popup(now);
                }
                self.menu_hold_armed = !self.popup.is_open();
            }
            Command::MenuHoldElapsed => {
                let armed = std::mem::take(&mut self.menu_hold_armed);
                if !armed {
                    debug!("hold-to-delete not armed for this press");
                } else if self.popup.is_open() {
                    debug!("hold-to-delete suppressed while popup is open");
                } else {
                    let playhead = self.timeline.playhead();
                    let tolerance = self.config.collision_tolerance;
                    if let Some(node) = self.timeline.delete_at(playhead, tolerance) {
                        info!(node = %node.id, "deleted node by hold");
                    }
                }
            }
            Command::TogglePlayback => self.toggle_playback(media),
            Command::ToggleTypingMode => {
                self.transport.typing_mode = !self.transport.typing_mode;
                info!(typing_mode = self.transport.typing_mode, "typing mode toggled");
                if self.transport.typing_mode {
                    self.stop_playback(media);
                }
            }
            Command::NavigatePopup(delta) => {
                self.popup.navigate(delta, now);
            }
            Command::ClosePopup => {
                self.popup.close();
                self.timeline.cancel_reposition();
            }
            Command::ConfirmPopup(index) => {
                self.popup.confirm(index, &mut self.timeline);
            }
            Command::ConfirmSelected => {
                self.popup.confirm_selected(&mut self.timeline);
            }
            Command::SeekTo(t) => {
                self.timeline.set_playhead(t);
                self.popup.close();
                self.media.seek(media, self.timeline.playhead(), now);
            }
            Command::JumpToNode(id) => {
                if let Some(time) = self.timeline.get(id).map(|n| n.time) {
                    self.timeline.set_playhead(time);
                    self.media.seek(media, self.timeline.playhead(), now);
                }
            }
            Command::OpenPopupAt(t) => {
                self.timeline.set_playhead(t);
                self.open_contextual_popup(now);
            }
            Command::OpenNodePopup(id) => {
                if self.timeline.get(id).is_some() {
                    let anchor = self.timeline.playhead_fraction();
                    self.popup.open(PopupContext::Node(id), anchor, now);
                }
            }
            Command::ClearTimeline => {
                self.timeline.clear();
                self.popup.close();
            }
            Command::SetDurationInput(text) => {
                let length = parse_duration_input(&text, self.config.default_length);
                self.timeline.set_length(length);
            }
            Command::SetLength(length) => self.timeline.set_length(length),
            Command::CancelReposition => self.timeline.cancel_reposition(),
            Command::MediaLoaded { duration } => {
                let length = duration
                    .filter(|d| d.is_finite() && *d > 0.0)
                    .unwrap_or(self.config.default_length);
                self.timeline.set_length(length);
                self.timeline.set_playhead(0.0);
                info!(length = self.timeline.length(), "media loaded");
            }
            Command::MediaTimeUpdate(t) => {
                if self.media.accepts_time_update(now) {
                    self.adopt_media_time(t);
                }
            }
            Command::MediaSeeking => self.media.set_seeking(true),
            Command::MediaSeeked(t) => {
                self.media.set_seeking(false);
                self.adopt_media_time(t);
            }
        }
    }

    fn insert_held(&mut self, labels: &[String], dir: Direction) {
        if labels.is_empty() {
            return;
        }
        let playhead = self.timeline.playhead();
        self.timeline.upsert_at(playhead, labels, Some(dir));
    }

    fn open_contextual_popup(&mut self, now: Instant) {
        let playhead = self.timeline.playhead();
        let context = match self.timeline.node_at(playhead, self.config.popup_tolerance) {
            Some(node) => PopupContext::Node(node.id),
            None if self.timeline.has_connector_at(playhead) => PopupContext::Connector,
            None => PopupContext::Empty,
        };
        let anchor = self.timeline.playhead_fraction();
        self.popup.open(context, anchor, now);
    }

    fn adopt_media_time(&mut self, t: f64) {
        if !t.is_finite() {
            return;
        }
        let length = self.timeline.length();
        self.timeline.set_playhead(t.clamp(0.0, length));
    }

    fn toggle_playback(&mut self, media: &mut dyn MediaSync) {
        if self.transport.playing {
            self.stop_playback(media);
            return;
        }
        self.transport.playing = true;
        self.transport.last_frame = None;
        match media.play() {
            Ok(()) => info!("playback started"),
            Err(e) => {
                warn!("Playback refused, staying paused: {}", e);
                self.transport.playing = false;
            }
        }
    }

    fn stop_playback(&mut self, media: &mut dyn MediaSync) {
        if self.transport.playing {
            info!("playback paused");
        }
        self.transport.playing = false;
        self.transport.last_frame = None;
        media.pause();
    }

    // ── Tick ────────────────────────────────────────────────────────────

    /// Run one frame. `snapshot` is `None` when no controller is connected.
    pub fn tick(
        &mut self,
        snapshot: Option<&ControllerSnapshot>,
        now: Instant,
        media: &mut dyn MediaSync,
    ) -> RenderFrame {
        while let Some(command) = self.queue.pop() {
            self.apply(command, now, media);
        }

        match snapshot {
            Some(snapshot) => {
                if !self.controller_connected {
                    info!(buttons = snapshot.button_count(), "controller connected");
                    self.controller_connected = true;
                }
                let commands = self.router.route(snapshot, now, &self.profile, &self.config);
                for command in commands {
                    self.apply(command, now, media);
                }
                self.scrub(snapshot, now, media);
            }
            None => {
                if self.controller_connected {
                    info!("controller disconnected");
                    self.controller_connected = false;
                }
                self.router.disconnect();
                self.scrub.reset();
            }
        }

        self.advance_playback(now, media);
        self.frame()
    }

    /// [`Session::tick`], then hand the frame to `sink`.
    pub fn tick_and_present(
        &mut self,
        snapshot: Option<&ControllerSnapshot>,
        now: Instant,
        media: &mut dyn MediaSync,
        sink: &mut dyn RenderSink,
    ) {
        let frame = self.tick(snapshot, now, media);
        sink.present(&frame);
    }

    fn scrub(&mut self, snapshot: &ControllerSnapshot, now: Instant, media: &mut dyn MediaSync) {
        let (x, y) = self.config.layout.scrub_axes(snapshot);
        let Some(displacement) = self.scrub.update(x, y, self.timeline.length()) else {
            return;
        };
        self.timeline.nudge_playhead(displacement);
        self.popup.close();
        self.media.seek(media, self.timeline.playhead(), now);
    }

    fn advance_playback(&mut self, now: Instant, media: &mut dyn MediaSync) {
        if !self.transport.playing {
            self.transport.last_frame = None;
            return;
        }
        if let Some(last) = self.transport.last_frame {
            let elapsed = now.saturating_duration_since(last).as_secs_f64();
            let next = self.timeline.playhead() + elapsed;
            // Playback restarts from zero instead of carrying the overshoot
            let next = if next >= self.timeline.length() { 0.0 } else { next };
            self.timeline.set_playhead(next);
            self.media.seek(media, self.timeline.playhead(), now);
        }
        self.transport.last_frame = Some(now);
    }

    /// Render the current state without ticking.
    pub fn frame(&self) -> RenderFrame {
        let timeline = &self.timeline;
        let popup = self.popup.context().map(|context| PopupView {
            context,
            anchor: self.popup.anchor().unwrap_or_default(),
            selected: self.popup.selected().unwrap_or_default(),
            options: context.options().to_vec(),
        });
        RenderFrame {
            notation: render_notation(
                timeline,
                self.transport.playing,
                self.config.highlight_tolerance,
            ),
            markers: node_markers(timeline, self.config.highlight_tolerance),
            playhead: timeline.playhead(),
            playhead_fraction: timeline.playhead_fraction(),
            length: timeline.length(),
            readout: time_readout(timeline.playhead(), timeline.length(), self.config.frame_rate),
            popup,
            playing: self.transport.playing,
            typing_mode: self.transport.typing_mode,
            repositioning: timeline.is_repositioning(),
            controller_connected: self.controller_connected,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rensa_types::NodeState;

    use super::*;
    use crate::media::{DetachedMedia, PlaybackError};

    #[derive(Default)]
    struct Clip {
        loaded: bool,
        refuse_play: bool,
        seeks: Vec<f64>,
        paused: usize,
    }

    impl MediaSync for Clip {
        fn is_loaded(&self) -> bool {
            self.loaded
        }
        fn duration(&self) -> Option<f64> {
            self.loaded.then_some(8.0)
        }
        fn seek(&mut self, time: f64) {
            self.seeks.push(time);
        }
        fn play(&mut self) -> Result<(), PlaybackError> {
            if self.refuse_play {
                Err(PlaybackError::Blocked("autoplay policy".into()))
            } else {
                Ok(())
            }
        }
        fn pause(&mut self) {
            self.paused += 1;
        }
    }

    fn at(t0: Instant, millis: u64) -> Instant {
        t0 + Duration::from_millis(millis)
    }

    #[test]
    fn test_refused_playback_reverts() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut clip = Clip {
            loaded: true,
            refuse_play: true,
            ..Default::default()
        };
        session.apply(Command::TogglePlayback, t0, &mut clip);
        assert!(!session.is_playing());

        clip.refuse_play = false;
        session.apply(Command::TogglePlayback, t0, &mut clip);
        assert!(session.is_playing());
    }

    #[test]
    fn test_playback_advances_and_wraps_to_zero() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut media = DetachedMedia;
        session.apply(Command::SetLength(1.0), t0, &mut media);
        session.apply(Command::TogglePlayback, t0, &mut media);

        let frame = session.tick(None, at(t0, 0), &mut media);
        assert_eq!(frame.playhead, 0.0);
        let frame = session.tick(None, at(t0, 600), &mut media);
        assert!((frame.playhead - 0.6).abs() < 1e-9);
        let frame = session.tick(None, at(t0, 1100), &mut media);
        assert_eq!(frame.playhead, 0.0);
    }

    #[test]
    fn test_typing_mode_stops_playback() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut clip = Clip::default();
        session.apply(Command::TogglePlayback, t0, &mut clip);
        session.apply(Command::ToggleTypingMode, t0, &mut clip);
        assert!(session.is_typing_mode());
        assert!(!session.is_playing());
        assert_eq!(clip.paused, 1);
    }

    #[test]
    fn test_media_loaded_sets_length() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut media = DetachedMedia;
        session.apply(Command::SeekTo(3.0), t0, &mut media);
        session.apply(Command::MediaLoaded { duration: Some(0.4) }, t0, &mut media);
        assert_eq!(session.timeline().length(), 1.0);
        assert_eq!(session.timeline().playhead(), 0.0);
        session.apply(Command::MediaLoaded { duration: None }, t0, &mut media);
        assert_eq!(session.timeline().length(), 10.0);
    }

    #[test]
    fn test_media_time_updates_respect_guards() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut clip = Clip {
            loaded: true,
            ..Default::default()
        };
        session.apply(Command::SeekTo(2.0), t0, &mut clip);
        assert_eq!(clip.seeks, vec![2.0]);

        session.apply(Command::MediaTimeUpdate(5.0), at(t0, 10), &mut clip);
        assert_eq!(session.timeline().playhead(), 2.0);
        session.apply(Command::MediaTimeUpdate(5.0), at(t0, 60), &mut clip);
        assert_eq!(session.timeline().playhead(), 5.0);

        session.apply(Command::MediaSeeking, at(t0, 100), &mut clip);
        session.apply(Command::MediaTimeUpdate(7.0), at(t0, 200), &mut clip);
        assert_eq!(session.timeline().playhead(), 5.0);
        session.apply(Command::MediaSeeked(6.0), at(t0, 300), &mut clip);
        assert_eq!(session.timeline().playhead(), 6.0);
        assert!(!session.is_media_seeking());
    }

    #[test]
    fn test_hold_delete_suppressed_with_popup_open() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut media = DetachedMedia;
        session.apply(
            Command::Strike {
                labels: vec!["L".into()],
                dir: Direction::Neutral,
            },
            t0,
            &mut media,
        );
        session.apply(Command::MenuPress, t0, &mut media);
        assert!(session.popup().is_open());
        session.apply(Command::MenuHoldElapsed, t0, &mut media);
        assert_eq!(session.timeline().len(), 1);
    }

    #[test]
    fn test_hold_delete_not_armed_by_press_that_opened_popup() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut media = DetachedMedia;
        session.apply(
            Command::Strike {
                labels: vec!["L".into()],
                dir: Direction::Neutral,
            },
            t0,
            &mut media,
        );
        session.apply(Command::MenuPress, t0, &mut media);
        // Popup closed by something else while the button stays down
        session.apply(Command::ClosePopup, t0, &mut media);
        session.apply(Command::MenuHoldElapsed, t0, &mut media);
        assert_eq!(session.timeline().len(), 1);
    }

    #[test]
    fn test_hold_delete_armed_by_press_that_closed_popup() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut media = DetachedMedia;
        session.apply(
            Command::Strike {
                labels: vec!["L".into()],
                dir: Direction::Neutral,
            },
            t0,
            &mut media,
        );
        // Off the node by more than the popup tolerance, inside the collision window
        session.apply(Command::SeekTo(0.07), t0, &mut media);
        session.apply(Command::MenuPress, t0, &mut media);
        assert_eq!(session.popup().context(), Some(PopupContext::Empty));

        // Second press confirms Insert Counter, which lands on the node
        session.apply(Command::MenuPress, t0, &mut media);
        assert!(!session.popup().is_open());
        assert_eq!(session.timeline().len(), 1);

        session.apply(Command::MenuHoldElapsed, t0, &mut media);
        assert!(session.timeline().is_empty());

        // Fires once per press
        session.apply(
            Command::Strike {
                labels: vec!["M".into()],
                dir: Direction::Neutral,
            },
            t0,
            &mut media,
        );
        session.apply(Command::MenuHoldElapsed, t0, &mut media);
        assert_eq!(session.timeline().len(), 1);
    }

    #[test]
    fn test_strike_ignored_while_popup_open() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut media = DetachedMedia;
        session.apply(Command::MenuPress, t0, &mut media);
        session.apply(
            Command::Strike {
                labels: vec!["M".into()],
                dir: Direction::Down,
            },
            t0,
            &mut media,
        );
        assert!(session.timeline().is_empty());
    }

    #[test]
    fn test_confirm_commits_reposition_first() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut media = DetachedMedia;
        let confirm = || Command::Confirm {
            labels: vec!["T".into()],
            dir: Direction::Neutral,
        };
        session.apply(confirm(), t0, &mut media);
        let id = session.timeline().nodes()[0].id;

        session.apply(Command::OpenNodePopup(id), t0, &mut media);
        session.apply(Command::ConfirmSelected, t0, &mut media);
        assert_eq!(session.timeline().reposition_target(), Some(id));

        session.apply(Command::SeekTo(4.0), t0, &mut media);
        session.apply(confirm(), t0, &mut media);
        assert!(!session.timeline().is_repositioning());
        assert_eq!(session.timeline().get(id).unwrap().time, 4.0);
        assert_eq!(session.timeline().len(), 1);
    }

    #[test]
    fn test_open_popup_at_picks_context() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut media = DetachedMedia;
        for t in [1.0, 3.0] {
            session.apply(Command::SeekTo(t), t0, &mut media);
            session.apply(
                Command::Strike {
                    labels: vec!["L".into()],
                    dir: Direction::Neutral,
                },
                t0,
                &mut media,
            );
        }

        session.apply(Command::OpenPopupAt(2.0), t0, &mut media);
        assert_eq!(session.popup().context(), Some(PopupContext::Connector));
        session.apply(Command::OpenPopupAt(5.0), t0, &mut media);
        assert_eq!(session.popup().context(), Some(PopupContext::Empty));
        session.apply(Command::OpenPopupAt(3.02), t0, &mut media);
        assert!(matches!(session.popup().context(), Some(PopupContext::Node(_))));

        let frame = session.frame();
        let view = frame.popup.unwrap();
        assert_eq!(view.options.len(), 8);
        assert!((view.anchor - 0.302).abs() < 1e-9);
    }

    #[test]
    fn test_insert_marker_from_empty_popup() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut media = DetachedMedia;
        session.apply(Command::OpenPopupAt(6.0), t0, &mut media);
        session.apply(Command::ConfirmPopup(2), t0, &mut media);
        let frame = session.frame();
        assert_eq!(frame.notation.to_plain_string(), "(whiff)");
        assert_eq!(session.timeline().nodes()[0].state, Some(NodeState::Whiff));
    }

    #[test]
    fn test_duration_input_rewraps() {
        let t0 = Instant::now();
        let mut session = Session::default();
        let mut media = DetachedMedia;
        session.apply(Command::SeekTo(7.0), t0, &mut media);
        session.apply(
            Command::Strike {
                labels: vec!["L".into()],
                dir: Direction::Neutral,
            },
            t0,
            &mut media,
        );
        session.apply(Command::SetDurationInput("5".into()), t0, &mut media);
        assert!((session.timeline().nodes()[0].time - 2.0).abs() < 1e-9);
        session.apply(Command::SetDurationInput("nope".into()), t0, &mut media);
        assert_eq!(session.timeline().length(), 10.0);
    }
}
