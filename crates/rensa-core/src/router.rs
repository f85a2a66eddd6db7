//! Controller router: snapshots in, commands out.
//!
//! The router owns edge detection and the two hold gestures. It knows
//! nothing about the timeline or popup; deciding what a press *means* in
//! the current state is the session's job.
//!
//! Timers run on a monotonic [`Instant`], never on frame count.

use std::time::{Duration, Instant};

use rensa_types::Direction;
use tracing::{debug, info};

use crate::command::Command;
use crate::config::EditorConfig;
use crate::controller::ControllerSnapshot;
use crate::direction::DirectionResolver;
use crate::profile::ButtonProfile;

/// Press timer for a button with a hold gesture.
#[derive(Clone, Copy, Debug, Default)]
struct HoldTimer {
    pressed_at: Option<Instant>,
    fired: bool,
}

impl HoldTimer {
    fn press(&mut self, now: Instant) {
        self.pressed_at = Some(now);
        self.fired = false;
    }

    /// True exactly once per press, on the first poll at or past `threshold`.
    fn poll(&mut self, now: Instant, threshold: Duration) -> bool {
        let Some(pressed_at) = self.pressed_at else {
            return false;
        };
        if self.fired || now.saturating_duration_since(pressed_at) < threshold {
            return false;
        }
        self.fired = true;
        true
    }

    /// Disarm. `None` if the press was not armed or already fired, else
    /// whether it lasted at least `threshold` of wall-clock time.
    ///
    /// A hold can cross the threshold between two ticks and end on the
    /// release tick; the duration decides, not whether `poll` saw it.
    fn release(&mut self, now: Instant, threshold: Duration) -> Option<bool> {
        let pressed_at = self.pressed_at.take()?;
        let fired = std::mem::take(&mut self.fired);
        (!fired).then(|| now.saturating_duration_since(pressed_at) >= threshold)
    }
}

/// Per-controller edge and hold state.
#[derive(Clone, Debug, Default)]
pub struct InputRouter {
    prev_buttons: Vec<bool>,
    menu: HoldTimer,
    start: HoldTimer,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; the next snapshot starts from "nothing was pressed".
    pub fn disconnect(&mut self) {
        if !self.prev_buttons.is_empty() {
            debug!("controller state reset");
        }
        self.prev_buttons.clear();
        self.menu = HoldTimer::default();
        self.start = HoldTimer::default();
    }

    /// Turn one snapshot into commands, in button index order.
    pub fn route(
        &mut self,
        snapshot: &ControllerSnapshot,
        now: Instant,
        profile: &ButtonProfile,
        config: &EditorConfig,
    ) -> Vec<Command> {
        let layout = &config.layout;
        if self.prev_buttons.len() != snapshot.button_count() {
            if !self.prev_buttons.is_empty() {
                info!(
                    from = self.prev_buttons.len(),
                    to = snapshot.button_count(),
                    "controller layout changed, resyncing"
                );
            }
            self.prev_buttons = vec![false; snapshot.button_count()];
        }

        let resolver = DirectionResolver::new(config.deadzone);
        // Labels and direction are read at most once per tick
        let mut cached: Option<(Vec<String>, Direction)> = None;
        let mut intent = || {
            cached
                .get_or_insert_with(|| {
                    (
                        profile.labels_currently_held(snapshot),
                        resolver.resolve(snapshot, layout),
                    )
                })
                .clone()
        };

        let mut commands = Vec::new();
        for (index, &pressed) in snapshot.buttons.iter().enumerate() {
            let just_pressed = pressed && !self.prev_buttons[index];
            self.prev_buttons[index] = pressed;
            if !just_pressed {
                continue;
            }

            if index == layout.menu {
                commands.push(Command::MenuPress);
                self.menu.press(now);
            } else if layout.is_confirm(index) {
                let (labels, dir) = intent();
                commands.push(Command::Confirm { labels, dir });
            } else if index == layout.start {
                self.start.press(now);
            } else if index == layout.popup_up {
                commands.push(Command::NavigatePopup(-1));
            } else if index == layout.popup_down {
                commands.push(Command::NavigatePopup(1));
            } else if profile.is_mapped(index) {
                let (labels, dir) = intent();
                commands.push(Command::Strike { labels, dir });
            }
        }

        if snapshot.pressed(layout.menu) {
            if self.menu.poll(now, config.delete_hold()) {
                commands.push(Command::MenuHoldElapsed);
            }
        } else if self.menu.release(now, config.delete_hold()) == Some(true) {
            commands.push(Command::MenuHoldElapsed);
        }

        if snapshot.pressed(layout.start) {
            if self.start.poll(now, config.start_hold()) {
                commands.push(Command::ToggleTypingMode);
            }
        } else {
            match self.start.release(now, config.start_hold()) {
                Some(true) => commands.push(Command::ToggleTypingMode),
                Some(false) => commands.push(Command::TogglePlayback),
                None => {}
            }
        }

        commands
    }
}
