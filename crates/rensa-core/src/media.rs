//! Media synchronization seam.
//!
//! A reference clip is optional. The session drives the clip's position
//! during playback, scrubbing, and seeks; the clip's own time updates only
//! win while the user is seeking it directly.

use std::time::{Duration, Instant};

/// Reasons a playback request can be refused.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("playback blocked: {0}")]
    Blocked(String),
}

/// Whatever plays the reference clip.
pub trait MediaSync {
    fn is_loaded(&self) -> bool;

    /// Clip duration in seconds, once known.
    fn duration(&self) -> Option<f64>;

    fn seek(&mut self, time: f64);

    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);
}

/// Media backend for sessions without a reference clip.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedMedia;

impl MediaSync for DetachedMedia {
    fn is_loaded(&self) -> bool {
        false
    }

    fn duration(&self) -> Option<f64> {
        None
    }

    fn seek(&mut self, _time: f64) {}

    fn play(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn pause(&mut self) {}
}

/// Feedback-loop guard between the playhead and the clip.
#[derive(Clone, Debug)]
pub(crate) struct MediaLink {
    /// The user is dragging the clip's own scrubber.
    seeking: bool,
    /// Time updates are ignored until this instant after a programmatic seek.
    guard_until: Option<Instant>,
    guard: Duration,
}

impl MediaLink {
    pub(crate) fn new(guard: Duration) -> Self {
        Self {
            seeking: false,
            guard_until: None,
            guard,
        }
    }

    pub(crate) fn is_seeking(&self) -> bool {
        self.seeking
    }

    pub(crate) fn set_seeking(&mut self, seeking: bool) {
        self.seeking = seeking;
    }

    /// Push the playhead to the clip, clamped to its duration.
    pub(crate) fn seek(&mut self, media: &mut dyn MediaSync, playhead: f64, now: Instant) {
        if !media.is_loaded() {
            return;
        }
        let target = media.duration().map_or(playhead, |d| playhead.min(d));
        media.seek(target);
        self.guard_until = Some(now + self.guard);
    }

    /// Should a time update reported by the clip move the playhead?
    pub(crate) fn accepts_time_update(&self, now: Instant) -> bool {
        !self.seeking && self.guard_until.is_none_or(|until| now >= until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Clip {
        seeks: Vec<f64>,
    }

    impl MediaSync for Clip {
        fn is_loaded(&self) -> bool {
            true
        }
        fn duration(&self) -> Option<f64> {
            Some(4.0)
        }
        fn seek(&mut self, time: f64) {
            self.seeks.push(time);
        }
        fn play(&mut self) -> Result<(), PlaybackError> {
            Err(PlaybackError::Blocked("autoplay".into()))
        }
        fn pause(&mut self) {}
    }

    #[test]
    fn test_seek_clamps_to_duration_and_arms_guard() {
        let t0 = Instant::now();
        let mut clip = Clip::default();
        let mut link = MediaLink::new(Duration::from_millis(50));
        assert!(link.accepts_time_update(t0));

        link.seek(&mut clip, 6.5, t0);
        assert_eq!(clip.seeks, vec![4.0]);
        assert!(!link.accepts_time_update(t0 + Duration::from_millis(10)));
        assert!(link.accepts_time_update(t0 + Duration::from_millis(50)));
    }

    #[test]
    fn test_user_seeking_blocks_updates() {
        let mut link = MediaLink::new(Duration::from_millis(50));
        link.set_seeking(true);
        assert!(link.is_seeking());
        assert!(!link.accepts_time_update(Instant::now()));
    }

    #[test]
    fn test_detached_media_ignores_seeks() {
        let mut media = DetachedMedia;
        let mut link = MediaLink::new(Duration::from_millis(50));
        let t0 = Instant::now();
        link.seek(&mut media, 3.0, t0);
        assert!(link.accepts_time_update(t0));
        assert!(media.play().is_ok());
    }
}
