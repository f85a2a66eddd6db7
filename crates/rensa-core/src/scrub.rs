//! Angular scrubbing: rotating a stick moves the playhead.
//!
//! The stick's polar angle is differenced tick to tick. One full turn at
//! full deflection moves the playhead `damping * length` seconds; the
//! squared magnitude term makes partial deflection much slower.

use std::f64::consts::PI;

/// Integrates stick rotation into playhead displacement.
#[derive(Clone, Debug)]
pub struct ScrubEngine {
    deadzone: f32,
    damping: f64,
    last_angle: Option<f64>,
}

impl Default for ScrubEngine {
    fn default() -> Self {
        Self::new(0.1, 0.12)
    }
}

impl ScrubEngine {
    pub fn new(deadzone: f32, damping: f64) -> Self {
        Self {
            deadzone,
            damping,
            last_angle: None,
        }
    }

    /// Angle recorded on the previous tick, if the stick was deflected.
    pub fn last_angle(&self) -> Option<f64> {
        self.last_angle
    }

    /// Forget the recorded angle (controller unplugged).
    pub fn reset(&mut self) {
        self.last_angle = None;
    }

    /// Feed one stick sample.
    ///
    /// Returns the playhead displacement in seconds when a delta could be
    /// computed (stick outside the deadzone on this and the previous tick).
    pub fn update(&mut self, x: f32, y: f32, length: f64) -> Option<f64> {
        let (x, y) = (f64::from(x), f64::from(y));
        let magnitude = x.hypot(y);
        if magnitude <= f64::from(self.deadzone) {
            self.last_angle = None;
            return None;
        }

        let angle = y.atan2(x);
        let displacement = self.last_angle.map(|last| {
            let delta = shortest_delta(angle - last);
            delta * (length / (2.0 * PI)) * magnitude * magnitude * self.damping
        });
        self.last_angle = Some(angle);
        displacement
    }
}

/// Normalize an angle difference into `(-π, π]`.
pub fn shortest_delta(delta: f64) -> f64 {
    let mut d = delta;
    while d > PI {
        d -= 2.0 * PI;
    }
    while d <= -PI {
        d += 2.0 * PI;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_angle(theta: f64, magnitude: f64) -> (f32, f32) {
        ((theta.cos() * magnitude) as f32, (theta.sin() * magnitude) as f32)
    }

    #[test]
    fn test_shortest_delta_range() {
        assert!((shortest_delta(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((shortest_delta(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert_eq!(shortest_delta(PI), PI);
        assert_eq!(shortest_delta(-PI), PI);
        assert_eq!(shortest_delta(0.25), 0.25);
    }

    #[test]
    fn test_first_sample_only_records_angle() {
        let mut scrub = ScrubEngine::default();
        assert_eq!(scrub.update(1.0, 0.0, 10.0), None);
        assert!(scrub.last_angle().is_some());
    }

    #[test]
    fn test_full_turn_at_full_deflection() {
        let mut scrub = ScrubEngine::default();
        let steps = 16;
        let mut total = 0.0;
        for i in 0..=steps {
            let theta = 2.0 * PI * f64::from(i) / f64::from(steps);
            let (x, y) = at_angle(theta, 1.0);
            if let Some(d) = scrub.update(x, y, 10.0) {
                total += d;
            }
        }
        assert!((total - 0.12 * 10.0).abs() < 1e-4, "total = {total}");
    }

    #[test]
    fn test_reverse_rotation_scrubs_backwards() {
        let mut scrub = ScrubEngine::default();
        scrub.update(1.0, 0.0, 10.0);
        let (x, y) = at_angle(-PI / 4.0, 1.0);
        let d = scrub.update(x, y, 10.0).unwrap();
        assert!(d < 0.0);
    }

    #[test]
    fn test_half_deflection_is_quarter_speed() {
        let mut full = ScrubEngine::new(0.1, 0.12);
        let mut half = ScrubEngine::new(0.1, 0.12);
        full.update(1.0, 0.0, 10.0);
        half.update(0.5, 0.0, 10.0);
        let (fx, fy) = at_angle(0.5, 1.0);
        let (hx, hy) = at_angle(0.5, 0.5);
        let df = full.update(fx, fy, 10.0).unwrap();
        let dh = half.update(hx, hy, 10.0).unwrap();
        assert!((dh / df - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_deadzone_clears_stale_angle() {
        let mut scrub = ScrubEngine::default();
        scrub.update(1.0, 0.0, 10.0);
        assert_eq!(scrub.update(0.0, 0.05, 10.0), None);
        assert_eq!(scrub.last_angle(), None);
        // Leaving the deadzone on the opposite side must not jump half a turn
        assert_eq!(scrub.update(-1.0, 0.0, 10.0), None);
        let (x, y) = at_angle(PI - 0.1, 1.0);
        let d = scrub.update(x, y, 10.0).unwrap();
        assert!(d.abs() < 0.05);
    }
}
