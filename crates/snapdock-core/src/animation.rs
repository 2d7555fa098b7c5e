#![forbid(unsafe_code)]

//! Snap-back easing and timing.
//!
//! A [`SnapAnimation`] never reads a clock. The engine samples it at an
//! absolute host timestamp with [`SnapAnimation::advance_to`].

use std::time::Duration;

use crate::geometry::Position;

/// Cubic ease-out: `1 - (1 - t)^3`, with `t` clamped to [0, 1].
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

// ---------------------------------------------------------------------------
// Snap duration
// ---------------------------------------------------------------------------

/// Timing law for snap-back animations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTiming {
    /// Shortest snap, regardless of distance.
    pub min: Duration,
    /// Longest snap, regardless of distance.
    pub max: Duration,
    /// Travel speed in pixels per millisecond.
    pub speed: f64,
}

impl Default for SnapTiming {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(200),
            max: Duration::from_millis(800),
            speed: 0.5,
        }
    }
}

impl SnapTiming {
    /// Duration of a snap covering `distance` pixels.
    ///
    /// `distance / speed` milliseconds, clamped to `[min, max]`. Non-finite
    /// or negative distances map to `min`.
    pub fn duration_for(&self, distance: f64) -> Duration {
        let (min, max) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        if !distance.is_finite() || distance <= 0.0 || self.speed <= 0.0 {
            return min;
        }
        let nanos = distance / self.speed * 1_000_000.0;
        if nanos <= min.as_nanos() as f64 {
            min
        } else if nanos >= max.as_nanos() as f64 {
            max
        } else {
            Duration::from_nanos(nanos.round() as u64)
        }
    }
}

// ---------------------------------------------------------------------------
// SnapAnimation
// ---------------------------------------------------------------------------

/// Eased travel of the handle from its release point to a zone pin.
///
/// Progress is `ease_out_cubic(elapsed / duration)`. Once complete,
/// [`position`](Self::position) returns the target exactly.
#[derive(Debug, Clone, Copy)]
pub struct SnapAnimation {
    from: Position,
    to: Position,
    started_at: Duration,
    elapsed: Duration,
    duration: Duration,
}

impl SnapAnimation {
    /// Start a snap at host time `now`, with duration from `timing`.
    pub fn new(from: Position, to: Position, now: Duration, timing: &SnapTiming) -> Self {
        let duration = timing.duration_for(from.distance(to));
        Self {
            from,
            to,
            started_at: now,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
        }
    }

    /// Jump to the state at absolute host time `now`.
    ///
    /// Timestamps earlier than the start count as zero elapsed.
    pub fn advance_to(&mut self, now: Duration) {
        self.elapsed = now.saturating_sub(self.started_at);
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn progress(&self) -> f64 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Current interpolated handle position.
    pub fn position(&self) -> Position {
        if self.is_complete() {
            return self.to;
        }
        self.from.lerp(self.to, ease_out_cubic(self.progress()))
    }

    pub fn target(&self) -> Position {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    #[test]
    fn ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn easing_clamps_input() {
        assert_eq!(ease_out_cubic(-1.0), 0.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }

    #[test]
    fn duration_clamps_to_bounds() {
        let timing = SnapTiming::default();
        assert_eq!(timing.duration_for(0.0), MS(200));
        assert_eq!(timing.duration_for(10.0), MS(200));
        assert_eq!(timing.duration_for(200.0), MS(400));
        assert_eq!(timing.duration_for(10_000.0), MS(800));
    }

    #[test]
    fn duration_handles_garbage_distance() {
        let timing = SnapTiming::default();
        assert_eq!(timing.duration_for(f64::NAN), MS(200));
        assert_eq!(timing.duration_for(-50.0), MS(200));
    }

    #[test]
    fn snap_lands_exactly_on_target() {
        let from = Position::new(0.1, 0.2);
        let to = Position::new(1144.0, 744.0);
        let mut snap = SnapAnimation::new(from, to, MS(1000), &SnapTiming::default());
        snap.advance_to(MS(1000) + snap.duration());
        assert!(snap.is_complete());
        assert_eq!(snap.position(), to);
    }

    #[test]
    fn snap_is_eased_midway() {
        let from = Position::new(0.0, 0.0);
        let to = Position::new(400.0, 0.0);
        let mut snap = SnapAnimation::new(from, to, MS(0), &SnapTiming::default());
        assert_eq!(snap.duration(), MS(800));
        snap.advance_to(MS(400));
        assert!(!snap.is_complete());
        let x = snap.position().x;
        assert!((x - 350.0).abs() < 1e-9, "x = {x}");
    }

    #[test]
    fn snap_before_start_stays_at_source() {
        let from = Position::new(10.0, 10.0);
        let mut snap =
            SnapAnimation::new(from, Position::new(500.0, 10.0), MS(100), &SnapTiming::default());
        snap.advance_to(MS(50));
        assert_eq!(snap.position(), from);
    }

    #[test]
    fn completes_at_duration_boundary() {
        let mut snap = SnapAnimation::new(
            Position::ZERO,
            Position::new(10.0, 0.0),
            Duration::ZERO,
            &SnapTiming::default(),
        );
        snap.advance_to(MS(199));
        assert!(!snap.is_complete());
        snap.advance_to(MS(200));
        assert!(snap.is_complete());
    }

    #[test]
    fn zero_distance_snap_still_takes_min_duration() {
        let p = Position::new(5.0, 5.0);
        let snap = SnapAnimation::new(p, p, Duration::ZERO, &SnapTiming::default());
        assert_eq!(snap.duration(), MS(200));
        assert_eq!(snap.position(), p);
    }
}
