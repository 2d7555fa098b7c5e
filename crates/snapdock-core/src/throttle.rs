#![forbid(unsafe_code)]

//! Latest-wins rate limiting for high-frequency input.
//!
//! Pointer moves arrive far faster than the engine needs them and resize
//! events come in storms. [`RateLimiter`] lets at most one value through per
//! interval:
//!
//! - The first value after a quiet period passes immediately (leading edge).
//! - Values arriving inside the window replace each other; only the most
//!   recent is kept. Older ones are dropped, never queued.
//! - The kept value is released by [`RateLimiter::poll`] once the window has
//!   elapsed (trailing edge).
//!
//! Time is supplied by the caller as a monotonic [`Duration`], so behavior is
//! deterministic for identical input sequences.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use snapdock_core::throttle::RateLimiter;
//!
//! let ms = Duration::from_millis;
//! let mut limiter = RateLimiter::new(ms(8));
//!
//! assert_eq!(limiter.submit(ms(0), 1), Some(1)); // leading edge
//! assert_eq!(limiter.submit(ms(2), 2), None); // held
//! assert_eq!(limiter.submit(ms(4), 3), None); // replaces 2
//! assert_eq!(limiter.poll(ms(6)), None); // window still open
//! assert_eq!(limiter.poll(ms(8)), Some(3)); // trailing edge, latest wins
//! assert_eq!(limiter.dropped(), 1);
//! ```

use std::time::Duration;

/// Passes at most one value per interval, keeping only the latest.
///
/// Not thread-safe; owned by a single event-processing loop.
#[derive(Debug, Clone)]
pub struct RateLimiter<T> {
    interval: Duration,
    /// Time of the last value let through.
    last_fired: Option<Duration>,
    /// Latest value held inside the current window.
    pending: Option<T>,
    /// Diagnostic: values replaced before they could fire.
    dropped: u64,
}

impl<T> RateLimiter<T> {
    /// Create a limiter with the given minimum spacing between values.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: None,
            dropped: 0,
        }
    }

    fn window_open(&self, now: Duration) -> bool {
        match self.last_fired {
            Some(last) => now.saturating_sub(last) < self.interval,
            None => false,
        }
    }

    /// Offer a value at time `now`.
    ///
    /// Returns `Some(value)` if it should be acted on immediately, or `None`
    /// if it is being held for the trailing edge.
    pub fn submit(&mut self, now: Duration, value: T) -> Option<T> {
        if self.window_open(now) {
            if self.pending.replace(value).is_some() {
                self.dropped = self.dropped.saturating_add(1);
            }
            return None;
        }
        // A held value is superseded by a fresh leading-edge value.
        if self.pending.take().is_some() {
            self.dropped = self.dropped.saturating_add(1);
        }
        self.last_fired = Some(now);
        Some(value)
    }

    /// Release the held value if its window has elapsed at `now`.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        if self.pending.is_none() || self.window_open(now) {
            return None;
        }
        self.last_fired = Some(now);
        self.pending.take()
    }

    /// Whether a value is being held.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fire the held value at `now` without waiting for its window.
    pub fn flush(&mut self, now: Duration) -> Option<T> {
        let value = self.pending.take()?;
        self.last_fired = Some(now);
        Some(value)
    }

    /// Forget all timing state, as if newly created. Keeps the counter.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_fired = None;
    }

    /// Number of values superseded before they fired.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Configured interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_value_passes_immediately() {
        let mut limiter = RateLimiter::new(ms(8));
        assert_eq!(limiter.submit(ms(100), "a"), Some("a"));
        assert!(!limiter.has_pending());
    }

    #[test]
    fn burst_keeps_only_latest() {
        let mut limiter = RateLimiter::new(ms(8));
        assert_eq!(limiter.submit(ms(0), 0), Some(0));
        for (i, t) in (1..=5).zip([1, 2, 3, 4, 5]) {
            assert_eq!(limiter.submit(ms(t), i), None);
        }
        assert_eq!(limiter.dropped(), 4);
        assert_eq!(limiter.poll(ms(7)), None);
        assert_eq!(limiter.poll(ms(8)), Some(5));
        assert!(!limiter.has_pending());
        assert_eq!(limiter.poll(ms(100)), None);
    }

    #[test]
    fn spaced_values_all_pass() {
        let mut limiter = RateLimiter::new(ms(8));
        for t in [0, 8, 16, 30] {
            assert_eq!(limiter.submit(ms(t), t), Some(t));
        }
        assert_eq!(limiter.dropped(), 0);
    }

    #[test]
    fn late_submit_supersedes_held_value() {
        let mut limiter = RateLimiter::new(ms(100));
        assert_eq!(limiter.submit(ms(0), 1), Some(1));
        assert_eq!(limiter.submit(ms(50), 2), None);
        // Nobody polled; the next submit after the window wins outright.
        assert_eq!(limiter.submit(ms(150), 3), Some(3));
        assert!(!limiter.has_pending());
        assert_eq!(limiter.dropped(), 1);
    }

    #[test]
    fn trailing_fire_restarts_window() {
        let mut limiter = RateLimiter::new(ms(10));
        limiter.submit(ms(0), 1);
        limiter.submit(ms(5), 2);
        assert_eq!(limiter.poll(ms(12)), Some(2));
        // Window now runs from 12.
        assert_eq!(limiter.submit(ms(15), 3), None);
        assert_eq!(limiter.poll(ms(22)), Some(3));
    }

    #[test]
    fn reset_reopens_leading_edge() {
        let mut limiter = RateLimiter::new(ms(10));
        limiter.submit(ms(0), 1);
        limiter.reset();
        assert_eq!(limiter.submit(ms(1), 2), Some(2));
    }

    #[test]
    fn clock_going_backwards_does_not_panic() {
        let mut limiter = RateLimiter::new(ms(10));
        limiter.submit(ms(100), 1);
        assert_eq!(limiter.submit(ms(50), 2), None);
        assert_eq!(limiter.poll(ms(50)), None);
        assert_eq!(limiter.poll(ms(110)), Some(2));
    }

    #[test]
    fn zero_interval_never_holds() {
        let mut limiter = RateLimiter::new(Duration::ZERO);
        assert_eq!(limiter.submit(ms(0), 1), Some(1));
        assert_eq!(limiter.submit(ms(0), 2), Some(2));
    }

    #[test]
    fn flush_fires_held_value_early() {
        let mut limiter = RateLimiter::new(ms(8));
        assert_eq!(limiter.submit(ms(0), 1), Some(1));
        assert_eq!(limiter.submit(ms(2), 2), None);
        assert_eq!(limiter.submit(ms(3), 3), None);
        assert_eq!(limiter.flush(ms(3)), Some(3));
        assert!(!limiter.has_pending());
        assert_eq!(limiter.flush(ms(4)), None);
        // The flush opened a fresh window.
        assert_eq!(limiter.submit(ms(5), 4), None);
    }
}
