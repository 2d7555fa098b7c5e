#![forbid(unsafe_code)]

//! `snapdock-web` embeds the drag engine in a host-driven page shell.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS) pushes pointer,
//!   touch, and resize events.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. [`step_host::StepHost`] is the
//! surface a binding layer would wrap.

pub mod panel;
pub mod step_host;

use core::time::Duration;
use std::collections::VecDeque;

use snapdock_core::config::ConfigError;
use snapdock_core::event::InputEvent;
use snapdock_core::geometry::Viewport;

/// Host harness error type.
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
    /// The engine configuration was rejected.
    Config(ConfigError),
}

impl core::fmt::Display for HostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid engine config: {err}"),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for HostError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    ///
    /// Time never runs backwards; earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }
}

/// Host-driven input queue.
///
/// The host pushes [`InputEvent`]s in arrival order; resize events update
/// the tracked viewport as soon as they are pushed.
#[derive(Debug, Clone)]
pub struct HostEventSource {
    viewport: Viewport,
    queue: VecDeque<InputEvent>,
}

impl HostEventSource {
    /// Create an empty queue for a viewport of the given size.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            queue: VecDeque::new(),
        }
    }

    /// Latest known viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Push a canonical event into the queue.
    pub fn push_event(&mut self, event: InputEvent) {
        if let InputEvent::Resize(viewport) = &event {
            self.viewport = *viewport;
        }
        self.queue.push_back(event);
    }

    /// Pop the oldest pending event.
    pub fn read_event(&mut self) -> Option<InputEvent> {
        self.queue.pop_front()
    }

    /// Look at the oldest pending event without removing it.
    #[must_use]
    pub fn peek_event(&self) -> Option<&InputEvent> {
        self.queue.front()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every queued event.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clock_is_monotonic() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(16));
        clock.set(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::from_millis(16));
        clock.set(Duration::from_millis(40));
        assert_eq!(clock.now(), Duration::from_millis(40));
    }

    #[test]
    fn queue_is_fifo_and_tracks_viewport() {
        let mut source = HostEventSource::new(Viewport::new(800.0, 600.0));
        source.push_event(InputEvent::pointer_down(1.0, 2.0));
        source.push_event(InputEvent::resize(1024.0, 768.0));
        source.push_event(InputEvent::PointerUp);
        assert_eq!(source.viewport(), Viewport::new(1024.0, 768.0));
        assert_eq!(source.len(), 3);
        assert_eq!(source.peek_event(), Some(&InputEvent::pointer_down(1.0, 2.0)));
        assert_eq!(source.read_event(), Some(InputEvent::pointer_down(1.0, 2.0)));
        assert_eq!(source.read_event(), Some(InputEvent::resize(1024.0, 768.0)));
        assert_eq!(source.read_event(), Some(InputEvent::PointerUp));
        assert!(source.is_empty());
    }

    #[test]
    fn host_error_display_and_source() {
        let err = HostError::from(ConfigError::InvalidSnapSpeed(0.0));
        assert!(err.to_string().starts_with("invalid engine config: "));
        assert!(std::error::Error::source(&err).is_some());
    }
}
