#![forbid(unsafe_code)]

//! Cancellable per-frame callbacks.
//!
//! A [`FrameScheduler`] stands in for the display's frame clock. Owners
//! request a frame and get a [`FrameHandle`]; when the host begins a frame,
//! [`FrameScheduler::begin_frame`] hands back every handle that was pending
//! when the frame started. Handles requested while a frame is being
//! processed wait for the next one, and cancelled handles never come back.
//!
//! # Invariants
//!
//! 1. Handle ids are unique and monotonically increasing for the lifetime
//!    of a scheduler (including across [`FrameScheduler::clear`]).
//! 2. A cancelled handle is never returned by `begin_frame`.
//! 3. A handle is returned at most once.

/// Ticket for a requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Raw id, for logging.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Queue of frame requests driven by host frame timestamps.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Vec<FrameHandle>,
    /// Diagnostic: frames delivered via `begin_frame`.
    delivered: u64,
    /// Diagnostic: requests cancelled before delivery.
    cancelled: u64,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a callback on the next frame.
    pub fn request(&mut self) -> FrameHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    /// Cancel a pending request. Returns `false` if it was not pending.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        let removed = self.pending.len() != before;
        if removed {
            self.cancelled = self.cancelled.saturating_add(1);
        }
        removed
    }

    /// Whether `handle` is still waiting for a frame.
    #[must_use]
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    /// Number of requests waiting for a frame.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Start a frame: take every pending request, oldest first.
    pub fn begin_frame(&mut self) -> Vec<FrameHandle> {
        let due = std::mem::take(&mut self.pending);
        self.delivered = self.delivered.saturating_add(due.len() as u64);
        due
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.cancelled = self.cancelled.saturating_add(self.pending.len() as u64);
        self.pending.clear();
    }

    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    #[must_use]
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}
