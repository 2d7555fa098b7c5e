#![forbid(unsafe_code)]

//! Core: the drag-and-snap engine for a corner-docked panel handle, plus the
//! geometry, zone, easing, rate-limiting, and frame-scheduling primitives it
//! is built from.
//!
//! The engine is host-driven. It never reads a clock or touches a DOM; the
//! host pushes pointer, touch, and resize events stamped with a monotonic
//! [`Duration`](std::time::Duration) and calls [`engine::DragEngine::tick`]
//! once per display frame.

pub mod animation;
pub mod config;
pub mod engine;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod gravity;
pub mod listener;
pub mod logging;
pub mod throttle;
pub mod zone;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, trace_span, warn};
