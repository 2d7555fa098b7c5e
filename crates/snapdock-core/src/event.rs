#![forbid(unsafe_code)]

//! Canonical input events for the engine.
//!
//! Hosts translate their native events (DOM mouse/touch/resize, toolkit
//! pointer events) into [`InputEvent`]s. Coordinates are client/viewport
//! pixels. Touch events carry every active touch point; the engine only
//! looks at the primary (first) one.

use crate::geometry::{Position, Viewport};
use crate::listener::ListenerKinds;

/// One active touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Host-assigned identifier, stable for the life of the touch.
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(id: u64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Input the engine reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed on the handle.
    PointerDown { x: f64, y: f64 },
    /// Pointer moved anywhere in the document.
    PointerMove { x: f64, y: f64 },
    /// Primary button released anywhere in the document.
    PointerUp,
    /// Touch began on the handle.
    TouchStart(Vec<TouchPoint>),
    /// Touch moved anywhere in the document.
    TouchMove(Vec<TouchPoint>),
    /// Touch ended anywhere in the document.
    TouchEnd,
    /// Viewport changed size.
    Resize(Viewport),
}

impl InputEvent {
    /// Mouse press at `(x, y)`.
    #[must_use]
    pub const fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown { x, y }
    }

    /// Mouse move to `(x, y)`.
    #[must_use]
    pub const fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    /// Single-finger touch start at `(x, y)`.
    #[must_use]
    pub fn touch_start(x: f64, y: f64) -> Self {
        Self::TouchStart(vec![TouchPoint::new(0, x, y)])
    }

    /// Single-finger touch move to `(x, y)`.
    #[must_use]
    pub fn touch_move(x: f64, y: f64) -> Self {
        Self::TouchMove(vec![TouchPoint::new(0, x, y)])
    }

    /// Resize to `width` × `height`.
    #[must_use]
    pub fn resize(width: f64, height: f64) -> Self {
        Self::Resize(Viewport::new(width, height))
    }

    /// Document-level listener this event is delivered through, if any.
    ///
    /// Events on the handle itself (down/start) and resize are always
    /// delivered; the rest only while the matching listener is attached.
    #[must_use]
    pub fn global_listener(&self) -> Option<ListenerKinds> {
        match self {
            Self::PointerMove { .. } => Some(ListenerKinds::POINTER_MOVE),
            Self::PointerUp => Some(ListenerKinds::POINTER_UP),
            Self::TouchMove(_) => Some(ListenerKinds::TOUCH_MOVE),
            Self::TouchEnd => Some(ListenerKinds::TOUCH_END),
            Self::PointerDown { .. } | Self::TouchStart(_) | Self::Resize(_) => None,
        }
    }
}

/// The primary touch point, if any.
#[must_use]
pub fn primary_touch(points: &[TouchPoint]) -> Option<Position> {
    points.first().map(TouchPoint::position)
}
