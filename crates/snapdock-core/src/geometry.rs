#![forbid(unsafe_code)]

//! Geometric primitives in viewport pixel space.
//!
//! Coordinates are `f64` CSS pixels with the origin at the top-left corner of
//! the viewport. Values may be fractional; nothing here rounds.

use std::ops::{Add, Sub};

/// A point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new position.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_sq(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Linear interpolation from `self` toward `other` by `t`.
    ///
    /// `t` is not clamped: `0.0` yields `self`, `1.0` yields `other`.
    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Viewport dimensions in pixels.
///
/// Negative or non-finite dimensions are coerced to zero on construction so
/// downstream math never sees them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a viewport, coercing invalid dimensions to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    /// Whether either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// The viewport's center point.
    #[inline]
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// An axis-aligned rectangle, typically an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A square of side `size` with its top-left corner at `origin`.
    #[inline]
    pub const fn square(origin: Position, size: f64) -> Self {
        Self::new(origin.x, origin.y, size, size)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the rectangle (half-open on right/bottom).
    #[inline]
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}
