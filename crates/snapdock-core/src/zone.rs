#![forbid(unsafe_code)]

//! Drop zones: classification of viewport points and pin resolution.
//!
//! The viewport is cut into a 3×3 grid by thirds. Eight of the nine cells are
//! zones; the middle cell has no zone of its own and is folded into the
//! nearest edge zone.
//!
//! # Invariants
//!
//! 1. [`classify`] is total: every point (including points outside the
//!    viewport) maps to exactly one zone.
//! 2. [`pin`] of any zone lies within `[0, viewport - handle]` on both axes.
//! 3. Zone names round-trip through [`DropZone::name`] and [`str::parse`].
//!
//! # Failure Modes
//!
//! | Input | Behavior |
//! |-------|----------|
//! | Unknown zone name | [`DropZone::parse_or_default`] yields [`DropZone::BottomRight`] |
//! | Viewport smaller than the handle | Pin clamps to `0` on that axis |
//! | Point exactly at the viewport center | Deterministic edge, see [`classify`] |

use std::fmt;
use std::str::FromStr;

use crate::geometry::{Position, Viewport};

/// One of the eight snap targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DropZone {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    CenterRight,
    BottomLeft,
    BottomCenter,
    #[default]
    BottomRight,
}

/// Horizontal third of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Left,
    Center,
    Right,
}

/// Vertical third of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Top,
    Center,
    Bottom,
}

/// Edge the drawer slides out from when the handle is pinned in a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationDirection {
    Left,
    Right,
    Top,
    Bottom,
}

impl AnimationDirection {
    /// Lowercase name, as used by style hooks (`data-direction`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for AnimationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static placement of a zone.
///
/// Negative offsets are measured from the right/bottom edge. A zero offset
/// on a centered axis is a placeholder; [`pin`] computes the real value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneConfig {
    pub offset: Position,
    pub direction: AnimationDirection,
}

const INSET: f64 = 16.0;
const FAR_INSET: f64 = -56.0;

impl DropZone {
    /// Every zone, in reading order.
    pub const ALL: [DropZone; 8] = [
        DropZone::TopLeft,
        DropZone::TopCenter,
        DropZone::TopRight,
        DropZone::CenterLeft,
        DropZone::CenterRight,
        DropZone::BottomLeft,
        DropZone::BottomCenter,
        DropZone::BottomRight,
    ];

    /// Build a zone from grid coordinates. The middle cell has no zone.
    pub const fn from_cell(row: Row, column: Column) -> Option<Self> {
        Some(match (row, column) {
            (Row::Top, Column::Left) => Self::TopLeft,
            (Row::Top, Column::Center) => Self::TopCenter,
            (Row::Top, Column::Right) => Self::TopRight,
            (Row::Center, Column::Left) => Self::CenterLeft,
            (Row::Center, Column::Center) => return None,
            (Row::Center, Column::Right) => Self::CenterRight,
            (Row::Bottom, Column::Left) => Self::BottomLeft,
            (Row::Bottom, Column::Center) => Self::BottomCenter,
            (Row::Bottom, Column::Right) => Self::BottomRight,
        })
    }

    pub const fn row(self) -> Row {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => Row::Top,
            Self::CenterLeft | Self::CenterRight => Row::Center,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => Row::Bottom,
        }
    }

    pub const fn column(self) -> Column {
        match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => Column::Left,
            Self::TopCenter | Self::BottomCenter => Column::Center,
            Self::TopRight | Self::CenterRight | Self::BottomRight => Column::Right,
        }
    }

    /// Static placement for this zone.
    pub const fn config(self) -> ZoneConfig {
        let (x, y, direction) = match self {
            Self::TopLeft => (INSET, INSET, AnimationDirection::Left),
            Self::TopCenter => (0.0, INSET, AnimationDirection::Bottom),
            Self::TopRight => (FAR_INSET, INSET, AnimationDirection::Right),
            Self::CenterLeft => (INSET, 0.0, AnimationDirection::Left),
            Self::CenterRight => (FAR_INSET, 0.0, AnimationDirection::Right),
            Self::BottomLeft => (INSET, FAR_INSET, AnimationDirection::Left),
            Self::BottomCenter => (0.0, FAR_INSET, AnimationDirection::Top),
            Self::BottomRight => (FAR_INSET, FAR_INSET, AnimationDirection::Right),
        };
        ZoneConfig {
            offset: Position::new(x, y),
            direction,
        }
    }

    /// Drawer direction for this zone.
    pub const fn animation_direction(self) -> AnimationDirection {
        self.config().direction
    }

    /// Stable kebab-case name, e.g. `"bottom-right"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::CenterLeft => "center-left",
            Self::CenterRight => "center-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Parse a zone name, falling back to [`DropZone::BottomRight`].
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for DropZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown zone name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownZone(pub String);

impl fmt::Display for UnknownZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown drop zone: {:?}", self.0)
    }
}

impl std::error::Error for UnknownZone {}

impl FromStr for DropZone {
    type Err = UnknownZone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DropZone::ALL
            .into_iter()
            .find(|zone| zone.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownZone(s.to_string()))
    }
}

/// Which third of `extent` the coordinate `v` falls in (0, 1 or 2).
///
/// Intervals are closed-open, except that everything at or past the second
/// cut lands in the last third.
fn third(v: f64, extent: f64) -> u8 {
    let cut = extent / 3.0;
    if v < cut {
        0
    } else if v < cut * 2.0 {
        1
    } else {
        2
    }
}

/// Classify a point into a drop zone.
///
/// Points in the middle cell go to the nearest edge zone. Distances are
/// compared in the order left, right, top, bottom and the first minimum
/// wins, so exact ties are resolved deterministically toward the earlier
/// edge in that list.
pub fn classify(point: Position, viewport: Viewport) -> DropZone {
    let column = match third(point.x, viewport.width) {
        0 => Column::Left,
        1 => Column::Center,
        _ => Column::Right,
    };
    let row = match third(point.y, viewport.height) {
        0 => Row::Top,
        1 => Row::Center,
        _ => Row::Bottom,
    };

    if let Some(zone) = DropZone::from_cell(row, column) {
        return zone;
    }

    let to_left = point.x;
    let to_right = viewport.width - point.x;
    let to_top = point.y;
    let to_bottom = viewport.height - point.y;
    let nearest = to_left.min(to_right).min(to_top).min(to_bottom);

    if nearest == to_left {
        DropZone::CenterLeft
    } else if nearest == to_right {
        DropZone::CenterRight
    } else if nearest == to_top {
        DropZone::TopCenter
    } else {
        DropZone::BottomCenter
    }
}

/// Resolve the pinned top-left position of a `handle_size` square for `zone`.
///
/// Negative offsets are taken from the far edge; centered axes put the
/// handle's midpoint on the viewport's midpoint. The result is clamped so
/// the handle stays inside the viewport whenever it fits, and to `0` when it
/// does not.
pub fn pin(zone: DropZone, viewport: Viewport, handle_size: f64) -> Position {
    let config = zone.config();
    let mut x = config.offset.x;
    let mut y = config.offset.y;

    if zone.column() == Column::Center {
        x = (viewport.width - handle_size) / 2.0;
    }
    if zone.row() == Row::Center {
        y = (viewport.height - handle_size) / 2.0;
    }

    if x < 0.0 {
        x += viewport.width;
    }
    if y < 0.0 {
        y += viewport.height;
    }

    Position::new(
        clamp_axis(x, viewport.width, handle_size),
        clamp_axis(y, viewport.height, handle_size),
    )
}

fn clamp_axis(v: f64, extent: f64, handle_size: f64) -> f64 {
    let max = (extent - handle_size).max(0.0);
    v.clamp(0.0, max)
}
