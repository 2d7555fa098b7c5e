#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! [`EngineConfig::default`] reproduces the stock feel of the handle. Hosts
//! can adjust individual knobs with the `with_*` builders, or pick up
//! overrides from the environment via [`EngineConfig::from_env`].
//!
//! # Environment overrides
//!
//! | Variable | Field | Format |
//! |----------|-------|--------|
//! | `SNAPDOCK_HANDLE_SIZE` | `handle_size` | positive float (px) |
//! | `SNAPDOCK_DRAG_THRESHOLD` | `drag_threshold` | non-negative float (px) |
//! | `SNAPDOCK_GRAVITY_RADIUS` | `gravity_radius` | non-negative float (px) |
//! | `SNAPDOCK_INITIAL_ZONE` | `initial_zone` | zone name, e.g. `top-left` |
//! | `SNAPDOCK_INTERRUPT_SNAP` | `interrupt_snap` | `1/true/yes/on`, `0/false/no/off` |
//!
//! Unparsable values are ignored and the default is kept. An unknown zone
//! name resolves to `bottom-right`.

use std::fmt;
use std::time::Duration;

use crate::animation::SnapTiming;
use crate::gravity::Gravity;
use crate::zone::DropZone;

const ENV_HANDLE_SIZE: &str = "SNAPDOCK_HANDLE_SIZE";
const ENV_DRAG_THRESHOLD: &str = "SNAPDOCK_DRAG_THRESHOLD";
const ENV_GRAVITY_RADIUS: &str = "SNAPDOCK_GRAVITY_RADIUS";
const ENV_INITIAL_ZONE: &str = "SNAPDOCK_INITIAL_ZONE";
const ENV_INTERRUPT_SNAP: &str = "SNAPDOCK_INTERRUPT_SNAP";

/// Tunables for [`DragEngine`](crate::engine::DragEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Side of the square handle in pixels (default: 40).
    pub handle_size: f64,
    /// Pointer travel before a press becomes a drag (default: 5).
    pub drag_threshold: f64,
    /// Radius of the sticky region around the pin (default: 150).
    pub gravity_radius: f64,
    /// Movement fraction applied right at the pin (default: 0.02).
    pub base_resistance: f64,
    /// Shortest snap-back (default: 200ms).
    pub min_snap: Duration,
    /// Longest snap-back (default: 800ms).
    pub max_snap: Duration,
    /// Snap travel speed in px/ms (default: 0.5).
    pub snap_speed: f64,
    /// Minimum spacing of applied pointer moves (default: 8ms).
    pub move_throttle: Duration,
    /// Minimum spacing of applied resizes (default: 100ms).
    pub resize_throttle: Duration,
    /// Zone the handle starts in (default: bottom-right).
    pub initial_zone: DropZone,
    /// Whether a press during a snap-back interrupts it (default: false,
    /// the press is ignored until the handle settles).
    pub interrupt_snap: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            handle_size: 40.0,
            drag_threshold: 5.0,
            gravity_radius: 150.0,
            base_resistance: 0.02,
            min_snap: Duration::from_millis(200),
            max_snap: Duration::from_millis(800),
            snap_speed: 0.5,
            move_throttle: Duration::from_millis(8),
            resize_throttle: Duration::from_millis(100),
            initial_zone: DropZone::BottomRight,
            interrupt_snap: false,
        }
    }
}

impl EngineConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = env_f64(&get_env, ENV_HANDLE_SIZE).filter(|v| *v > 0.0) {
            config.handle_size = v;
        }
        if let Some(v) = env_f64(&get_env, ENV_DRAG_THRESHOLD).filter(|v| *v >= 0.0) {
            config.drag_threshold = v;
        }
        if let Some(v) = env_f64(&get_env, ENV_GRAVITY_RADIUS).filter(|v| *v >= 0.0) {
            config.gravity_radius = v;
        }
        if let Some(name) = get_env(ENV_INITIAL_ZONE) {
            config.initial_zone = DropZone::parse_or_default(&name);
        }
        if let Some(v) = get_env(ENV_INTERRUPT_SNAP).and_then(|v| parse_bool(&v)) {
            config.interrupt_snap = v;
        }
        config
    }

    #[must_use]
    pub fn with_handle_size(mut self, px: f64) -> Self {
        self.handle_size = px;
        self
    }

    #[must_use]
    pub fn with_drag_threshold(mut self, px: f64) -> Self {
        self.drag_threshold = px;
        self
    }

    #[must_use]
    pub fn with_gravity_radius(mut self, px: f64) -> Self {
        self.gravity_radius = px;
        self
    }

    /// Set the snap duration bounds.
    #[must_use]
    pub fn with_snap_bounds(mut self, min: Duration, max: Duration) -> Self {
        self.min_snap = min;
        self.max_snap = max;
        self
    }

    #[must_use]
    pub fn with_move_throttle(mut self, interval: Duration) -> Self {
        self.move_throttle = interval;
        self
    }

    #[must_use]
    pub fn with_resize_throttle(mut self, interval: Duration) -> Self {
        self.resize_throttle = interval;
        self
    }

    #[must_use]
    pub fn with_initial_zone(mut self, zone: DropZone) -> Self {
        self.initial_zone = zone;
        self
    }

    /// Let a press during a snap-back cancel it and start a new drag.
    #[must_use]
    pub fn interrupting_snap(mut self) -> Self {
        self.interrupt_snap = true;
        self
    }

    /// Gravity parameters derived from this config.
    #[must_use]
    pub fn gravity(&self) -> Gravity {
        Gravity {
            radius: self.gravity_radius,
            base_factor: self.base_resistance,
        }
    }

    /// Snap timing derived from this config.
    #[must_use]
    pub fn snap_timing(&self) -> SnapTiming {
        SnapTiming {
            min: self.min_snap,
            max: self.max_snap,
            speed: self.snap_speed,
        }
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.handle_size.is_finite() && self.handle_size > 0.0) {
            return Err(ConfigError::InvalidLength {
                field: "handle_size",
                value: self.handle_size,
            });
        }
        for (field, value) in [
            ("drag_threshold", self.drag_threshold),
            ("gravity_radius", self.gravity_radius),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidLength { field, value });
            }
        }
        if !(self.base_resistance.is_finite() && (0.0..=1.0).contains(&self.base_resistance)) {
            return Err(ConfigError::ResistanceOutOfRange(self.base_resistance));
        }
        if !(self.snap_speed.is_finite() && self.snap_speed > 0.0) {
            return Err(ConfigError::InvalidSnapSpeed(self.snap_speed));
        }
        if self.min_snap > self.max_snap {
            return Err(ConfigError::SnapBoundsInverted {
                min: self.min_snap,
                max: self.max_snap,
            });
        }
        Ok(())
    }
}

/// A rejected configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A pixel length is negative, non-finite, or (for the handle) zero.
    InvalidLength { field: &'static str, value: f64 },
    /// Base resistance outside `[0, 1]`.
    ResistanceOutOfRange(f64),
    /// Snap speed not strictly positive.
    InvalidSnapSpeed(f64),
    /// `min_snap` exceeds `max_snap`.
    SnapBoundsInverted { min: Duration, max: Duration },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { field, value } => write!(f, "invalid {field}: {value}"),
            Self::ResistanceOutOfRange(v) => {
                write!(f, "base_resistance must be within [0, 1], got {v}")
            }
            Self::InvalidSnapSpeed(v) => write!(f, "snap_speed must be positive, got {v}"),
            Self::SnapBoundsInverted { min, max } => {
                write!(f, "min_snap {min:?} exceeds max_snap {max:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_f64<F>(get_env: &F, key: &str) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    get_env(key)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
