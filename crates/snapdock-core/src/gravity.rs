#![forbid(unsafe_code)]

//! Gravitational resistance around the current pin.
//!
//! Near the pin the handle lags behind the cursor, which makes the docked
//! handle feel sticky; outside the radius it tracks the cursor exactly.
//!
//! ```
//! use snapdock_core::geometry::Position;
//! use snapdock_core::gravity::Gravity;
//!
//! let gravity = Gravity::default();
//! let pin = Position::new(100.0, 100.0);
//! let far = Position::new(400.0, 400.0);
//! assert_eq!(gravity.resist(pin, pin, far), far);
//! ```

use crate::geometry::Position;

/// Resistance parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Distance from the pin beyond which there is no resistance.
    pub radius: f64,
    /// Fraction of the cursor delta applied right at the pin.
    pub base_factor: f64,
}

impl Default for Gravity {
    fn default() -> Self {
        Self {
            radius: 150.0,
            base_factor: 0.02,
        }
    }
}

impl Gravity {
    /// Fraction of the way from the current position to the cursor that the
    /// handle moves, for a cursor `dist_sq` (squared) away from the pin.
    ///
    /// Interpolates on the squared-distance ratio, so resistance falls off
    /// faster than linearly. Returns `1.0` at or beyond the radius.
    pub fn factor(&self, dist_sq: f64) -> f64 {
        let radius_sq = self.radius * self.radius;
        if dist_sq.is_nan() || dist_sq >= radius_sq {
            return 1.0;
        }
        self.base_factor + (1.0 - self.base_factor) * (dist_sq / radius_sq)
    }

    /// Resisted handle position for a cursor-following target.
    ///
    /// `pin` is the current zone's pinned position, `current` the handle's
    /// displayed position, `cursor` where the handle would be with no
    /// resistance.
    pub fn resist(&self, pin: Position, current: Position, cursor: Position) -> Position {
        let factor = self.factor(pin.distance_sq(cursor));
        if factor >= 1.0 {
            return cursor;
        }
        current.lerp(cursor, factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_radius_tracks_cursor_exactly() {
        let g = Gravity::default();
        let pin = Position::new(1144.0, 744.0);
        let cursor = Position::new(900.0, 500.0);
        assert_eq!(g.resist(pin, pin, cursor), cursor);
    }

    #[test]
    fn at_radius_boundary_tracks_cursor() {
        let g = Gravity::default();
        let pin = Position::ZERO;
        let cursor = Position::new(150.0, 0.0);
        assert_eq!(g.resist(pin, pin, cursor), cursor);
    }

    #[test]
    fn factor_endpoints() {
        let g = Gravity::default();
        assert_eq!(g.factor(0.0), 0.02);
        assert_eq!(g.factor(150.0 * 150.0), 1.0);
        // Squared-ratio interpolation: half the radius gives a quarter ratio.
        let half = 75.0 * 75.0;
        assert!((g.factor(half) - (0.02 + 0.98 * 0.25)).abs() < 1e-12);
    }

    #[test]
    fn inside_radius_moves_partially() {
        let g = Gravity::default();
        let pin = Position::new(100.0, 100.0);
        let cursor = Position::new(130.0, 100.0);
        let resisted = g.resist(pin, pin, cursor);
        assert!(resisted.x > pin.x && resisted.x < cursor.x, "{resisted:?}");
        assert_eq!(resisted.y, 100.0);
        let expected = 100.0 + 30.0 * (0.02 + 0.98 * (900.0 / 22500.0));
        assert!((resisted.x - expected).abs() < 1e-9);
    }

    #[test]
    fn nan_distance_tracks_cursor() {
        let g = Gravity::default();
        assert_eq!(g.factor(f64::NAN), 1.0);
    }
}
