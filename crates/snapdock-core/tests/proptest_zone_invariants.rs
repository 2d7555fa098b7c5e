//! Property-based invariant tests for zones, resistance, and snapping.
//!
//! 1. Every zone pin keeps the handle inside any viewport it fits in.
//! 2. Classification is deterministic and agrees with the thirds grid off
//!    the middle cell.
//! 3. Resistance never overshoots the cursor, pulls strictly between pin
//!    and cursor inside the radius, and vanishes beyond it.
//! 4. Snap duration is bounded and monotone in distance.
//! 5. A rate limiter never lets two values through inside one interval.
//! 6. Any drag path ends with the handle exactly on its zone's pin.

use std::time::Duration;

use proptest::prelude::*;
use snapdock_core::animation::SnapTiming;
use snapdock_core::config::EngineConfig;
use snapdock_core::engine::DragEngine;
use snapdock_core::geometry::{Position, Rect, Viewport};
use snapdock_core::gravity::Gravity;
use snapdock_core::throttle::RateLimiter;
use snapdock_core::zone::{self, DropZone};

// ── Helpers ─────────────────────────────────────────────────────────────

const HANDLE: f64 = 40.0;

fn zone_strategy() -> impl Strategy<Value = DropZone> {
    prop::sample::select(DropZone::ALL.to_vec())
}

fn roomy_viewport() -> impl Strategy<Value = Viewport> {
    (120.0f64..4000.0, 120.0f64..4000.0).prop_map(|(w, h)| Viewport::new(w, h))
}

fn any_viewport() -> impl Strategy<Value = Viewport> {
    (0.0f64..4000.0, 0.0f64..4000.0).prop_map(|(w, h)| Viewport::new(w, h))
}

fn point_in(viewport: Viewport) -> impl Strategy<Value = Position> {
    (0.0..viewport.width.max(1.0), 0.0..viewport.height.max(1.0))
        .prop_map(|(x, y)| Position::new(x, y))
}

fn third(v: f64, extent: f64) -> u8 {
    if v < extent / 3.0 {
        0
    } else if v < extent * 2.0 / 3.0 {
        1
    } else {
        2
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Pins stay in bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pin_keeps_handle_inside(zone in zone_strategy(), viewport in roomy_viewport()) {
        let p = zone::pin(zone, viewport, HANDLE);
        prop_assert!(p.x >= 0.0 && p.x + HANDLE <= viewport.width, "{zone} -> {p:?} in {viewport:?}");
        prop_assert!(p.y >= 0.0 && p.y + HANDLE <= viewport.height, "{zone} -> {p:?} in {viewport:?}");
    }

    #[test]
    fn pin_never_negative(zone in zone_strategy(), viewport in any_viewport()) {
        let p = zone::pin(zone, viewport, HANDLE);
        prop_assert!(p.x >= 0.0 && p.y >= 0.0);
        prop_assert!(p.is_finite());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Classification
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn classify_is_deterministic(
        (viewport, point) in roomy_viewport().prop_flat_map(|v| (Just(v), point_in(v)))
    ) {
        prop_assert_eq!(zone::classify(point, viewport), zone::classify(point, viewport));
    }

    #[test]
    fn classify_matches_grid_off_center(
        (viewport, point) in roomy_viewport().prop_flat_map(|v| (Just(v), point_in(v)))
    ) {
        let col = third(point.x, viewport.width);
        let row = third(point.y, viewport.height);
        let zone = zone::classify(point, viewport);
        if (row, col) != (1, 1) {
            let expected = match (row, col) {
                (0, 0) => DropZone::TopLeft,
                (0, 1) => DropZone::TopCenter,
                (0, 2) => DropZone::TopRight,
                (1, 0) => DropZone::CenterLeft,
                (1, 2) => DropZone::CenterRight,
                (2, 0) => DropZone::BottomLeft,
                (2, 1) => DropZone::BottomCenter,
                _ => DropZone::BottomRight,
            };
            prop_assert_eq!(zone, expected);
        } else {
            prop_assert!(matches!(
                zone,
                DropZone::TopCenter | DropZone::BottomCenter | DropZone::CenterLeft | DropZone::CenterRight
            ));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Resistance
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resistance_never_overshoots(
        px in -500.0f64..500.0, py in -500.0f64..500.0,
        cx in -500.0f64..500.0, cy in -500.0f64..500.0,
        tx in -500.0f64..500.0, ty in -500.0f64..500.0,
    ) {
        let g = Gravity::default();
        let (pin, current, cursor) =
            (Position::new(px, py), Position::new(cx, cy), Position::new(tx, ty));
        let out = g.resist(pin, current, cursor);
        prop_assert!(out.distance(cursor) <= current.distance(cursor) + 1e-9);
    }

    #[test]
    fn inside_radius_lands_strictly_between(
        angle in 0.0f64..std::f64::consts::TAU,
        r in 1.0f64..149.0,
    ) {
        let g = Gravity::default();
        let pin = Position::new(500.0, 500.0);
        let cursor = Position::new(pin.x + r * angle.cos(), pin.y + r * angle.sin());
        let out = g.resist(pin, pin, cursor);
        let moved = pin.distance(out);
        prop_assert!(moved > 0.0, "handle did not move toward {cursor:?}");
        prop_assert!(moved < pin.distance(cursor), "{out:?} reached {cursor:?}");
    }

    #[test]
    fn no_resistance_beyond_radius(angle in 0.0f64..std::f64::consts::TAU, extra in 0.0f64..1000.0) {
        let g = Gravity::default();
        let pin = Position::new(500.0, 500.0);
        let r = g.radius + extra;
        let cursor = Position::new(pin.x + r * angle.cos(), pin.y + r * angle.sin());
        // Guard against rounding pulling the point just inside the radius.
        prop_assume!(pin.distance_sq(cursor) >= g.radius * g.radius);
        prop_assert_eq!(g.resist(pin, pin, cursor), cursor);
    }

    #[test]
    fn factor_is_within_unit_range(d in 0.0f64..1e6) {
        let f = Gravity::default().factor(d);
        prop_assert!((0.02..=1.0).contains(&f), "factor {f}");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Snap duration
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn snap_duration_bounded_and_monotone(a in 0.0f64..10_000.0, b in 0.0f64..10_000.0) {
        let timing = SnapTiming::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let d_lo = timing.duration_for(lo);
        let d_hi = timing.duration_for(hi);
        prop_assert!(d_lo >= timing.min && d_hi <= timing.max);
        prop_assert!(d_lo <= d_hi);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Rate limiting
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn limiter_spacing(gaps in prop::collection::vec(0u64..20, 1..60)) {
        let interval = Duration::from_millis(8);
        let mut limiter = RateLimiter::new(interval);
        let mut now = Duration::ZERO;
        let mut fired: Vec<Duration> = Vec::new();
        for (i, gap) in gaps.iter().enumerate() {
            now += Duration::from_millis(*gap);
            if limiter.poll(now).is_some() {
                fired.push(now);
            }
            if limiter.submit(now, i).is_some() {
                fired.push(now);
            }
        }
        for pair in fired.windows(2) {
            prop_assert!(pair[1] - pair[0] >= interval, "fired at {pair:?}");
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Drags always settle on a pin
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_drag_settles_on_pin(path in prop::collection::vec((0.0f64..1200.0, 0.0f64..800.0), 1..20)) {
        let viewport = Viewport::new(1200.0, 800.0);
        let mut engine = DragEngine::new(EngineConfig::default(), viewport);
        let start = engine.position();
        engine.attach_element(Rect::square(start, HANDLE));

        let ms = Duration::from_millis;
        let mut now = 0;
        engine.pointer_down(ms(now), start.x + 20.0, start.y + 20.0);
        for (x, y) in &path {
            now += 10;
            engine.pointer_move(ms(now), *x, *y);
        }
        now += 10;
        engine.pointer_up(ms(now));
        while engine.is_snapping() {
            now += 16;
            engine.tick(ms(now));
            prop_assert!(now < 10_000);
        }
        prop_assert_eq!(engine.position(), engine.zone_position(engine.current_zone()));
        prop_assert!(engine.listeners().attached().is_empty());
    }
}
