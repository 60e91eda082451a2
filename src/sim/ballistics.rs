//! Closed-form ballistics under constant gravity
//!
//! A shot is a parabola `p(t) = s + v·t + ½·g·t²`. Given where it starts,
//! where it must land and how long it may fly, the launch velocity falls out
//! of that equation directly, so there is nothing to integrate.

use glam::DVec2;

use crate::consts::MIN_FLIGHT_TIME;

/// Clamp a flight time to something the solver can divide by
#[inline]
pub fn sanitize_flight_time(t: f64) -> f64 {
    // NaN fails the comparison too
    if t > MIN_FLIGHT_TIME { t } else { MIN_FLIGHT_TIME }
}

/// Launch velocity that carries `start` to `impact` in exactly `flight_time`
///
/// `v = (impact − start − ½·g·t²) / t`
pub fn solve_velocity(start: DVec2, impact: DVec2, flight_time: f64, gravity: DVec2) -> DVec2 {
    let t = sanitize_flight_time(flight_time);
    (impact - start - 0.5 * gravity * (t * t)) / t
}

/// Position along the parabola after `t` seconds
#[inline]
pub fn position_at(start: DVec2, velocity: DVec2, gravity: DVec2, t: f64) -> DVec2 {
    start + velocity * t + 0.5 * gravity * (t * t)
}

/// Instantaneous velocity after `t` seconds
#[inline]
pub fn velocity_at(velocity: DVec2, gravity: DVec2, t: f64) -> DVec2 {
    velocity + gravity * t
}

/// Direction of travel in radians (cosmetic: sprite rotation)
#[inline]
pub fn heading(velocity: DVec2) -> f64 {
    velocity.y.atan2(velocity.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_shot() {
        let start = DVec2::ZERO;
        let impact = DVec2::new(300.0, 0.0);
        let g = DVec2::new(0.0, -1600.0);

        let v = solve_velocity(start, impact, 1.2, g);
        assert!((v.x - 250.0).abs() < 1e-9);
        assert!((v.y - 960.0).abs() < 1e-9);

        let p = position_at(start, v, g, 1.2);
        assert!((p - impact).length() < 1e-9);
    }

    #[test]
    fn test_apex_heading() {
        let v = DVec2::new(250.0, 960.0);
        let g = DVec2::new(0.0, -1600.0);
        // Vertical velocity vanishes at t = 960 / 1600
        let at_apex = velocity_at(v, g, 0.6);
        assert!(at_apex.y.abs() < 1e-9);
        assert!(heading(at_apex).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_flight_time_is_clamped() {
        let start = DVec2::new(10.0, 10.0);
        let impact = DVec2::new(20.0, 10.0);
        let g = DVec2::new(0.0, -1600.0);

        for t in [0.0, -1.0, f64::NAN] {
            let v = solve_velocity(start, impact, t, g);
            assert!(v.is_finite(), "t = {} gave {:?}", t, v);
            let p = position_at(start, v, g, MIN_FLIGHT_TIME);
            assert!((p - impact).length() < 1e-6);
        }
    }

    #[test]
    fn test_zero_gravity_is_straight_line() {
        let v = solve_velocity(DVec2::ZERO, DVec2::new(100.0, 50.0), 2.0, DVec2::ZERO);
        assert_eq!(v, DVec2::new(50.0, 25.0));
    }

    proptest! {
        #[test]
        fn prop_round_trip_hits_impact(
            sx in 0.0f64..1080.0, sy in 0.0f64..1920.0,
            ix in 0.0f64..1080.0, iy in 0.0f64..1920.0,
            t in 0.01f64..=10.0,
            gx in -500.0f64..500.0, gy in -3000.0f64..0.0,
        ) {
            let start = DVec2::new(sx, sy);
            let impact = DVec2::new(ix, iy);
            let g = DVec2::new(gx, gy);
            let v = solve_velocity(start, impact, t, g);
            let p = position_at(start, v, g, t);
            prop_assert!((p - impact).length() < 1e-4, "landed at {:?}, wanted {:?}", p, impact);
        }
    }
}
