//! Launch origin
//!
//! The cannon sits on a boat riding the swell, so the launch point moves.
//! The simulation only ever asks "where is the muzzle right now?", and gets
//! `None` when there is nothing to fire from.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Anything that can say where shots leave from
pub trait MuzzleProvider {
    fn muzzle_at(&self, time: f64) -> Option<DVec2>;
}

impl MuzzleProvider for DVec2 {
    fn muzzle_at(&self, _time: f64) -> Option<DVec2> {
        Some(*self)
    }
}

impl MuzzleProvider for Option<DVec2> {
    fn muzzle_at(&self, _time: f64) -> Option<DVec2> {
        *self
    }
}

/// Muzzle on a bobbing, drifting boat
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoatMuzzle {
    /// Muzzle position with the boat at rest
    pub anchor: DVec2,
    /// Vertical bob amplitude (px)
    pub bob_amplitude: f64,
    /// Bob cycles per second
    pub bob_speed: f64,
    /// Horizontal drift speed (px/s)
    pub drift_speed: f64,
    /// Width of the horizontal ping-pong (px)
    pub drift_range: f64,
}

impl Default for BoatMuzzle {
    fn default() -> Self {
        Self {
            anchor: DVec2::new(540.0, 220.0),
            bob_amplitude: 6.0,
            bob_speed: 0.6,
            drift_speed: 4.0,
            drift_range: 20.0,
        }
    }
}

impl BoatMuzzle {
    pub fn at_anchor(anchor: DVec2) -> Self {
        Self {
            anchor,
            ..Default::default()
        }
    }

    fn drift(&self, time: f64) -> f64 {
        if self.drift_range <= 0.0 {
            return 0.0;
        }
        ping_pong(time * self.drift_speed, self.drift_range) - self.drift_range * 0.5
    }

    fn bob(&self, time: f64) -> f64 {
        (time * std::f64::consts::TAU * self.bob_speed).sin() * self.bob_amplitude
    }
}

impl MuzzleProvider for BoatMuzzle {
    fn muzzle_at(&self, time: f64) -> Option<DVec2> {
        Some(self.anchor + DVec2::new(self.drift(time), self.bob(time)))
    }
}

/// Triangle wave bouncing between 0 and `length`
fn ping_pong(t: f64, length: f64) -> f64 {
    let period = length * 2.0;
    let t = t.rem_euclid(period);
    length - (t - length).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_and_missing() {
        let fixed = DVec2::new(1.0, 2.0);
        assert_eq!(fixed.muzzle_at(5.0), Some(fixed));
        assert_eq!(None::<DVec2>.muzzle_at(5.0), None);
    }

    #[test]
    fn test_ping_pong() {
        assert_eq!(ping_pong(0.0, 10.0), 0.0);
        assert_eq!(ping_pong(4.0, 10.0), 4.0);
        assert_eq!(ping_pong(14.0, 10.0), 6.0);
        assert_eq!(ping_pong(20.0, 10.0), 0.0);
    }

    #[test]
    fn test_boat_stays_near_anchor() {
        let boat = BoatMuzzle::default();
        for i in 0..600 {
            let p = boat.muzzle_at(i as f64 * 0.1).unwrap();
            let d = p - boat.anchor;
            assert!(d.x.abs() <= boat.drift_range * 0.5 + 1e-9);
            assert!(d.y.abs() <= boat.bob_amplitude + 1e-9);
        }
    }

    #[test]
    fn test_calm_boat_is_fixed() {
        let boat = BoatMuzzle {
            bob_amplitude: 0.0,
            drift_range: 0.0,
            ..BoatMuzzle::at_anchor(DVec2::new(100.0, 50.0))
        };
        assert_eq!(boat.muzzle_at(3.7), Some(DVec2::new(100.0, 50.0)));
    }
}
