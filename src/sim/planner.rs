//! Impact point planning
//!
//! Picks where and when the next shot lands. Pure apart from the RNG it is
//! handed, so the sequence it produces is whatever the session seed makes it.

use glam::DVec2;
use rand::Rng;

use crate::consts::MIN_FLIGHT_TIME;
use crate::tuning::{Interval, Tuning};

/// Landing spot, flight time and payload for one shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactPlan {
    pub impact: DVec2,
    pub flight_duration: f64,
    pub is_hazard: bool,
}

/// Samples impact plans inside the playable band of the screen
#[derive(Debug, Clone)]
pub struct ImpactPointPlanner {
    x_range: Interval,
    y_range: Interval,
    flight_time_range: Interval,
    hazard_probability: f64,
}

impl ImpactPointPlanner {
    /// Build from validated tuning
    pub fn new(tuning: &Tuning) -> Self {
        let margin = tuning.impact_x_margin;
        let mut flight_time_range = tuning.flight_time_range;
        if flight_time_range.min <= 0.0 {
            log::warn!(
                "flight_time_range.min {} is not positive, clamping to {}",
                flight_time_range.min,
                MIN_FLIGHT_TIME
            );
            flight_time_range.min = MIN_FLIGHT_TIME;
            flight_time_range.max = flight_time_range.max.max(MIN_FLIGHT_TIME);
        }

        Self {
            x_range: Interval::new(margin, tuning.screen_size.x - margin),
            y_range: tuning.impact_y_range,
            flight_time_range,
            hazard_probability: tuning.hazard_probability.clamp(0.0, 1.0),
        }
    }

    /// Draw the next plan
    pub fn plan<R: Rng>(&self, rng: &mut R) -> ImpactPlan {
        let impact = DVec2::new(sample(rng, self.x_range), sample(rng, self.y_range));
        let flight_duration = sample(rng, self.flight_time_range);
        let is_hazard = rng.random_bool(self.hazard_probability);
        ImpactPlan {
            impact,
            flight_duration,
            is_hazard,
        }
    }

    pub fn x_range(&self) -> Interval {
        self.x_range
    }

    pub fn y_range(&self) -> Interval {
        self.y_range
    }

    pub fn flight_time_range(&self) -> Interval {
        self.flight_time_range
    }
}

/// Uniform draw from a closed interval (degenerate intervals return `min`)
pub(crate) fn sample<R: Rng>(rng: &mut R, range: Interval) -> f64 {
    if range.max > range.min {
        rng.random_range(range.min..=range.max)
    } else {
        range.min
    }
}
