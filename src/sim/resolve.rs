//! Hit resolution: timing offset in, score and life deltas out

use serde::{Deserialize, Serialize};

use super::marker::Trigger;
use crate::tuning::Tuning;

/// How a marker resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Tapped inside the perfect window
    Perfect,
    /// Tapped inside the half window
    Good,
    /// Tapped, but outside both windows (no reward, no penalty)
    TooEarlyOrLate,
    /// Never tapped
    MissedExpired,
    /// Tapped a TNT barrel
    HazardClicked,
    /// Left a TNT barrel alone
    HazardIgnored,
}

impl Outcome {
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Perfect => "perfect",
            Outcome::Good => "good",
            Outcome::TooEarlyOrLate => "tooEarlyOrLate",
            Outcome::MissedExpired => "missedExpired",
            Outcome::HazardClicked => "hazardClicked",
            Outcome::HazardIgnored => "hazardIgnored",
        }
    }

    /// Whether the player should see this as a mistake
    pub fn is_bad(&self) -> bool {
        matches!(self, Outcome::MissedExpired | Outcome::HazardClicked)
    }
}

/// Deltas produced by one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub score_delta: i32,
    /// Always <= 0
    pub life_delta: i32,
    pub outcome: Outcome,
}

impl Resolution {
    const fn new(score_delta: i32, life_delta: i32, outcome: Outcome) -> Self {
        Self {
            score_delta,
            life_delta,
            outcome,
        }
    }
}

/// Timing windows and point values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResolver {
    pub perfect_window: f64,
    pub half_window: f64,
    pub points_perfect: i32,
    pub points_half: i32,
}

impl HitResolver {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            perfect_window: tuning.perfect_window,
            half_window: tuning.half_window,
            points_perfect: tuning.points_perfect,
            points_half: tuning.points_half,
        }
    }

    pub fn resolve(&self, offset: f64, is_hazard: bool, via_click: bool) -> Resolution {
        match (is_hazard, via_click) {
            (true, true) => Resolution::new(0, -1, Outcome::HazardClicked),
            (true, false) => Resolution::new(0, 0, Outcome::HazardIgnored),
            (false, false) => Resolution::new(0, -1, Outcome::MissedExpired),
            (false, true) => {
                let dt = offset.abs();
                if dt <= self.perfect_window {
                    Resolution::new(self.points_perfect, 0, Outcome::Perfect)
                } else if dt <= self.half_window {
                    Resolution::new(self.points_half, 0, Outcome::Good)
                } else {
                    Resolution::new(0, 0, Outcome::TooEarlyOrLate)
                }
            }
        }
    }

    pub fn resolve_trigger(&self, trigger: &Trigger) -> Resolution {
        self.resolve(trigger.offset, trigger.is_hazard, trigger.via_click)
    }
}

impl Default for HitResolver {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}
