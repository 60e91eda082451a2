//! Immutable shot plans

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::ballistics;

/// What the cannon loaded (selects the projectile sprite)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShotKind {
    #[default]
    Cannonball,
    /// Hazard: tapping it costs a life, ignoring it is free
    Tnt,
}

impl ShotKind {
    pub fn from_hazard(is_hazard: bool) -> Self {
        if is_hazard { ShotKind::Tnt } else { ShotKind::Cannonball }
    }

    pub fn is_hazard(&self) -> bool {
        *self == ShotKind::Tnt
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShotKind::Cannonball => "cannonball",
            ShotKind::Tnt => "tnt",
        }
    }
}

/// One planned projectile/marker pair. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub start: DVec2,
    pub impact: DVec2,
    /// Seconds from launch to impact (always > 0)
    pub flight_duration: f64,
    pub gravity: DVec2,
    pub is_hazard: bool,
    /// Cadence time this shot was scheduled for
    pub scheduled_time: f64,
}

impl Shot {
    pub fn new(
        start: DVec2,
        impact: DVec2,
        flight_duration: f64,
        gravity: DVec2,
        is_hazard: bool,
        scheduled_time: f64,
    ) -> Self {
        Self {
            start,
            impact,
            flight_duration: ballistics::sanitize_flight_time(flight_duration),
            gravity,
            is_hazard,
            scheduled_time,
        }
    }

    pub fn kind(&self) -> ShotKind {
        ShotKind::from_hazard(self.is_hazard)
    }

    /// Launch velocity for this plan
    pub fn launch_velocity(&self) -> DVec2 {
        ballistics::solve_velocity(self.start, self.impact, self.flight_duration, self.gravity)
    }
}
