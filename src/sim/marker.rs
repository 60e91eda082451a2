//! Impact markers
//!
//! The ring drawn where a shot will land. It is the only place timing is
//! judged, and it judges exactly once: whichever of tap or expiry reaches an
//! `Armed` marker first wins, and everything after is ignored.
//!
//! ```text
//! Armed ──tap──▶ Clicked ──┐
//!   │                      ├──▶ Consumed
//!   └──expiry──▶ Expired ──┘
//! ```

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::shot::Shot;
use crate::clamp01;

/// Marker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerState {
    /// Waiting for a tap or for its impact time to pass
    Armed,
    /// Resolved by a tap
    Clicked,
    /// Resolved by expiry
    Expired,
    /// Done; removed from the active set
    Consumed,
}

/// A resolution the marker has committed to; handed to the hit resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trigger {
    /// Tap time minus impact time (negative = early). Zero on expiry.
    pub offset: f64,
    pub is_hazard: bool,
    pub via_click: bool,
}

#[derive(Debug, Clone)]
pub struct ImpactMarker {
    pub id: u32,
    pub shot: Shot,
    pub spawn_time: f64,
    pub state: MarkerState,
    /// Set when the bound projectile lands (cosmetic flash)
    pub pinged: bool,
}

impl ImpactMarker {
    pub fn new(id: u32, shot: Shot, spawn_time: f64) -> Self {
        Self {
            id,
            shot,
            spawn_time,
            state: MarkerState::Armed,
            pinged: false,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.shot.impact
    }

    pub fn is_hazard(&self) -> bool {
        self.shot.is_hazard
    }

    pub fn is_armed(&self) -> bool {
        self.state == MarkerState::Armed
    }

    pub fn is_consumed(&self) -> bool {
        self.state == MarkerState::Consumed
    }

    /// Seconds until nominal impact (negative once it has passed)
    pub fn time_to_impact(&self, now: f64) -> f64 {
        self.spawn_time + self.shot.flight_duration - now
    }

    /// Ring fill in [0, 1]; reaches 1 at the impact instant
    pub fn progress(&self, now: f64) -> f64 {
        clamp01((now - self.spawn_time) / self.shot.flight_duration)
    }

    /// Player tapped this marker at `timestamp`.
    ///
    /// Returns the trigger to resolve, or `None` if the marker already
    /// resolved.
    pub fn tap(&mut self, timestamp: f64) -> Option<Trigger> {
        if self.state != MarkerState::Armed {
            return None;
        }
        self.state = MarkerState::Clicked;
        let tap_elapsed = timestamp - self.spawn_time;
        Some(Trigger {
            offset: tap_elapsed - self.shot.flight_duration,
            is_hazard: self.shot.is_hazard,
            via_click: true,
        })
    }

    /// Expire the marker if its impact time has passed without a tap
    pub fn check_expiry(&mut self, now: f64) -> Option<Trigger> {
        if self.state != MarkerState::Armed {
            return None;
        }
        if now - self.spawn_time < self.shot.flight_duration {
            return None;
        }
        self.state = MarkerState::Expired;
        Some(Trigger {
            offset: 0.0,
            is_hazard: self.shot.is_hazard,
            via_click: false,
        })
    }

    /// Finish a resolution (call after the trigger has been applied)
    pub fn consume(&mut self) {
        if matches!(self.state, MarkerState::Clicked | MarkerState::Expired) {
            self.state = MarkerState::Consumed;
        }
    }

    /// Hard shutdown: drop an armed marker without resolving it
    pub fn cancel(&mut self) {
        if self.state == MarkerState::Armed {
            self.state = MarkerState::Consumed;
        }
    }

    /// Cosmetic ping from the bound projectile. Returns false if the
    /// marker is already gone.
    pub fn ping(&mut self) -> bool {
        if self.state == MarkerState::Consumed {
            return false;
        }
        self.pinged = true;
        true
    }
}
