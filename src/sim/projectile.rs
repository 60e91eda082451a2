//! In-flight projectiles
//!
//! A projectile is pure presentation: it follows its parabola, reports where
//! it is each tick, and says "impact" exactly once. Scoring never looks at it.

use glam::DVec2;

use super::ballistics::{heading, position_at, velocity_at};
use super::shot::{Shot, ShotKind};

/// Result of advancing a projectile by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileStep {
    pub position: DVec2,
    /// Radians, for sprite rotation
    pub heading: f64,
    /// True on the single tick the projectile reaches its impact point
    pub impacted: bool,
}

/// A launched cannonball or TNT barrel
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub shot: Shot,
    pub velocity: DVec2,
    pub spawn_time: f64,
    /// Seconds since launch, clamped to the flight duration
    pub elapsed: f64,
    /// Marker spawned alongside this projectile (cosmetic correlation only)
    pub marker_id: Option<u32>,
    impacted: bool,
}

impl Projectile {
    pub fn new(id: u32, shot: Shot, spawn_time: f64) -> Self {
        Self {
            id,
            shot,
            velocity: shot.launch_velocity(),
            spawn_time,
            elapsed: 0.0,
            marker_id: None,
            impacted: false,
        }
    }

    pub fn bind_marker(&mut self, marker_id: u32) {
        self.marker_id = Some(marker_id);
    }

    pub fn kind(&self) -> ShotKind {
        self.shot.kind()
    }

    pub fn position(&self) -> DVec2 {
        position_at(self.shot.start, self.velocity, self.shot.gravity, self.elapsed)
    }

    pub fn heading(&self) -> f64 {
        heading(velocity_at(self.velocity, self.shot.gravity, self.elapsed))
    }

    /// Whether the impact notification has already fired
    pub fn is_done(&self) -> bool {
        self.impacted
    }

    /// Advance the flight clock
    pub fn tick(&mut self, dt: f64) -> ProjectileStep {
        let flight = self.shot.flight_duration;
        self.elapsed = (self.elapsed + dt.max(0.0)).clamp(0.0, flight);

        let reached = self.elapsed >= flight;
        let impacted = reached && !self.impacted;
        if reached {
            self.impacted = true;
        }

        ProjectileStep {
            position: self.position(),
            heading: self.heading(),
            impacted,
        }
    }
}
