//! Events emitted by the simulation
//!
//! The tick loop never calls out. It appends to `GameState::events`, and the
//! frontend drains that buffer once per frame, either matching on
//! [`GameEvent`] directly or routing it through a [`GameSink`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::resolve::Outcome;
use super::shot::ShotKind;

/// Progress-bar stars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Star {
    Bronze,
    Silver,
    Gold,
}

impl Star {
    pub const ALL: [Star; 3] = [Star::Bronze, Star::Silver, Star::Gold];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A projectile/marker pair was spawned
    ShotFired {
        projectile_id: u32,
        marker_id: u32,
        kind: ShotKind,
        impact: DVec2,
        flight_duration: f64,
    },
    /// Cadence wanted a shot but there was no muzzle to fire from
    ShotSkipped { scheduled_time: f64 },
    ProjectileFrame {
        id: u32,
        kind: ShotKind,
        position: DVec2,
        /// Radians
        heading: f64,
    },
    /// Projectile reached its impact point (once per projectile)
    ProjectileImpact { id: u32, position: DVec2 },
    /// Bound marker flashed by its projectile's impact
    MarkerPinged { id: u32 },
    MarkerFrame {
        id: u32,
        position: DVec2,
        /// Ring fill in [0, 1]
        progress: f64,
        is_hazard: bool,
    },
    /// Marker resolved (floating popup / flash)
    Outcome {
        marker_id: u32,
        outcome: Outcome,
        position: DVec2,
        points: i32,
    },
    ScoreDelta { amount: i32 },
    /// Always <= 0
    LifeDelta { amount: i32 },
    StarUnlocked { star: Star },
    GameOver { score: u64 },
}

/// Receiver for drained events. Every hook defaults to a no-op.
pub trait GameSink {
    fn on_score_delta(&mut self, _amount: i32) {}
    fn on_life_delta(&mut self, _amount: i32) {}
    fn on_projectile_frame(&mut self, _id: u32, _kind: ShotKind, _position: DVec2, _heading: f64) {}
    fn on_marker_frame(&mut self, _id: u32, _position: DVec2, _progress: f64, _is_hazard: bool) {}
    fn on_outcome(&mut self, _outcome: Outcome, _position: DVec2, _points: i32) {}
    fn on_shot_fired(&mut self, _kind: ShotKind, _impact: DVec2, _flight_duration: f64) {}
    fn on_impact(&mut self, _id: u32, _position: DVec2) {}
    fn on_marker_ping(&mut self, _id: u32) {}
    fn on_star(&mut self, _star: Star) {}
    fn on_game_over(&mut self, _score: u64) {}
}

/// Route a batch of events to a sink, in order
pub fn dispatch<S: GameSink + ?Sized>(events: &[GameEvent], sink: &mut S) {
    for event in events {
        match *event {
            GameEvent::ShotFired {
                kind,
                impact,
                flight_duration,
                ..
            } => sink.on_shot_fired(kind, impact, flight_duration),
            GameEvent::ShotSkipped { .. } => {}
            GameEvent::ProjectileFrame {
                id,
                kind,
                position,
                heading,
            } => sink.on_projectile_frame(id, kind, position, heading),
            GameEvent::ProjectileImpact { id, position } => sink.on_impact(id, position),
            GameEvent::MarkerPinged { id } => sink.on_marker_ping(id),
            GameEvent::MarkerFrame {
                id,
                position,
                progress,
                is_hazard,
            } => sink.on_marker_frame(id, position, progress, is_hazard),
            GameEvent::Outcome {
                outcome,
                position,
                points,
                ..
            } => sink.on_outcome(outcome, position, points),
            GameEvent::ScoreDelta { amount } => sink.on_score_delta(amount),
            GameEvent::LifeDelta { amount } => sink.on_life_delta(amount),
            GameEvent::StarUnlocked { star } => sink.on_star(star),
            GameEvent::GameOver { score } => sink.on_game_over(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Tally {
        score: i32,
        lives: i32,
        outcomes: Vec<Outcome>,
        game_over: bool,
    }

    impl GameSink for Tally {
        fn on_score_delta(&mut self, amount: i32) {
            self.score += amount;
        }
        fn on_life_delta(&mut self, amount: i32) {
            self.lives += amount;
        }
        fn on_outcome(&mut self, outcome: Outcome, _position: DVec2, _points: i32) {
            self.outcomes.push(outcome);
        }
        fn on_game_over(&mut self, _score: u64) {
            self.game_over = true;
        }
    }

    #[test]
    fn test_dispatch_routes_in_order() {
        let events = vec![
            GameEvent::Outcome {
                marker_id: 1,
                outcome: Outcome::Perfect,
                position: DVec2::ZERO,
                points: 100,
            },
            GameEvent::ScoreDelta { amount: 100 },
            GameEvent::Outcome {
                marker_id: 2,
                outcome: Outcome::MissedExpired,
                position: DVec2::ZERO,
                points: 0,
            },
            GameEvent::LifeDelta { amount: -1 },
            GameEvent::MarkerPinged { id: 2 },
            GameEvent::GameOver { score: 100 },
        ];

        let mut tally = Tally::default();
        dispatch(&events, &mut tally);
        assert_eq!(tally.score, 100);
        assert_eq!(tally.lives, -1);
        assert_eq!(tally.outcomes, vec![Outcome::Perfect, Outcome::MissedExpired]);
        assert!(tally.game_over);
    }

    #[test]
    fn test_events_serialize() {
        let json = serde_json::to_string(&GameEvent::StarUnlocked { star: Star::Gold }).unwrap();
        assert_eq!(json, r#"{"StarUnlocked":{"star":"Gold"}}"#);
    }
}
