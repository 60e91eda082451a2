//! Game state and session bookkeeping
//!
//! One `GameState` owns everything that changes during a session: the clock,
//! the RNG, the cadence scheduler, every live projectile and marker, score,
//! lives and the event buffer. Nothing is global.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::events::{GameEvent, Star};
use super::marker::{ImpactMarker, Trigger};
use super::planner::ImpactPointPlanner;
use super::projectile::Projectile;
use super::resolve::{HitResolver, Resolution};
use super::scheduler::ShotScheduler;
use super::shot::Shot;
use crate::clamp01;
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Shots are flying
    Playing,
    /// Clock frozen
    Paused,
    /// Out of lives
    GameOver,
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation clock (seconds); only advances while playing
    pub time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Bronze, silver, gold
    pub stars: [bool; 3],
    pub scheduler: ShotScheduler,
    pub planner: ImpactPointPlanner,
    pub resolver: HitResolver,
    /// In-flight projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Live markers (sorted by id)
    pub markers: Vec<ImpactMarker>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    pub shots_fired: u32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let scheduler = ShotScheduler::new(&tuning, 0.0, &mut rng);
        let planner = ImpactPointPlanner::new(&tuning);
        let resolver = HitResolver::new(&tuning);

        log::info!(
            "Session started (seed {}, {} lives, first decision at t={:.2})",
            seed,
            tuning.max_lives,
            scheduler.next_single_shot_time()
        );

        Ok(Self {
            seed,
            rng,
            lives: tuning.max_lives,
            tuning,
            time: 0.0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            score: 0,
            stars: [false; 3],
            scheduler,
            planner,
            resolver,
            projectiles: Vec::new(),
            markers: Vec::new(),
            events: Vec::new(),
            shots_fired: 0,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn marker(&self, id: u32) -> Option<&ImpactMarker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn projectile(&self, id: u32) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    /// Fraction of the gold score reached, in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.tuning.gold_score == 0 {
            return 0.0;
        }
        clamp01(self.score as f64 / self.tuning.gold_score as f64)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Spawn one projectile/marker pair from `muzzle`.
    ///
    /// Returns the marker id, or `None` if there was no muzzle to fire from.
    pub fn fire_one(&mut self, muzzle: Option<DVec2>, scheduled_time: f64) -> Option<u32> {
        let Some(start) = muzzle else {
            log::debug!("No muzzle, shot scheduled at t={:.3} skipped", scheduled_time);
            self.events.push(GameEvent::ShotSkipped { scheduled_time });
            return None;
        };

        let plan = self.planner.plan(&mut self.rng);
        let shot = Shot::new(
            start,
            plan.impact,
            plan.flight_duration,
            self.tuning.gravity,
            plan.is_hazard,
            scheduled_time,
        );

        let projectile_id = self.next_entity_id();
        let marker_id = self.next_entity_id();
        let mut projectile = Projectile::new(projectile_id, shot, self.time);
        projectile.bind_marker(marker_id);
        let marker = ImpactMarker::new(marker_id, shot, self.time);

        log::debug!(
            "Fired {} #{} at t={:.3}: impact ({:.0}, {:.0}) in {:.2}s",
            shot.kind().as_str(),
            projectile_id,
            self.time,
            shot.impact.x,
            shot.impact.y,
            shot.flight_duration
        );

        self.events.push(GameEvent::ShotFired {
            projectile_id,
            marker_id,
            kind: shot.kind(),
            impact: shot.impact,
            flight_duration: shot.flight_duration,
        });
        self.projectiles.push(projectile);
        self.markers.push(marker);
        self.shots_fired += 1;
        Some(marker_id)
    }

    /// Deliver a tap to a marker. Returns the resolution if this tap was the
    /// one that resolved it.
    pub fn tap_marker(&mut self, marker_id: u32, timestamp: f64) -> Option<Resolution> {
        if self.is_over() {
            return None;
        }
        let idx = self.markers.iter().position(|m| m.id == marker_id)?;
        let trigger = self.markers[idx].tap(timestamp)?;
        Some(self.apply_trigger(idx, trigger))
    }

    /// Expire the marker at `idx` if its time is up
    pub(crate) fn expire_marker(&mut self, idx: usize, now: f64) -> Option<Resolution> {
        let trigger = self.markers[idx].check_expiry(now)?;
        Some(self.apply_trigger(idx, trigger))
    }

    fn apply_trigger(&mut self, idx: usize, trigger: Trigger) -> Resolution {
        let resolution = self.resolver.resolve_trigger(&trigger);
        let marker = &self.markers[idx];
        let (marker_id, position) = (marker.id, marker.position());

        log::debug!(
            "Marker #{} resolved {} (offset {:+.3}s)",
            marker_id,
            resolution.outcome.tag(),
            trigger.offset
        );

        self.events.push(GameEvent::Outcome {
            marker_id,
            outcome: resolution.outcome,
            position,
            points: resolution.score_delta,
        });
        // Consume before applying deltas: losing the last life prunes markers
        self.markers[idx].consume();

        if resolution.score_delta != 0 {
            self.apply_score_delta(resolution.score_delta);
        }
        if resolution.life_delta != 0 {
            self.apply_life_delta(resolution.life_delta);
        }
        resolution
    }

    /// Add points (never takes score below what it was)
    pub fn apply_score_delta(&mut self, amount: i32) {
        self.events.push(GameEvent::ScoreDelta { amount });
        self.score += amount.max(0) as u64;
        self.unlock_stars();
    }

    /// Remove lives; ends the session at zero
    pub fn apply_life_delta(&mut self, amount: i32) {
        let loss = amount.min(0).unsigned_abs().min(u8::MAX as u32) as u8;
        if loss == 0 || self.is_over() {
            return;
        }
        self.events.push(GameEvent::LifeDelta { amount });
        self.lives = self.lives.saturating_sub(loss);
        if self.lives == 0 {
            self.end_session();
        }
    }

    fn unlock_stars(&mut self) {
        let progress = self.progress();
        for (i, star) in Star::ALL.into_iter().enumerate() {
            if !self.stars[i] && progress >= self.tuning.star_thresholds[i] {
                self.stars[i] = true;
                log::info!("{:?} star unlocked at score {}", star, self.score);
                self.events.push(GameEvent::StarUnlocked { star });
            }
        }
    }

    /// Hard stop: cancel pending bursts and drop armed markers unresolved
    pub fn shutdown(&mut self) {
        self.scheduler.cancel();
        for marker in &mut self.markers {
            marker.cancel();
        }
    }

    fn end_session(&mut self) {
        if self.is_over() {
            return;
        }
        log::info!(
            "Game over at t={:.2}: score {} ({:.0}% of gold), {} shots",
            self.time,
            self.score,
            self.progress() * 100.0,
            self.shots_fired
        );
        self.phase = GamePhase::GameOver;
        self.shutdown();
        self.projectiles.clear();
        self.markers.retain(|m| !m.is_consumed());
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
        self.markers.sort_by_key(|m| m.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::resolve::Outcome;

    fn quiet_tuning() -> Tuning {
        // Cadence far in the future so only manual shots fly
        Tuning {
            mean_interval: 1000.0,
            interval_jitter: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(12345, Tuning::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert!(state.markers.is_empty());
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            burst_chance: -0.5,
            ..Default::default()
        };
        assert!(GameState::new(1, tuning).is_err());
    }

    #[test]
    fn test_fire_one_spawns_bound_pair() {
        let mut state = GameState::new(7, quiet_tuning()).unwrap();
        let marker_id = state.fire_one(Some(DVec2::new(540.0, 220.0)), 0.0).unwrap();

        assert_eq!(state.projectiles.len(), 1);
        let proj = &state.projectiles[0];
        let marker = state.marker(marker_id).unwrap();
        assert_eq!(proj.marker_id, Some(marker_id));
        assert_eq!(proj.shot.impact, marker.shot.impact);
        assert_eq!(proj.shot.flight_duration, marker.shot.flight_duration);
        assert_eq!(proj.shot.is_hazard, marker.shot.is_hazard);
        assert!(matches!(state.events[0], GameEvent::ShotFired { .. }));
    }

    #[test]
    fn test_fire_without_muzzle_is_skipped() {
        let mut state = GameState::new(7, quiet_tuning()).unwrap();
        assert!(state.fire_one(None, 1.5).is_none());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.events, vec![GameEvent::ShotSkipped { scheduled_time: 1.5 }]);
    }

    #[test]
    fn test_tap_resolves_once() {
        let tuning = Tuning {
            hazard_probability: 0.0,
            ..quiet_tuning()
        };
        let mut state = GameState::new(3, tuning).unwrap();
        let id = state.fire_one(Some(DVec2::ZERO), 0.0).unwrap();
        let flight = state.marker(id).unwrap().shot.flight_duration;

        let first = state.tap_marker(id, flight + 0.05).unwrap();
        assert_eq!(first.outcome, Outcome::Perfect);
        assert!(state.tap_marker(id, flight).is_none());
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_score_never_decreases() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        state.apply_score_delta(50);
        state.apply_score_delta(-200);
        assert_eq!(state.score, 50);
    }

    #[test]
    fn test_stars_unlock_once_in_order() {
        let tuning = Tuning {
            gold_score: 300,
            ..Default::default()
        };
        let mut state = GameState::new(1, tuning).unwrap();
        for _ in 0..5 {
            state.apply_score_delta(100);
        }
        let stars: Vec<Star> = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::StarUnlocked { star } => Some(*star),
                _ => None,
            })
            .collect();
        assert_eq!(stars, vec![Star::Bronze, Star::Silver, Star::Gold]);
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn test_last_life_ends_session() {
        let mut state = GameState::new(1, quiet_tuning()).unwrap();
        let id = state.fire_one(Some(DVec2::ZERO), 0.0).unwrap();

        state.apply_life_delta(-1);
        state.apply_life_delta(-1);
        assert_eq!(state.phase, GamePhase::Playing);
        state.apply_life_delta(-1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);

        // Armed marker was dropped without resolving
        assert!(state.marker(id).is_none());
        assert!(state.projectiles.is_empty());
        assert!(state.scheduler.is_cancelled());
        let outcomes = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Outcome { .. }))
            .count();
        assert_eq!(outcomes, 0);
        assert_eq!(
            state.events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count(),
            1
        );

        state.apply_life_delta(-1);
        assert_eq!(
            state.events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count(),
            1
        );
    }

    #[test]
    fn test_shutdown_cancels_without_resolving() {
        let mut state = GameState::new(2, quiet_tuning()).unwrap();
        let id = state.fire_one(Some(DVec2::ZERO), 0.0).unwrap();
        state.events.clear();

        state.shutdown();
        assert!(state.marker(id).unwrap().is_consumed());
        assert!(state.tap_marker(id, 1.0).is_none());
        assert!(state.events.is_empty());
    }
}
