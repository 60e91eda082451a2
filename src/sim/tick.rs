//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically. Within one
//! tick taps are always handled before markers are checked for expiry, so a
//! tap and an expiry landing on the same frame can never both count.

use glam::DVec2;

use super::events::GameEvent;
use super::state::{GamePhase, GameState};

/// A tap already hit-tested onto a marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub marker_id: u32,
    /// Simulation time of the tap (seconds)
    pub timestamp: f64,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Taps since the last tick, in arrival order
    pub taps: Vec<Tap>,
    /// Current launch origin (None = nothing to fire from)
    pub muzzle: Option<DVec2>,
    /// Pause toggle
    pub pause: bool,
    /// Fire one shot right now (debug/testing)
    pub fire_now: bool,
    /// Demo mode - the simulation taps markers itself
    pub autoplay: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f64) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at t={:.2}", state.time);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed at t={:.2}", state.time);
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    let dt = dt.max(0.0);
    state.time_ticks += 1;
    state.time += dt;
    let now = state.time;

    // --- TAPS (before expiry) ---
    for tap in &input.taps {
        state.tap_marker(tap.marker_id, tap.timestamp);
        if state.is_over() {
            return;
        }
    }
    if input.autoplay {
        for tap in autoplay_taps(state, now) {
            state.tap_marker(tap.marker_id, tap.timestamp);
            if state.is_over() {
                return;
            }
        }
    }

    // --- PROJECTILES ---
    advance_projectiles(state, dt);

    // --- MARKERS ---
    for idx in 0..state.markers.len() {
        state.expire_marker(idx, now);
        if state.is_over() {
            return;
        }
    }
    state.markers.retain(|m| !m.is_consumed());
    for marker in &state.markers {
        state.events.push(GameEvent::MarkerFrame {
            id: marker.id,
            position: marker.position(),
            progress: marker.progress(now),
            is_hazard: marker.is_hazard(),
        });
    }

    // --- CADENCE ---
    if let Some(scheduled) = state.scheduler.tick(now, &mut state.rng) {
        state.fire_one(input.muzzle, scheduled);
    }
    // Manual fire stops with the cannon
    if input.fire_now && !state.scheduler.is_cancelled() {
        state.fire_one(input.muzzle, now);
    }

    state.normalize_order();
}

/// Move every projectile along its arc; land the ones whose time is up
fn advance_projectiles(state: &mut GameState, dt: f64) {
    let mut landed: Vec<u32> = Vec::new();

    for projectile in &mut state.projectiles {
        let step = projectile.tick(dt);
        state.events.push(GameEvent::ProjectileFrame {
            id: projectile.id,
            kind: projectile.kind(),
            position: step.position,
            heading: step.heading,
        });
        if step.impacted {
            state.events.push(GameEvent::ProjectileImpact {
                id: projectile.id,
                position: step.position,
            });
            if let Some(marker_id) = projectile.marker_id {
                landed.push(marker_id);
            }
        }
    }

    // Impact flash on the bound marker, if it is still around
    for marker_id in landed {
        if let Some(marker) = state.markers.iter_mut().find(|m| m.id == marker_id) {
            if marker.ping() {
                state.events.push(GameEvent::MarkerPinged { id: marker_id });
            }
        }
    }

    state.projectiles.retain(|p| !p.is_done());
}

/// Demo player: taps each cannonball just before it lands, never touches TNT
fn autoplay_taps(state: &GameState, now: f64) -> Vec<Tap> {
    let lead = state.resolver.perfect_window * 0.5;
    state
        .markers
        .iter()
        .filter(|m| m.is_armed() && !m.is_hazard() && m.time_to_impact(now) <= lead)
        .map(|m| Tap {
            marker_id: m.id,
            timestamp: now,
        })
        .collect()
}
