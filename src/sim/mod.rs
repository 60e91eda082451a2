//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ballistics;
pub mod events;
pub mod marker;
pub mod muzzle;
pub mod planner;
pub mod projectile;
pub mod resolve;
pub mod scheduler;
pub mod shot;
pub mod state;
pub mod tick;

pub use ballistics::{heading, position_at, solve_velocity, velocity_at};
pub use events::{GameEvent, GameSink, Star, dispatch};
pub use marker::{ImpactMarker, MarkerState, Trigger};
pub use muzzle::{BoatMuzzle, MuzzleProvider};
pub use planner::{ImpactPlan, ImpactPointPlanner};
pub use projectile::{Projectile, ProjectileStep};
pub use resolve::{HitResolver, Outcome, Resolution};
pub use scheduler::{BurstPlan, CadenceState, ShotScheduler};
pub use shot::{Shot, ShotKind};
pub use state::{GamePhase, GameState};
pub use tick::{Tap, TickInput, tick};
