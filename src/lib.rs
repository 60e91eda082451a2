//! Broadside - tap the cannonball before it lands
//!
//! Core modules:
//! - `sim`: Deterministic simulation (shot cadence, ballistics, hit timing, session state)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration errors

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use tuning::{CountRange, Interval, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f64 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Smallest flight time the solver accepts (seconds)
    pub const MIN_FLIGHT_TIME: f64 = 1e-3;

    /// Longest burst the scheduler will queue
    pub const MAX_BURST_COUNT: u32 = 64;
}

/// Clamp a value into [0, 1], mapping NaN to 0
#[inline]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
