//! Shot cadence
//!
//! Decides *when* the cannon fires. Every cadence decision is either a single
//! shot or a burst; a burst is planned up front as a queue of fire-times and
//! drained completely before the next decision is considered.

use std::collections::VecDeque;

use rand::Rng;

use super::planner::sample;
use crate::consts::MAX_BURST_COUNT;
use crate::tuning::{CountRange, Interval, Tuning};

/// Cadence state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CadenceState {
    /// Waiting for the next cadence decision
    Idle,
    /// Draining a burst plan
    BurstActive,
}

/// Strictly increasing queue of fire-times for one burst
#[derive(Debug, Clone, Default)]
pub struct BurstPlan {
    times: VecDeque<f64>,
}

impl BurstPlan {
    /// Plan a burst starting from `now`.
    ///
    /// `gaps.min` must be positive for the times to be strictly increasing;
    /// the scheduler only calls this with validated ranges. The shot count is
    /// capped at `MAX_BURST_COUNT`.
    pub fn generate<R: Rng>(rng: &mut R, now: f64, count: CountRange, gaps: Interval) -> Self {
        let n = if count.max > count.min {
            rng.random_range(count.min..=count.max)
        } else {
            count.min
        }
        .min(MAX_BURST_COUNT);

        let mut t = now;
        let times = (0..n)
            .map(|_| {
                t += sample(rng, gaps);
                t
            })
            .collect();
        Self { times }
    }

    pub fn head(&self) -> Option<f64> {
        self.times.front().copied()
    }

    /// Pop the head if it is due
    pub fn pop_due(&mut self, now: f64) -> Option<f64> {
        match self.head() {
            Some(t) if now >= t => self.times.pop_front(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn clear(&mut self) {
        self.times.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.times.iter().copied()
    }
}

/// Decides when shots fire
#[derive(Debug, Clone)]
pub struct ShotScheduler {
    mean_interval: f64,
    interval_jitter: f64,
    min_interval: f64,
    burst_chance: f64,
    burst_count_range: CountRange,
    burst_gap_range: Interval,
    /// False when the burst ranges were rejected at startup
    bursts_enabled: bool,
    next_single_shot_time: f64,
    burst: BurstPlan,
    cancelled: bool,
}

impl ShotScheduler {
    /// Build from validated tuning. The first decision is one interval after `now`.
    pub fn new<R: Rng>(tuning: &Tuning, now: f64, rng: &mut R) -> Self {
        let bursts_enabled = match tuning.burst_issue() {
            Some(err) => {
                log::warn!("Bursts disabled, falling back to single shots: {}", err);
                false
            }
            None => true,
        };

        let mut scheduler = Self {
            mean_interval: tuning.mean_interval,
            interval_jitter: tuning.interval_jitter.abs(),
            min_interval: tuning.min_interval,
            burst_chance: tuning.burst_chance.clamp(0.0, 1.0),
            burst_count_range: tuning.burst_count_range,
            burst_gap_range: tuning.burst_gap_range,
            bursts_enabled,
            next_single_shot_time: now,
            burst: BurstPlan::default(),
            cancelled: false,
        };
        scheduler.schedule_next(now, rng);
        scheduler
    }

    pub fn state(&self) -> CadenceState {
        if self.burst.is_empty() {
            CadenceState::Idle
        } else {
            CadenceState::BurstActive
        }
    }

    pub fn next_single_shot_time(&self) -> f64 {
        self.next_single_shot_time
    }

    pub fn pending_burst(&self) -> &BurstPlan {
        &self.burst
    }

    pub fn bursts_enabled(&self) -> bool {
        self.bursts_enabled
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Advance to `now`. Returns the scheduled fire-time of the shot that
    /// should be fired this tick, if any. At most one shot per tick.
    pub fn tick<R: Rng>(&mut self, now: f64, rng: &mut R) -> Option<f64> {
        if self.cancelled {
            return None;
        }

        if !self.burst.is_empty() {
            return self.burst.pop_due(now);
        }

        if now < self.next_single_shot_time {
            return None;
        }

        let decided_at = self.next_single_shot_time;
        let fired = if self.bursts_enabled && rng.random_bool(self.burst_chance) {
            self.burst =
                BurstPlan::generate(rng, now, self.burst_count_range, self.burst_gap_range);
            log::debug!(
                "Burst of {} planned at t={:.3} (last at t={:.3})",
                self.burst.len(),
                now,
                self.burst.iter().last().unwrap_or(now)
            );
            None
        } else {
            Some(decided_at)
        };

        self.schedule_next(now, rng);
        fired
    }

    /// Tear down: drop any pending burst and stop deciding
    pub fn cancel(&mut self) {
        if !self.burst.is_empty() {
            log::debug!("Cancelled {} pending burst shots", self.burst.len());
        }
        self.burst.clear();
        self.cancelled = true;
    }

    fn schedule_next<R: Rng>(&mut self, now: f64, rng: &mut R) {
        let jitter = if self.interval_jitter > 0.0 {
            rng.random_range(-self.interval_jitter..=self.interval_jitter)
        } else {
            0.0
        };
        self.next_single_shot_time = now + self.min_interval.max(self.mean_interval + jitter);
    }
}
