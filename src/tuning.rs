//! Game balance tuning
//!
//! Loaded from JSON (any subset of fields; the rest keep their defaults) and
//! validated once, before a session is built.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_BURST_COUNT;
use crate::error::ConfigError;

/// Closed real interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn is_inverted(&self) -> bool {
        self.max < self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Closed integer range `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Every knob the shot engine exposes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Cadence ===
    /// Mean time between cadence decisions (s)
    pub mean_interval: f64,
    /// Uniform jitter applied around `mean_interval` (s, magnitude)
    pub interval_jitter: f64,
    /// Floor for the time between cadence decisions (s)
    pub min_interval: f64,
    /// Chance a cadence decision becomes a burst
    pub burst_chance: f64,
    /// Number of shots in a burst
    pub burst_count_range: CountRange,
    /// Gap between consecutive burst shots (s)
    pub burst_gap_range: Interval,

    // === Ballistics ===
    /// Constant gravity (px/s², points down the screen)
    pub gravity: DVec2,
    /// Flight time of each shot (s)
    pub flight_time_range: Interval,

    // === Impact placement ===
    /// Vertical band impacts may land in (screen px)
    pub impact_y_range: Interval,
    /// Horizontal keep-out at both screen edges (px)
    pub impact_x_margin: f64,
    /// Screen size (px)
    pub screen_size: DVec2,

    // === Timing & scoring ===
    /// |offset| at or below this is a perfect tap (s)
    pub perfect_window: f64,
    /// |offset| at or below this earns half points (s)
    pub half_window: f64,
    /// Chance a shot is a hazard (TNT)
    pub hazard_probability: f64,
    pub points_perfect: i32,
    pub points_half: i32,

    // === Session ===
    /// Lives at the start of a session
    pub max_lives: u8,
    /// Score that fills the progress bar
    pub gold_score: u64,
    /// Progress fractions unlocking bronze, silver and gold stars
    pub star_thresholds: [f64; 3],
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            mean_interval: 1.6,
            interval_jitter: 0.9,
            min_interval: 0.15,
            burst_chance: 0.25,
            burst_count_range: CountRange::new(2, 4),
            burst_gap_range: Interval::new(0.25, 0.55),

            gravity: DVec2::new(0.0, -1600.0),
            flight_time_range: Interval::new(0.9, 1.6),

            impact_y_range: Interval::new(450.0, 1350.0),
            impact_x_margin: 90.0,
            screen_size: DVec2::new(1080.0, 1920.0),

            perfect_window: 0.08,
            half_window: 0.25,
            hazard_probability: 0.15,
            points_perfect: 100,
            points_half: 50,

            max_lives: 3,
            gold_score: 200,
            star_thresholds: [1.0 / 3.0, 2.0 / 3.0, 1.0],
        }
    }
}

impl Tuning {
    /// Parse tuning JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Pretty JSON, e.g. for writing a starter tuning file
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would make the engine unable to sample a shot.
    ///
    /// Burst ranges are not checked here; see [`Tuning::burst_issue`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("mean_interval", self.mean_interval),
            ("interval_jitter", self.interval_jitter),
            ("min_interval", self.min_interval),
            ("burst_chance", self.burst_chance),
            ("gravity.x", self.gravity.x),
            ("gravity.y", self.gravity.y),
            ("impact_x_margin", self.impact_x_margin),
            ("screen_size.x", self.screen_size.x),
            ("screen_size.y", self.screen_size.y),
            ("perfect_window", self.perfect_window),
            ("half_window", self.half_window),
            ("hazard_probability", self.hazard_probability),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        if !self.flight_time_range.is_finite() {
            return Err(ConfigError::NonFinite { field: "flight_time_range" });
        }
        if !self.impact_y_range.is_finite() {
            return Err(ConfigError::NonFinite { field: "impact_y_range" });
        }

        if self.min_interval <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "min_interval",
                value: self.min_interval,
            });
        }
        for (field, value) in [
            ("screen_size.x", self.screen_size.x),
            ("screen_size.y", self.screen_size.y),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.max_lives == 0 {
            return Err(ConfigError::NonPositive {
                field: "max_lives",
                value: 0.0,
            });
        }

        for (field, value) in [
            ("burst_chance", self.burst_chance),
            ("hazard_probability", self.hazard_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { field, value });
            }
        }

        for (field, range) in [
            ("flight_time_range", self.flight_time_range),
            ("impact_y_range", self.impact_y_range),
        ] {
            if range.is_inverted() {
                return Err(ConfigError::InvertedRange {
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        for (field, value) in [
            ("impact_x_margin", self.impact_x_margin),
            ("perfect_window", self.perfect_window),
            ("half_window", self.half_window),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.half_window < self.perfect_window {
            return Err(ConfigError::InvertedRange {
                field: "perfect_window..half_window",
                min: self.perfect_window,
                max: self.half_window,
            });
        }

        // Impacts must land on screen
        let y = self.impact_y_range;
        if y.min < 0.0 || y.max > self.screen_size.y {
            return Err(ConfigError::OffScreen {
                field: "impact_y_range",
                min: y.min,
                max: y.max,
                limit: self.screen_size.y,
            });
        }
        if self.screen_size.x - self.impact_x_margin < self.impact_x_margin {
            return Err(ConfigError::MarginTooWide {
                margin: self.impact_x_margin,
                width: self.screen_size.x,
            });
        }

        Ok(())
    }

    /// Problem with the burst parameters, if any.
    ///
    /// A burst issue is not fatal: the scheduler reports it once and fires
    /// single shots only.
    pub fn burst_issue(&self) -> Option<ConfigError> {
        let count = self.burst_count_range;
        if count.max < count.min {
            return Some(ConfigError::InvertedRange {
                field: "burst_count_range",
                min: count.min as f64,
                max: count.max as f64,
            });
        }
        if count.max > MAX_BURST_COUNT {
            return Some(ConfigError::TooLarge {
                field: "burst_count_range.max",
                value: count.max as f64,
                limit: MAX_BURST_COUNT as f64,
            });
        }
        if count.min == 0 {
            return Some(ConfigError::NonPositive {
                field: "burst_count_range.min",
                value: 0.0,
            });
        }

        let gap = self.burst_gap_range;
        if !gap.is_finite() {
            return Some(ConfigError::NonFinite { field: "burst_gap_range" });
        }
        if gap.is_inverted() {
            return Some(ConfigError::InvertedRange {
                field: "burst_gap_range",
                min: gap.min,
                max: gap.max,
            });
        }
        // Burst fire-times must be strictly increasing
        if gap.min <= 0.0 {
            return Some(ConfigError::NonPositive {
                field: "burst_gap_range.min",
                value: gap.min,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert!(tuning.burst_issue().is_none());
        assert_eq!(tuning.gold_score, 200);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "burst_chance": 0.5, "points_perfect": 250 }"#).unwrap();
        assert_eq!(tuning.burst_chance, 0.5);
        assert_eq!(tuning.points_perfect, 250);
        assert_eq!(tuning.points_half, 50);
        assert_eq!(tuning.burst_count_range, CountRange::new(2, 4));
    }

    #[test]
    fn test_json_vectors_and_ranges() {
        let tuning = Tuning::from_json(
            r#"{ "gravity": [0.0, -980.0], "flight_time_range": { "min": 1.0, "max": 2.0 } }"#,
        )
        .unwrap();
        assert_eq!(tuning.gravity, DVec2::new(0.0, -980.0));
        assert_eq!(tuning.flight_time_range, Interval::new(1.0, 2.0));
    }

    #[test]
    fn test_round_trip_through_json() {
        let json = Tuning::default().to_json().unwrap();
        let tuning = Tuning::from_json(&json).unwrap();
        assert_eq!(tuning.screen_size, DVec2::new(1080.0, 1920.0));
        assert_eq!(tuning.star_thresholds, Tuning::default().star_thresholds);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_probability_out_of_range() {
        let tuning = Tuning {
            hazard_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::ProbabilityOutOfRange {
                field: "hazard_probability",
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_flight_range_is_fatal() {
        let tuning = Tuning {
            flight_time_range: Interval::new(2.0, 1.0),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::InvertedRange {
                field: "flight_time_range",
                ..
            })
        ));
    }

    #[test]
    fn test_margin_too_wide() {
        let tuning = Tuning {
            impact_x_margin: 600.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::MarginTooWide { .. })));
    }

    #[test]
    fn test_non_finite_rejected() {
        let tuning = Tuning {
            gravity: DVec2::new(0.0, f64::NAN),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::NonFinite { field: "gravity.y" })
        ));
    }

    #[test]
    fn test_inverted_burst_ranges_are_soft() {
        let tuning = Tuning {
            burst_count_range: CountRange::new(5, 2),
            ..Default::default()
        };
        assert!(tuning.validate().is_ok());
        assert!(matches!(
            tuning.burst_issue(),
            Some(ConfigError::InvertedRange {
                field: "burst_count_range",
                ..
            })
        ));

        let tuning = Tuning {
            burst_gap_range: Interval::new(0.5, 0.1),
            ..Default::default()
        };
        assert!(matches!(
            tuning.burst_issue(),
            Some(ConfigError::InvertedRange {
                field: "burst_gap_range",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_margin_rejected() {
        let tuning = Tuning {
            impact_x_margin: -200.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::Negative {
                field: "impact_x_margin",
                ..
            })
        ));
    }

    #[test]
    fn test_impact_band_must_fit_screen() {
        for band in [Interval::new(-500.0, 1000.0), Interval::new(450.0, 4000.0)] {
            let tuning = Tuning {
                impact_y_range: band,
                ..Default::default()
            };
            assert!(matches!(
                tuning.validate(),
                Err(ConfigError::OffScreen {
                    field: "impact_y_range",
                    ..
                })
            ));
        }

        let edge = Tuning {
            impact_y_range: Interval::new(0.0, 1920.0),
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_timing_windows_checked() {
        let negative = Tuning {
            perfect_window: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::Negative {
                field: "perfect_window",
                ..
            })
        ));

        let swapped = Tuning {
            perfect_window: 0.3,
            half_window: 0.1,
            ..Default::default()
        };
        assert!(matches!(swapped.validate(), Err(ConfigError::InvertedRange { .. })));
    }

    #[test]
    fn test_huge_burst_is_burst_issue() {
        let tuning = Tuning {
            burst_count_range: CountRange::new(1, u32::MAX),
            ..Default::default()
        };
        assert!(tuning.validate().is_ok());
        assert!(matches!(
            tuning.burst_issue(),
            Some(ConfigError::TooLarge {
                field: "burst_count_range.max",
                ..
            })
        ));

        let at_cap = Tuning {
            burst_count_range: CountRange::new(1, MAX_BURST_COUNT),
            ..Default::default()
        };
        assert!(at_cap.burst_issue().is_none());
    }

    #[test]
    fn test_zero_gap_is_burst_issue() {
        let tuning = Tuning {
            burst_gap_range: Interval::new(0.0, 0.3),
            ..Default::default()
        };
        assert!(matches!(tuning.burst_issue(), Some(ConfigError::NonPositive { .. })));
    }
}
