//! Configuration errors
//!
//! Everything that can go wrong in this crate goes wrong at construction time.
//! Once a `GameState` exists the tick loop never fails.

/// A rejected `Tuning` value
#[derive(Debug)]
pub enum ConfigError {
    /// Field is NaN or infinite
    NonFinite { field: &'static str },
    /// Field must be strictly positive
    NonPositive { field: &'static str, value: f64 },
    /// Field must be zero or more
    Negative { field: &'static str, value: f64 },
    /// Field exceeds its upper limit
    TooLarge { field: &'static str, value: f64, limit: f64 },
    /// Probability outside [0, 1]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    /// Range with `max < min`
    InvertedRange { field: &'static str, min: f64, max: f64 },
    /// Horizontal margin leaves no room for impacts
    MarginTooWide { margin: f64, width: f64 },
    /// Range reaches outside `[0, limit]` screen pixels
    OffScreen { field: &'static str, min: f64, max: f64, limit: f64 },
    /// Malformed tuning JSON
    Parse(serde_json::Error),
    /// Tuning file could not be read
    Io(std::io::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonFinite { field } => write!(f, "{} must be finite", field),
            ConfigError::NonPositive { field, value } => {
                write!(f, "{} must be positive (got {})", field, value)
            }
            ConfigError::Negative { field, value } => {
                write!(f, "{} must not be negative (got {})", field, value)
            }
            ConfigError::TooLarge { field, value, limit } => {
                write!(f, "{} must be at most {} (got {})", field, limit, value)
            }
            ConfigError::ProbabilityOutOfRange { field, value } => {
                write!(f, "{} must be within [0, 1] (got {})", field, value)
            }
            ConfigError::InvertedRange { field, min, max } => {
                write!(f, "{} has max < min ({} < {})", field, max, min)
            }
            ConfigError::MarginTooWide { margin, width } => {
                write!(f, "impact_x_margin {} leaves no room on a {} wide screen", margin, width)
            }
            ConfigError::OffScreen {
                field,
                min,
                max,
                limit,
            } => write!(f, "{} [{}, {}] is outside the screen [0, {}]", field, min, max, limit),
            ConfigError::Parse(err) => write!(f, "invalid tuning JSON: {}", err),
            ConfigError::Io(err) => write!(f, "could not read tuning file: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::Io(err) => Some(err),
            _ => None,
        }
    }
}
