//! Duration units given on the command line.

use crate::error::{Error, Result};
use std::time::Duration;

/// Unit a numeric duration argument is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Seconds,
    Minutes,
    Hours,
}

impl Unit {
    /// Pick the unit from the three CLI flags. Minutes win over hours, and
    /// seconds is the fallback when no flag is set.
    pub fn from_flags(_seconds: bool, minutes: bool, hours: bool) -> Self {
        if minutes {
            Unit::Minutes
        } else if hours {
            Unit::Hours
        } else {
            Unit::Seconds
        }
    }

    /// Seconds per unit.
    pub fn scale(self) -> f64 {
        match self {
            Unit::Seconds => 1.0,
            Unit::Minutes => 60.0,
            Unit::Hours => 3600.0,
        }
    }
}

/// Convert `value` in `unit` to seconds.
pub fn convert_duration(value: f64, unit: Unit) -> f64 {
    value * unit.scale()
}

/// Convert `value` in `unit` to a wait time.
///
/// Zero is allowed. Negative, NaN and infinite values are rejected.
pub fn to_wait(value: f64, unit: Unit) -> Result<Duration> {
    Duration::try_from_secs_f64(convert_duration(value, unit))
        .map_err(|_| Error::InvalidDuration { value })
}
