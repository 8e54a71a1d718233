use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::bioavailability::Bioavailability;
use crate::error::PharmsimError;

/// Unit in which a half-life is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    #[default]
    Hours,
    Days,
}

impl TimeUnit {
    /// Convert a duration in this unit to hours.
    pub fn to_hours(self, value: f64) -> f64 {
        match self {
            TimeUnit::Seconds => value / 3600.0,
            TimeUnit::Minutes => value / 60.0,
            TimeUnit::Hours => value,
            TimeUnit::Days => value * 24.0,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = PharmsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seconds" | "second" | "s" => Ok(TimeUnit::Seconds),
            "minutes" | "minute" | "min" => Ok(TimeUnit::Minutes),
            "hours" | "hour" | "h" => Ok(TimeUnit::Hours),
            "days" | "day" | "d" => Ok(TimeUnit::Days),
            _ => Err(PharmsimError::UnknownUnit {
                field: "half_life_unit".to_string(),
                unit: s.to_string(),
            }),
        }
    }
}

/// Pharmacokinetic properties of a compound, as supplied by the caller.
///
/// Fields are optional where the resolver applies a default; the half-life is
/// kept in hours.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompoundParameters {
    /// Elimination half-life in hours
    pub half_life: Option<f64>,
    /// Volume of distribution in liters
    pub volume_of_distribution: Option<f64>,
    /// First-order absorption rate constant (1/h)
    pub ka: Option<f64>,
    /// Route-dependent bioavailability
    pub bioavailability: Bioavailability,
}

impl CompoundParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn half_life(mut self, hours: f64) -> Self {
        self.half_life = Some(hours);
        self
    }

    pub fn volume_of_distribution(mut self, liters: f64) -> Self {
        self.volume_of_distribution = Some(liters);
        self
    }

    pub fn ka(mut self, ka: f64) -> Self {
        self.ka = Some(ka);
        self
    }

    pub fn bioavailability(mut self, bioavailability: Bioavailability) -> Self {
        self.bioavailability = bioavailability;
        self
    }
}
