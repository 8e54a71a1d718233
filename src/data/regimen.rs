use serde::{Deserialize, Serialize};

use super::route::Route;
use crate::error::PharmsimError;

/// Dosing regimen supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DosingRegimen {
    /// Amount per administration (mass units)
    pub dose: Option<f64>,
    /// Time between administrations in hours
    pub interval: Option<f64>,
    /// Route of administration
    pub route: Option<Route>,
}

impl DosingRegimen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dose(mut self, dose: f64) -> Self {
        self.dose = Some(dose);
        self
    }

    pub fn interval(mut self, hours: f64) -> Self {
        self.interval = Some(hours);
        self
    }

    pub fn route(mut self, route: Route) -> Self {
        self.route = Some(route);
        self
    }
}

/// Parse a dosing schedule into an interval in hours.
///
/// Accepts a plain number of hours (`"12"`) or one of the labels used by the dosing
/// front-end, matched case-insensitively:
///
/// | Label | Interval |
/// |-------|----------|
/// | `Once a day` | 24 h |
/// | `N times a day`, `Nx a day` | 24 / N h |
/// | `Every other day` | 48 h |
/// | `Once a week` | 168 h |
/// | `N times a week` | 168 / N h |
/// | `Once every N days` | 24 N h |
/// | `Every N hours` | N h |
pub fn parse_schedule(label: &str) -> Result<f64, PharmsimError> {
    let normalized = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if let Ok(hours) = normalized.parse::<f64>() {
        return Ok(hours);
    }

    let unknown = || PharmsimError::UnknownSchedule {
        label: label.to_string(),
    };

    let hours = match normalized.as_str() {
        "once a day" | "daily" => 24.0,
        "every other day" => 48.0,
        "once a week" | "weekly" => 168.0,
        _ => {
            let tokens: Vec<&str> = normalized.split(' ').collect();
            match tokens.as_slice() {
                [n, "times", "a", "day"] => 24.0 / count(n).ok_or_else(unknown)?,
                [n, "a", "day"] if n.ends_with('x') => {
                    24.0 / count(n.trim_end_matches('x')).ok_or_else(unknown)?
                }
                [n, "times", "a", "week"] => 168.0 / count(n).ok_or_else(unknown)?,
                ["once", "every", n, "days" | "day"] => 24.0 * count(n).ok_or_else(unknown)?,
                ["every", n, "hours" | "hour"] => count(n).ok_or_else(unknown)?,
                _ => return Err(unknown()),
            }
        }
    };
    Ok(hours)
}

fn count(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
}
