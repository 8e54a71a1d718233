use ndarray::Array1;

use crate::error::PharmsimError;

/// Simulation horizon in hours (7 days).
pub const TOTAL_TIME: f64 = 168.0;
/// Grid resolution in hours.
pub const TIME_STEP: f64 = 0.5;
/// Number of grid points over `[0, TOTAL_TIME]` at `TIME_STEP`.
pub const GRID_POINTS: usize = 337;

/// Fixed, ordered time grid on which traces are reported.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Array1<f64>,
}

impl TimeGrid {
    /// The 337-point grid over `[0, 168]` hours at 0.5 h resolution.
    pub fn standard() -> Self {
        Self {
            times: Array1::linspace(0.0, TOTAL_TIME, GRID_POINTS),
        }
    }

    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Index of the first grid point with `time >= t`, or `len()` if there is none.
    pub fn first_index_at_or_after(&self, t: f64) -> usize {
        self.times
            .iter()
            .position(|&time| time >= t)
            .unwrap_or(self.len())
    }

    /// Elapsed times since `t_dose` for every grid point from `start` on.
    pub fn elapsed_since(&self, start: usize, t_dose: f64) -> Vec<f64> {
        self.times
            .iter()
            .skip(start)
            .map(|&time| time - t_dose)
            .collect()
    }
}

/// Administration times `{0, I, 2I, ...}` strictly below `total_time + I`.
///
/// The last event may fall after the horizon; it is still part of the schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct DosingEvents {
    times: Vec<f64>,
}

impl DosingEvents {
    pub fn new(interval: f64, total_time: f64, max_doses: usize) -> Result<Self, PharmsimError> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(PharmsimError::ComputationFailure(format!(
                "dosing interval must be positive, got {interval}"
            )));
        }
        let count = ((total_time + interval) / interval).ceil();
        if !count.is_finite() || count > max_doses as f64 {
            return Err(PharmsimError::TooManyDoses {
                interval,
                doses: count,
                max_doses,
            });
        }
        let times = (0..count as usize).map(|k| k as f64 * interval).collect();
        Ok(Self { times })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
