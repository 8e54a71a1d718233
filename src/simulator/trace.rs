use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::PharmsimError;

/// Concentration at a single grid time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    pub time: f64,
    pub concentration: f64,
}

/// Superposed concentration-time curve, one point per grid time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcentrationTrace {
    points: Vec<TracePoint>,
}

/// Exposure metrics derived from a trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Highest concentration
    pub cmax: f64,
    /// First time at which `cmax` is reached
    pub tmax: f64,
    /// Lowest concentration
    pub cmin: f64,
    /// Area under the curve, linear trapezoidal rule
    pub auc: f64,
}

impl ConcentrationTrace {
    pub fn new(points: Vec<TracePoint>) -> Self {
        Self { points }
    }

    pub(crate) fn from_parts(
        times: impl IntoIterator<Item = f64>,
        concentrations: impl IntoIterator<Item = f64>,
    ) -> Self {
        let points = times
            .into_iter()
            .zip(concentrations)
            .map(|(time, concentration)| TracePoint {
                time,
                concentration,
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[TracePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    pub fn concentrations(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.concentration).collect()
    }

    /// Concentration at an exact grid time, if present.
    pub fn at(&self, time: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|p| (p.time - time).abs() < 1e-9)
            .map(|p| p.concentration)
    }

    /// `None` for an empty trace.
    pub fn summary(&self) -> Option<TraceSummary> {
        let first = self.points.first()?;
        let mut summary = TraceSummary {
            cmax: first.concentration,
            tmax: first.time,
            cmin: first.concentration,
            auc: 0.0,
        };
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            summary.auc += (a.concentration + b.concentration) / 2.0 * (b.time - a.time);
            if b.concentration > summary.cmax {
                summary.cmax = b.concentration;
                summary.tmax = b.time;
            }
            summary.cmin = summary.cmin.min(b.concentration);
        }
        Some(summary)
    }

    /// Write the trace as `time,concentration` CSV.
    pub fn to_csv<W: Write>(&self, writer: W) -> Result<(), PharmsimError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for point in &self.points {
            wtr.serialize(point)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

impl IntoIterator for ConcentrationTrace {
    type Item = TracePoint;
    type IntoIter = std::vec::IntoIter<TracePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}
