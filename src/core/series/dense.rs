use crate::core::error::PipelineError;
use crate::core::model::{SeriesSet, TIERS};

/// Checks that exactly seven equal-length tier sequences were supplied.
pub fn validate_dense(tiers: Vec<Vec<f64>>) -> Result<SeriesSet, PipelineError> {
    let found = tiers.len();
    let tiers: [Vec<f64>; TIERS] = tiers
        .try_into()
        .map_err(|_| PipelineError::ShapeMismatch {
            what: "dense tier count",
            expected: TIERS,
            found,
        })?;
    SeriesSet::from_tiers(tiers)
}

/// Gathers dense tier lines as they arrive.
///
/// Stops accepting after the seventh line so a stray extra line is reported
/// as soon as it is read.
#[derive(Clone, Debug, Default)]
pub struct DenseCollector {
    tiers: Vec<Vec<f64>>,
}

impl DenseCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tier: Vec<f64>) -> Result<(), PipelineError> {
        if self.tiers.len() == TIERS {
            return Err(PipelineError::ShapeMismatch {
                what: "dense tier count",
                expected: TIERS,
                found: TIERS + 1,
            });
        }
        self.tiers.push(tier);
        Ok(())
    }

    pub fn finish(self) -> Result<SeriesSet, PipelineError> {
        validate_dense(self.tiers)
    }
}
