use crate::core::error::PipelineError;
use crate::core::model::SeriesSet;
use crate::core::percentile;

/// Groups the observations of many equal-length runs by position.
///
/// Memory grows with `runs * positions`; this is the only ingestion path
/// that holds every observation at once.
#[derive(Clone, Debug, Default)]
pub struct SampleBinner {
    buckets: Vec<Vec<f64>>,
    width: Option<usize>,
    runs: usize,
}

impl SampleBinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one run; its length must match the first run seen.
    pub fn push(&mut self, run: &[f64]) -> Result<(), PipelineError> {
        match self.width {
            None => {
                self.width = Some(run.len());
                self.buckets = run.iter().map(|&v| vec![v]).collect();
            }
            Some(width) => {
                if run.len() != width {
                    return Err(PipelineError::ShapeMismatch {
                        what: "run sequence",
                        expected: width,
                        found: run.len(),
                    });
                }
                for (bucket, &v) in self.buckets.iter_mut().zip(run) {
                    bucket.push(v);
                }
            }
        }
        self.runs += 1;
        Ok(())
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Number of positions per run, once the first run has been seen.
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    pub fn bucket(&self, position: usize) -> Option<&[f64]> {
        self.buckets.get(position).map(Vec::as_slice)
    }

    /// Reduces every position to its percentile tuple, in index order.
    pub fn finish(self) -> Result<SeriesSet, PipelineError> {
        let mut series = SeriesSet::with_capacity(self.buckets.len());
        for mut bucket in self.buckets {
            series.push(percentile::summarize(&mut bucket)?);
        }
        Ok(series)
    }
}
