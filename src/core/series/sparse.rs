use crate::core::error::PipelineError;
use crate::core::model::{PercentileTuple, SeriesSet};

/// Value written into every tier at positions no record covered.
pub const SPARSE_FILL: f64 = 0.0;

/// Largest series length the assembler will zero-fill up to.
pub const MAX_SERIES_LEN: usize = 1 << 24;

/// One precomputed percentile tuple keyed by its x-position.
///
/// Built from the line shape `[index, [min, p5, p25, p50, p75, p95, max]]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseRecord {
    pub index: usize,
    pub tuple: PercentileTuple,
}

impl TryFrom<(usize, Vec<f64>)> for SparseRecord {
    type Error = PipelineError;

    fn try_from((index, values): (usize, Vec<f64>)) -> Result<Self, Self::Error> {
        let found = values.len();
        let tuple = values
            .try_into()
            .map_err(|_| PipelineError::ShapeMismatch {
                what: "sparse percentile tuple",
                expected: 7,
                found,
            })?;
        Ok(Self { index, tuple })
    }
}

/// Rebuilds a dense [`SeriesSet`] from index-keyed records.
///
/// Records must arrive with strictly increasing indices. Gaps are padded
/// with [`SPARSE_FILL`]; a record at or behind the high-water mark is
/// rejected rather than overwriting what was already written. Indices at or
/// past [`MAX_SERIES_LEN`] are rejected before anything is allocated.
#[derive(Clone, Debug, Default)]
pub struct SparseSeriesAssembler {
    series: SeriesSet,
    high_water: Option<usize>,
    records: usize,
}

impl SparseSeriesAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SparseRecord) -> Result<(), PipelineError> {
        if let Some(high_water) = self.high_water
            && record.index <= high_water
        {
            return Err(PipelineError::OutOfOrder {
                index: record.index,
                high_water,
            });
        }
        if record.index >= MAX_SERIES_LEN {
            return Err(PipelineError::SeriesTooLong {
                index: record.index,
                limit: MAX_SERIES_LEN,
            });
        }
        self.series.extend_to(record.index, SPARSE_FILL);
        self.series.push(record.tuple);
        self.high_water = Some(record.index);
        self.records += 1;
        Ok(())
    }

    pub fn high_water(&self) -> Option<usize> {
        self.high_water
    }

    pub fn records(&self) -> usize {
        self.records
    }

    pub fn finish(self) -> SeriesSet {
        self.series
    }
}
