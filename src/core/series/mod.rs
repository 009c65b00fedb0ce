//! Ingestion paths that normalize input into a [`SeriesSet`].
//!
//! [`SeriesSet`]: crate::core::model::SeriesSet

mod binner;
mod dense;
mod offset;
mod sparse;

pub use binner::SampleBinner;
pub use dense::{DenseCollector, validate_dense};
pub use offset::rebase;
pub use sparse::{MAX_SERIES_LEN, SPARSE_FILL, SparseRecord, SparseSeriesAssembler};
