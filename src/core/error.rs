use thiserror::Error;

/// Failures that abort a chart invocation.
///
/// Every variant is fatal: the pipeline stops before anything is written to
/// the output destination.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("{what}: expected length {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("no data to summarize: {0}")]
    EmptyInput(&'static str),

    #[error("unsupported output format {0:?} (expected one of png, svg, svgz, pdf)")]
    UnsupportedFormat(String),

    #[error("series is empty; nothing to plot")]
    EmptySeries,

    #[error("sparse record index {index} does not advance past {high_water}")]
    OutOfOrder { index: usize, high_water: usize },

    #[error("sparse record index {index} exceeds the series length limit {limit}")]
    SeriesTooLong { index: usize, limit: usize },

    #[error("roll count for value {value} overflows")]
    CountOverflow { value: u8 },

    #[error("die value {0} out of range 1..=6")]
    InvalidRoll(u8),
}
