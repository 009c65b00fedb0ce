use crate::core::model::SeriesSet;

/// Returns a copy of `series` with `offset` subtracted from every value.
pub fn rebase(series: &SeriesSet, offset: f64) -> SeriesSet {
    series.map_values(|v| v - offset)
}
