use crate::core::error::PipelineError;
use crate::core::model::{PercentileTuple, Tier};

/// Linear-interpolation percentile of ascending `sorted` values.
///
/// `rank` is in `[0, 100]`. The fractional position `rank/100 * (n-1)` is
/// interpolated between its floor and ceiling neighbours, so rank 0 is the
/// minimum and rank 100 the maximum.
pub fn percentile_sorted(sorted: &[f64], rank: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = (rank / 100.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Reduces one position's observations to its seven summary statistics.
///
/// The slice is sorted in place.
pub fn summarize(values: &mut [f64]) -> Result<PercentileTuple, PipelineError> {
    if values.is_empty() {
        return Err(PipelineError::EmptyInput("observations for percentile"));
    }
    values.sort_by(f64::total_cmp);
    let sorted = &*values;
    Ok(Tier::ALL.map(|tier| match tier {
        Tier::Min => sorted[0],
        Tier::Max => sorted[sorted.len() - 1],
        _ => percentile_sorted(sorted, tier.rank()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_fills_every_tier() {
        let t = summarize(&mut [42.5]).unwrap();
        assert_eq!(t, [42.5; 7]);
    }

    #[test]
    fn median_of_three_is_middle_value() {
        let t = summarize(&mut [10.0, 20.0, 0.0]).unwrap();
        assert_eq!(t[Tier::Min.index()], 0.0);
        assert_eq!(t[Tier::P50.index()], 10.0);
        assert_eq!(t[Tier::Max.index()], 20.0);
    }

    #[test]
    fn interpolates_between_ranks() {
        // pos for p25 over 5 values is 1.0, p5 is 0.2, p95 is 3.8
        let t = summarize(&mut [1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((t[Tier::P5.index()] - 1.2).abs() < 1e-12);
        assert_eq!(t[Tier::P25.index()], 2.0);
        assert_eq!(t[Tier::P75.index()], 4.0);
        assert!((t[Tier::P95.index()] - 4.8).abs() < 1e-12);
    }

    #[test]
    fn even_count_median_is_midpoint() {
        let t = summarize(&mut [4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(t[Tier::P50.index()], 2.5);
    }

    #[test]
    fn empty_collection_is_rejected() {
        assert_eq!(
            summarize(&mut []),
            Err(PipelineError::EmptyInput("observations for percentile"))
        );
    }

    #[test]
    fn tiers_are_non_decreasing() {
        let mut v = vec![9.0, -3.0, 7.5, 0.0, 0.0, 12.0, -8.0, 3.25];
        let t = summarize(&mut v).unwrap();
        assert!(t.windows(2).all(|w| w[0] <= w[1]));
    }
}
