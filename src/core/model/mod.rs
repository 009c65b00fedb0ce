use crate::core::error::PipelineError;

pub const TIERS: usize = 7;

/// `(min, p5, p25, p50, p75, p95, max)` for one x-position.
pub type PercentileTuple = [f64; TIERS];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tier {
    Min,
    P5,
    P25,
    P50,
    P75,
    P95,
    Max,
}

impl Tier {
    pub const ALL: [Tier; TIERS] = [
        Tier::Min,
        Tier::P5,
        Tier::P25,
        Tier::P50,
        Tier::P75,
        Tier::P95,
        Tier::Max,
    ];

    pub fn index(self) -> usize {
        match self {
            Tier::Min => 0,
            Tier::P5 => 1,
            Tier::P25 => 2,
            Tier::P50 => 3,
            Tier::P75 => 4,
            Tier::P95 => 5,
            Tier::Max => 6,
        }
    }

    /// Percentile rank in `[0, 100]`.
    pub fn rank(self) -> f64 {
        match self {
            Tier::Min => 0.0,
            Tier::P5 => 5.0,
            Tier::P25 => 25.0,
            Tier::P50 => 50.0,
            Tier::P75 => 75.0,
            Tier::P95 => 95.0,
            Tier::Max => 100.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Min => "min",
            Tier::P5 => "p5",
            Tier::P25 => "p25",
            Tier::P50 => "median",
            Tier::P75 => "p75",
            Tier::P95 => "p95",
            Tier::Max => "max",
        }
    }
}

/// Seven parallel percentile sequences over the x-positions `0..len`.
///
/// All ingestion paths converge on this form. The tiers always have equal
/// length, so position `i` in every tier describes the same x-coordinate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesSet {
    tiers: [Vec<f64>; TIERS],
}

impl SeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(len: usize) -> Self {
        Self {
            tiers: std::array::from_fn(|_| Vec::with_capacity(len)),
        }
    }

    /// Builds a set from seven tier sequences, rejecting unequal lengths.
    pub fn from_tiers(tiers: [Vec<f64>; TIERS]) -> Result<Self, PipelineError> {
        let expected = tiers[0].len();
        for tier in &tiers[1..] {
            if tier.len() != expected {
                return Err(PipelineError::ShapeMismatch {
                    what: "percentile tier",
                    expected,
                    found: tier.len(),
                });
            }
        }
        Ok(Self { tiers })
    }

    pub fn from_tuples<I: IntoIterator<Item = PercentileTuple>>(tuples: I) -> Self {
        let mut set = Self::new();
        for t in tuples {
            set.push(t);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.tiers[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, tuple: PercentileTuple) {
        for (tier, v) in self.tiers.iter_mut().zip(tuple) {
            tier.push(v);
        }
    }

    /// Pads every tier with `fill` until the set is `len` long.
    pub fn extend_to(&mut self, len: usize, fill: f64) {
        for tier in &mut self.tiers {
            if tier.len() < len {
                tier.resize(len, fill);
            }
        }
    }

    /// Applies `f` to every value, keeping shape.
    pub fn map_values<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            tiers: std::array::from_fn(|t| self.tiers[t].iter().map(|&v| f(v)).collect()),
        }
    }

    pub fn tier(&self, tier: Tier) -> &[f64] {
        &self.tiers[tier.index()]
    }

    pub fn tiers(&self) -> &[Vec<f64>; TIERS] {
        &self.tiers
    }

    pub fn into_tiers(self) -> [Vec<f64>; TIERS] {
        self.tiers
    }

    pub fn tuple_at(&self, i: usize) -> Option<PercentileTuple> {
        if i >= self.len() {
            return None;
        }
        Some(std::array::from_fn(|t| self.tiers[t][i]))
    }

    pub fn median(&self) -> &[f64] {
        self.tier(Tier::P50)
    }

    /// Largest value of the `max` tier and smallest of the `min` tier.
    pub fn extent(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let lo = self.tier(Tier::Min).iter().copied().fold(f64::INFINITY, f64::min);
        let hi = self
            .tier(Tier::Max)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        Some((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_at_reads_across_tiers() {
        let set = SeriesSet::from_tuples([
            [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0],
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.tuple_at(1), Some([10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]));
        assert_eq!(set.tuple_at(2), None);
        assert_eq!(set.median(), &[3.0, 13.0]);
    }

    #[test]
    fn from_tiers_rejects_ragged_input() {
        let mut tiers: [Vec<f64>; TIERS] = std::array::from_fn(|_| vec![0.0; 3]);
        tiers[4].pop();
        let err = SeriesSet::from_tiers(tiers).unwrap_err();
        assert_eq!(
            err,
            PipelineError::ShapeMismatch {
                what: "percentile tier",
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn extent_uses_outer_tiers() {
        let set = SeriesSet::from_tuples([
            [-4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0],
            [-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 9.0],
        ]);
        assert_eq!(set.extent(), Some((-4.0, 9.0)));
        assert_eq!(SeriesSet::new().extent(), None);
    }
}
