use crate::core::error::PipelineError;
use serde::{Deserialize, Serialize};

pub const ROLL_VALUES: usize = 11;
pub const HARD_VALUES: usize = 4;
pub const MIN_ROLL: u8 = 2;
pub const MAX_ROLL: u8 = 12;

/// Number of two-die combinations producing each value 2..=12.
pub const WAYS: [u32; ROLL_VALUES] = [1, 2, 3, 4, 5, 6, 5, 4, 3, 2, 1];

/// One throw of two six-sided dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "[u8; 2]")]
pub struct Roll {
    dice: [u8; 2],
}

impl Roll {
    pub fn new(dice: [u8; 2]) -> Result<Self, PipelineError> {
        for d in dice {
            if !(1..=6).contains(&d) {
                return Err(PipelineError::InvalidRoll(d));
            }
        }
        Ok(Self { dice })
    }

    pub fn dice(&self) -> [u8; 2] {
        self.dice
    }

    pub fn value(self) -> u8 {
        self.dice[0] + self.dice[1]
    }

    /// Doubles on 4, 6, 8 or 10.
    pub fn is_hard(self) -> bool {
        self.dice[0] == self.dice[1] && self.dice[0] != 1 && self.dice[0] != 6
    }
}

impl TryFrom<[u8; 2]> for Roll {
    type Error = PipelineError;

    fn try_from(dice: [u8; 2]) -> Result<Self, Self::Error> {
        Roll::new(dice)
    }
}

impl From<Roll> for [u8; 2] {
    fn from(r: Roll) -> Self {
        r.dice
    }
}

/// Per-value roll counts, the record shape consumed by the frequency chart.
///
/// `all[i]` counts rolls of value `i + 2`; `hard[i]` counts hard
/// `4 + 2*i`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RollCounts {
    pub all: [u64; ROLL_VALUES],
    pub hard: [u64; HARD_VALUES],
}

/// A roll-count line as decoded, before its vector lengths are checked.
/// Older producers may omit `hard`.
#[derive(Clone, Debug, Deserialize)]
pub struct RollCountsLine {
    pub all: Vec<u64>,
    #[serde(default)]
    pub hard: Option<Vec<u64>>,
}

impl TryFrom<RollCountsLine> for RollCounts {
    type Error = PipelineError;

    fn try_from(raw: RollCountsLine) -> Result<Self, Self::Error> {
        let found = raw.all.len();
        let all = raw
            .all
            .try_into()
            .map_err(|_| PipelineError::ShapeMismatch {
                what: "roll count vector",
                expected: ROLL_VALUES,
                found,
            })?;
        let hard = match raw.hard {
            None => [0; HARD_VALUES],
            Some(hard) => {
                let found = hard.len();
                hard.try_into().map_err(|_| PipelineError::ShapeMismatch {
                    what: "hard-way count vector",
                    expected: HARD_VALUES,
                    found,
                })?
            }
        };
        Ok(Self { all, hard })
    }
}

impl RollCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, roll: Roll) {
        let v = roll.value();
        self.all[(v - MIN_ROLL) as usize] += 1;
        if roll.is_hard() {
            self.hard[(v / 2 - 2) as usize] += 1;
        }
    }

    pub fn total(&self) -> u128 {
        self.all.iter().map(|&c| u128::from(c)).sum()
    }
}

/// Theoretical counts for `num_rolls` fair rolls, as `(all, hard)`.
pub fn expected_counts(num_rolls: f64) -> ([f64; ROLL_VALUES], [f64; HARD_VALUES]) {
    let all = WAYS.map(|w| num_rolls * f64::from(w) / 36.0);
    let hard = [num_rolls / 36.0; HARD_VALUES];
    (all, hard)
}

/// Running sum of roll-count records for one chart invocation.
#[derive(Clone, Debug, Default)]
pub struct RollTally {
    counts: [u64; ROLL_VALUES],
    records: usize,
}

impl RollTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one record. On overflow the tally is left unchanged.
    pub fn add(&mut self, record: &RollCounts) -> Result<(), PipelineError> {
        let mut sums = self.counts;
        for ((value, acc), c) in (MIN_ROLL..=MAX_ROLL).zip(sums.iter_mut()).zip(record.all) {
            *acc = acc
                .checked_add(c)
                .ok_or(PipelineError::CountOverflow { value })?;
        }
        self.counts = sums;
        self.records += 1;
        Ok(())
    }

    pub fn counts(&self) -> &[u64; ROLL_VALUES] {
        &self.counts
    }

    pub fn records(&self) -> usize {
        self.records
    }

    pub fn total(&self) -> u128 {
        self.counts.iter().map(|&c| u128::from(c)).sum()
    }

    /// Observed share of each roll value.
    pub fn frequencies(&self) -> Result<[f64; ROLL_VALUES], PipelineError> {
        let total = self.total();
        if total == 0 {
            return Err(PipelineError::EmptyInput("roll counts sum to zero"));
        }
        Ok(self.counts.map(|c| c as f64 / total as f64))
    }

    pub fn expected_frequencies() -> [f64; ROLL_VALUES] {
        expected_counts(1.0).0
    }
}
