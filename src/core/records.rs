use crate::core::dice::{Roll, RollCounts, RollCountsLine};
use crate::core::io::InputSource;
use crate::core::series::SparseRecord;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Which line shape the fan-chart input carries.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputMode {
    /// One run sequence per line.
    Runs,
    /// Exactly seven lines, one dense sequence per percentile tier.
    Dense,
    /// One `[index, [7 values]]` pair per line.
    Sparse,
}

impl InputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InputMode::Runs => "runs",
            InputMode::Dense => "dense",
            InputMode::Sparse => "sparse",
        }
    }
}

/// Decodes JSON lines from an [`InputSource`] one at a time.
///
/// Blank lines are skipped. Errors name the 1-based line number.
pub struct LineDecoder {
    source: InputSource,
    line_no: usize,
}

impl LineDecoder {
    pub fn new(source: InputSource) -> Self {
        Self { source, line_no: 0 }
    }

    /// Line number of the most recently read line.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn next_value<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        loop {
            let Some(line) = self.source.next_line()? else {
                return Ok(None);
            };
            self.line_no += 1;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let value = serde_json::from_slice(line)
                .with_context(|| format!("failed to decode input line {}", self.line_no))?;
            return Ok(Some(value));
        }
    }

    /// Decodes one line with `decode`, which validates the raw JSON shape.
    ///
    /// Domain errors from `decode` keep their type under the line context.
    fn next_checked<R, T, E>(&mut self, decode: impl FnOnce(R) -> Result<T, E>) -> Result<Option<T>>
    where
        R: DeserializeOwned,
        E: std::error::Error + Send + Sync + 'static,
    {
        let Some(raw) = self.next_value::<R>()? else {
            return Ok(None);
        };
        let line_no = self.line_no;
        decode(raw)
            .map(Some)
            .with_context(|| format!("failed to decode input line {line_no}"))
    }

    /// One run sequence (`runs` mode).
    pub fn next_run(&mut self) -> Result<Option<Vec<f64>>> {
        self.next_value()
    }

    /// One percentile-tier line (`dense` mode).
    pub fn next_tier(&mut self) -> Result<Option<Vec<f64>>> {
        self.next_value()
    }

    /// One `[index, [7 values]]` pair (`sparse` mode).
    pub fn next_sparse(&mut self) -> Result<Option<SparseRecord>> {
        self.next_checked(|pair: (usize, Vec<f64>)| SparseRecord::try_from(pair))
    }

    pub fn next_counts(&mut self) -> Result<Option<RollCounts>> {
        self.next_checked(|line: RollCountsLine| RollCounts::try_from(line))
    }

    pub fn next_roll(&mut self) -> Result<Option<Roll>> {
        self.next_checked(|dice: [u8; 2]| Roll::new(dice))
    }
}
