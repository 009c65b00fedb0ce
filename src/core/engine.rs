use crate::core::dice::{RollCounts, RollTally};
use crate::core::model::SeriesSet;
use crate::core::records::{InputMode, LineDecoder};
use crate::core::series::{DenseCollector, SampleBinner, SparseSeriesAssembler, rebase};
use anyhow::{Context, Result};
use std::time::{Duration, Instant};

pub struct BandConfig {
    pub mode: InputMode,
    /// Subtracted from every value after ingestion; `0.0` skips rebasing.
    pub offset: f64,
}

#[derive(Debug)]
pub struct IngestOutput {
    pub series: SeriesSet,
    pub records: usize,
}

/// Drains `decoder` through the ingestion path selected by `cfg.mode`.
pub fn ingest(decoder: &mut LineDecoder, cfg: &BandConfig) -> Result<IngestOutput> {
    let stats = stats_enabled();
    let t_ingest = Instant::now();
    let (series, records) = match cfg.mode {
        InputMode::Runs => ingest_runs(decoder)?,
        InputMode::Dense => ingest_dense(decoder)?,
        InputMode::Sparse => ingest_sparse(decoder)?,
    };
    log_stage(stats, &format!("engine.ingest_{}", cfg.mode.as_str()), t_ingest);
    if stats {
        eprintln!(
            "BANDPLOT_STATS records={} positions={}",
            records,
            series.len()
        );
    }

    let series = if cfg.offset != 0.0 {
        let t_offset = Instant::now();
        let rebased = rebase(&series, cfg.offset);
        log_stage(stats, "engine.offset", t_offset);
        rebased
    } else {
        series
    };
    Ok(IngestOutput { series, records })
}

fn ingest_runs(decoder: &mut LineDecoder) -> Result<(SeriesSet, usize)> {
    let mut binner = SampleBinner::new();
    while let Some(run) = decoder.next_run()? {
        binner
            .push(&run)
            .with_context(|| format!("input line {}", decoder.line_no()))?;
    }
    let runs = binner.runs();
    let series = binner.finish()?;
    Ok((series, runs))
}

fn ingest_dense(decoder: &mut LineDecoder) -> Result<(SeriesSet, usize)> {
    let mut collector = DenseCollector::new();
    let mut lines = 0usize;
    while let Some(tier) = decoder.next_tier()? {
        collector
            .push(tier)
            .with_context(|| format!("input line {}", decoder.line_no()))?;
        lines += 1;
    }
    Ok((collector.finish()?, lines))
}

fn ingest_sparse(decoder: &mut LineDecoder) -> Result<(SeriesSet, usize)> {
    let mut assembler = SparseSeriesAssembler::new();
    while let Some(record) = decoder.next_sparse()? {
        assembler
            .push(record)
            .with_context(|| format!("input line {}", decoder.line_no()))?;
    }
    let records = assembler.records();
    Ok((assembler.finish(), records))
}

/// Sums every roll-count record in `decoder`.
pub fn tally_counts(decoder: &mut LineDecoder) -> Result<RollTally> {
    let stats = stats_enabled();
    let t = Instant::now();
    let mut tally = RollTally::new();
    while let Some(counts) = decoder.next_counts()? {
        tally
            .add(&counts)
            .with_context(|| format!("input line {}", decoder.line_no()))?;
    }
    log_stage(stats, "engine.tally_counts", t);
    if stats {
        eprintln!(
            "BANDPLOT_STATS records={} rolls={}",
            tally.records(),
            tally.total()
        );
    }
    Ok(tally)
}

/// Counts individual dice rolls into one record.
pub fn count_rolls(decoder: &mut LineDecoder) -> Result<RollCounts> {
    let stats = stats_enabled();
    let t = Instant::now();
    let mut counts = RollCounts::new();
    while let Some(roll) = decoder.next_roll()? {
        counts.add(roll);
    }
    log_stage(stats, "engine.count_rolls", t);
    Ok(counts)
}

pub(crate) fn stats_enabled() -> bool {
    matches!(std::env::var("BANDPLOT_STATS").as_deref(), Ok("1"))
}

pub(crate) fn log_stage(stats: bool, name: &str, t: Instant) {
    if stats {
        eprintln!("BANDPLOT_STATS stage={} time={}", name, fmt_dur(t.elapsed()));
    }
}

pub(crate) fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
