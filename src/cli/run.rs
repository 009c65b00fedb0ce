use crate::cli::args::{Cli, Commands, MedrangeArgs, ModeArg, RollstatsArgs, TallyArgs};
use crate::core::engine::{self, BandConfig, fmt_dur, log_stage, stats_enabled};
use crate::core::io::InputSource;
use crate::core::records::{InputMode, LineDecoder};
use crate::report::band::{self, BandOptions};
use crate::report::output::Destination;
use crate::report::rolls::{self, RollChartOptions};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::time::Instant;

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Medrange(args) => medrange(args),
        Commands::Rollstats(args) => rollstats(args),
        Commands::Tally(args) => tally(args),
    }
}

fn medrange(args: MedrangeArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    let format = args.io.format;
    let opts = BandOptions {
        title: args.title,
        x_label: args.xlabel,
        y_label: args.ylabel,
        format,
        transparent: args.io.transparent,
        y_min: args.ymin,
        y_max: args.ymax,
    };
    let mode = match args.mode {
        ModeArg::Runs => InputMode::Runs,
        ModeArg::Dense => InputMode::Dense,
        ModeArg::Sparse => InputMode::Sparse,
    };
    let cfg = BandConfig {
        mode,
        offset: args.offset,
    };
    let dest = Destination::from_path(&args.io.output);

    let mut decoder = open_decoder(stats, &args.io.input)?;
    let ingested = engine::ingest(&mut decoder, &cfg)
        .with_context(|| format!("failed to ingest {} input", mode.as_str()))?;

    let t_render = Instant::now();
    let rendered = band::render(&ingested.series, &opts)?;
    log_stage(stats, "render", t_render);

    let t_write = Instant::now();
    dest.write(&rendered.bytes)?;
    log_stage(stats, "write", t_write);

    eprintln!("{}", rendered.summary);
    if stats {
        eprintln!(
            "BANDPLOT_STATS output bytes={} format={}",
            rendered.bytes.len(),
            format.as_str()
        );
        eprintln!("BANDPLOT_STATS total={}", fmt_dur(t0.elapsed()));
    }
    Ok(())
}

fn rollstats(args: RollstatsArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    let format = args.io.format;
    let opts = RollChartOptions {
        title: args.title,
        x_label: args.xlabel,
        y_label: args.ylabel,
        format,
        transparent: args.io.transparent,
    };
    let dest = Destination::from_path(&args.io.output);

    let mut decoder = open_decoder(stats, &args.io.input)?;
    let tally = engine::tally_counts(&mut decoder)?;

    let t_render = Instant::now();
    let bytes = rolls::render(&tally, &opts)?;
    log_stage(stats, "render", t_render);

    dest.write(&bytes)?;
    if stats {
        eprintln!("BANDPLOT_STATS total={}", fmt_dur(t0.elapsed()));
    }
    Ok(())
}

fn tally(args: TallyArgs) -> Result<()> {
    let stats = stats_enabled();
    let mut decoder = open_decoder(stats, &args.input)?;
    let counts = engine::count_rolls(&mut decoder)?;
    let mut line = serde_json::to_string(&counts).context("failed to encode roll counts")?;
    line.push('\n');
    Destination::from_path(&args.output).write(line.as_bytes())
}

fn open_decoder(stats: bool, input: &Path) -> Result<LineDecoder> {
    let t_open = Instant::now();
    let (source, kind) = InputSource::open(input)?;
    log_stage(stats, "input_open", t_open);
    if stats {
        eprintln!("BANDPLOT_STATS input={} kind={:?}", input.display(), kind);
    }
    Ok(LineDecoder::new(source))
}
