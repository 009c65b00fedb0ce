use bandplot::core::engine::{self, BandConfig};
use bandplot::core::error::PipelineError;
use bandplot::core::io::InputSource;
use bandplot::core::model::Tier;
use bandplot::core::records::{InputMode, LineDecoder};
use bandplot::report::band::{self, BandOptions};
use bandplot::report::output::{Destination, OutputFormat};
use bandplot::report::rolls::{self, RollChartOptions};
use std::fs;
use std::path::Path;

fn decoder_for(path: &Path) -> LineDecoder {
    let (source, _) = InputSource::open(path).unwrap();
    LineDecoder::new(source)
}

fn svg_opts() -> BandOptions {
    BandOptions {
        format: OutputFormat::Svg,
        ..BandOptions::default()
    }
}

/// Ingest, render and write, the way `bandplot medrange` does.
fn plot(input: &Path, output: &Path, mode: InputMode, opts: &BandOptions) -> anyhow::Result<String> {
    let mut decoder = decoder_for(input);
    let ingested = engine::ingest(&mut decoder, &BandConfig { mode, offset: 0.0 })?;
    let rendered = band::render(&ingested.series, opts)?;
    Destination::from_path(output).write(&rendered.bytes)?;
    Ok(rendered.summary.to_string())
}

#[test]
fn runs_file_to_svg_chart() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("runs.jsonl");
    let output = dir.path().join("chart.svg");
    fs::write(&input, "[100, 90, 80, 95]\n[100, 110, 70, 60]\n[100, 100, 100, 85]\n").unwrap();

    let summary = plot(&input, &output, InputMode::Runs, &svg_opts()).unwrap();
    assert_eq!(
        summary,
        "Median game min = 80.0 (loss 20)\nMedian game end = 85.0 (loss 15)"
    );
    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    for label in ["median", "top 5%", "middle 50%", "bottom 5%"] {
        assert!(svg.contains(label), "missing legend entry {label}");
    }
}

#[test]
fn dense_and_sparse_inputs_agree() {
    let dir = tempfile::tempdir().unwrap();
    let dense = dir.path().join("dense.jsonl");
    let sparse = dir.path().join("sparse.jsonl");
    let tiers: Vec<String> = (0..7)
        .map(|t| format!("[{}, 0, 0, {}]", t, t * 2))
        .collect();
    fs::write(&dense, tiers.join("\n")).unwrap();
    fs::write(
        &sparse,
        "[0, [0,1,2,3,4,5,6]]\n[3, [0,2,4,6,8,10,12]]\n",
    )
    .unwrap();

    let cfg = |mode| BandConfig { mode, offset: 0.0 };
    let a = engine::ingest(&mut decoder_for(&dense), &cfg(InputMode::Dense)).unwrap();
    let b = engine::ingest(&mut decoder_for(&sparse), &cfg(InputMode::Sparse)).unwrap();
    assert_eq!(a.series, b.series);
    assert_eq!(a.records, 7);
    assert_eq!(b.records, 2);
    assert_eq!(b.series.tier(Tier::P50), &[3.0, 0.0, 0.0, 6.0]);
}

#[test]
fn offset_shifts_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("runs.jsonl");
    fs::write(&input, "[500, 450, 520]\n").unwrap();
    let ingested = engine::ingest(
        &mut decoder_for(&input),
        &BandConfig {
            mode: InputMode::Runs,
            offset: 500.0,
        },
    )
    .unwrap();
    assert_eq!(ingested.series.median(), &[0.0, -50.0, 20.0]);
    let rendered = band::render(&ingested.series, &svg_opts()).unwrap();
    assert_eq!(rendered.summary.min_loss(), 50);
    assert_eq!(rendered.summary.end_loss(), -20);
}

#[test]
fn empty_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.jsonl");
    let output = dir.path().join("chart.svg");
    fs::write(&input, "\n\n").unwrap();

    let err = plot(&input, &output, InputMode::Runs, &svg_opts()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<PipelineError>(),
        Some(&PipelineError::EmptySeries)
    );
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn ragged_runs_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("runs.jsonl");
    let output = dir.path().join("chart.svg");
    fs::write(&input, "[1, 2, 3]\n[1, 2]\n").unwrap();

    let err = plot(&input, &output, InputMode::Runs, &svg_opts()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::ShapeMismatch { expected: 3, found: 2, .. })
    ));
    assert!(!output.exists());
}

#[test]
fn unsupported_format_is_reported() {
    let err = "jpeg".parse::<OutputFormat>().unwrap_err();
    assert_eq!(err, PipelineError::UnsupportedFormat("jpeg".to_string()));
    assert!(err.to_string().contains("jpeg"));
}

#[test]
fn png_chart_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("runs.jsonl");
    let output = dir.path().join("chart.png");
    fs::write(&input, "[0, 1, 2]\n[0, -1, -2]\n").unwrap();
    let opts = BandOptions {
        transparent: true,
        ..BandOptions::default()
    };
    plot(&input, &output, InputMode::Runs, &opts).unwrap();
    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[test]
fn roll_counts_to_frequency_chart() {
    let dir = tempfile::tempdir().unwrap();
    let rolls_path = dir.path().join("rolls.jsonl");
    let mut lines = String::new();
    for a in 1..=6 {
        for b in 1..=6 {
            lines.push_str(&format!("[{a}, {b}]\n"));
        }
    }
    fs::write(&rolls_path, lines).unwrap();
    let counts = engine::count_rolls(&mut decoder_for(&rolls_path)).unwrap();
    assert_eq!(counts.total(), 36);

    let counts_path = dir.path().join("counts.jsonl");
    let record = serde_json::to_string(&counts).unwrap();
    fs::write(&counts_path, format!("{record}\n{record}\n")).unwrap();
    let tally = engine::tally_counts(&mut decoder_for(&counts_path)).unwrap();
    assert_eq!(tally.total(), 72);

    let opts = RollChartOptions {
        format: OutputFormat::Svg,
        ..RollChartOptions::default()
    };
    let bytes = rolls::render(&tally, &opts).unwrap();
    let svg = String::from_utf8(bytes).unwrap();
    assert!(svg.contains("actual"));
    assert!(svg.contains("expected"));
}
