use crate::core::dice::{MAX_ROLL, MIN_ROLL, RollTally};
use crate::report::output::{self, OutputFormat};
use crate::report::svg::{Chart, Rgba};
use anyhow::Result;

const ACTUAL_COLOR: Rgba = Rgba::rgb(0, 109, 219);
const EXPECTED_COLOR: Rgba = Rgba::rgb(219, 109, 0);

#[derive(Clone, Debug)]
pub struct RollChartOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub format: OutputFormat,
    pub transparent: bool,
}

impl Default for RollChartOptions {
    fn default() -> Self {
        Self {
            title: "Rolls".to_string(),
            x_label: "Roll value".to_string(),
            y_label: "Frequency".to_string(),
            format: OutputFormat::Png,
            transparent: false,
        }
    }
}

/// Overlays observed roll frequencies on the fair-dice expectation.
pub fn build_chart(tally: &RollTally, opts: &RollChartOptions) -> Result<Chart> {
    let actual = tally.frequencies()?;
    let expected = RollTally::expected_frequencies();
    let xs: Vec<f64> = (MIN_ROLL..=MAX_ROLL).map(f64::from).collect();

    let mut chart = Chart::new(&opts.title, &opts.x_label, &opts.y_label);
    chart.line(&xs, &actual, ACTUAL_COLOR, "actual");
    chart.line(&xs, &expected, EXPECTED_COLOR, "expected");
    chart.set_xlim(f64::from(MIN_ROLL), f64::from(MAX_ROLL));
    let y_max = actual.iter().copied().fold(0.0, f64::max) * 1.1;
    chart.set_ylim(0.0, y_max);
    Ok(chart)
}

pub fn render(tally: &RollTally, opts: &RollChartOptions) -> Result<Vec<u8>> {
    let chart = build_chart(tally, opts)?;
    let svg = chart.to_svg(opts.transparent)?;
    output::encode(&svg, opts.format)
}
