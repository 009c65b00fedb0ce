use crate::core::error::PipelineError;
use crate::core::model::{SeriesSet, Tier};
use crate::report::output::{self, OutputFormat};
use crate::report::svg::{Chart, Rgba};
use anyhow::Result;
use std::fmt;

// Colorblind-safe palette.
const DARK_PURPLE: Rgba = Rgba::rgb(73, 0, 146);
const DARK_BLUE: Rgba = Rgba::rgb(0, 109, 219);
const PURPLE: Rgba = Rgba::rgb(182, 109, 255);
const BLUE: Rgba = Rgba::rgb(109, 182, 255);
const LIGHT_BLUE: Rgba = Rgba::rgb(182, 219, 255);

const MEDIAN_COLOR: Rgba = PURPLE;

/// Filled regions from the top of the envelope down: upper tier, lower
/// tier, color, legend label.
const BANDS: [(Tier, Tier, Rgba, &str); 5] = [
    (Tier::Max, Tier::P95, DARK_PURPLE.alpha(0.9), "top 5%"),
    (Tier::P95, Tier::P75, DARK_BLUE.alpha(0.9), "next 20%"),
    (Tier::P75, Tier::P25, PURPLE.alpha(0.5), "middle 50%"),
    (Tier::P25, Tier::P5, BLUE.alpha(0.9), "next 20%"),
    (Tier::P5, Tier::Min, LIGHT_BLUE.alpha(0.9), "bottom 5%"),
];

#[derive(Clone, Debug)]
pub struct BandOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub format: OutputFormat,
    pub transparent: bool,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

impl Default for BandOptions {
    fn default() -> Self {
        Self {
            title: "Expected bankroll change over time".to_string(),
            x_label: "Roll number".to_string(),
            y_label: "Change in bankroll".to_string(),
            format: OutputFormat::Png,
            transparent: false,
            y_min: None,
            y_max: None,
        }
    }
}

/// Where the median run starts, bottoms out and ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MedianSummary {
    pub start: f64,
    pub min: f64,
    pub end: f64,
}

impl MedianSummary {
    pub fn from_series(series: &SeriesSet) -> Result<Self, PipelineError> {
        let median = series.median();
        let (Some(&start), Some(&end)) = (median.first(), median.last()) else {
            return Err(PipelineError::EmptySeries);
        };
        let min = median.iter().copied().fold(f64::INFINITY, f64::min);
        Ok(Self { start, min, end })
    }

    pub fn min_loss(&self) -> i64 {
        (self.start - self.min).trunc() as i64
    }

    pub fn end_loss(&self) -> i64 {
        (self.start - self.end).trunc() as i64
    }
}

impl fmt::Display for MedianSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Median game min = {:?} (loss {})",
            self.min,
            self.min_loss()
        )?;
        write!(f, "Median game end = {:?} (loss {})", self.end, self.end_loss())
    }
}

#[derive(Debug)]
pub struct RenderedBand {
    pub bytes: Vec<u8>,
    pub summary: MedianSummary,
}

/// Lays out the fan chart without encoding it.
pub fn build_chart(series: &SeriesSet, opts: &BandOptions) -> Result<Chart, PipelineError> {
    let (lo, hi) = series.extent().ok_or(PipelineError::EmptySeries)?;
    let xs: Vec<f64> = (0..series.len()).map(|i| i as f64).collect();

    let mut chart = Chart::new(&opts.title, &opts.x_label, &opts.y_label);
    chart.line(&xs, series.median(), MEDIAN_COLOR, "median");
    for (upper, lower, color, label) in BANDS {
        chart.fill_between(&xs, series.tier(upper), series.tier(lower), color, label);
    }

    chart.set_xlim(0.0, (series.len() - 1) as f64);
    let y_mag = hi.max(-lo);
    chart.set_ylim(opts.y_min.unwrap_or(0.0), opts.y_max.unwrap_or(y_mag));
    Ok(chart)
}

/// Renders `series` as a fan chart and summarizes its median.
pub fn render(series: &SeriesSet, opts: &BandOptions) -> Result<RenderedBand> {
    let chart = build_chart(series, opts)?;
    let summary = MedianSummary::from_series(series)?;
    let svg = chart.to_svg(opts.transparent)?;
    let bytes = output::encode(&svg, opts.format)?;
    Ok(RenderedBand { bytes, summary })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> SeriesSet {
        SeriesSet::from_tuples([
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [-5.0, -4.0, -2.5, 0.0, 2.5, 4.5, 5.0],
            [-30.0, -12.0, -8.0, -7.5, 10.0, 18.0, 20.0],
        ])
    }

    fn svg_opts() -> BandOptions {
        BandOptions {
            format: OutputFormat::Svg,
            ..BandOptions::default()
        }
    }

    #[test]
    fn empty_series_is_rejected() {
        let err = render(&SeriesSet::new(), &svg_opts()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PipelineError>(),
            Some(&PipelineError::EmptySeries)
        );
    }

    #[test]
    fn axis_limits_follow_envelope() {
        let chart = build_chart(&series(), &svg_opts()).unwrap();
        assert_eq!((chart.xlim().min, chart.xlim().max), (0.0, 2.0));
        // -1 * min tier (30) beats the max tier (20)
        assert_eq!((chart.ylim().min, chart.ylim().max), (0.0, 30.0));
    }

    #[test]
    fn explicit_y_limits_override() {
        let opts = BandOptions {
            y_min: Some(-40.0),
            y_max: Some(25.0),
            ..svg_opts()
        };
        let chart = build_chart(&series(), &opts).unwrap();
        assert_eq!((chart.ylim().min, chart.ylim().max), (-40.0, 25.0));
        let opts = BandOptions {
            y_max: Some(12.0),
            ..svg_opts()
        };
        let chart = build_chart(&series(), &opts).unwrap();
        assert_eq!((chart.ylim().min, chart.ylim().max), (0.0, 12.0));
    }

    #[test]
    fn draws_median_then_bands_in_stacking_order() {
        let chart = build_chart(&series(), &svg_opts()).unwrap();
        assert_eq!(
            chart.legend_labels(),
            vec![
                "median",
                "top 5%",
                "next 20%",
                "middle 50%",
                "next 20%",
                "bottom 5%"
            ]
        );
    }

    #[test]
    fn summary_reports_integer_losses() {
        let s = MedianSummary::from_series(&series()).unwrap();
        assert_eq!(s, MedianSummary { start: 0.0, min: -7.5, end: -7.5 });
        assert_eq!(s.min_loss(), 7);
        assert_eq!(
            s.to_string(),
            "Median game min = -7.5 (loss 7)\nMedian game end = -7.5 (loss 7)"
        );
    }

    #[test]
    fn whole_number_values_keep_their_decimal_point() {
        let s = MedianSummary {
            start: 100.0,
            min: 80.0,
            end: 100.0,
        };
        assert_eq!(
            s.to_string(),
            "Median game min = 80.0 (loss 20)\nMedian game end = 100.0 (loss 0)"
        );
    }

    #[test]
    fn single_position_renders() {
        let s = SeriesSet::from_tuples([[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]]);
        let out = render(&s, &svg_opts()).unwrap();
        assert!(out.bytes.starts_with(b"<svg"));
        assert_eq!(out.summary.end_loss(), 0);
    }

    #[test]
    fn svg_output_uses_palette() {
        let out = render(&series(), &svg_opts()).unwrap();
        let text = String::from_utf8(out.bytes).unwrap();
        for hex in ["#490092", "#006ddb", "#b66dff", "#6db6ff", "#b6dbff"] {
            assert!(text.contains(hex), "missing {hex}");
        }
        assert!(text.contains("Expected bankroll change over time"));
    }
}
