use crate::report::output::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(
    name = "bandplot",
    version,
    about = "Percentile fan charts and roll-frequency plots for dice simulations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plot the median across many runs with 5/25/75/95th percentile bands.
    Medrange(MedrangeArgs),
    /// Plot observed roll-value frequencies against fair dice.
    Rollstats(RollstatsArgs),
    /// Count `[d1, d2]` rolls into one roll-count record.
    Tally(TallyArgs),
}

#[derive(Args)]
pub struct OutputArgs {
    /// From where to read records, one JSON value per line (`-` for stdin).
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// File to which to write the graph (`-` for stdout).
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,

    /// Output format [possible values: png, svg, svgz, pdf]
    #[arg(long, default_value = "png", value_parser = OutputFormat::from_str)]
    pub format: OutputFormat,

    #[arg(long, default_value_t = false)]
    pub transparent: bool,
}

#[derive(Args)]
pub struct MedrangeArgs {
    #[command(flatten)]
    pub io: OutputArgs,

    #[arg(long, value_enum, default_value_t = ModeArg::Runs)]
    pub mode: ModeArg,

    #[arg(long, default_value = "Expected bankroll change over time")]
    pub title: String,

    #[arg(long, default_value = "Roll number")]
    pub xlabel: String,

    #[arg(long, default_value = "Change in bankroll")]
    pub ylabel: String,

    /// Subtracted from every value before plotting.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub offset: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub ymin: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub ymax: Option<f64>,
}

#[derive(Args)]
pub struct RollstatsArgs {
    #[command(flatten)]
    pub io: OutputArgs,

    #[arg(long, default_value = "Rolls")]
    pub title: String,

    #[arg(long, default_value = "Roll value")]
    pub xlabel: String,

    #[arg(long, default_value = "Frequency")]
    pub ylabel: String,
}

#[derive(Args)]
pub struct TallyArgs {
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// One run sequence per line.
    #[value(name = "runs")]
    Runs,
    /// Seven lines, one per percentile tier.
    #[value(name = "dense")]
    Dense,
    /// One `[index, [7 percentiles]]` pair per line.
    #[value(name = "sparse")]
    Sparse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medrange_defaults() {
        let cli = Cli::try_parse_from(["bandplot", "medrange"]).unwrap();
        let Commands::Medrange(args) = cli.command else {
            panic!("expected medrange");
        };
        assert_eq!(args.io.format, OutputFormat::Png);
        assert_eq!(args.io.input, PathBuf::from("-"));
        assert!(matches!(args.mode, ModeArg::Runs));
        assert_eq!(args.offset, 0.0);
        assert!(args.ymin.is_none());
    }

    #[test]
    fn medrange_accepts_negative_overrides() {
        let cli = Cli::try_parse_from([
            "bandplot", "medrange", "--mode", "sparse", "--offset", "-500", "--ymin", "-20",
            "--ymax", "40", "-o", "out.svg", "--format", "svg",
        ])
        .unwrap();
        let Commands::Medrange(args) = cli.command else {
            panic!("expected medrange");
        };
        assert!(matches!(args.mode, ModeArg::Sparse));
        assert_eq!(args.io.format, OutputFormat::Svg);
        assert_eq!(args.offset, -500.0);
        assert_eq!(args.ymin, Some(-20.0));
        assert_eq!(args.ymax, Some(40.0));
    }

    #[test]
    fn rollstats_defaults() {
        let cli = Cli::try_parse_from(["bandplot", "rollstats", "--transparent"]).unwrap();
        let Commands::Rollstats(args) = cli.command else {
            panic!("expected rollstats");
        };
        assert_eq!(args.title, "Rolls");
        assert!(args.io.transparent);
    }

    #[test]
    fn unknown_format_is_rejected_while_parsing() {
        let err = Cli::try_parse_from(["bandplot", "medrange", "--format", "jpeg"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("unsupported output format"));
    }

    #[test]
    fn format_help_lists_choices() {
        use clap::CommandFactory;
        let mut cmd = Cli::command();
        let help = cmd
            .find_subcommand_mut("medrange")
            .unwrap()
            .render_help()
            .to_string();
        assert!(help.contains("png, svg, svgz, pdf"), "{help}");
    }
}
