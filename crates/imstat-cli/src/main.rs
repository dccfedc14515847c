use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use console::Style;
use imstat_core::clip::ClipParams;
use imstat_core::pipeline::{run_imstat, StatConfig};
use imstat_core::report::{build_report, render_lines, FormatMode, ReturnShape};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imstat", about = "Compute pixel statistics over an image region")]
#[command(version)]
struct Cli {
    /// Image region string: a path with an optional [xmin:xmax,ymin:ymax]
    /// suffix (1-based, inclusive bounds)
    instring: String,

    /// Comma-separated statistics to report
    #[arg(long, default_value = imstat_core::consts::DEFAULT_FIELDS)]
    fields: String,

    /// Smallest accepted pixel value
    #[arg(long, default_value_t = f64::NEG_INFINITY)]
    lower: f64,

    /// Largest accepted pixel value
    #[arg(long, default_value_t = f64::INFINITY)]
    upper: f64,

    /// Number of sigma-clipping passes
    #[arg(long, default_value_t = 0)]
    nclip: usize,

    /// Low-side clipping threshold in sigma
    #[arg(long, default_value_t = imstat_core::consts::DEFAULT_LOW_SIGMA)]
    lsig: f64,

    /// High-side clipping threshold in sigma
    #[arg(long, default_value_t = imstat_core::consts::DEFAULT_HIGH_SIGMA)]
    usig: f64,

    /// Histogram bin width in units of the sample stddev
    #[arg(long, default_value_t = imstat_core::consts::DEFAULT_BINWIDTH)]
    binwidth: f64,

    /// Print a header line above the values (yes/no)
    #[arg(long, default_value = "yes")]
    format: String,

    /// Print the statistics to stdout (yes/no)
    #[arg(long = "Stdout", default_value = "yes", value_parser = parse_switch)]
    stdout: bool,

    /// Shape of the structured result (str/arr/dict)
    #[arg(long = "returnType", default_value = "str")]
    return_type: String,

    /// Statistics config file (TOML); replaces the statistics flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config = if let Some(ref config_path) = cli.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid statistics config")?
    } else {
        build_config_from_args(cli)
    };

    let base_dir = std::env::current_dir().context("Cannot determine working directory")?;

    let outcome = match run_imstat(&cli.instring, &base_dir, &config) {
        Ok(outcome) => outcome,
        Err(err) => {
            report_failure(err);
            return Ok(());
        }
    };

    if cli.stdout {
        match FormatMode::from_str(&cli.format) {
            Ok(format) => {
                for line in render_lines(&outcome.selection, format) {
                    println!("{line}");
                }
            }
            Err(err) => report_failure(err),
        }
    }

    match ReturnShape::from_str(&cli.return_type) {
        Ok(shape) => {
            let report = build_report(&outcome.selection, shape);
            debug!(report = ?report, "Structured report");
        }
        Err(err) => report_failure(err),
    }

    Ok(())
}

fn build_config_from_args(cli: &Cli) -> StatConfig {
    StatConfig {
        fields: cli.fields.clone(),
        binwidth: cli.binwidth,
        clip: ClipParams {
            lower: cli.lower,
            upper: cli.upper,
            nclip: cli.nclip,
            low_sigma: cli.lsig,
            high_sigma: cli.usig,
        },
    }
}

fn parse_switch(s: &str) -> std::result::Result<bool, String> {
    match s {
        "yes" | "true" => Ok(true),
        "no" | "false" => Ok(false),
        _ => Err(format!("expected yes, no, true, or false, got {s:?}")),
    }
}

/// Print a failure as a styled diagnostic on stderr. No statistics are
/// emitted and the process still exits normally.
fn report_failure(err: impl std::fmt::Display) {
    let style = Style::new().red().bold();
    eprintln!("{} {err}", style.apply_to("error:"));
}
