//! Energy, specific heat and susceptibility versus temperature on one lattice.
//
//  Run:  `cargo run --release --bin energy_scan -- --size 32 --steps 5000000`

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use ising::logging;
use ising::output::write_temperature_csv_to_path;
use ising::sweep::{energy_sweep, linspace, EnergySweepConfig};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Linear lattice size L (L x L sites)
    #[arg(long, default_value_t = 16)]
    size: usize,

    /// Metropolis steps per temperature
    #[arg(long, default_value_t = 1_000_000)]
    steps: u64,

    /// Lowest temperature
    #[arg(long, default_value_t = 1.0)]
    t_min: f64,

    /// Highest temperature
    #[arg(long, default_value_t = 4.0)]
    t_max: f64,

    /// Number of evenly spaced temperatures
    #[arg(long, default_value_t = 31)]
    t_count: usize,

    /// Coupling constant J
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    coupling: f64,

    /// Master seed; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV
    #[arg(short, long, default_value = "energy_scan.csv")]
    output: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<String>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let level = if args.quiet { Level::WARN } else { Level::INFO };
    logging::init(level, args.log_file.as_deref()).wrap_err("Unable to set up logging")?;

    let cfg = EnergySweepConfig {
        size: args.size,
        steps: args.steps,
        coupling: args.coupling,
        temperatures: linspace(args.t_min, args.t_max, args.t_count),
        master_seed: args.seed.unwrap_or_else(rand::random),
    };
    cfg.validate().wrap_err("Invalid run configuration")?;
    info!("Configuration:\n{cfg:#?}");

    let bar = ProgressBar::new(cfg.temperatures.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(" {bar:40.cyan/blue} {pos}/{len} temperatures [{elapsed_precise}]")
            .wrap_err("Invalid progress bar template")?,
    );

    let rows = energy_sweep(&cfg, |_| bar.inc(1)).wrap_err("Sweep failed")?;
    bar.finish();

    write_temperature_csv_to_path(&args.output, &rows)
        .wrap_err_with(|| format!("Unable to write results to {}", args.output))?;
    info!("Scan complete → {}", args.output);
    Ok(())
}
