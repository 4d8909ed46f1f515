//! Susceptibility of the square-lattice Ising model versus lattice size.
//!
//! For every `L` in `min_size..=max_size` the model on an `L x L` periodic
//! lattice is sampled `repetition` times at the critical temperature and the
//! mean and spread of the susceptibility are written as `L chi std` lines.
//
//  Run:  `cargo run --release -- result.txt 1000000 4 1.0`

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use ising::logging;
use ising::output::write_size_table_to_path;
use ising::sweep::{susceptibility_sweep, SweepConfig};
use tracing::{info, Level};

/// Susceptibility versus lattice size at T_c.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output table, one `L chi std` line per lattice size
    #[arg(default_value = "result.txt")]
    outfile: String,

    /// Metropolis steps per run
    #[arg(default_value_t = 100_000_000)]
    steps: u64,

    /// Independent runs per lattice size
    #[arg(default_value_t = 1)]
    repetition: usize,

    /// Coupling constant J
    #[arg(default_value_t = 1.0, allow_negative_numbers = true)]
    coupling: f64,

    /// Smallest linear lattice size
    #[arg(long, default_value_t = 2)]
    min_size: usize,

    /// Largest linear lattice size
    #[arg(long, default_value_t = 30)]
    max_size: usize,

    /// Temperature (default: T_c * J)
    #[arg(long)]
    temperature: Option<f64>,

    /// Master seed; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,

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

    // ------------------------------------------------------------
    let cfg = SweepConfig {
        min_size: args.min_size,
        max_size: args.max_size,
        steps: args.steps,
        repetitions: args.repetition,
        coupling: args.coupling,
        temperature: args.temperature,
        master_seed: args.seed.unwrap_or_else(rand::random),
    };
    cfg.validate().wrap_err("Invalid run configuration")?;
    info!("Configuration:\n{cfg:#?}");

    let sizes = cfg.sizes().count();
    let bar = ProgressBar::new(sizes as u64);
    bar.set_style(
        ProgressStyle::with_template(" {bar:40.cyan/blue} {pos}/{len} sizes [{elapsed_precise}]")
            .wrap_err("Invalid progress bar template")?,
    );

    let rows = susceptibility_sweep(&cfg, |_| bar.inc(1)).wrap_err("Sweep failed")?;
    bar.finish();

    // ------------------------------------------------------------
    write_size_table_to_path(&args.outfile, &rows)
        .wrap_err_with(|| format!("Unable to write results to {}", args.outfile))?;
    info!("Sweep complete → {}", args.outfile);
    Ok(())
}
