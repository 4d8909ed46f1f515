// sweep.rs - Independent runs over lattice sizes / temperatures, dispatched with rayon

use std::ops::RangeInclusive;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{IsingError, Result};
use crate::lattice::NeighborTable;
use crate::metropolis::{run_susceptibility, Metropolis};
use crate::observables::{EnergyEstimator, SusceptibilityEstimator};
use crate::system::SpinSystem;
use crate::utils::rng::{run_id, run_rng};

/// Critical temperature of the square-lattice model in units of `J / k_B`.
pub const CRITICAL_TEMPERATURE: f64 = 2.26918531421;

/// Exact value `2 / ln(1 + sqrt 2)`.
pub fn critical_temperature_exact() -> f64 {
    2.0 / (1.0 + 2.0_f64.sqrt()).ln()
}

/// Online mean / variance over repetitions (Welford).
#[derive(Debug, Default, Clone)]
pub struct RepetitionStats {
    n: u64,
    mean: f64,
    m2: f64,
}

impl RepetitionStats {
    pub fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Variance dividing by the number of repetitions.
    pub fn population_var(&self) -> f64 {
        if self.n > 0 { self.m2 / self.n as f64 } else { 0.0 }
    }

    pub fn population_std(&self) -> f64 {
        self.population_var().sqrt()
    }
}

/// Susceptibility versus lattice size at one temperature.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub min_size: usize,
    pub max_size: usize,
    pub steps: u64,
    pub repetitions: usize,
    pub coupling: f64,
    /// Defaults to `CRITICAL_TEMPERATURE * coupling` when unset.
    pub temperature: Option<f64>,
    pub master_seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_size: 2,
            max_size: 30,
            steps: 100_000_000,
            repetitions: 1,
            coupling: 1.0,
            temperature: None,
            master_seed: 0,
        }
    }
}

impl SweepConfig {
    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(CRITICAL_TEMPERATURE * self.coupling)
    }

    /// Linear lattice sizes `L`, each simulated on an `L x L` lattice.
    pub fn sizes(&self) -> RangeInclusive<usize> {
        self.min_size..=self.max_size
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_size < 1 {
            return Err(IsingError::InvalidSweep("min_size must be >= 1".into()));
        }
        if self.min_size > self.max_size {
            return Err(IsingError::InvalidSweep(format!(
                "min_size {} exceeds max_size {}",
                self.min_size, self.max_size
            )));
        }
        if self.repetitions < 1 {
            return Err(IsingError::InvalidSweep("repetitions must be >= 1".into()));
        }
        if !self.coupling.is_finite() {
            return Err(IsingError::InvalidCoupling(self.coupling));
        }
        Metropolis::new(self.temperature(), self.steps).map(|_| ())
    }
}

/// One output row of the size sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeResult {
    pub size: usize,
    /// Mean susceptibility over repetitions.
    pub mean: f64,
    /// Population standard deviation over repetitions.
    pub std: f64,
}

/// Run every size in parallel, repetitions of one size in sequence.
///
/// `on_size_done` is called from worker threads as each size finishes.
/// Rows come back ordered by size.
pub fn susceptibility_sweep<F>(config: &SweepConfig, on_size_done: F) -> Result<Vec<SizeResult>>
where
    F: Fn(&SizeResult) + Sync,
{
    config.validate()?;
    let temperature = config.temperature();
    let sizes: Vec<usize> = config.sizes().collect();

    info!(
        master_seed = config.master_seed,
        temperature,
        steps = config.steps,
        repetitions = config.repetitions,
        sizes = sizes.len(),
        "starting susceptibility sweep"
    );

    let mut rows = sizes
        .par_iter()
        .enumerate()
        .map(|(task, &size)| -> Result<SizeResult> {
            let table = Arc::new(NeighborTable::square(size, size));
            let mut stats = RepetitionStats::default();

            for rep in 0..config.repetitions {
                let mut rng = run_rng(config.master_seed, run_id(task, rep));
                let mut system = SpinSystem::new(size * size, config.coupling, Arc::clone(&table))?;
                let chi = run_susceptibility(&mut system, temperature, config.steps, &mut rng)?;
                debug!(size, repetition = rep, chi, "repetition done");
                stats.push(chi);
            }

            let row = SizeResult {
                size,
                mean: stats.mean(),
                std: stats.population_std(),
            };
            on_size_done(&row);
            Ok(row)
        })
        .collect::<Result<Vec<_>>>()?;

    rows.sort_by_key(|r| r.size);
    Ok(rows)
}

/// `count` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Energy observables versus temperature on one `size x size` lattice.
#[derive(Debug, Clone)]
pub struct EnergySweepConfig {
    pub size: usize,
    pub steps: u64,
    pub coupling: f64,
    pub temperatures: Vec<f64>,
    pub master_seed: u64,
}

impl Default for EnergySweepConfig {
    fn default() -> Self {
        Self {
            size: 16,
            steps: 1_000_000,
            coupling: 1.0,
            temperatures: linspace(1.0, 4.0, 31),
            master_seed: 0,
        }
    }
}

impl EnergySweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.size < 1 {
            return Err(IsingError::InvalidSweep("size must be >= 1".into()));
        }
        if self.temperatures.is_empty() {
            return Err(IsingError::InvalidSweep("no temperatures given".into()));
        }
        if !self.coupling.is_finite() {
            return Err(IsingError::InvalidCoupling(self.coupling));
        }
        for &t in &self.temperatures {
            Metropolis::new(t, self.steps)?;
        }
        Ok(())
    }
}

/// One output row of the temperature sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureResult {
    pub temperature: f64,
    pub mean_energy: f64,
    pub mean_msquare: f64,
    pub specific_heat: f64,
    pub susceptibility: f64,
    pub acceptance_ratio: f64,
}

/// Both estimators read the same chain at every temperature; temperatures run
/// in parallel and rows come back in input order.
pub fn energy_sweep<F>(config: &EnergySweepConfig, on_temperature_done: F) -> Result<Vec<TemperatureResult>>
where
    F: Fn(&TemperatureResult) + Sync,
{
    config.validate()?;
    let size = config.size;
    let table = Arc::new(NeighborTable::square(size, size));

    info!(
        master_seed = config.master_seed,
        size,
        steps = config.steps,
        temperatures = config.temperatures.len(),
        "starting energy sweep"
    );

    config
        .temperatures
        .par_iter()
        .enumerate()
        .map(|(task, &temperature)| -> Result<TemperatureResult> {
            let mut rng = run_rng(config.master_seed, run_id(task, 0));
            let mut system = SpinSystem::new(size * size, config.coupling, Arc::clone(&table))?;
            let sampler = Metropolis::new(temperature, config.steps)?;
            let report = sampler.run(
                &mut system,
                &mut rng,
                (EnergyEstimator::new(), SusceptibilityEstimator::new()),
            )?;
            let (energy, susceptibility) = report.observables;

            let row = TemperatureResult {
                temperature,
                mean_energy: energy.mean_energy,
                mean_msquare: energy.mean_msquare,
                specific_heat: energy.specific_heat,
                susceptibility,
                acceptance_ratio: report.acceptance_ratio(),
            };
            on_temperature_done(&row);
            Ok(row)
        })
        .collect()
}
