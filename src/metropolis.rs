// Single-site-flip Metropolis chain driving interchangeable estimators.

use rand::Rng;
use tracing::{debug, info};

use crate::error::{IsingError, Result};
use crate::observables::{
    EnergyEstimator, EnergyObservables, Estimator, SusceptibilityEstimator, BOLTZMANN,
};
use crate::system::SpinSystem;

/// Fraction of the steps discarded as equilibration is `1 / DISCARD_DIVISOR`.
pub const DISCARD_DIVISOR: u64 = 10;

/// Where a given step index falls in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Equilibrating,
    Measuring,
    Done,
}

/// `min(1, exp(-beta * delta_e))`.
///
/// Returns exactly `1.0` whenever `delta_e <= 0`.
#[inline(always)]
pub fn acceptance_probability(delta_e: f64, beta: f64) -> f64 {
    (-beta * delta_e).exp().min(1.0)
}

/// Number of leading steps that are not measured: `steps / 10`, truncated.
#[inline]
pub fn discard_count(steps: u64) -> u64 {
    steps / DISCARD_DIVISOR
}

/// Validated parameters of one Metropolis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metropolis {
    temperature: f64,
    beta: f64,
    steps: u64,
    discard: u64,
}

/// Result of a run: the estimator output plus chain diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport<T> {
    pub observables: T,
    pub accepted: u64,
    pub steps: u64,
    pub discard: u64,
    pub measured: u64,
}

impl<T> RunReport<T> {
    /// `accepted / steps`.
    pub fn acceptance_ratio(&self) -> f64 {
        self.accepted as f64 / self.steps as f64
    }
}

impl Metropolis {
    /// Reject parameters that would produce NaN or empty statistics.
    pub fn new(temperature: f64, steps: u64) -> Result<Self> {
        if !(temperature > 0.0 && temperature.is_finite()) {
            return Err(IsingError::InvalidTemperature(temperature));
        }
        if steps == 0 {
            return Err(IsingError::InvalidSteps(steps));
        }
        let discard = discard_count(steps);
        if discard >= steps {
            return Err(IsingError::NoMeasuredSamples { steps, discard });
        }
        Ok(Self {
            temperature,
            beta: 1.0 / (BOLTZMANN * temperature),
            steps,
            discard,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn discard(&self) -> u64 {
        self.discard
    }

    /// Steps that feed the estimator, `steps - discard`.
    pub fn measured(&self) -> u64 {
        self.steps - self.discard
    }

    pub fn phase(&self, step: u64) -> Phase {
        if step >= self.steps {
            Phase::Done
        } else if step >= self.discard {
            Phase::Measuring
        } else {
            Phase::Equilibrating
        }
    }

    /// Flip every site with probability 1/2, in site order.
    ///
    /// Not counted in `steps` nor in the acceptance ratio.
    pub fn randomize<R: Rng>(system: &mut SpinSystem, rng: &mut R) {
        for site in 0..system.site_count() {
            if rng.gen_bool(0.5) {
                system.toggle(site);
            }
        }
    }

    /// Randomize, then run `steps` proposals, feeding `estimator` after each
    /// measured step.
    pub fn run<R, E>(
        &self,
        system: &mut SpinSystem,
        rng: &mut R,
        mut estimator: E,
    ) -> Result<RunReport<E::Output>>
    where
        R: Rng,
        E: Estimator,
    {
        let sites = system.site_count();
        Self::randomize(system, rng);

        let mut energy = system.energy();
        let mut accepted = 0u64;

        for step in 0..self.steps {
            let site = rng.gen_range(0..sites);
            system.toggle(site);

            let new_energy = system.energy();
            let accept = acceptance_probability(new_energy - energy, self.beta);
            if rng.gen_bool(accept) {
                energy = new_energy;
                accepted += 1;
            } else {
                system.toggle(site);
            }

            if self.phase(step) == Phase::Measuring {
                estimator.record(system);
            }
        }

        #[cfg(debug_assertions)]
        system.verify_invariants()?;

        let observables = estimator.finish(system, self.temperature)?;
        let report = RunReport {
            observables,
            accepted,
            steps: self.steps,
            discard: self.discard,
            measured: self.measured(),
        };

        info!(
            sites,
            temperature = self.temperature,
            steps = self.steps,
            accepted,
            acceptance_ratio = report.acceptance_ratio(),
            "metropolis run finished"
        );
        debug!(
            same_direction = system.same_direction(),
            magnetization = system.magnetization(),
            "final state"
        );

        Ok(report)
    }
}

/// Mean energy, mean `(M/N)^2` and specific heat from one fresh run.
pub fn run_energy_observables<R: Rng>(
    system: &mut SpinSystem,
    temperature: f64,
    steps: u64,
    rng: &mut R,
) -> Result<EnergyObservables> {
    let sampler = Metropolis::new(temperature, steps)?;
    Ok(sampler.run(system, rng, EnergyEstimator::new())?.observables)
}

/// Magnetic susceptibility from one fresh run.
pub fn run_susceptibility<R: Rng>(
    system: &mut SpinSystem,
    temperature: f64,
    steps: u64,
    rng: &mut R,
) -> Result<f64> {
    let sampler = Metropolis::new(temperature, steps)?;
    Ok(sampler.run(system, rng, SusceptibilityEstimator::new())?.observables)
}
