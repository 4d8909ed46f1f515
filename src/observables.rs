// observables.rs - Accumulators that turn a Metropolis trajectory into thermodynamics

use crate::error::{IsingError, Result};
use crate::system::SpinSystem;

/// Boltzmann constant; units are absorbed into `T` and `J`.
pub const BOLTZMANN: f64 = 1.0;

/// A measurement policy fed by the sampler once per measured step.
pub trait Estimator {
    type Output;

    /// Fold the current state of `system` into the running sums.
    fn record(&mut self, system: &SpinSystem);

    /// Reduce the running sums to the final observable(s).
    fn finish(self, system: &SpinSystem, temperature: f64) -> Result<Self::Output>;
}

/// Running first and second moments of an integer series.
///
/// Sums are kept exactly in `i128`, so the population variance computed from
/// them is never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MomentSums {
    count: u64,
    sum: i128,
    sum_sq: i128,
}

impl MomentSums {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, value: i64) {
        let v = value as i128;
        self.count += 1;
        self.sum += v;
        self.sum_sq += v * v;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.sum as f64 / self.count as f64 }
    }

    pub fn mean_sq(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.sum_sq as f64 / self.count as f64 }
    }

    /// `<x^2> - <x>^2`, dividing by the sample count.
    pub fn population_variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as i128;
        let numerator = n * self.sum_sq - self.sum * self.sum;
        numerator as f64 / (n * n) as f64
    }
}

/// Output of [`EnergyEstimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyObservables {
    /// `<E>`, extensive.
    pub mean_energy: f64,
    /// `<(M/N)^2>`.
    pub mean_msquare: f64,
    /// `Var(E) / (N T^2)`.
    pub specific_heat: f64,
}

/// Mean energy, mean normalized magnetization squared and specific heat.
///
/// Energy is `-J` times the integer bond sum, so the bond sum is what gets
/// accumulated and the energy moments are rescaled at the end.
#[derive(Debug, Clone, Default)]
pub struct EnergyEstimator {
    bonds: MomentSums,
    magnetization: MomentSums,
}

impl EnergyEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> u64 {
        self.bonds.count()
    }
}

impl Estimator for EnergyEstimator {
    type Output = EnergyObservables;

    #[inline]
    fn record(&mut self, system: &SpinSystem) {
        self.bonds.push(system.same_direction());
        self.magnetization.push(system.magnetization());
    }

    fn finish(self, system: &SpinSystem, temperature: f64) -> Result<EnergyObservables> {
        if self.bonds.count() == 0 {
            return Err(IsingError::NoSamples);
        }
        let j = system.interaction();
        let n = system.site_count() as f64;

        let mean_energy = -j * self.bonds.mean();
        let energy_variance = j * j * self.bonds.population_variance();
        let mean_msquare = self.magnetization.mean_sq() / (n * n);

        Ok(EnergyObservables {
            mean_energy,
            mean_msquare,
            specific_heat: energy_variance / (n * temperature * temperature),
        })
    }
}

/// Magnetic susceptibility `chi = beta * Var(M) / N` from raw magnetization.
#[derive(Debug, Clone, Default)]
pub struct SusceptibilityEstimator {
    magnetization: MomentSums,
}

impl SusceptibilityEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> u64 {
        self.magnetization.count()
    }

    /// `<M>` over the samples recorded so far.
    pub fn mean_magnetization(&self) -> f64 {
        self.magnetization.mean()
    }

    /// `<M^2> - <M>^2` over the samples recorded so far.
    pub fn magnetization_variance(&self) -> f64 {
        self.magnetization.population_variance()
    }
}

impl Estimator for SusceptibilityEstimator {
    type Output = f64;

    #[inline]
    fn record(&mut self, system: &SpinSystem) {
        self.magnetization.push(system.magnetization());
    }

    fn finish(self, system: &SpinSystem, temperature: f64) -> Result<f64> {
        if self.magnetization.count() == 0 {
            return Err(IsingError::NoSamples);
        }
        let beta = 1.0 / (BOLTZMANN * temperature);
        Ok(self.magnetization.population_variance() * beta / system.site_count() as f64)
    }
}

/// Two policies reading the same trajectory.
impl<A: Estimator, B: Estimator> Estimator for (A, B) {
    type Output = (A::Output, B::Output);

    #[inline]
    fn record(&mut self, system: &SpinSystem) {
        self.0.record(system);
        self.1.record(system);
    }

    fn finish(self, system: &SpinSystem, temperature: f64) -> Result<Self::Output> {
        Ok((
            self.0.finish(system, temperature)?,
            self.1.finish(system, temperature)?,
        ))
    }
}
