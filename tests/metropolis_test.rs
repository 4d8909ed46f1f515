//! Metropolis chain: acceptance rule, schedule and reproducibility.

use ising::metropolis::{discard_count, Metropolis, Phase};
use ising::sweep::CRITICAL_TEMPERATURE;
use ising::{
    acceptance_probability, run_energy_observables, Estimator, IsingError, Result, SpinSystem,
    SusceptibilityEstimator,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rand_pcg::Pcg64;

/// Counts how often the sampler asks for a measurement.
#[derive(Default)]
struct CountingEstimator {
    records: u64,
}

impl Estimator for CountingEstimator {
    type Output = u64;

    fn record(&mut self, _system: &SpinSystem) {
        self.records += 1;
    }

    fn finish(self, _system: &SpinSystem, _temperature: f64) -> Result<u64> {
        Ok(self.records)
    }
}

#[test]
fn test_downhill_moves_always_accepted() {
    for beta in [1e-6, 0.1, 0.44, 1.0, 10.0, 1e6] {
        for delta_e in [-16.0, -8.0, -4.0, -1e-12, -0.0, 0.0] {
            assert_eq!(
                acceptance_probability(delta_e, beta),
                1.0,
                "dE={delta_e} beta={beta}"
            );
        }
    }
}

#[test]
fn test_uphill_moves_follow_boltzmann_factor() {
    let beta = 0.5;
    for delta_e in [2.0, 4.0, 8.0] {
        let p = acceptance_probability(delta_e, beta);
        assert_eq!(p, (-beta * delta_e).exp());
        assert!(p > 0.0 && p < 1.0);
    }
    // Underflow is a clean zero, still a valid probability.
    assert_eq!(acceptance_probability(1e6, 10.0), 0.0);
}

#[test]
fn test_discard_truncates() {
    assert_eq!(discard_count(5), 0);
    assert_eq!(discard_count(9), 0);
    assert_eq!(discard_count(10), 1);
    assert_eq!(discard_count(19), 1);
    assert_eq!(discard_count(100_000), 10_000);

    let ten = Metropolis::new(2.0, 10).unwrap();
    assert_eq!((ten.discard(), ten.measured()), (1, 9));
    let five = Metropolis::new(2.0, 5).unwrap();
    assert_eq!((five.discard(), five.measured()), (0, 5));
}

#[test]
fn test_measurement_count_matches_schedule() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    for (steps, expected) in [(1, 1), (5, 5), (10, 9), (25, 23), (1_000, 900)] {
        let mut s = SpinSystem::square(3, 3, 1.0).unwrap();
        let sampler = Metropolis::new(2.0, steps).unwrap();
        let report = sampler.run(&mut s, &mut rng, CountingEstimator::default()).unwrap();
        assert_eq!(report.observables, expected, "steps={steps}");
        assert_eq!(report.measured, expected);
        assert_eq!(report.steps, steps);
        assert!(report.accepted <= steps);
    }
}

#[test]
fn test_phases() {
    let m = Metropolis::new(1.0, 10).unwrap();
    assert_eq!(m.phase(0), Phase::Equilibrating);
    assert_eq!(m.phase(1), Phase::Measuring);
    assert_eq!(m.phase(9), Phase::Measuring);
    assert_eq!(m.phase(10), Phase::Done);
}

#[test]
fn test_invalid_configuration_fails_fast() {
    for t in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(
            matches!(Metropolis::new(t, 100), Err(IsingError::InvalidTemperature(_))),
            "temperature {t} accepted"
        );
    }
    assert!(matches!(Metropolis::new(1.0, 0), Err(IsingError::InvalidSteps(0))));

    let mut s = SpinSystem::square(2, 2, 1.0).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(0);
    assert!(run_energy_observables(&mut s, -2.0, 100, &mut rng).is_err());
    // Nothing ran, the system is still in its initial state.
    assert_eq!(s.magnetization(), -4);
}

#[test]
fn test_randomize_gives_roughly_half_up() {
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let mut s = SpinSystem::square(100, 100, 1.0).unwrap();
    Metropolis::randomize(&mut s, &mut rng);
    // 10^4 fair coins: |M| has standard deviation 100.
    assert!(s.magnetization().abs() < 500, "M = {}", s.magnetization());
    s.verify_invariants().unwrap();
}

#[test]
fn test_invariants_hold_after_run() {
    let mut rng = Pcg64::seed_from_u64(42);
    for (rows, cols) in [(1, 1), (2, 2), (3, 5), (8, 8)] {
        let mut s = SpinSystem::square(rows, cols, 1.0).unwrap();
        let sampler = Metropolis::new(CRITICAL_TEMPERATURE, 20_000).unwrap();
        sampler.run(&mut s, &mut rng, SusceptibilityEstimator::new()).unwrap();
        s.verify_invariants().unwrap();
    }
}

#[test]
fn test_critical_run_is_reproducible() {
    // -----------------------------------------------------------
    // 4x4, J = 1, T = T_c, 100k steps, fixed seed, twice.
    // -----------------------------------------------------------
    let run = || {
        let mut rng = ChaCha20Rng::seed_from_u64(0xDEADBEEF);
        let mut s = SpinSystem::square(4, 4, 1.0).unwrap();
        let sampler = Metropolis::new(CRITICAL_TEMPERATURE, 100_000).unwrap();
        let report = sampler.run(&mut s, &mut rng, SusceptibilityEstimator::new()).unwrap();
        (report, s.same_direction(), s.magnetization(), s.spins().to_vec())
    };

    let (first, bonds_a, m_a, spins_a) = run();
    let (second, bonds_b, m_b, spins_b) = run();

    assert_eq!(first.accepted, second.accepted);
    assert_eq!(first.observables.to_bits(), second.observables.to_bits());
    assert_eq!((bonds_a, m_a), (bonds_b, m_b));
    assert_eq!(spins_a, spins_b);

    let ratio = first.acceptance_ratio();
    assert!(
        (0.01..=0.99).contains(&ratio),
        "Acceptance rate {ratio:.3} is outside plausible range"
    );
}

#[test]
fn test_different_seeds_give_different_chains() {
    let chain = |seed| {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut s = SpinSystem::square(6, 6, 1.0).unwrap();
        let report = Metropolis::new(CRITICAL_TEMPERATURE, 50_000)
            .unwrap()
            .run(&mut s, &mut rng, CountingEstimator::default())
            .unwrap();
        (report.accepted, s.spins().to_vec())
    };
    assert_ne!(chain(1), chain(2));
}

#[test]
fn test_hot_chain_accepts_nearly_everything() {
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let mut s = SpinSystem::square(8, 8, 1.0).unwrap();
    let report = Metropolis::new(1e6, 10_000)
        .unwrap()
        .run(&mut s, &mut rng, CountingEstimator::default())
        .unwrap();
    assert!(report.acceptance_ratio() > 0.99);
}
