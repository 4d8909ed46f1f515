pub mod error;
pub mod lattice;
pub mod system;
pub mod observables;
pub mod metropolis;
pub mod sweep;
pub mod output;
pub mod logging;

pub mod utils {
    pub mod rng;
}

pub use error::{IsingError, Result};
pub use lattice::{build_square_lattice, NeighborTable};
pub use metropolis::{
    acceptance_probability, run_energy_observables, run_susceptibility, Metropolis, Phase,
    RunReport,
};
pub use observables::{
    EnergyEstimator, EnergyObservables, Estimator, SusceptibilityEstimator,
};
pub use system::SpinSystem;
