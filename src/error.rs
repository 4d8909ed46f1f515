//! Error types for the Ising simulator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IsingError {
    #[error("temperature must be positive and finite, got {0}")]
    InvalidTemperature(f64),

    #[error("step count must be at least 1, got {0}")]
    InvalidSteps(u64),

    #[error("{steps} steps with {discard} discarded leaves no measured samples")]
    NoMeasuredSamples { steps: u64, discard: u64 },

    #[error("estimator finished with no recorded samples")]
    NoSamples,

    #[error("coupling constant must be finite, got {0}")]
    InvalidCoupling(f64),

    #[error("a spin system needs at least one site")]
    EmptySystem,

    #[error("neighbor table has {table} entries but the system has {sites} sites")]
    NeighborCountMismatch { sites: usize, table: usize },

    #[error("site {site} lists neighbor {neighbor}, outside 0..{sites}")]
    NeighborOutOfRange {
        site: usize,
        neighbor: usize,
        sites: usize,
    },

    #[error("site index {site} out of range 0..{sites}")]
    SiteOutOfRange { site: usize, sites: usize },

    #[error("{name} aggregate drifted: tracked {tracked}, recounted {recounted}")]
    CorruptedAggregate {
        name: &'static str,
        tracked: i64,
        recounted: i64,
    },

    #[error("invalid sweep configuration: {0}")]
    InvalidSweep(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, IsingError>;
