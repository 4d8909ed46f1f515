use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Mix `master` with `run_id` into a well-spread 64-bit seed (SplitMix64 finalizer).
pub fn run_seed(master: u64, run_id: u64) -> u64 {
    let mut x = master ^ run_id.wrapping_mul(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Per-run deterministic RNG. Distinct `run_id`s give independent streams.
pub fn run_rng(master: u64, run_id: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(run_seed(master, run_id))
}

/// Pack a lattice-size index and a repetition index into one run id.
#[inline]
pub fn run_id(task: usize, repetition: usize) -> u64 {
    ((task as u64) << 32) | repetition as u64
}
