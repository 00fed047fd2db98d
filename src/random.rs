//! Random source construction.
//!
//! Every random draw made by the engine (gene generation, mutation,
//! crossover points, pairing, refresh) comes from one [`StdRng`], so a
//! seeded engine replays identically.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates an RNG from `seed`, or from fresh entropy when `None`.
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}
