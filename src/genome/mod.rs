//! Genetic material: alphabets, genes, and chromosomes.
//!
//! - [`Alphabet`]: the symbol set a gene draws from
//! - [`Gene`]: a fixed-length symbol sequence with per-symbol mutation
//! - [`Chromosome`]: an ordered gene sequence with flattened single-point
//!   crossover
//!
//! All randomized operations take the caller's RNG so that an engine can
//! drive every draw from one seeded source.

mod alphabet;
mod chromosome;
mod gene;

pub use alphabet::Alphabet;
pub use chromosome::Chromosome;
pub use gene::Gene;
