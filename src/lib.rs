//! Symbolic-sequence genetic algorithm.
//!
//! Candidate solutions are [`Chromosome`](genome::Chromosome)s: ordered
//! lists of [`Gene`](genome::Gene)s, each a fixed-length run of symbols
//! drawn from an [`Alphabet`](genome::Alphabet). A caller-supplied fitness
//! function scores chromosomes and the
//! [`GeneticAlgorithm`](ga::GeneticAlgorithm) evolves a population toward
//! higher scores.
//!
//! - [`genome`]: genes, chromosomes, mutation and single-point crossover
//! - [`ga`]: the generational engine and its pluggable policies
//! - [`translate`]: decoding DNA into numbers for scoring
//! - [`random`]: seeded random sources
//! - [`error`]: the crate error type
//!
//! # Example
//!
//! ```
//! use u_genome::ga::{EngineConfig, GeneticAlgorithm, RunConfig};
//! use u_genome::genome::{Alphabet, Chromosome};
//! use u_genome::random::create_rng;
//! use u_genome::translate::{BinaryIntTranslator, TranslatedFitness};
//!
//! // Largest 8-bit value divisible by 7.
//! let fitness = TranslatedFitness::new(BinaryIntTranslator, |v: &[u64]| {
//!     if v[0] % 7 == 0 { v[0] as i64 } else { -1 }
//! });
//!
//! let mut rng = create_rng(3);
//! let population = Chromosome::random_batch(&[8], 30, &Alphabet::Binary, &mut rng).unwrap();
//! let mut ga = GeneticAlgorithm::new(population, fitness, EngineConfig::default().with_seed(3)).unwrap();
//! ga.run(&RunConfig::new(200, 0.05, 0.7)).unwrap();
//! assert!(ga.best_fitness() >= 0);
//! ```

pub mod error;
pub mod ga;
pub mod genome;
pub mod random;
pub mod translate;
