//! Generational evolution engine.
//!
//! The caller supplies an initial population of [`Chromosome`](crate::genome::Chromosome)s
//! and a [`FitnessFn`]; [`GeneticAlgorithm`] evolves it. Each generation:
//!
//! 1. **Evaluate**: score every chromosome (cached from the previous step)
//! 2. **Compete**: a [`SelectionPolicy`] picks survivors
//! 3. **Reproduce**: a [`RecombinationPolicy`] refills the population
//! 4. **Mutate**: every chromosome is mutated with `p_mutate`
//! 5. **Bookkeeping**: best tracking, elitism, and on stagnation either
//!    quit or a [`RefreshPolicy`]
//!
//! Higher fitness is better.
//!
//! # Core Traits
//!
//! - [`Fitness`]: a comparable score
//! - [`FitnessFn`]: scores a chromosome
//! - [`SelectionPolicy`], [`RecombinationPolicy`], [`RefreshPolicy`]:
//!   injected strategies
//!
//! # Key Types
//!
//! - [`EngineConfig`]: seed and parallel evaluation, fixed at construction
//! - [`RunConfig`]: per-run budget, probabilities, elitism and stagnation limits
//! - [`GeneticAlgorithm`]: the engine
//! - [`GenerationStats`], [`RunSummary`]: observable results
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod recombination;
mod refresh;
mod runner;
mod selection;
mod types;

pub use config::{EngineConfig, RunConfig};
pub use recombination::{FitnessProportionate, RecombinationPolicy, UniformPairing};
pub use refresh::{RefreshPolicy, Remutate, Reseed};
pub use runner::{EngineState, GenerationStats, GeneticAlgorithm, Policies, RunSummary};
pub use selection::{Competition, FitnessRange, SelectionPolicy, Truncation, WeightedSurvival};
pub use types::{from_fn, try_from_fn, Fitness, FitnessFn, FnFitness, TryFnFitness};
