//! Engine and run configuration.
//!
//! [`EngineConfig`] is fixed when the engine is built; [`RunConfig`] is
//! passed to every [`run`](super::GeneticAlgorithm::run) call and can differ
//! between incremental runs.

use crate::error::{check_probability, invalid, Result};

/// Construction-time settings for [`GeneticAlgorithm`](super::GeneticAlgorithm).
///
/// # Examples
///
/// ```
/// use u_genome::ga::EngineConfig;
///
/// let config = EngineConfig::default().with_seed(42);
/// assert_eq!(config.seed, Some(42));
/// assert!(!config.parallel);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Seed for the engine's random source.
    ///
    /// `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Whether to evaluate chromosomes in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` cargo feature. Scores are
    /// joined in population order before ranking, so results do not depend
    /// on this flag.
    pub parallel: bool,
}

impl EngineConfig {
    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Parameters of a single [`run`](super::GeneticAlgorithm::run) call.
///
/// Builders store values as given; [`validate`](Self::validate) rejects
/// anything out of range instead of clamping it.
///
/// # Examples
///
/// ```
/// use u_genome::ga::RunConfig;
///
/// let config = RunConfig::new(500, 0.1, 0.65)
///     .with_refresh_after(40)
///     .with_quit_after(120);
/// assert!(config.elitist);
/// assert!(config.validate().is_ok());
///
/// assert!(RunConfig::new(10, 1.5, 0.5).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Maximum number of generations to run. Must be at least 1.
    pub generations: usize,

    /// Per-symbol mutation probability in `[0, 1]`.
    pub p_mutate: f64,

    /// Per-pair crossover probability in `[0, 1]`.
    pub p_crossover: f64,

    /// Replace the weakest chromosome with the best-ever one whenever a
    /// generation fails to improve.
    pub elitist: bool,

    /// Refresh the population after this many stagnant generations.
    pub refresh_after: Option<usize>,

    /// Stop after this many stagnant generations.
    pub quit_after: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            p_mutate: 0.1,
            p_crossover: 0.5,
            elitist: true,
            refresh_after: None,
            quit_after: None,
        }
    }
}

impl RunConfig {
    /// Creates an elitist configuration without refresh or early quit.
    pub fn new(generations: usize, p_mutate: f64, p_crossover: f64) -> Self {
        Self {
            generations,
            p_mutate,
            p_crossover,
            ..Self::default()
        }
    }

    /// Sets the generation budget.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the mutation probability.
    pub fn with_p_mutate(mut self, p: f64) -> Self {
        self.p_mutate = p;
        self
    }

    /// Sets the crossover probability.
    pub fn with_p_crossover(mut self, p: f64) -> Self {
        self.p_crossover = p;
        self
    }

    /// Enables or disables elitist replacement.
    pub fn with_elitist(mut self, elitist: bool) -> Self {
        self.elitist = elitist;
        self
    }

    /// Sets the stagnation count that triggers a refresh.
    pub fn with_refresh_after(mut self, n: usize) -> Self {
        self.refresh_after = Some(n);
        self
    }

    /// Sets the stagnation count that ends the run.
    pub fn with_quit_after(mut self, n: usize) -> Self {
        self.quit_after = Some(n);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `InvalidArgument` describing the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        if self.generations == 0 {
            return Err(invalid("generations must be at least 1"));
        }
        check_probability("p_mutate", self.p_mutate)?;
        check_probability("p_crossover", self.p_crossover)?;
        if self.refresh_after == Some(0) {
            return Err(invalid("refresh_after must be positive or None"));
        }
        if self.quit_after == Some(0) {
            return Err(invalid("quit_after must be positive or None"));
        }
        Ok(())
    }
}
