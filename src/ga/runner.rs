//! Generational evolution loop.
//!
//! [`GeneticAlgorithm`] owns a population and drives, per generation:
//! evaluate → compete → reproduce → mutate → bookkeeping (elitism, refresh,
//! quit).

use super::config::{EngineConfig, RunConfig};
use super::recombination::{FitnessProportionate, RecombinationPolicy};
use super::refresh::{RefreshPolicy, Reseed};
use super::selection::{Competition, FitnessRange, SelectionPolicy, WeightedSurvival};
use super::types::{Fitness, FitnessFn};
use crate::error::{invalid, EvolveError, Result};
use crate::genome::Chromosome;
use crate::random::rng_from;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use std::cmp::Ordering;
use std::time::{Duration, Instant};

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Built, never run.
    Ready,
    /// Inside [`GeneticAlgorithm::run`].
    Running,
    /// A run has finished (budget spent, stagnation quit, solved, or failed).
    /// Calling `run` again resumes from the current population.
    Terminated,
}

/// Bookkeeping recorded at the end of each generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats<S> {
    /// 1-based generation number, cumulative across runs.
    pub generation: usize,

    /// Fittest score of this generation before elitist replacement.
    pub generation_best: S,

    /// Best score observed so far.
    pub best: S,

    /// Whether this generation strictly improved on the best score.
    pub improved: bool,

    /// Whether the population was refreshed at the end of this generation.
    pub refreshed: bool,
}

/// Outcome of one [`run`](GeneticAlgorithm::run) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Generations completed in this call.
    pub generations_run: usize,

    /// Whether the run stopped on `quit_after`.
    pub stagnated: bool,

    /// Whether the run stopped on [`FitnessFn::is_solved`].
    pub solved: bool,

    /// Wall-clock duration of the call.
    pub elapsed: Duration,
}

/// The strategy objects an engine is composed of.
///
/// ```
/// use u_genome::ga::{Policies, Remutate, Truncation};
///
/// let policies = Policies::default()
///     .with_selection(Truncation::new(0.3).unwrap())
///     .with_refresh(Remutate::default());
/// ```
#[derive(Debug, Clone)]
pub struct Policies<S, C, H> {
    pub selection: S,
    pub recombination: C,
    pub refresh: H,
}

impl Default for Policies<WeightedSurvival, FitnessProportionate, Reseed> {
    fn default() -> Self {
        Self {
            selection: WeightedSurvival::default(),
            recombination: FitnessProportionate,
            refresh: Reseed::default(),
        }
    }
}

impl<S, C, H> Policies<S, C, H> {
    /// Replaces the selection policy.
    pub fn with_selection<S2: SelectionPolicy>(self, selection: S2) -> Policies<S2, C, H> {
        Policies {
            selection,
            recombination: self.recombination,
            refresh: self.refresh,
        }
    }

    /// Replaces the recombination policy.
    pub fn with_recombination<C2: RecombinationPolicy>(self, recombination: C2) -> Policies<S, C2, H> {
        Policies {
            selection: self.selection,
            recombination,
            refresh: self.refresh,
        }
    }

    /// Replaces the refresh policy.
    pub fn with_refresh<H2: RefreshPolicy>(self, refresh: H2) -> Policies<S, C, H2> {
        Policies {
            selection: self.selection,
            recombination: self.recombination,
            refresh,
        }
    }
}

/// A generational genetic algorithm over [`Chromosome`]s.
///
/// # Usage
///
/// ```
/// use u_genome::ga::{from_fn, EngineConfig, GeneticAlgorithm, RunConfig};
/// use u_genome::genome::{Alphabet, Chromosome};
/// use u_genome::random::create_rng;
///
/// let mut rng = create_rng(1);
/// let population = Chromosome::random_batch(&[16], 20, &Alphabet::Binary, &mut rng).unwrap();
/// let ones = from_fn(|c: &Chromosome| c.dna().matches('1').count());
///
/// let mut ga = GeneticAlgorithm::new(population, ones, EngineConfig::default().with_seed(42)).unwrap();
/// let best = ga.run(&RunConfig::new(100, 0.05, 0.7)).unwrap();
/// assert_eq!(best.len(), 16);
/// assert!(ga.best_fitness() >= 8);
/// ```
pub struct GeneticAlgorithm<F, S = WeightedSurvival, C = FitnessProportionate, H = Reseed>
where
    F: FitnessFn,
{
    fitness: F,
    policies: Policies<S, C, H>,
    config: EngineConfig,
    rng: StdRng,

    population: Vec<Chromosome>,
    scores: Vec<F::Score>,

    best: Chromosome,
    best_fitness: F::Score,
    stagnation: usize,
    generation: usize,
    overall_range: FitnessRange,

    state: EngineState,
    history: Vec<GenerationStats<F::Score>>,
    last_run: Option<RunSummary>,
}

/// What bookkeeping decided about a generation.
struct StepOutcome {
    quit: bool,
}

impl<F: FitnessFn> GeneticAlgorithm<F> {
    /// Creates an engine with the default policies.
    ///
    /// See [`with_policies`](Self::with_policies) for the checks performed.
    pub fn new(population: Vec<Chromosome>, fitness: F, config: EngineConfig) -> Result<Self> {
        Self::with_policies(population, fitness, config, Policies::default())
    }
}

impl<F, S, C, H> GeneticAlgorithm<F, S, C, H>
where
    F: FitnessFn,
    S: SelectionPolicy,
    C: RecombinationPolicy,
    H: RefreshPolicy,
{
    /// Creates an engine from an initial population and injected policies.
    ///
    /// The population must hold at least two chromosomes, all commensurate
    /// (same gene count, lengths and alphabets). Every chromosome is scored
    /// once here to seed the best-known solution; a failing evaluation is
    /// returned as `FitnessEvaluation`.
    pub fn with_policies(
        population: Vec<Chromosome>,
        fitness: F,
        config: EngineConfig,
        policies: Policies<S, C, H>,
    ) -> Result<Self> {
        if population.len() < 2 {
            return Err(invalid(format!(
                "population must hold at least 2 chromosomes, got {}",
                population.len()
            )));
        }
        if let Some(pos) = population[1..]
            .iter()
            .position(|c| !c.is_commensurate(&population[0]))
        {
            return Err(invalid(format!(
                "chromosome {} does not share the layout of chromosome 0",
                pos + 1
            )));
        }

        let scores = evaluate_population(&fitness, &population, config.parallel)?;
        let overall_range = FitnessRange::of(&scores)
            .ok_or_else(|| invalid("population must not be empty"))?;
        let best_idx = best_index(&scores);
        let best = population[best_idx].clone();
        let best_fitness = scores[best_idx];

        debug!(
            "engine ready: population {}, chromosome length {}, initial best {:.6}",
            population.len(),
            best.len(),
            best_fitness.to_f64()
        );

        Ok(Self {
            rng: rng_from(config.seed),
            fitness,
            policies,
            config,
            population,
            scores,
            best,
            best_fitness,
            stagnation: 0,
            generation: 0,
            overall_range,
            state: EngineState::Ready,
            history: Vec::new(),
            last_run: None,
        })
    }

    /// Evolves the current population for up to `config.generations`
    /// generations and returns a snapshot of the best chromosome so far.
    ///
    /// The configuration is validated before any generation runs. Calling
    /// `run` again continues from the current population, best solution and
    /// stagnation count.
    ///
    /// If the fitness function fails, the error is returned and the engine
    /// keeps the population of the last completed generation.
    pub fn run(&mut self, config: &RunConfig) -> Result<Chromosome> {
        config.validate()?;

        info!(
            "run start at generation {}: budget {}, p_mutate {}, p_crossover {}, elitist {}",
            self.generation, config.generations, config.p_mutate, config.p_crossover, config.elitist
        );

        self.state = EngineState::Running;
        let start = Instant::now();
        let result = self.run_generations(config);
        self.state = EngineState::Terminated;

        let (generations_run, stagnated, solved) = result?;
        let summary = RunSummary {
            generations_run,
            stagnated,
            solved,
            elapsed: start.elapsed(),
        };
        info!(
            "run end after {} generations ({:?}): best {:.6}",
            summary.generations_run,
            summary.elapsed,
            self.best_fitness.to_f64()
        );
        self.last_run = Some(summary);

        Ok(self.best.clone())
    }

    fn run_generations(&mut self, config: &RunConfig) -> Result<(usize, bool, bool)> {
        if self.fitness.is_solved(self.best_fitness) {
            info!("already solved at generation {}", self.generation);
            return Ok((0, false, true));
        }
        for completed in 1..=config.generations {
            let outcome = self.step(config)?;
            if outcome.quit {
                info!(
                    "quitting on generation {} after {} generations without improvement",
                    self.generation, self.stagnation
                );
                return Ok((completed, true, false));
            }
            if self.fitness.is_solved(self.best_fitness) {
                info!("solved on generation {}", self.generation);
                return Ok((completed, false, true));
            }
        }
        Ok((config.generations, false, false))
    }

    /// Runs one generation. Nothing is committed unless every step succeeds.
    fn step(&mut self, config: &RunConfig) -> Result<StepOutcome> {
        let n = self.population.len();

        // Compete
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| descending(self.scores[a], self.scores[b]));
        let ranked: Vec<F::Score> = order.iter().map(|&i| self.scores[i]).collect();
        let generation_range =
            FitnessRange::of(&ranked).ok_or_else(|| invalid("population must not be empty"))?;
        let overall_range = self.overall_range.union(generation_range);
        let competition = Competition {
            ranked: &ranked,
            generation: generation_range,
            overall: overall_range,
        };

        let mut positions = self.policies.selection.compete(&competition, &mut self.rng);
        positions.sort_unstable();
        positions.dedup();
        match positions.last() {
            None => return Err(EvolveError::Policy("selection returned no survivors".into())),
            Some(&last) if last >= n => {
                return Err(EvolveError::Policy(format!(
                    "selection returned position {last} for a population of {n}"
                )))
            }
            Some(_) => {}
        }
        trace!("generation {}: {} of {n} survive", self.generation + 1, positions.len());

        let survivors: Vec<Chromosome> = positions
            .iter()
            .map(|&p| self.population[order[p]].clone())
            .collect();
        let survivor_scores: Vec<F::Score> = positions.iter().map(|&p| ranked[p]).collect();

        // Reproduce
        let mut next = self.policies.recombination.reproduce(
            survivors,
            &survivor_scores,
            n,
            config.p_crossover,
            &mut self.rng,
        )?;
        if next.len() != n {
            return Err(EvolveError::Policy(format!(
                "reproduction produced {} chromosomes, expected {n}",
                next.len()
            )));
        }

        // Mutate
        for chromosome in &mut next {
            chromosome.mutate(config.p_mutate, &mut self.rng)?;
        }

        // Bookkeeping
        let mut scores = evaluate_population(&self.fitness, &next, self.config.parallel)?;
        let gen_best_idx = best_index(&scores);
        let generation_best = scores[gen_best_idx];
        let mut overall_range = overall_range.union(range_of(&scores)?);

        let mut stagnation = self.stagnation;
        let mut new_best = None;
        let mut refreshed = false;
        let mut quit = false;
        let improved = generation_best > self.best_fitness;

        if improved {
            new_best = Some((next[gen_best_idx].clone(), generation_best));
            stagnation = 0;
        } else {
            stagnation += 1;

            let mut elite_slot = None;
            if config.elitist {
                let weakest = worst_index(&scores);
                next[weakest] = self.best.clone();
                scores[weakest] = self.best_fitness;
                elite_slot = Some(weakest);
            }

            if config.quit_after.is_some_and(|limit| stagnation >= limit) {
                quit = true;
            } else if config.refresh_after.is_some_and(|limit| stagnation >= limit) {
                info!(
                    "refreshing on generation {} after {stagnation} generations without improvement",
                    self.generation + 1
                );
                // Protect the best-ever copy itself, not merely a member tying its score.
                let protected = elite_slot
                    .or_else(|| next.iter().position(|c| *c == self.best))
                    .unwrap_or_else(|| best_index(&scores));
                self.policies
                    .refresh
                    .refresh(&mut next, protected, &mut self.rng)?;
                scores = evaluate_population(&self.fitness, &next, self.config.parallel)?;
                overall_range = overall_range.union(range_of(&scores)?);

                let idx = best_index(&scores);
                if scores[idx] > self.best_fitness {
                    new_best = Some((next[idx].clone(), scores[idx]));
                }
                refreshed = true;
                stagnation = 0;
            }
        }

        // Commit
        self.population = next;
        self.scores = scores;
        self.stagnation = stagnation;
        self.overall_range = overall_range;
        if let Some((best, best_fitness)) = new_best {
            self.best = best;
            self.best_fitness = best_fitness;
        }
        self.generation += 1;
        self.history.push(GenerationStats {
            generation: self.generation,
            generation_best,
            best: self.best_fitness,
            improved,
            refreshed,
        });

        debug!(
            "generation {}: generation best {:.6}, best {:.6}, stagnation {}",
            self.generation,
            generation_best.to_f64(),
            self.best_fitness.to_f64(),
            self.stagnation
        );

        Ok(StepOutcome { quit })
    }

    /// Scores one chromosome with the injected fitness function.
    pub fn evaluate(&self, chromosome: &Chromosome) -> Result<F::Score> {
        self.fitness
            .evaluate(chromosome)
            .map_err(EvolveError::FitnessEvaluation)
    }
}

impl<F: FitnessFn, S, C, H> GeneticAlgorithm<F, S, C, H> {
    /// The current population.
    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    /// Cached scores, aligned with [`population`](Self::population).
    pub fn scores(&self) -> &[F::Score] {
        &self.scores
    }

    /// The best chromosome observed so far (an owned snapshot).
    pub fn best(&self) -> &Chromosome {
        &self.best
    }

    /// Score of [`best`](Self::best).
    pub fn best_fitness(&self) -> F::Score {
        self.best_fitness
    }

    /// Generations since the best score last strictly improved (or since the
    /// last refresh).
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    /// Generations completed across all runs.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Where the engine is in its lifecycle.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Per-generation statistics across all runs.
    pub fn history(&self) -> &[GenerationStats<F::Score>] {
        &self.history
    }

    /// Summary of the most recent successful `run` call.
    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }

    /// The injected fitness function.
    pub fn fitness(&self) -> &F {
        &self.fitness
    }

    /// The construction-time configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the engine, returning its population.
    pub fn into_population(self) -> Vec<Chromosome> {
        self.population
    }
}

/// Orders scores best first; incomparable scores tie.
fn descending<S: Fitness>(a: S, b: S) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Index of the first highest score.
fn best_index<S: Fitness>(scores: &[S]) -> usize {
    let mut best = 0;
    for (i, s) in scores.iter().enumerate().skip(1) {
        if *s > scores[best] {
            best = i;
        }
    }
    best
}

/// Index of the first lowest score.
fn worst_index<S: Fitness>(scores: &[S]) -> usize {
    let mut worst = 0;
    for (i, s) in scores.iter().enumerate().skip(1) {
        if *s < scores[worst] {
            worst = i;
        }
    }
    worst
}

fn range_of<S: Fitness>(scores: &[S]) -> Result<FitnessRange> {
    FitnessRange::of(scores).ok_or_else(|| invalid("population must not be empty"))
}

fn evaluate_sequential<F: FitnessFn>(
    fitness: &F,
    population: &[Chromosome],
) -> Result<Vec<F::Score>> {
    population
        .iter()
        .map(|c| fitness.evaluate(c))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(EvolveError::FitnessEvaluation)
}

/// Scores every chromosome, in population order.
#[cfg(feature = "parallel")]
fn evaluate_population<F: FitnessFn>(
    fitness: &F,
    population: &[Chromosome],
    parallel: bool,
) -> Result<Vec<F::Score>> {
    use rayon::prelude::*;

    if parallel {
        population
            .par_iter()
            .map(|c| fitness.evaluate(c))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(EvolveError::FitnessEvaluation)
    } else {
        evaluate_sequential(fitness, population)
    }
}

/// Scores every chromosome, in population order.
#[cfg(not(feature = "parallel"))]
fn evaluate_population<F: FitnessFn>(
    fitness: &F,
    population: &[Chromosome],
    _parallel: bool,
) -> Result<Vec<F::Score>> {
    evaluate_sequential(fitness, population)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::ga::{from_fn, try_from_fn, Remutate, Reseed, Truncation, UniformPairing};
    use crate::genome::{Alphabet, Gene};
    use crate::random::create_rng;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Arc;

    fn random_population(seed: u64, n: usize, len: usize) -> Vec<Chromosome> {
        let mut rng = create_rng(seed);
        Chromosome::random_batch(&[len], n, &Alphabet::Binary, &mut rng).unwrap()
    }

    fn count_ones(c: &Chromosome) -> usize {
        c.dna().matches('1').count()
    }

    fn seeded() -> EngineConfig {
        EngineConfig::default().with_seed(42)
    }

    // ---- OneMax with a target: maximize the number of '1' symbols ----

    struct OneMax {
        target: usize,
    }

    impl FitnessFn for OneMax {
        type Score = usize;

        fn evaluate(&self, chromosome: &Chromosome) -> std::result::Result<usize, BoxError> {
            Ok(count_ones(chromosome))
        }

        fn is_solved(&self, best: usize) -> bool {
            best >= self.target
        }
    }

    #[test]
    fn test_new_rejects_small_population() {
        let population = random_population(1, 1, 8);
        assert!(matches!(
            GeneticAlgorithm::new(population, from_fn(count_ones), seeded()),
            Err(EvolveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_new_rejects_incommensurate_population() {
        let mut population = random_population(1, 3, 8);
        population.push(Chromosome::new(vec![Gene::binary("0101").unwrap()]).unwrap());
        assert!(matches!(
            GeneticAlgorithm::new(population, from_fn(count_ones), seeded()),
            Err(EvolveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_new_propagates_fitness_failure() {
        let population = random_population(1, 4, 8);
        let failing = try_from_fn(|_: &Chromosome| -> std::result::Result<f64, BoxError> {
            Err("boom".into())
        });
        assert!(matches!(
            GeneticAlgorithm::new(population, failing, seeded()),
            Err(EvolveError::FitnessEvaluation(_))
        ));
    }

    #[test]
    fn test_initial_best_is_population_best() {
        let population = random_population(3, 10, 16);
        let expected = population.iter().map(count_ones).max().unwrap();
        let ga = GeneticAlgorithm::new(population, from_fn(count_ones), seeded()).unwrap();
        assert_eq!(ga.best_fitness(), expected);
        assert_eq!(count_ones(ga.best()), expected);
        assert_eq!(ga.state(), EngineState::Ready);
        assert_eq!(ga.stagnation(), 0);
        assert_eq!(ga.generation(), 0);
    }

    #[test]
    fn test_run_validates_before_running() {
        let population = random_population(3, 10, 16);
        let mut ga = GeneticAlgorithm::new(population, from_fn(count_ones), seeded()).unwrap();
        let before = ga.population().to_vec();

        for config in [
            RunConfig::new(0, 0.1, 0.5),
            RunConfig::new(10, 1.1, 0.5),
            RunConfig::new(10, 0.1, -0.5),
            RunConfig::new(10, 0.1, 0.5).with_quit_after(0),
            RunConfig::new(10, 0.1, 0.5).with_refresh_after(0),
        ] {
            assert!(matches!(ga.run(&config), Err(EvolveError::InvalidArgument(_))));
        }
        assert_eq!(ga.generation(), 0);
        assert_eq!(ga.state(), EngineState::Ready);
        assert_eq!(ga.population(), &before[..]);
    }

    #[test]
    fn test_onemax_convergence() {
        let population = random_population(7, 20, 20);
        let mut ga = GeneticAlgorithm::new(population, from_fn(count_ones), seeded()).unwrap();
        let initial = ga.best_fitness();

        let best = ga.run(&RunConfig::new(200, 0.02, 0.7)).unwrap();

        assert!(ga.best_fitness() >= 16, "expected >= 16 ones, got {}", ga.best_fitness());
        assert!(ga.best_fitness() >= initial);
        assert_eq!(count_ones(&best), ga.best_fitness());
        assert_eq!(ga.state(), EngineState::Terminated);
    }

    #[test]
    fn test_deterministic_under_seed() {
        let run = || {
            let population = random_population(11, 12, 24);
            let mut ga = GeneticAlgorithm::new(population, from_fn(count_ones), seeded()).unwrap();
            let best = ga
                .run(&RunConfig::new(40, 0.05, 0.6).with_refresh_after(5))
                .unwrap();
            (best, ga.history().to_vec(), ga.population().to_vec())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_population_size_invariant() {
        let population = random_population(5, 9, 12);
        let mut ga = GeneticAlgorithm::new(population, from_fn(count_ones), seeded()).unwrap();
        for (p_mutate, p_crossover) in [(0.0, 0.0), (1.0, 1.0), (0.3, 0.8), (0.01, 0.0)] {
            for _ in 0..10 {
                ga.run(&RunConfig::new(1, p_mutate, p_crossover)).unwrap();
                assert_eq!(ga.population().len(), 9);
                assert_eq!(ga.scores().len(), 9);
            }
        }
    }

    #[test]
    fn test_best_fitness_is_monotonic() {
        let population = random_population(5, 10, 32);
        let mut ga = GeneticAlgorithm::new(population, from_fn(count_ones), seeded()).unwrap();
        let initial = ga.best_fitness();
        ga.run(&RunConfig::new(80, 0.2, 0.9)).unwrap();

        let bests: Vec<usize> = ga.history().iter().map(|s| s.best).collect();
        assert!(bests[0] >= initial);
        for window in bests.windows(2) {
            assert!(window[1] >= window[0], "best regressed: {window:?}");
        }
    }

    #[test]
    fn test_elitism_keeps_best_in_population() {
        let population = random_population(8, 10, 32);
        let mut ga = GeneticAlgorithm::new(population, from_fn(count_ones), seeded()).unwrap();
        // Heavy mutation makes the population regress without elitism.
        for _ in 0..30 {
            ga.run(&RunConfig::new(1, 0.3, 0.5)).unwrap();
            assert!(ga.population().contains(ga.best()));
            assert!(ga.scores().contains(&ga.best_fitness()));
        }
    }

    #[test]
    fn test_scores_match_population() {
        let population = random_population(8, 10, 16);
        let mut ga = GeneticAlgorithm::new(population, from_fn(count_ones), seeded()).unwrap();
        ga.run(&RunConfig::new(25, 0.1, 0.5).with_refresh_after(3)).unwrap();
        for (c, &s) in ga.population().iter().zip(ga.scores()) {
            assert_eq!(count_ones(c), s);
        }
    }

    #[test]
    fn test_quit_after_stagnation() {
        let population = random_population(2, 10, 8);
        let mut ga = GeneticAlgorithm::new(population, from_fn(|_: &Chromosome| 0.0), seeded()).unwrap();
        let best = ga
            .run(&RunConfig::new(100, 0.1, 0.5).with_quit_after(20))
            .unwrap();

        let summary = ga.last_run().unwrap();
        assert_eq!(summary.generations_run, 20);
        assert!(summary.stagnated);
        assert!(!summary.solved);
        assert_eq!(ga.history().len(), 20);
        assert_eq!(&best, ga.best());
        assert_eq!(ga.state(), EngineState::Terminated);
    }

    #[test]
    fn test_quit_checked_before_refresh() {
        let population = random_population(2, 10, 8);
        let mut ga = GeneticAlgorithm::new(population, from_fn(|_: &Chromosome| 0i32), seeded()).unwrap();
        ga.run(&RunConfig::new(50, 0.1, 0.5).with_refresh_after(3).with_quit_after(3))
            .unwrap();
        assert_eq!(ga.last_run().unwrap().generations_run, 3);
        assert!(ga.history().iter().all(|s| !s.refreshed));
    }

    #[test]
    fn test_refresh_resets_stagnation() {
        let population = random_population(2, 10, 8);
        let mut ga = GeneticAlgorithm::new(population, from_fn(|_: &Chromosome| 1u32), seeded()).unwrap();
        ga.run(&RunConfig::new(12, 0.1, 0.5).with_refresh_after(5)).unwrap();

        let refreshed: Vec<usize> = ga
            .history()
            .iter()
            .filter(|s| s.refreshed)
            .map(|s| s.generation)
            .collect();
        assert_eq!(refreshed, vec![5, 10]);
        assert_eq!(ga.stagnation(), 2);
        assert_eq!(ga.last_run().unwrap().generations_run, 12);
    }

    #[test]
    fn test_fitness_failure_keeps_last_generation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let flaky = try_from_fn(move |c: &Chromosome| -> std::result::Result<usize, BoxError> {
            // 10 initial evaluations, then 10 per generation; the third generation fails.
            if counter.fetch_add(1, AtomicOrdering::SeqCst) >= 35 {
                Err("evaluator crashed".into())
            } else {
                Ok(count_ones(c))
            }
        });

        let population = random_population(4, 10, 16);
        let mut ga = GeneticAlgorithm::new(population, flaky, seeded()).unwrap();
        let err = ga.run(&RunConfig::new(10, 0.1, 0.5)).unwrap_err();

        assert!(matches!(err, EvolveError::FitnessEvaluation(_)));
        assert_eq!(ga.generation(), 2);
        assert_eq!(ga.history().len(), 2);
        assert_eq!(ga.population().len(), 10);
        assert_eq!(ga.scores().len(), 10);
        assert!(ga.last_run().is_none());
        assert_eq!(ga.state(), EngineState::Terminated);
    }

    #[test]
    fn test_incremental_runs_resume() {
        let population = random_population(6, 10, 16);
        let mut ga = GeneticAlgorithm::new(population, from_fn(count_ones), seeded()).unwrap();
        ga.run(&RunConfig::new(5, 0.05, 0.5)).unwrap();
        let mid_best = ga.best_fitness();
        let mid_population = ga.population().to_vec();

        ga.run(&RunConfig::new(5, 0.05, 0.5)).unwrap();
        assert_eq!(ga.generation(), 10);
        assert_eq!(ga.history().len(), 10);
        assert_eq!(ga.history()[5].generation, 6);
        assert!(ga.best_fitness() >= mid_best);
        assert_ne!(ga.population(), &mid_population[..]);
    }

    #[test]
    fn test_stagnation_carries_across_runs() {
        let population = random_population(6, 10, 8);
        let mut ga = GeneticAlgorithm::new(population, from_fn(|_: &Chromosome| 0u64), seeded()).unwrap();
        ga.run(&RunConfig::new(4, 0.1, 0.5)).unwrap();
        assert_eq!(ga.stagnation(), 4);
        ga.run(&RunConfig::new(10, 0.1, 0.5).with_quit_after(6)).unwrap();
        assert_eq!(ga.last_run().unwrap().generations_run, 2);
    }

    #[test]
    fn test_is_solved_stops_early() {
        let population = random_population(9, 20, 10);
        let mut ga = GeneticAlgorithm::new(population, OneMax { target: 10 }, seeded()).unwrap();
        let best = ga.run(&RunConfig::new(5000, 0.05, 0.7)).unwrap();

        let summary = ga.last_run().unwrap();
        assert!(summary.solved);
        assert!(summary.generations_run < 5000);
        assert_eq!(best.dna(), "1111111111");
    }

    #[test]
    fn test_alternative_policies() {
        let population = random_population(10, 16, 20);
        let policies = Policies::default()
            .with_selection(Truncation::default())
            .with_recombination(UniformPairing)
            .with_refresh(Remutate::default());
        let mut ga =
            GeneticAlgorithm::with_policies(population, from_fn(count_ones), seeded(), policies)
                .unwrap();
        let initial = ga.best_fitness();
        ga.run(&RunConfig::new(60, 0.03, 0.7).with_refresh_after(10)).unwrap();
        assert!(ga.best_fitness() >= initial);
        assert_eq!(ga.population().len(), 16);
    }

    #[test]
    fn test_parallel_flag_does_not_change_results() {
        let run = |parallel: bool| {
            let population = random_population(12, 12, 16);
            let config = EngineConfig::default().with_seed(5).with_parallel(parallel);
            let mut ga = GeneticAlgorithm::new(population, from_fn(count_ones), config).unwrap();
            ga.run(&RunConfig::new(20, 0.05, 0.6)).unwrap();
            (ga.best().clone(), ga.history().to_vec())
        };
        assert_eq!(run(false), run(true));
    }

    // ---- Policy contract enforcement ----

    struct NobodySurvives;

    impl SelectionPolicy for NobodySurvives {
        fn compete<S: Fitness, R: rand::Rng>(
            &self,
            _competition: &Competition<'_, S>,
            _rng: &mut R,
        ) -> Vec<usize> {
            Vec::new()
        }
    }

    struct Shrinking;

    impl RecombinationPolicy for Shrinking {
        fn reproduce<S: Fitness, R: rand::Rng>(
            &self,
            survivors: Vec<Chromosome>,
            _scores: &[S],
            _target_size: usize,
            _p_crossover: f64,
            _rng: &mut R,
        ) -> Result<Vec<Chromosome>> {
            Ok(survivors.into_iter().take(1).collect())
        }
    }

    #[test]
    fn test_policy_violations_are_reported() {
        let population = random_population(1, 6, 8);
        let policies = Policies::default().with_selection(NobodySurvives);
        let mut ga =
            GeneticAlgorithm::with_policies(population.clone(), from_fn(count_ones), seeded(), policies)
                .unwrap();
        assert!(matches!(
            ga.run(&RunConfig::default()),
            Err(EvolveError::Policy(_))
        ));
        assert_eq!(ga.population(), &population[..]);

        let policies = Policies::default().with_recombination(Shrinking);
        let mut ga =
            GeneticAlgorithm::with_policies(population, from_fn(count_ones), seeded(), policies)
                .unwrap();
        assert!(matches!(
            ga.run(&RunConfig::default()),
            Err(EvolveError::Policy(_))
        ));
        assert_eq!(ga.population().len(), 6);
    }

    #[test]
    fn test_evaluate_wraps_errors() {
        let population = random_population(1, 3, 4);
        let ga = GeneticAlgorithm::new(population, from_fn(count_ones), seeded()).unwrap();
        let c = Chromosome::new(vec![Gene::binary("1101").unwrap()]).unwrap();
        assert_eq!(ga.evaluate(&c).unwrap(), 3);
    }

    #[test]
    fn test_refresh_under_elitism_keeps_best_copy() {
        // Capped score: many members tie the best, only one slot holds the best-ever copy.
        let capped = from_fn(|c: &Chromosome| count_ones(c).min(7));
        let population = random_population(21, 10, 12);
        let policies = Policies::default().with_refresh(Reseed::new(1.0).unwrap());
        let mut ga = GeneticAlgorithm::with_policies(population, capped, seeded(), policies).unwrap();

        let config = RunConfig::new(1, 0.1, 0.5).with_refresh_after(1);
        for _ in 0..50 {
            ga.run(&config).unwrap();
            assert!(ga.population().contains(ga.best()), "best lost on generation {}", ga.generation());
        }
        assert!(ga.history().iter().any(|s| s.refreshed));
    }

    #[test]
    fn test_refresh_without_elitism_keeps_best_when_present() {
        let population: Vec<Chromosome> = (0..8)
            .map(|_| Chromosome::new(vec![Gene::binary("000000000000").unwrap()]).unwrap())
            .collect();
        let policies = Policies::default().with_refresh(Reseed::new(1.0).unwrap());
        let mut ga =
            GeneticAlgorithm::with_policies(population, from_fn(count_ones), seeded(), policies)
                .unwrap();
        let best = ga.best().clone();

        // No variation: the generation cannot improve, so it refreshes.
        ga.run(&RunConfig::new(1, 0.0, 0.0).with_elitist(false).with_refresh_after(1))
            .unwrap();
        assert!(ga.history()[0].refreshed);
        assert!(ga.population().contains(&best));
        assert!(ga.population().contains(ga.best()));
    }

    #[test]
    fn test_refresh_adopts_strictly_better_member() {
        let population: Vec<Chromosome> = (0..10)
            .map(|_| Chromosome::new(vec![Gene::binary("000000000000").unwrap()]).unwrap())
            .collect();
        let policies = Policies::default().with_refresh(Reseed::new(1.0).unwrap());
        let mut ga =
            GeneticAlgorithm::with_policies(population, from_fn(count_ones), seeded(), policies)
                .unwrap();
        assert_eq!(ga.best_fitness(), 0);

        ga.run(&RunConfig::new(1, 0.0, 0.0).with_refresh_after(1)).unwrap();

        let stats = &ga.history()[0];
        assert!(stats.refreshed);
        assert!(!stats.improved);
        assert_eq!(stats.generation_best, 0);
        assert!(ga.best_fitness() > 0);
        assert_eq!(stats.best, ga.best_fitness());
        assert_eq!(count_ones(ga.best()), ga.best_fitness());
        assert!(ga.population().contains(ga.best()));
        assert_eq!(ga.stagnation(), 0);
    }

    #[test]
    fn test_non_elitist_best_is_monotonic_snapshot() {
        let population = random_population(13, 10, 24);
        let mut ga = GeneticAlgorithm::new(population, from_fn(count_ones), seeded()).unwrap();
        let config = RunConfig::new(1, 0.3, 0.8).with_elitist(false);

        let mut previous = ga.best_fitness();
        let mut snapshot = ga.run(&config).unwrap();
        let mut snapshot_dna = snapshot.dna();
        for _ in 0..40 {
            assert!(ga.best_fitness() >= previous);
            previous = ga.best_fitness();

            let next = ga.run(&config).unwrap();
            // Earlier snapshots are unaffected by later generations.
            assert_eq!(snapshot.dna(), snapshot_dna);
            snapshot = next;
            snapshot_dna = snapshot.dna();
        }
        assert_eq!(ga.evaluate(ga.best()).unwrap(), ga.best_fitness());

        let bests: Vec<usize> = ga.history().iter().map(|s| s.best).collect();
        assert!(bests.windows(2).all(|w| w[1] >= w[0]));
        // Heavy mutation without elitism lets some generations fall below the best-ever.
        assert!(ga.history().iter().any(|s| s.generation_best < s.best));
    }

    #[test]
    fn test_already_solved_runs_no_generation() {
        let population = random_population(9, 10, 10);
        let mut ga = GeneticAlgorithm::new(population, OneMax { target: 0 }, seeded()).unwrap();
        let before = ga.population().to_vec();

        let best = ga.run(&RunConfig::new(100, 0.1, 0.5)).unwrap();

        let summary = ga.last_run().unwrap();
        assert!(summary.solved);
        assert_eq!(summary.generations_run, 0);
        assert_eq!(ga.generation(), 0);
        assert!(ga.history().is_empty());
        assert_eq!(ga.population(), &before[..]);
        assert_eq!(&best, ga.best());
        assert_eq!(ga.state(), EngineState::Terminated);
    }

    #[test]
    fn test_best_and_worst_index_ties_take_first() {
        assert_eq!(best_index(&[1.0, 3.0, 3.0, 0.0]), 1);
        assert_eq!(worst_index(&[1.0, 0.0, 3.0, 0.0]), 1);
        let mut order = vec![0usize, 1, 2, 3];
        let scores = [2.0, 5.0, 2.0, 5.0];
        order.sort_by(|&a, &b| descending(scores[a], scores[b]));
        assert_eq!(order, vec![1, 3, 0, 2]);
    }
}
