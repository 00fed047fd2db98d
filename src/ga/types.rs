//! Core trait definitions for the evolution engine.
//!
//! [`Fitness`] describes a score, and [`FitnessFn`] is the one capability
//! a caller must supply: mapping a chromosome to a score.

use crate::error::BoxError;
use crate::genome::Chromosome;

/// Marker trait for fitness scores.
///
/// Scores must be comparable and cheaply copyable. **Higher is better.**
/// For minimization problems, negate the cost.
///
/// Built-in implementations exist for the primitive float and integer
/// types.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Converts the score to `f64` for range arithmetic and logging.
    fn to_f64(self) -> f64;
}

macro_rules! impl_fitness {
    ($($t:ty),*) => {
        $(
            impl Fitness for $t {
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_fitness!(f64, f32, i32, i64, u32, u64, usize);

/// Scores chromosomes.
///
/// `evaluate` must be a pure function of the chromosome: the engine may
/// cache its results, reuse them across steps, and (with the `parallel`
/// feature) call it from several threads at once.
///
/// # Implementing
///
/// ```
/// use u_genome::error::BoxError;
/// use u_genome::ga::FitnessFn;
/// use u_genome::genome::Chromosome;
///
/// struct OneMax;
///
/// impl FitnessFn for OneMax {
///     type Score = usize;
///
///     fn evaluate(&self, chromosome: &Chromosome) -> Result<usize, BoxError> {
///         Ok(chromosome.dna().matches('1').count())
///     }
/// }
/// ```
pub trait FitnessFn: Send + Sync {
    /// The score type.
    type Score: Fitness;

    /// Scores one chromosome.
    ///
    /// An error aborts the current run and is surfaced as
    /// [`EvolveError::FitnessEvaluation`](crate::error::EvolveError::FitnessEvaluation).
    fn evaluate(&self, chromosome: &Chromosome) -> Result<Self::Score, BoxError>;

    /// Whether `best` is good enough to stop early.
    ///
    /// Checked once per generation after bookkeeping. The default never
    /// stops.
    fn is_solved(&self, _best: Self::Score) -> bool {
        false
    }
}

/// [`FitnessFn`] backed by an infallible closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnFitness<F>(F);

/// Wraps a closure that always produces a score.
///
/// ```
/// use u_genome::ga::{from_fn, FitnessFn};
/// use u_genome::genome::{Chromosome, Gene};
///
/// let ones = from_fn(|c: &Chromosome| c.dna().matches('1').count());
/// let c = Chromosome::new(vec![Gene::binary("1101").unwrap()]).unwrap();
/// assert_eq!(ones.evaluate(&c).unwrap(), 3);
/// ```
pub fn from_fn<F, S>(f: F) -> FnFitness<F>
where
    F: Fn(&Chromosome) -> S + Send + Sync,
    S: Fitness,
{
    FnFitness(f)
}

impl<F, S> FitnessFn for FnFitness<F>
where
    F: Fn(&Chromosome) -> S + Send + Sync,
    S: Fitness,
{
    type Score = S;

    fn evaluate(&self, chromosome: &Chromosome) -> Result<S, BoxError> {
        Ok((self.0)(chromosome))
    }
}

/// [`FitnessFn`] backed by a fallible closure. See [`try_from_fn`].
#[derive(Clone)]
pub struct TryFnFitness<F>(F);

/// Wraps a closure that may fail.
pub fn try_from_fn<F, S>(f: F) -> TryFnFitness<F>
where
    F: Fn(&Chromosome) -> Result<S, BoxError> + Send + Sync,
    S: Fitness,
{
    TryFnFitness(f)
}

impl<F, S> FitnessFn for TryFnFitness<F>
where
    F: Fn(&Chromosome) -> Result<S, BoxError> + Send + Sync,
    S: Fitness,
{
    type Score = S;

    fn evaluate(&self, chromosome: &Chromosome) -> Result<S, BoxError> {
        (self.0)(chromosome)
    }
}
