//! Survival ("compete") policies.
//!
//! A [`SelectionPolicy`] decides which chromosomes of a generation survive
//! to reproduce. The engine ranks the population first (best first, ties in
//! population order) and hands the policy the ranked scores together with
//! the current and all-time fitness ranges.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::Fitness;
use crate::error::{invalid, Result};
use rand::Rng;

/// Minimum and maximum of a set of scores, as `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessRange {
    pub min: f64,
    pub max: f64,
}

impl FitnessRange {
    /// The range covering `scores`, or `None` if empty.
    pub fn of<S: Fitness>(scores: &[S]) -> Option<Self> {
        let mut iter = scores.iter().map(|s| s.to_f64());
        let first = iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |r, f| Self {
            min: r.min.min(f),
            max: r.max.max(f),
        }))
    }

    /// The smallest range covering both.
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` within the range, in `[0, 1]`.
    ///
    /// A zero-width range maps everything to 1.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Input for one competition.
#[derive(Debug, Clone, Copy)]
pub struct Competition<'a, S> {
    /// Scores of the current population, best first.
    pub ranked: &'a [S],

    /// Range of `ranked`.
    pub generation: FitnessRange,

    /// Range of every score observed since the engine was built.
    pub overall: FitnessRange,
}

/// Chooses the survivors of a generation.
pub trait SelectionPolicy: Send + Sync {
    /// Returns positions into `competition.ranked` of the survivors.
    ///
    /// The result must be non-empty and every position in range. Order and
    /// duplicates do not matter; the engine keeps survivors in rank order.
    fn compete<S: Fitness, R: Rng>(&self, competition: &Competition<'_, S>, rng: &mut R)
        -> Vec<usize>;
}

/// Probabilistic survival weighing absolute and relative fitness.
///
/// Each chromosome survives with probability
///
/// ```text
/// p = absolute_weight * overall.normalize(fit) + relative_weight * generation.normalize(fit)
/// ```
///
/// The absolute term is environmental pressure: a chromosome near the
/// worst score ever seen rarely survives however it compares to its
/// peers. The relative term is competitive pressure within the generation.
/// If no chromosome survives, all of them do.
///
/// # Examples
///
/// ```
/// use u_genome::ga::WeightedSurvival;
///
/// let default = WeightedSurvival::default();
/// assert!((default.absolute_weight() - 0.25).abs() < 1e-12);
///
/// assert!(WeightedSurvival::new(1.0, 0.0).is_ok());
/// assert!(WeightedSurvival::new(0.5, 0.6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedSurvival {
    absolute_weight: f64,
    relative_weight: f64,
}

impl Default for WeightedSurvival {
    fn default() -> Self {
        Self {
            absolute_weight: 0.25,
            relative_weight: 0.75,
        }
    }
}

impl WeightedSurvival {
    /// Creates the policy. Each weight must lie in `[0, 1]` and they must
    /// sum to 1.
    pub fn new(absolute_weight: f64, relative_weight: f64) -> Result<Self> {
        for (name, w) in [
            ("absolute_weight", absolute_weight),
            ("relative_weight", relative_weight),
        ] {
            if !(0.0..=1.0).contains(&w) {
                return Err(invalid(format!("{name} must be in [0, 1], got {w}")));
            }
        }
        if (absolute_weight + relative_weight - 1.0).abs() > 1e-9 {
            return Err(invalid(format!(
                "survival weights must sum to 1, got {}",
                absolute_weight + relative_weight
            )));
        }
        Ok(Self {
            absolute_weight,
            relative_weight,
        })
    }

    pub fn absolute_weight(&self) -> f64 {
        self.absolute_weight
    }

    pub fn relative_weight(&self) -> f64 {
        self.relative_weight
    }

    fn survival_probability(&self, fit: f64, competition: &Competition<'_, impl Fitness>) -> f64 {
        self.absolute_weight * competition.overall.normalize(fit)
            + self.relative_weight * competition.generation.normalize(fit)
    }
}

impl SelectionPolicy for WeightedSurvival {
    fn compete<S: Fitness, R: Rng>(
        &self,
        competition: &Competition<'_, S>,
        rng: &mut R,
    ) -> Vec<usize> {
        let survivors: Vec<usize> = competition
            .ranked
            .iter()
            .enumerate()
            .filter(|(_, score)| {
                let p = self.survival_probability(score.to_f64(), competition);
                rng.random::<f64>() < p
            })
            .map(|(pos, _)| pos)
            .collect();

        if survivors.is_empty() {
            // Nothing survived; everyone lives.
            (0..competition.ranked.len()).collect()
        } else {
            survivors
        }
    }
}

/// Deterministic truncation: the top `ceil(n * survival_ratio)` survive.
///
/// ```
/// use u_genome::ga::Truncation;
///
/// assert!(Truncation::new(0.5).is_ok());
/// assert!(Truncation::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Truncation {
    survival_ratio: f64,
}

impl Default for Truncation {
    fn default() -> Self {
        Self {
            survival_ratio: 0.5,
        }
    }
}

impl Truncation {
    /// Creates the policy. `survival_ratio` must lie in `(0, 1]`.
    pub fn new(survival_ratio: f64) -> Result<Self> {
        if survival_ratio > 0.0 && survival_ratio <= 1.0 {
            Ok(Self { survival_ratio })
        } else {
            Err(invalid(format!(
                "survival_ratio must be in (0, 1], got {survival_ratio}"
            )))
        }
    }

    pub fn survival_ratio(&self) -> f64 {
        self.survival_ratio
    }

    fn survivor_count(&self, n: usize) -> usize {
        ((n as f64 * self.survival_ratio).ceil() as usize).clamp(1, n.max(1))
    }
}

impl SelectionPolicy for Truncation {
    fn compete<S: Fitness, R: Rng>(
        &self,
        competition: &Competition<'_, S>,
        _rng: &mut R,
    ) -> Vec<usize> {
        (0..self.survivor_count(competition.ranked.len())).collect()
    }
}
