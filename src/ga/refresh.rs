//! Refresh policies for escaping local optima.
//!
//! After `refresh_after` stagnant generations the engine hands the whole
//! population to a [`RefreshPolicy`], marking one member as protected: the
//! current fittest. A policy must leave that member unchanged so a refresh
//! never loses the best solution outright.

use crate::error::{check_probability, invalid, Result};
use crate::genome::Chromosome;
use rand::seq::index;
use rand::Rng;

/// Perturbs a stagnant population.
pub trait RefreshPolicy: Send + Sync {
    /// Refreshes `population` in place, leaving `population[protected]`
    /// untouched.
    fn refresh<R: Rng>(
        &self,
        population: &mut [Chromosome],
        protected: usize,
        rng: &mut R,
    ) -> Result<()>;
}

/// Re-randomizes a random subset of the population.
///
/// `round(fraction * (n - 1))` unprotected members get fresh random symbols
/// with their layout and alphabets kept.
///
/// ```
/// use u_genome::ga::Reseed;
///
/// assert!((Reseed::default().fraction() - 0.5).abs() < 1e-12);
/// assert!(Reseed::new(1.0).is_ok());
/// assert!(Reseed::new(1.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reseed {
    fraction: f64,
}

impl Default for Reseed {
    fn default() -> Self {
        Self { fraction: 0.5 }
    }
}

impl Reseed {
    /// Creates the policy. `fraction` must lie in `[0, 1]`.
    pub fn new(fraction: f64) -> Result<Self> {
        check_probability("fraction", fraction)?;
        Ok(Self { fraction })
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl RefreshPolicy for Reseed {
    fn refresh<R: Rng>(
        &self,
        population: &mut [Chromosome],
        protected: usize,
        rng: &mut R,
    ) -> Result<()> {
        check_protected(population, protected)?;
        let candidates = population.len() - 1;
        let amount = (candidates as f64 * self.fraction).round() as usize;

        for i in index::sample(rng, candidates, amount.min(candidates)).into_iter() {
            // Skip over the protected slot.
            let target = if i >= protected { i + 1 } else { i };
            population[target].randomize(rng);
        }
        Ok(())
    }
}

/// Heavy mutation of every unprotected member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Remutate {
    p_mutate: f64,
}

impl Default for Remutate {
    fn default() -> Self {
        Self { p_mutate: 0.5 }
    }
}

impl Remutate {
    /// Creates the policy. `p_mutate` must lie in `[0, 1]`.
    pub fn new(p_mutate: f64) -> Result<Self> {
        check_probability("p_mutate", p_mutate)?;
        Ok(Self { p_mutate })
    }

    pub fn p_mutate(&self) -> f64 {
        self.p_mutate
    }
}

impl RefreshPolicy for Remutate {
    fn refresh<R: Rng>(
        &self,
        population: &mut [Chromosome],
        protected: usize,
        rng: &mut R,
    ) -> Result<()> {
        check_protected(population, protected)?;
        for (i, chromosome) in population.iter_mut().enumerate() {
            if i != protected {
                chromosome.mutate(self.p_mutate, rng)?;
            }
        }
        Ok(())
    }
}

fn check_protected(population: &[Chromosome], protected: usize) -> Result<()> {
    if protected < population.len() {
        Ok(())
    } else {
        Err(invalid(format!(
            "protected index {protected} out of range for population of {}",
            population.len()
        )))
    }
}
