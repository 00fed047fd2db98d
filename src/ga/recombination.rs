//! Reproduction policies.
//!
//! A [`RecombinationPolicy`] refills the population from the survivors of a
//! competition. Survivors are kept; offspring are produced in pairs of
//! copied parents which, with probability `p_crossover`, exchange DNA at a
//! uniformly random point. Offspring are appended until the population is
//! back to its target size.

use super::types::Fitness;
use crate::error::{invalid, Result};
use crate::genome::Chromosome;
use rand::Rng;

/// Refills a population from its survivors.
pub trait RecombinationPolicy: Send + Sync {
    /// Returns exactly `target_size` chromosomes: the survivors followed by
    /// offspring.
    ///
    /// `scores[i]` is the fitness of `survivors[i]`; survivors arrive best
    /// first.
    fn reproduce<S: Fitness, R: Rng>(
        &self,
        survivors: Vec<Chromosome>,
        scores: &[S],
        target_size: usize,
        p_crossover: f64,
        rng: &mut R,
    ) -> Result<Vec<Chromosome>>;
}

/// First parent picked by fitness-proportionate roulette, mate uniformly.
///
/// Fitter survivors reproduce more often, but any survivor may be chosen as
/// a mate. A survivor can be paired with itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitnessProportionate;

impl RecombinationPolicy for FitnessProportionate {
    fn reproduce<S: Fitness, R: Rng>(
        &self,
        survivors: Vec<Chromosome>,
        scores: &[S],
        target_size: usize,
        p_crossover: f64,
        rng: &mut R,
    ) -> Result<Vec<Chromosome>> {
        let weights = roulette_weights(scores);
        let total: f64 = weights.iter().sum();
        fill_with_offspring(survivors, target_size, p_crossover, rng, |rng| {
            roulette_pick(&weights, total, rng)
        })
    }
}

/// Both parents picked uniformly at random, with replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformPairing;

impl RecombinationPolicy for UniformPairing {
    fn reproduce<S: Fitness, R: Rng>(
        &self,
        survivors: Vec<Chromosome>,
        _scores: &[S],
        target_size: usize,
        p_crossover: f64,
        rng: &mut R,
    ) -> Result<Vec<Chromosome>> {
        let n = survivors.len();
        fill_with_offspring(survivors, target_size, p_crossover, rng, |rng| {
            rng.random_range(0..n)
        })
    }
}

/// Appends offspring pairs to `survivors` until `target_size` is reached.
///
/// `pick_first` chooses the first parent's index among the survivors; the
/// mate is always uniform.
fn fill_with_offspring<R, P>(
    survivors: Vec<Chromosome>,
    target_size: usize,
    p_crossover: f64,
    rng: &mut R,
    mut pick_first: P,
) -> Result<Vec<Chromosome>>
where
    R: Rng,
    P: FnMut(&mut R) -> usize,
{
    let parents = survivors.len();
    if parents == 0 {
        return Err(invalid("cannot reproduce without survivors"));
    }
    if parents > target_size {
        return Err(invalid(format!(
            "{parents} survivors exceed target population size {target_size}"
        )));
    }

    let mut next = survivors;
    next.reserve(target_size - parents);

    while next.len() < target_size {
        let a = pick_first(rng);
        let b = rng.random_range(0..parents);
        let mut first = next[a].clone();
        let mut second = next[b].clone();

        if rng.random::<f64>() < p_crossover {
            let point = rng.random_range(0..first.len());
            first.crossover(&mut second, point)?;
        }

        next.push(first);
        if next.len() < target_size {
            next.push(second);
        }
    }

    Ok(next)
}

/// Roulette weights for maximization: `fit - min + epsilon`.
///
/// On a zero-width range every weight is equal.
fn roulette_weights<S: Fitness>(scores: &[S]) -> Vec<f64> {
    let min = scores
        .iter()
        .map(|s| s.to_f64())
        .fold(f64::INFINITY, f64::min);
    let epsilon = 1e-10;
    scores
        .iter()
        .map(|s| {
            let w = s.to_f64() - min + epsilon;
            if w.is_finite() && w > 0.0 {
                w
            } else {
                epsilon
            }
        })
        .collect()
}

fn roulette_pick<R: Rng>(weights: &[f64], total: f64, rng: &mut R) -> usize {
    let n = weights.len();
    if n == 1 || !(total > 0.0 && total.is_finite()) {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{Alphabet, Gene};
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn population(dnas: &[&str]) -> Vec<Chromosome> {
        dnas.iter()
            .map(|d| Chromosome::new(vec![Gene::binary(d).unwrap()]).unwrap())
            .collect()
    }

    #[test]
    fn test_fills_to_target_keeping_survivors_first() {
        let survivors = population(&["1111", "0000", "1010"]);
        let mut rng = create_rng(42);
        let next = FitnessProportionate
            .reproduce(survivors.clone(), &[4.0, 0.0, 2.0], 10, 0.5, &mut rng)
            .unwrap();
        assert_eq!(next.len(), 10);
        assert_eq!(&next[..3], &survivors[..]);
    }

    #[test]
    fn test_odd_gap_is_filled_exactly() {
        let survivors = population(&["11", "00"]);
        let mut rng = create_rng(1);
        let next = UniformPairing
            .reproduce(survivors, &[1u32, 0], 5, 1.0, &mut rng)
            .unwrap();
        assert_eq!(next.len(), 5);
    }

    #[test]
    fn test_no_crossover_produces_copies() {
        let survivors = population(&["1100", "0011"]);
        let mut rng = create_rng(5);
        let next = UniformPairing
            .reproduce(survivors.clone(), &[0.0, 0.0], 12, 0.0, &mut rng)
            .unwrap();
        assert!(next.iter().all(|c| survivors.contains(c)));
    }

    #[test]
    fn test_full_survival_adds_nothing() {
        let survivors = population(&["1", "0"]);
        let mut rng = create_rng(5);
        let next = FitnessProportionate
            .reproduce(survivors.clone(), &[1.0, 0.0], 2, 1.0, &mut rng)
            .unwrap();
        assert_eq!(next, survivors);
    }

    #[test]
    fn test_rejects_empty_or_oversized_survivors() {
        let mut rng = create_rng(5);
        assert!(FitnessProportionate
            .reproduce::<f64, _>(vec![], &[], 4, 0.5, &mut rng)
            .is_err());
        let survivors = population(&["1", "0", "1"]);
        assert!(UniformPairing
            .reproduce(survivors, &[1.0, 0.0, 1.0], 2, 0.5, &mut rng)
            .is_err());
    }

    #[test]
    fn test_roulette_favors_fitter() {
        let weights = roulette_weights(&[100.0, 50.0, 1.0]);
        let total: f64 = weights.iter().sum();
        let mut rng = create_rng(42);
        let mut counts = [0u32; 3];
        for _ in 0..10_000 {
            counts[roulette_pick(&weights, total, &mut rng)] += 1;
        }
        assert!(counts[0] > counts[1] && counts[1] > counts[2], "{counts:?}");
    }

    #[test]
    fn test_roulette_equal_scores_is_uniform() {
        let weights = roulette_weights(&[3i64, 3, 3, 3]);
        let total: f64 = weights.iter().sum();
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[roulette_pick(&weights, total, &mut rng)] += 1;
        }
        for &c in &counts {
            assert!(c > 2000, "expected roughly uniform, got {counts:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_population_size_restored(
            seed in any::<u64>(),
            survivors in 1usize..8,
            extra in 0usize..12,
            p_crossover in 0.0f64..=1.0,
        ) {
            let mut rng = create_rng(seed);
            let parents = Chromosome::random_batch(&[3, 4], survivors, &Alphabet::Decimal, &mut rng).unwrap();
            let scores: Vec<f64> = (0..survivors).map(|i| i as f64).collect();
            let target = survivors + extra;
            let next = FitnessProportionate
                .reproduce(parents, &scores, target, p_crossover, &mut rng)
                .unwrap();
            prop_assert_eq!(next.len(), target);
            prop_assert!(next.iter().all(|c| c.genes()[0].len() == 3 && c.genes()[1].len() == 4));
        }
    }
}
