//! Finds the largest 16-bit integer divisible by every factor in a set.
//!
//! Run with `RUST_LOG=info cargo run --example biggest_multiple`.

use u_genome::error::BoxError;
use u_genome::ga::{EngineConfig, FitnessFn, GeneticAlgorithm, RunConfig};
use u_genome::genome::{Alphabet, Chromosome};
use u_genome::random::create_rng;
use u_genome::translate::{BinaryIntTranslator, Translator};

const GENE_LENGTH: usize = 16;

/// +1 per factor that divides the number, -1 per factor that does not,
/// scaled by the number's share of the encodable range.
struct BiggestMultiple {
    factors: Vec<u64>,
    max_encoded: u64,
    target: f64,
}

impl BiggestMultiple {
    fn new(factors: Vec<u64>, bits: usize) -> Self {
        let max_encoded = (1u64 << bits) - 1;
        let product: u64 = factors.iter().product();
        let best_possible = max_encoded / product * product;
        let target = factors.len() as f64 * best_possible as f64 / max_encoded as f64;
        Self {
            factors,
            max_encoded,
            target,
        }
    }

    fn score(&self, number: u64) -> f64 {
        let hits: i64 = self
            .factors
            .iter()
            .map(|&f| if number % f == 0 { 1 } else { -1 })
            .sum();
        hits as f64 * number as f64 / self.max_encoded as f64
    }
}

impl FitnessFn for BiggestMultiple {
    type Score = f64;

    fn evaluate(&self, chromosome: &Chromosome) -> Result<f64, BoxError> {
        let number = BinaryIntTranslator.translate_gene(&chromosome.genes()[0])?;
        Ok(self.score(number))
    }

    fn is_solved(&self, best: f64) -> bool {
        best >= self.target - 1e-12
    }
}

fn main() -> Result<(), BoxError> {
    env_logger::init();

    let factors = vec![2, 3, 7, 11];
    let mut rng = create_rng(2015);
    let population = Chromosome::random_batch(&[GENE_LENGTH], 10, &Alphabet::Binary, &mut rng)?;

    let fitness = BiggestMultiple::new(factors.clone(), GENE_LENGTH);
    let mut ga = GeneticAlgorithm::new(population, fitness, EngineConfig::default().with_seed(2015))?;

    let best = ga.run(&RunConfig::new(1_000_000, 0.15, 0.25))?;
    let number = BinaryIntTranslator.translate_gene(&best.genes()[0])?;
    let summary = ga.last_run().copied();

    println!("best chromosome: {best}");
    println!("best number: {number}");
    if let Some(summary) = summary {
        println!(
            "{} generations in {:?} (solved: {})",
            summary.generations_run, summary.elapsed, summary.solved
        );
    }
    for factor in &factors {
        println!("  {number} % {factor} = {}", number % factor);
    }

    Ok(())
}
