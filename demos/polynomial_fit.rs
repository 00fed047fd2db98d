//! Fits the coefficients of a cubic from sampled points.
//!
//! Each gene encodes one coefficient with [`BinaryFloatTranslator`]:
//! a sign bit, 8 significand bits, an exponent sign bit and 2 exponent
//! bits. Fitness is the negated absolute error over `x = 1..=10`, inflated
//! by half again when any coefficient is negative.
//!
//! Run with `RUST_LOG=debug cargo run --example polynomial_fit`.

use u_genome::error::BoxError;
use u_genome::ga::{EngineConfig, GeneticAlgorithm, Policies, RunConfig, WeightedSurvival};
use u_genome::genome::{Alphabet, Chromosome};
use u_genome::random::create_rng;
use u_genome::translate::{BinaryFloatTranslator, TranslatedFitness, Translator};

const SIGNIFICAND_LENGTH: usize = 8;
const NUM_X: usize = 10;

/// Highest power first.
fn evaluate_polynomial(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

fn sample(coefficients: &[f64]) -> Vec<f64> {
    (1..=NUM_X)
        .map(|x| evaluate_polynomial(coefficients, x as f64))
        .collect()
}

fn error(modeled: &[f64], expected: &[f64], coefficients: &[f64]) -> f64 {
    let total: f64 = modeled
        .iter()
        .zip(expected)
        .map(|(m, e)| (m - e).abs())
        .sum();
    if coefficients.iter().any(|&c| c < 0.0) {
        total * 1.5
    } else {
        total
    }
}

fn main() -> Result<(), BoxError> {
    env_logger::init();

    let target = [0.001, 0.01, 0.1, 1.0];
    let expected = sample(&target);

    let translator = BinaryFloatTranslator::new(SIGNIFICAND_LENGTH, true)?;
    let gene_length = translator.min_length() + 2;
    let lengths = vec![gene_length; target.len()];

    let mut rng = create_rng(318);
    let population = Chromosome::random_batch(&lengths, 20, &Alphabet::Binary, &mut rng)?;

    let expected_for_fitness = expected.clone();
    let fitness = TranslatedFitness::new(translator, move |coefficients: &[f64]| {
        -error(&sample(coefficients), &expected_for_fitness, coefficients)
    });

    // Pure environmental pressure: only the all-time range matters.
    let policies = Policies::default().with_selection(WeightedSurvival::new(1.0, 0.0)?);
    let mut ga = GeneticAlgorithm::with_policies(
        population,
        fitness,
        EngineConfig::default().with_seed(318),
        policies,
    )?;

    let best = ga.run(&RunConfig::new(5000, 0.15, 0.5).with_refresh_after(500))?;
    let coefficients = translator.translate_chromosome(&best)?;
    let modeled = sample(&coefficients);

    println!("target coefficients: {target:?}");
    println!("best coefficients:   {coefficients:?}");
    println!("error: {:.6}", error(&modeled, &expected, &coefficients));
    println!(
        "improvements: {}",
        ga.history().iter().filter(|s| s.improved).count()
    );

    Ok(())
}
