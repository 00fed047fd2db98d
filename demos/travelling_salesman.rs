//! Shortest closed tour through random cities, with each chromosome a
//! reordering of the same city genes.
//!
//! Run with `RUST_LOG=info cargo run --example travelling_salesman`.

use rand::Rng;
use u_genome::error::BoxError;
use u_genome::ga::{EngineConfig, FitnessFn, GeneticAlgorithm, RunConfig};
use u_genome::genome::{Chromosome, Gene};
use u_genome::random::create_rng;
use u_genome::translate::{BinaryIntTranslator, Translator};

const NUM_CITIES: usize = 20;
const POPULATION: usize = 20;
const GENERATIONS: usize = 500;

/// Negative length of the closed tour, so shorter tours score higher.
struct TourLength {
    cities: Vec<(f64, f64)>,
}

impl TourLength {
    fn tour(&self, chromosome: &Chromosome) -> Result<Vec<usize>, BoxError> {
        let ids = BinaryIntTranslator.translate_chromosome(chromosome)?;
        ids.into_iter()
            .map(|id| -> Result<usize, BoxError> {
                let id = id as usize;
                if id < self.cities.len() {
                    Ok(id)
                } else {
                    Err(format!("city id {id} out of range").into())
                }
            })
            .collect()
    }

    fn length(&self, tour: &[usize]) -> f64 {
        tour.iter()
            .zip(tour.iter().cycle().skip(1))
            .map(|(&a, &b)| {
                let (ax, ay) = self.cities[a];
                let (bx, by) = self.cities[b];
                (ax - bx).hypot(ay - by)
            })
            .sum()
    }
}

impl FitnessFn for TourLength {
    type Score = f64;

    fn evaluate(&self, chromosome: &Chromosome) -> Result<f64, BoxError> {
        let tour = self.tour(chromosome)?;
        Ok(-self.length(&tour))
    }
}

/// One bit more than the smallest width that numbers every city.
fn gene_length(num_cities: usize) -> usize {
    let mut bits = 0;
    while (1usize << bits) < num_cities {
        bits += 1;
    }
    bits + 1
}

fn main() -> Result<(), BoxError> {
    env_logger::init();

    let mut rng = create_rng(100);
    let cities: Vec<(f64, f64)> = (0..NUM_CITIES)
        .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
        .collect();

    let width = gene_length(NUM_CITIES);
    let genes = (0..NUM_CITIES)
        .map(|id| Gene::binary(&format!("{id:0width$b}")).map(|g| g.with_name(format!("city {id}"))))
        .collect::<Result<Vec<_>, _>>()?;
    let population = Chromosome::random_reordering_batch(&genes, POPULATION, &mut rng)?;

    let fitness = TourLength { cities };
    let mut ga = GeneticAlgorithm::new(population, fitness, EngineConfig::default().with_seed(100))?;

    let best = ga.run(&RunConfig::new(GENERATIONS, 0.10, 0.50))?;
    let tour = ga.fitness().tour(&best)?;

    println!("best tour: {tour:?}");
    println!("length: {:.3}", -ga.best_fitness());
    if let Some(summary) = ga.last_run() {
        println!(
            "{} generations in {:?}",
            summary.generations_run, summary.elapsed
        );
    }

    Ok(())
}
