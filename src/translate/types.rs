//! The translator abstraction and its fitness adapter.

use crate::error::{BoxError, Result};
use crate::ga::{Fitness, FitnessFn};
use crate::genome::{Chromosome, Gene};

/// Decodes genes into values.
///
/// # Implementing
///
/// ```
/// use u_genome::error::Result;
/// use u_genome::genome::{Chromosome, Gene};
/// use u_genome::translate::Translator;
///
/// /// Counts the `1` symbols of a gene.
/// struct Ones;
///
/// impl Translator for Ones {
///     type Output = usize;
///
///     fn translate_gene(&self, gene: &Gene) -> Result<usize> {
///         Ok(gene.symbols().iter().filter(|&&s| s == '1').count())
///     }
/// }
///
/// let c = Chromosome::new(vec![Gene::binary("101").unwrap(), Gene::binary("1").unwrap()]).unwrap();
/// assert_eq!(Ones.translate_chromosome(&c).unwrap(), vec![2, 1]);
/// ```
pub trait Translator: Send + Sync {
    /// The decoded value of one gene.
    type Output;

    /// Decodes one gene, or fails with `Translation`.
    fn translate_gene(&self, gene: &Gene) -> Result<Self::Output>;

    /// Decodes every gene of `chromosome`, in order.
    fn translate_chromosome(&self, chromosome: &Chromosome) -> Result<Vec<Self::Output>> {
        chromosome
            .genes()
            .iter()
            .map(|g| self.translate_gene(g))
            .collect()
    }
}

/// [`FitnessFn`] that translates a chromosome and scores the decoded values.
///
/// A translation failure is reported as a fitness evaluation failure.
///
/// ```
/// use u_genome::ga::FitnessFn;
/// use u_genome::genome::{Chromosome, Gene};
/// use u_genome::translate::{BinaryIntTranslator, TranslatedFitness};
///
/// let sum = TranslatedFitness::new(BinaryIntTranslator, |values: &[u64]| values.iter().sum::<u64>());
/// let c = Chromosome::new(vec![Gene::binary("101").unwrap(), Gene::binary("11").unwrap()]).unwrap();
/// assert_eq!(sum.evaluate(&c).unwrap(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct TranslatedFitness<T, F> {
    translator: T,
    score: F,
}

impl<T, F> TranslatedFitness<T, F> {
    pub fn new(translator: T, score: F) -> Self {
        Self { translator, score }
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }
}

impl<T, F, S> FitnessFn for TranslatedFitness<T, F>
where
    T: Translator,
    F: Fn(&[T::Output]) -> S + Send + Sync,
    S: Fitness,
{
    type Score = S;

    fn evaluate(&self, chromosome: &Chromosome) -> std::result::Result<S, BoxError> {
        let values = self.translator.translate_chromosome(chromosome)?;
        Ok((self.score)(&values))
    }
}
