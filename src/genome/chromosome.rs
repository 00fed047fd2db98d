//! Chromosomes: ordered gene sequences with crossover.

use super::alphabet::Alphabet;
use super::gene::Gene;
use crate::error::{check_probability, invalid, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// A candidate solution: an ordered, non-empty sequence of genes.
///
/// The chromosome's DNA is the concatenation of its genes' symbols in order.
/// It is computed on demand, never stored, so it cannot drift out of sync.
///
/// `Clone` is a deep copy: the clone owns its own genes and later mutation
/// of either side does not affect the other.
///
/// A *reordering* chromosome (see [`reordering`](Chromosome::reordering))
/// holds a fixed set of distinct genes, and only their order evolves:
/// mutation swaps two genes, crossover swaps whole genes, and must
/// always yield a permutation of the gene set.
///
/// # Examples
///
/// ```
/// use u_genome::genome::{Chromosome, Gene};
///
/// let mut a = Chromosome::new(vec![Gene::binary("11").unwrap()]).unwrap();
/// let mut b = Chromosome::new(vec![Gene::binary("00").unwrap()]).unwrap();
/// a.crossover(&mut b, 1).unwrap();
/// assert_eq!(a.dna(), "10");
/// assert_eq!(b.dna(), "01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ChromosomeRepr"))]
pub struct Chromosome {
    genes: Vec<Gene>,
    /// Sorted gene DNAs of a reordering chromosome.
    choices: Option<Arc<[String]>>,
}

impl Chromosome {
    /// Creates a chromosome from genes.
    ///
    /// Fails with `InvalidArgument` if `genes` is empty.
    pub fn new(genes: Vec<Gene>) -> Result<Self> {
        if genes.is_empty() {
            return Err(invalid("chromosome must have at least one gene"));
        }
        Ok(Self {
            genes,
            choices: None,
        })
    }

    /// Creates a reordering chromosome over a fixed set of genes.
    ///
    /// The genes' DNAs become the chromosome's choice set; every later
    /// operation keeps the genes a permutation of it. Fails with
    /// `InvalidArgument` if `genes` is empty or two genes share a DNA.
    ///
    /// ```
    /// use u_genome::genome::{Chromosome, Gene};
    ///
    /// let cities: Vec<Gene> = ["00", "01", "10", "11"].iter().map(|d| Gene::binary(d).unwrap()).collect();
    /// let mut tour = Chromosome::reordering(cities).unwrap();
    /// assert!(tour.is_reordering());
    /// assert!(tour.set_dna("11100100").is_ok());
    /// assert!(tour.set_dna("11111111").is_err());
    /// ```
    pub fn reordering(genes: Vec<Gene>) -> Result<Self> {
        if genes.is_empty() {
            return Err(invalid("chromosome must have at least one gene"));
        }
        let mut choices: Vec<String> = genes.iter().map(Gene::dna).collect();
        choices.sort();
        if let Some(w) = choices.windows(2).find(|w| w[0] == w[1]) {
            return Err(invalid(format!(
                "reordering genes must be distinct, {} repeats",
                w[0]
            )));
        }
        Ok(Self {
            genes,
            choices: Some(choices.into()),
        })
    }

    /// Creates a reordering chromosome holding `choices` in random order.
    pub fn random_reordering<R: Rng>(choices: &[Gene], rng: &mut R) -> Result<Self> {
        let mut chromosome = Self::reordering(choices.to_vec())?;
        chromosome.genes.shuffle(rng);
        Ok(chromosome)
    }

    /// Creates `n` reordering chromosomes over `choices`, each shuffled.
    pub fn random_reordering_batch<R: Rng>(
        choices: &[Gene],
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Self>> {
        if n == 0 {
            return Err(invalid("chromosome count must be positive"));
        }
        (0..n).map(|_| Self::random_reordering(choices, rng)).collect()
    }

    /// Whether this is a reordering chromosome.
    pub fn is_reordering(&self) -> bool {
        self.choices.is_some()
    }

    /// The sorted choice set of a reordering chromosome.
    pub fn choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    /// Creates a random chromosome with one gene per entry of `gene_lengths`.
    ///
    /// A single-gene chromosome takes a one-element slice. Fails with
    /// `InvalidArgument` if `gene_lengths` is empty or contains a zero.
    pub fn random<R: Rng>(
        gene_lengths: &[usize],
        alphabet: &Alphabet,
        rng: &mut R,
    ) -> Result<Self> {
        check_lengths(gene_lengths)?;
        let genes = gene_lengths
            .iter()
            .map(|&len| Gene::random(alphabet.clone(), len, rng))
            .collect::<Result<Vec<_>>>()?;
        Self::new(genes)
    }

    /// Creates `n` random chromosomes sharing the layout `gene_lengths`.
    pub fn random_batch<R: Rng>(
        gene_lengths: &[usize],
        n: usize,
        alphabet: &Alphabet,
        rng: &mut R,
    ) -> Result<Vec<Self>> {
        if n == 0 {
            return Err(invalid("chromosome count must be positive"));
        }
        check_lengths(gene_lengths)?;
        (0..n)
            .map(|_| Self::random(gene_lengths, alphabet, rng))
            .collect()
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Mutable access to the genes. The gene count cannot change.
    ///
    /// `None` for a reordering chromosome, whose genes may only be
    /// rearranged by its own operators.
    pub fn genes_mut(&mut self) -> Option<&mut [Gene]> {
        match self.choices {
            Some(_) => None,
            None => Some(&mut self.genes),
        }
    }

    pub fn num_genes(&self) -> usize {
        self.genes.len()
    }

    /// Total number of symbols across all genes.
    pub fn len(&self) -> usize {
        self.genes.iter().map(Gene::len).sum()
    }

    /// Never true for a constructed chromosome.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The flattened symbol sequence.
    pub fn dna(&self) -> String {
        self.symbols().collect()
    }

    fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.genes.iter().flat_map(|g| g.symbols().iter().copied())
    }

    /// Writes a flattened sequence back into the genes, in order.
    ///
    /// Genes `100100` and `011011` given `111111000000` become `111111` and
    /// `000000`. Nothing is written unless every gene accepts its slice and,
    /// for a reordering chromosome, the slices are a permutation of the
    /// choice set.
    pub fn set_dna(&mut self, dna: &str) -> Result<()> {
        let symbols: Vec<char> = dna.chars().collect();
        if symbols.len() != self.len() {
            return Err(invalid(format!(
                "DNA length {} does not match chromosome length {}",
                symbols.len(),
                self.len()
            )));
        }
        self.check_flat(&symbols)?;
        self.check_permutation(&symbols)?;
        self.write_flat(&symbols);
        Ok(())
    }

    fn check_permutation(&self, symbols: &[char]) -> Result<()> {
        let Some(choices) = &self.choices else {
            return Ok(());
        };
        let mut offset = 0;
        let mut dnas: Vec<String> = Vec::with_capacity(self.genes.len());
        for gene in &self.genes {
            dnas.push(symbols[offset..offset + gene.len()].iter().collect());
            offset += gene.len();
        }
        dnas.sort();
        if dnas[..] == choices[..] {
            Ok(())
        } else {
            Err(invalid("DNA is not a permutation of the reordering genes"))
        }
    }

    fn check_flat(&self, symbols: &[char]) -> Result<()> {
        let mut offset = 0;
        for gene in &self.genes {
            gene.accepts(&symbols[offset..offset + gene.len()])?;
            offset += gene.len();
        }
        Ok(())
    }

    fn write_flat(&mut self, symbols: &[char]) {
        let mut offset = 0;
        for gene in &mut self.genes {
            let len = gene.len();
            gene.write_symbols(&symbols[offset..offset + len]);
            offset += len;
        }
    }

    /// Mutates every gene with the shared per-symbol probability `p_mutate`.
    ///
    /// A reordering chromosome instead swaps two distinct genes, once, with
    /// probability `p_mutate`.
    pub fn mutate<R: Rng>(&mut self, p_mutate: f64, rng: &mut R) -> Result<()> {
        check_probability("p_mutate", p_mutate)?;
        if self.is_reordering() {
            let n = self.genes.len();
            if n > 1 && rng.random::<f64>() < p_mutate {
                let a = rng.random_range(0..n);
                let mut b = rng.random_range(0..n - 1);
                if b >= a {
                    b += 1;
                }
                self.genes.swap(a, b);
            }
            return Ok(());
        }
        for gene in &mut self.genes {
            gene.mutate_unchecked(p_mutate, rng);
        }
        Ok(())
    }

    /// Re-draws every symbol of every gene, keeping the layout.
    ///
    /// A reordering chromosome is shuffled instead.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        if self.is_reordering() {
            self.genes.shuffle(rng);
            return;
        }
        for gene in &mut self.genes {
            gene.randomize(rng);
        }
    }

    /// Single-point crossover on the flattened DNA.
    ///
    /// Symbols from `index` onward are exchanged between `self` and `other`,
    /// in place. `index == 0` swaps everything; `index == len()` swaps
    /// nothing. Applying the same crossover twice restores both sides.
    ///
    /// Fails with `InvalidArgument`, leaving both chromosomes untouched, if
    /// the flattened lengths differ, `index > len()`, or a swapped symbol is
    /// not in the receiving gene's alphabet.
    ///
    /// Two reordering chromosomes over the same choice set exchange whole
    /// genes instead: with `k` the gene of `other` covering `index`, each
    /// side moves the other's gene `k` into position `k` by swapping it
    /// with its own copy, so both stay permutations. `index == len()`
    /// changes nothing. Crossing a reordering chromosome with any other
    /// kind fails with `InvalidArgument`.
    pub fn crossover(&mut self, other: &mut Chromosome, index: usize) -> Result<()> {
        let len = self.len();
        if len != other.len() {
            return Err(invalid(format!(
                "crossover needs equal lengths, got {len} and {}",
                other.len()
            )));
        }
        if index > len {
            return Err(invalid(format!(
                "crossover index {index} out of range 0..={len}"
            )));
        }

        let reordering = match (&self.choices, &other.choices) {
            (None, None) => false,
            (Some(a), Some(b)) if a == b => true,
            _ => {
                return Err(invalid(
                    "reordering chromosomes cross over only with the same gene set",
                ))
            }
        };
        if reordering {
            self.reorder_crossover(other, index);
            return Ok(());
        }

        let mut mine: Vec<char> = self.symbols().collect();
        let mut theirs: Vec<char> = other.symbols().collect();
        mine[index..].swap_with_slice(&mut theirs[index..]);

        self.check_flat(&mine)?;
        other.check_flat(&theirs)?;
        self.write_flat(&mine);
        other.write_flat(&theirs);
        Ok(())
    }

    fn reorder_crossover(&mut self, other: &mut Chromosome, index: usize) {
        let Some(k) = other.gene_at(index) else {
            return;
        };
        let theirs = other.genes[k].clone();
        let mine = self.genes[k].clone();
        self.move_to(&theirs, k);
        other.move_to(&mine, k);
    }

    /// Index of the gene covering flattened position `index`.
    fn gene_at(&self, index: usize) -> Option<usize> {
        let mut end = 0;
        self.genes.iter().position(|g| {
            end += g.len();
            index < end
        })
    }

    fn move_to(&mut self, gene: &Gene, k: usize) {
        if let Some(j) = self.genes.iter().position(|g| g.symbols() == gene.symbols()) {
            self.genes.swap(j, k);
        }
    }

    /// Whether `other` has the same gene count, gene lengths and alphabets.
    ///
    /// Reordering chromosomes are commensurate when they share a choice set.
    /// Commensurate chromosomes can always be crossed over.
    pub fn is_commensurate(&self, other: &Chromosome) -> bool {
        if self.choices.is_some() || other.choices.is_some() {
            return self.choices == other.choices;
        }
        self.genes.len() == other.genes.len()
            && self
                .genes
                .iter()
                .zip(&other.genes)
                .all(|(a, b)| a.len() == b.len() && a.alphabet() == b.alphabet())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ChromosomeRepr {
    genes: Vec<Gene>,
    choices: Option<Vec<String>>,
}

#[cfg(feature = "serde")]
impl TryFrom<ChromosomeRepr> for Chromosome {
    type Error = crate::error::EvolveError;

    fn try_from(raw: ChromosomeRepr) -> Result<Self> {
        let Some(mut choices) = raw.choices else {
            return Self::new(raw.genes);
        };
        let chromosome = Self::reordering(raw.genes)?;
        choices.sort();
        if chromosome.choices() != Some(&choices[..]) {
            return Err(invalid("choices do not match the reordering genes"));
        }
        Ok(chromosome)
    }
}

fn check_lengths(gene_lengths: &[usize]) -> Result<()> {
    if gene_lengths.is_empty() {
        return Err(invalid("at least one gene length is required"));
    }
    if gene_lengths.contains(&0) {
        return Err(invalid("gene lengths must be positive"));
    }
    Ok(())
}

impl<'a> IntoIterator for &'a Chromosome {
    type Item = &'a Gene;
    type IntoIter = std::slice::Iter<'a, Gene>;

    fn into_iter(self) -> Self::IntoIter {
        self.genes.iter()
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chromosome<")?;
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", gene.dna())?;
        }
        write!(f, ">")
    }
}
