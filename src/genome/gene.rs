//! Genes: fixed-length symbol sequences over one alphabet.

use super::alphabet::Alphabet;
use crate::error::{check_probability, invalid, Result};
use rand::Rng;
use std::fmt;

/// A single feature of a candidate solution, encoded as symbols.
///
/// Invariants: every symbol belongs to [`alphabet`](Gene::alphabet), and the
/// length never changes after construction. Mutation replaces symbols in
/// place.
///
/// # Examples
///
/// ```
/// use u_genome::genome::{Alphabet, Gene};
///
/// let gene = Gene::new(Alphabet::Binary, "1010").unwrap();
/// assert_eq!(gene.len(), 4);
/// assert_eq!(gene.dna(), "1010");
/// assert!(Gene::new(Alphabet::Binary, "10x0").is_err());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GeneRepr"))]
pub struct Gene {
    alphabet: Alphabet,
    symbols: Vec<char>,
    name: Option<String>,
}

impl Gene {
    /// Creates a gene from an explicit symbol string.
    ///
    /// Fails with `InvalidArgument` if `dna` is empty or contains a symbol
    /// outside `alphabet`.
    pub fn new(alphabet: Alphabet, dna: &str) -> Result<Self> {
        let symbols: Vec<char> = dna.chars().collect();
        if symbols.is_empty() {
            return Err(invalid("gene DNA must not be empty"));
        }
        check_symbols(&alphabet, &symbols)?;
        Ok(Self {
            alphabet,
            symbols,
            name: None,
        })
    }

    /// Shorthand for a [`Alphabet::Binary`] gene.
    pub fn binary(dna: &str) -> Result<Self> {
        Self::new(Alphabet::Binary, dna)
    }

    /// Creates a gene of `length` symbols drawn uniformly from `alphabet`.
    ///
    /// Fails with `InvalidArgument` if `length` is zero.
    pub fn random<R: Rng>(alphabet: Alphabet, length: usize, rng: &mut R) -> Result<Self> {
        if length == 0 {
            return Err(invalid("gene length must be positive"));
        }
        let symbols = (0..length).map(|_| alphabet.sample(rng)).collect();
        Ok(Self {
            alphabet,
            symbols,
            name: None,
        })
    }

    /// Attaches a display name. Names do not affect equality.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Genes are never empty; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// The symbols as a string.
    pub fn dna(&self) -> String {
        self.symbols.iter().collect()
    }

    /// Replaces the symbols with `dna`, which must have the same length and
    /// only contain symbols of this gene's alphabet.
    pub fn set_dna(&mut self, dna: &str) -> Result<()> {
        let symbols: Vec<char> = dna.chars().collect();
        if symbols.len() != self.symbols.len() {
            return Err(invalid(format!(
                "gene DNA length {} does not match gene length {}",
                symbols.len(),
                self.symbols.len()
            )));
        }
        check_symbols(&self.alphabet, &symbols)?;
        self.symbols = symbols;
        Ok(())
    }

    /// Re-draws each symbol independently with probability `p_mutate`.
    ///
    /// The replacement is drawn from the whole alphabet, so it may equal the
    /// symbol it replaces. Fails with `InvalidArgument` unless
    /// `0 <= p_mutate <= 1`.
    pub fn mutate<R: Rng>(&mut self, p_mutate: f64, rng: &mut R) -> Result<()> {
        check_probability("p_mutate", p_mutate)?;
        self.mutate_unchecked(p_mutate, rng);
        Ok(())
    }

    pub(crate) fn mutate_unchecked<R: Rng>(&mut self, p_mutate: f64, rng: &mut R) {
        for symbol in &mut self.symbols {
            if rng.random::<f64>() < p_mutate {
                *symbol = self.alphabet.sample(rng);
            }
        }
    }

    /// Re-draws every symbol.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for symbol in &mut self.symbols {
            *symbol = self.alphabet.sample(rng);
        }
    }

    /// Checks that `symbols` could be written into this gene.
    pub(crate) fn accepts(&self, symbols: &[char]) -> Result<()> {
        if symbols.len() != self.symbols.len() {
            return Err(invalid(format!(
                "expected {} symbols, got {}",
                self.symbols.len(),
                symbols.len()
            )));
        }
        check_symbols(&self.alphabet, symbols)
    }

    /// Overwrites the symbols. Callers validate with [`accepts`](Self::accepts).
    pub(crate) fn write_symbols(&mut self, symbols: &[char]) {
        self.symbols.copy_from_slice(symbols);
    }
}

fn check_symbols(alphabet: &Alphabet, symbols: &[char]) -> Result<()> {
    match symbols.iter().find(|&&s| !alphabet.contains(s)) {
        Some(s) => Err(invalid(format!(
            "symbol {s:?} is not in the {alphabet} alphabet"
        ))),
        None => Ok(()),
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GeneRepr {
    alphabet: Alphabet,
    symbols: Vec<char>,
    name: Option<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<GeneRepr> for Gene {
    type Error = crate::error::EvolveError;

    fn try_from(raw: GeneRepr) -> Result<Self> {
        let alphabet = match raw.alphabet {
            Alphabet::Custom(symbols) => Alphabet::custom(symbols.iter().copied())?,
            other => other,
        };
        let dna: String = raw.symbols.into_iter().collect();
        let gene = Gene::new(alphabet, &dna)?;
        Ok(match raw.name {
            Some(name) => gene.with_name(name),
            None => gene,
        })
    }
}

impl PartialEq for Gene {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.symbols == other.symbols
    }
}

impl Eq for Gene {}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gene")?;
        if let Some(name) = &self.name {
            write!(f, "[{name}]")?;
        }
        write!(f, "<{}>", self.dna())
    }
}
