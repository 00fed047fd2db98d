//! Symbol alphabets for genes.

use crate::error::{invalid, Result};
use rand::Rng;
use std::fmt;
use std::sync::Arc;

const BINARY: [char; 2] = ['0', '1'];
const DECIMAL: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
const ALPHABETIC: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];
const NUCLEOTIDE: [char; 4] = ['A', 'T', 'C', 'G'];

/// The finite set of symbols a gene may contain.
///
/// Each gene carries its alphabet from construction onward; there is no
/// global alphabet state.
///
/// # Examples
///
/// ```
/// use u_genome::genome::Alphabet;
///
/// assert_eq!(Alphabet::Binary.symbols(), &['0', '1']);
/// assert!(Alphabet::Nucleotide.contains('G'));
///
/// let hex = Alphabet::custom("0123456789abcdef".chars()).unwrap();
/// assert_eq!(hex.len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alphabet {
    /// `0` and `1`.
    #[default]
    Binary,
    /// The digits `0` through `9`.
    Decimal,
    /// Uppercase ASCII letters `A` through `Z`.
    Alphabetic,
    /// DNA bases `A`, `T`, `C`, `G`.
    Nucleotide,
    /// A caller-defined set of distinct symbols.
    ///
    /// Build through [`Alphabet::custom`] to get the non-empty, no-duplicate
    /// checks.
    Custom(Arc<[char]>),
}

impl Alphabet {
    /// Creates a custom alphabet.
    ///
    /// Fails with `InvalidArgument` if `symbols` is empty or contains a
    /// repeated symbol.
    pub fn custom(symbols: impl IntoIterator<Item = char>) -> Result<Self> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        if symbols.is_empty() {
            return Err(invalid("alphabet must contain at least one symbol"));
        }
        for (i, s) in symbols.iter().enumerate() {
            if symbols[..i].contains(s) {
                return Err(invalid(format!("alphabet symbol {s:?} is repeated")));
            }
        }
        Ok(Alphabet::Custom(symbols.into()))
    }

    /// The symbols of this alphabet, in declaration order.
    pub fn symbols(&self) -> &[char] {
        match self {
            Alphabet::Binary => &BINARY[..],
            Alphabet::Decimal => &DECIMAL[..],
            Alphabet::Alphabetic => &ALPHABETIC[..],
            Alphabet::Nucleotide => &NUCLEOTIDE[..],
            Alphabet::Custom(symbols) => &symbols[..],
        }
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols().len()
    }

    /// Always false for alphabets built through the public constructors.
    pub fn is_empty(&self) -> bool {
        self.symbols().is_empty()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols().contains(&symbol)
    }

    /// Draws one symbol uniformly at random.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> char {
        let symbols = self.symbols();
        symbols[rng.random_range(0..symbols.len())]
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alphabet::Binary => write!(f, "binary"),
            Alphabet::Decimal => write!(f, "decimal"),
            Alphabet::Alphabetic => write!(f, "alphabetic"),
            Alphabet::Nucleotide => write!(f, "nucleotide"),
            Alphabet::Custom(symbols) => {
                write!(f, "custom[{}]", symbols.iter().collect::<String>())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_builtin_sizes() {
        assert_eq!(Alphabet::Binary.len(), 2);
        assert_eq!(Alphabet::Decimal.len(), 10);
        assert_eq!(Alphabet::Alphabetic.len(), 26);
        assert_eq!(Alphabet::Nucleotide.len(), 4);
        assert_eq!(Alphabet::default(), Alphabet::Binary);
    }

    #[test]
    fn test_custom_rejects_empty() {
        assert!(Alphabet::custom("".chars()).is_err());
    }

    #[test]
    fn test_custom_rejects_duplicates() {
        assert!(Alphabet::custom("abca".chars()).is_err());
    }

    #[test]
    fn test_custom_equality_by_content() {
        let a = Alphabet::custom("xyz".chars()).unwrap();
        let b = Alphabet::custom("xyz".chars()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Alphabet::Binary);
    }

    #[test]
    fn test_sample_covers_alphabet() {
        let mut rng = create_rng(42);
        let mut seen = [false; 4];
        for _ in 0..1000 {
            let s = Alphabet::Nucleotide.sample(&mut rng);
            let idx = NUCLEOTIDE.iter().position(|&c| c == s).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s), "all bases should be drawn: {seen:?}");
    }

    #[test]
    fn test_display() {
        assert_eq!(Alphabet::Binary.to_string(), "binary");
        let custom = Alphabet::custom("ab".chars()).unwrap();
        assert_eq!(custom.to_string(), "custom[ab]");
    }
}
