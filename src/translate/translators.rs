//! Built-in numeric translators.

use super::types::Translator;
use crate::error::{invalid, EvolveError, Result};
use crate::genome::Gene;

/// Binary DNA as an unsigned base-2 integer, most significant bit first.
///
/// ```
/// use u_genome::genome::Gene;
/// use u_genome::translate::{BinaryIntTranslator, Translator};
///
/// assert_eq!(BinaryIntTranslator.translate_gene(&Gene::binary("1010").unwrap()).unwrap(), 10);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryIntTranslator;

impl Translator for BinaryIntTranslator {
    type Output = u64;

    fn translate_gene(&self, gene: &Gene) -> Result<u64> {
        parse_bits(gene.symbols())
    }
}

/// Binary DNA as a real number `significand * 10^exponent`.
///
/// Layout, left to right:
///
/// ```text
/// [sign]  significand_length bits   exponent sign   exponent bits...
///   0 = +       unsigned int           0 = +        unsigned int
/// ```
///
/// The leading sign bit is present only when `signed`. Exponent bits may be
/// empty, in which case the exponent is 0.
///
/// ```
/// use u_genome::genome::Gene;
/// use u_genome::translate::{BinaryFloatTranslator, Translator};
///
/// let t = BinaryFloatTranslator::new(3, true).unwrap();
/// let x = t.translate_gene(&Gene::binary("001111").unwrap()).unwrap();
/// assert!((x - 0.3).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryFloatTranslator {
    significand_length: usize,
    signed: bool,
}

impl BinaryFloatTranslator {
    /// Creates a translator. `significand_length` must be in `1..=64`.
    pub fn new(significand_length: usize, signed: bool) -> Result<Self> {
        if !(1..=64).contains(&significand_length) {
            return Err(invalid(format!(
                "significand_length must be in 1..=64, got {significand_length}"
            )));
        }
        Ok(Self {
            significand_length,
            signed,
        })
    }

    pub fn significand_length(&self) -> usize {
        self.significand_length
    }

    pub fn signed(&self) -> bool {
        self.signed
    }

    /// Shortest gene this translator accepts.
    pub fn min_length(&self) -> usize {
        usize::from(self.signed) + self.significand_length + 1
    }
}

impl Translator for BinaryFloatTranslator {
    type Output = f64;

    fn translate_gene(&self, gene: &Gene) -> Result<f64> {
        let bits = gene.symbols();
        if bits.len() < self.min_length() {
            return Err(EvolveError::Translation(format!(
                "gene of length {} is shorter than the {} symbols the layout needs",
                bits.len(),
                self.min_length()
            )));
        }

        let start = usize::from(self.signed);
        let exponent_sign = start + self.significand_length;

        let negative = self.signed && bit(bits[0])?;
        let significand = parse_bits(&bits[start..exponent_sign])? as f64;
        let negative_exponent = bit(bits[exponent_sign])?;
        let magnitude = parse_bits(&bits[exponent_sign + 1..])?;
        let magnitude = i32::try_from(magnitude).map_err(|_| {
            EvolveError::Translation(format!("exponent {magnitude} out of range"))
        })?;

        // Divide for negative exponents: 3 / 10 is exact where 3 * 0.1 is not.
        let scale = 10f64.powi(magnitude);
        let value = if negative_exponent {
            significand / scale
        } else {
            significand * scale
        };
        Ok(if negative { -value } else { value })
    }
}

/// Decimal DNA as an unsigned base-10 integer.
///
/// ```
/// use u_genome::genome::{Alphabet, Gene};
/// use u_genome::translate::{DecimalIntTranslator, Translator};
///
/// let gene = Gene::new(Alphabet::Decimal, "0042").unwrap();
/// assert_eq!(DecimalIntTranslator.translate_gene(&gene).unwrap(), 42);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecimalIntTranslator;

impl Translator for DecimalIntTranslator {
    type Output = u64;

    fn translate_gene(&self, gene: &Gene) -> Result<u64> {
        gene.symbols().iter().try_fold(0u64, |acc, &s| {
            let digit = s
                .to_digit(10)
                .ok_or_else(|| EvolveError::Translation(format!("'{s}' is not a decimal digit")))?;
            acc.checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .ok_or_else(|| {
                    EvolveError::Translation(format!("gene {} overflows u64", gene.dna()))
                })
        })
    }
}

fn bit(symbol: char) -> Result<bool> {
    match symbol {
        '0' => Ok(false),
        '1' => Ok(true),
        other => Err(EvolveError::Translation(format!(
            "'{other}' is not a binary digit"
        ))),
    }
}

/// Parses base-2 symbols into a `u64`. Empty input is 0.
fn parse_bits(bits: &[char]) -> Result<u64> {
    if bits.len() > 64 {
        return Err(EvolveError::Translation(format!(
            "{} bits do not fit in u64",
            bits.len()
        )));
    }
    bits.iter()
        .try_fold(0u64, |acc, &s| Ok((acc << 1) | u64::from(bit(s)?)))
}
