//! Problem generation
//!
//! A problem is a label in the source base and the answer in the target base.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::numeral::{self, Radix};

/// Which conversion the player practices during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConversionMode {
    #[default]
    BinaryToDecimal,
    DecimalToBinary,
    HexToDecimal,
    DecimalToHex,
    BinaryToHex,
    HexToBinary,
    OctalToDecimal,
    DecimalToOctal,
}

impl ConversionMode {
    pub const ALL: [ConversionMode; 8] = [
        ConversionMode::BinaryToDecimal,
        ConversionMode::DecimalToBinary,
        ConversionMode::HexToDecimal,
        ConversionMode::DecimalToHex,
        ConversionMode::BinaryToHex,
        ConversionMode::HexToBinary,
        ConversionMode::OctalToDecimal,
        ConversionMode::DecimalToOctal,
    ];

    /// Base the label is written in
    pub fn source_radix(self) -> Radix {
        match self {
            ConversionMode::BinaryToDecimal | ConversionMode::BinaryToHex => Radix::Binary,
            ConversionMode::HexToDecimal | ConversionMode::HexToBinary => Radix::Hexadecimal,
            ConversionMode::OctalToDecimal => Radix::Octal,
            ConversionMode::DecimalToBinary
            | ConversionMode::DecimalToHex
            | ConversionMode::DecimalToOctal => Radix::Decimal,
        }
    }

    /// Base the answer is written in
    pub fn target_radix(self) -> Radix {
        match self {
            ConversionMode::BinaryToDecimal
            | ConversionMode::HexToDecimal
            | ConversionMode::OctalToDecimal => Radix::Decimal,
            ConversionMode::DecimalToBinary | ConversionMode::HexToBinary => Radix::Binary,
            ConversionMode::DecimalToHex | ConversionMode::BinaryToHex => Radix::Hexadecimal,
            ConversionMode::DecimalToOctal => Radix::Octal,
        }
    }

    /// Menu title, e.g. "Binary to Decimal"
    pub fn title(self) -> &'static str {
        match self {
            ConversionMode::BinaryToDecimal => "Binary to Decimal",
            ConversionMode::DecimalToBinary => "Decimal to Binary",
            ConversionMode::HexToDecimal => "Hexadecimal to Decimal",
            ConversionMode::DecimalToHex => "Decimal to Hexadecimal",
            ConversionMode::BinaryToHex => "Binary to Hexadecimal",
            ConversionMode::HexToBinary => "Hexadecimal to Binary",
            ConversionMode::OctalToDecimal => "Octal to Decimal",
            ConversionMode::DecimalToOctal => "Decimal to Octal",
        }
    }

    /// Identifier used by settings and the page ("binaryToDecimal", ...)
    pub fn as_str(self) -> &'static str {
        match self {
            ConversionMode::BinaryToDecimal => "binaryToDecimal",
            ConversionMode::DecimalToBinary => "decimalToBinary",
            ConversionMode::HexToDecimal => "hexToDecimal",
            ConversionMode::DecimalToHex => "decimalToHex",
            ConversionMode::BinaryToHex => "binaryToHex",
            ConversionMode::HexToBinary => "hexToBinary",
            ConversionMode::OctalToDecimal => "octalToDecimal",
            ConversionMode::DecimalToOctal => "decimalToOctal",
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ConversionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConversionMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown conversion mode '{}'", s))
    }
}

/// One conversion problem carried by an enemy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Shown on the enemy, in the source base
    pub label: String,
    /// Correct answer, in the target base
    pub answer: String,
}

impl Problem {
    pub fn new(label: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            answer: answer.into(),
        }
    }

    /// Case-insensitive comparison against a submitted answer
    pub fn is_correct(&self, submitted: &str) -> bool {
        submitted.trim().eq_ignore_ascii_case(&self.answer)
    }
}

/// Uniform integer in `[lo, hi)`, or `lo` when the range is empty
fn sample(rng: &mut impl Rng, lo: u64, hi: u64) -> u64 {
    if hi <= lo { lo } else { rng.random_range(lo..hi) }
}

/// `bits` random binary digits with a forced leading one
fn random_bits(rng: &mut impl Rng, bits: u32) -> String {
    let mut s: String = (0..bits.max(1))
        .map(|_| if rng.random_bool(0.5) { '1' } else { '0' })
        .collect();
    if s.len() > 1 && s.starts_with('0') {
        s.replace_range(0..1, "1");
    }
    s
}

/// A value that needs exactly `bits` bits: `[2^(bits-1), 2^bits - 1]`
fn random_decimal(rng: &mut impl Rng, bits: u32) -> u64 {
    let bits = bits.clamp(1, 63);
    rng.random_range((1u64 << (bits - 1))..=((1u64 << bits) - 1))
}

/// Magnitude for a hex label, at least two hex digits
fn random_hex_value(rng: &mut impl Rng, bits: u32) -> u64 {
    let lo = 16u64.pow(bits / 4).saturating_sub(1);
    let hi = 16u64.pow(bits.div_ceil(4)).saturating_sub(1);
    let value = sample(rng, lo, hi);
    if value < 16 { sample(rng, 16, 255) } else { value }
}

/// Magnitude for an octal label, at least two octal digits
fn random_octal_value(rng: &mut impl Rng, bits: u32) -> u64 {
    let lo = 8u64.pow(bits / 3).saturating_sub(1);
    let hi = 8u64.pow(bits.div_ceil(3)).saturating_sub(1);
    let value = sample(rng, lo, hi);
    if value < 8 { sample(rng, 8, 63) } else { value }
}

/// Generate a problem of roughly `bits` bits for the given mode.
///
/// Always returns a well-formed problem; resampling is bounded.
pub fn generate_problem(rng: &mut impl Rng, bits: u32, mode: ConversionMode) -> Problem {
    let bits = bits.clamp(1, 16);
    match mode {
        ConversionMode::BinaryToDecimal => {
            let label = random_bits(rng, bits);
            let value = numeral::binary_to_decimal(&label).unwrap_or_default();
            Problem::new(label, value.to_string())
        }
        ConversionMode::BinaryToHex => {
            let label = random_bits(rng, bits.div_ceil(4) * 4);
            let value = numeral::binary_to_decimal(&label).unwrap_or_default();
            Problem::new(label, numeral::decimal_to_hex(value))
        }
        ConversionMode::DecimalToBinary => {
            let value = random_decimal(rng, bits);
            Problem::new(value.to_string(), numeral::decimal_to_binary(value))
        }
        ConversionMode::DecimalToHex => {
            let value = random_decimal(rng, bits);
            Problem::new(value.to_string(), numeral::decimal_to_hex(value))
        }
        ConversionMode::DecimalToOctal => {
            let value = random_decimal(rng, bits);
            Problem::new(value.to_string(), numeral::decimal_to_octal(value))
        }
        ConversionMode::HexToDecimal => {
            let label = numeral::decimal_to_hex(random_hex_value(rng, bits));
            let value = numeral::hex_to_decimal(&label).unwrap_or_default();
            Problem::new(label, value.to_string())
        }
        ConversionMode::HexToBinary => {
            let label = numeral::decimal_to_hex(random_hex_value(rng, bits));
            let answer = numeral::hex_to_binary(&label).unwrap_or_default();
            Problem::new(label, answer)
        }
        ConversionMode::OctalToDecimal => {
            let label = numeral::decimal_to_octal(random_octal_value(rng, bits));
            let value = numeral::octal_to_decimal(&label).unwrap_or_default();
            Problem::new(label, value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn check(problem: &Problem, mode: ConversionMode) {
        let value = numeral::parse(&problem.label, mode.source_radix()).unwrap();
        let expected = match mode {
            ConversionMode::HexToBinary => numeral::hex_to_binary(&problem.label).unwrap(),
            _ => numeral::format(value, mode.target_radix()),
        };
        assert_eq!(problem.answer, expected, "{:?} {:?}", mode, problem);
    }

    #[test]
    fn test_every_mode_produces_consistent_answers() {
        let mut rng = Pcg32::seed_from_u64(7);
        for mode in ConversionMode::ALL {
            for bits in 3..14 {
                for _ in 0..20 {
                    let p = generate_problem(&mut rng, bits, mode);
                    check(&p, mode);
                }
            }
        }
    }

    #[test]
    fn test_decimal_source_needs_exact_bits() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let p = generate_problem(&mut rng, 4, ConversionMode::DecimalToBinary);
            let value: u64 = p.label.parse().unwrap();
            assert!((8..=15).contains(&value));
            assert_eq!(p.answer.len(), 4);
        }
    }

    #[test]
    fn test_binary_label_has_leading_one() {
        let mut rng = Pcg32::seed_from_u64(3);
        for bits in 2..14 {
            let p = generate_problem(&mut rng, bits, ConversionMode::BinaryToDecimal);
            assert_eq!(p.label.len(), bits as usize);
            assert!(p.label.starts_with('1'));
        }
    }

    #[test]
    fn test_binary_to_hex_label_is_whole_nibbles() {
        let mut rng = Pcg32::seed_from_u64(5);
        let p = generate_problem(&mut rng, 5, ConversionMode::BinaryToHex);
        assert_eq!(p.label.len(), 8);
    }

    #[test]
    fn test_hex_and_octal_labels_never_degenerate() {
        let mut rng = Pcg32::seed_from_u64(9);
        for bits in 3..6 {
            for _ in 0..100 {
                let hex = generate_problem(&mut rng, bits, ConversionMode::HexToDecimal);
                assert!(hex.answer.parse::<u64>().unwrap() >= 16);
                let oct = generate_problem(&mut rng, bits, ConversionMode::OctalToDecimal);
                assert!(oct.answer.parse::<u64>().unwrap() >= 8);
            }
        }
    }

    #[test]
    fn test_hex_to_binary_example() {
        let p = Problem::new("D6", numeral::hex_to_binary("D6").unwrap());
        assert_eq!(p.answer, "11010110");
        assert!(p.is_correct("11010110"));
    }

    #[test]
    fn test_is_correct_ignores_case() {
        let p = Problem::new("214", "D6");
        assert!(p.is_correct("d6"));
        assert!(p.is_correct(" D6 "));
        assert!(!p.is_correct("D7"));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("hexToBinary".parse::<ConversionMode>(), Ok(ConversionMode::HexToBinary));
        assert!("binaryToRoman".parse::<ConversionMode>().is_err());
        let json = serde_json::to_string(&ConversionMode::DecimalToOctal).unwrap();
        assert_eq!(json, "\"decimalToOctal\"");
    }
}
