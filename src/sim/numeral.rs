//! Numeral conversion engine
//!
//! Pure functions between decimal, binary, octal and hexadecimal strings.
//! Outputs are minimal-width (no leading zeros) with uppercase hex digits,
//! except `hex_to_binary`, which pads to four bits per hex digit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing a numeral string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumeralError {
    #[error("empty numeral")]
    Empty,
    #[error("negative values are not supported")]
    Negative,
    #[error("invalid digit '{digit}' for base {radix}")]
    InvalidDigit { digit: char, radix: u32 },
    #[error("numeral does not fit in 64 bits")]
    Overflow,
    #[error("unknown radix '{0}'")]
    UnknownRadix(String),
}

/// A numeral base used by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Radix::Binary => "Binary",
            Radix::Octal => "Octal",
            Radix::Decimal => "Decimal",
            Radix::Hexadecimal => "Hexadecimal",
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Radix {
    type Err = NumeralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "2" | "bin" | "binary" => Ok(Radix::Binary),
            "8" | "oct" | "octal" => Ok(Radix::Octal),
            "10" | "dec" | "decimal" => Ok(Radix::Decimal),
            "16" | "hex" | "hexadecimal" => Ok(Radix::Hexadecimal),
            other => Err(NumeralError::UnknownRadix(other.to_string())),
        }
    }
}

/// Parse a non-negative numeral in the given radix.
///
/// Hex digits are accepted in either case. Signs, whitespace and prefixes
/// such as `0x` are rejected.
pub fn parse(s: &str, radix: Radix) -> Result<u64, NumeralError> {
    if s.is_empty() {
        return Err(NumeralError::Empty);
    }
    if s.starts_with('-') {
        return Err(NumeralError::Negative);
    }
    let base = radix.base();
    if let Some(digit) = s.chars().find(|c| !c.is_digit(base)) {
        return Err(NumeralError::InvalidDigit { digit, radix: base });
    }
    u64::from_str_radix(s, base).map_err(|_| NumeralError::Overflow)
}

/// Format a value in the given radix (minimal width, uppercase hex)
pub fn format(value: u64, radix: Radix) -> String {
    match radix {
        Radix::Binary => format!("{:b}", value),
        Radix::Octal => format!("{:o}", value),
        Radix::Decimal => value.to_string(),
        Radix::Hexadecimal => format!("{:X}", value),
    }
}

/// Convert a numeral between any two radixes (practice arena).
///
/// Surrounding whitespace is ignored.
pub fn convert(input: &str, from: Radix, to: Radix) -> Result<String, NumeralError> {
    let value = parse(input.trim(), from)?;
    Ok(format(value, to))
}

/// [`convert`] with radixes given by name or base, e.g. `"hex"` or `"16"`
pub fn convert_named(input: &str, from: &str, to: &str) -> Result<String, NumeralError> {
    convert(input, from.parse()?, to.parse()?)
}

pub fn binary_to_decimal(bin: &str) -> Result<u64, NumeralError> {
    parse(bin, Radix::Binary)
}

pub fn decimal_to_binary(n: u64) -> String {
    format(n, Radix::Binary)
}

pub fn hex_to_decimal(hex: &str) -> Result<u64, NumeralError> {
    parse(hex, Radix::Hexadecimal)
}

pub fn decimal_to_hex(n: u64) -> String {
    format(n, Radix::Hexadecimal)
}

pub fn octal_to_decimal(oct: &str) -> Result<u64, NumeralError> {
    parse(oct, Radix::Octal)
}

pub fn decimal_to_octal(n: u64) -> String {
    format(n, Radix::Octal)
}

pub fn binary_to_hex(bin: &str) -> Result<String, NumeralError> {
    binary_to_decimal(bin).map(decimal_to_hex)
}

/// Hex to binary, zero-padded to exactly `4 * hex.len()` bits
pub fn hex_to_binary(hex: &str) -> Result<String, NumeralError> {
    let value = hex_to_decimal(hex)?;
    Ok(pad_binary(value, hex.len() * 4))
}

/// Binary representation left-padded with zeros to at least `width` bits
pub fn pad_binary(value: u64, width: usize) -> String {
    format!("{:0width$b}", value, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_conversions() {
        assert_eq!(binary_to_decimal("1011"), Ok(11));
        assert_eq!(decimal_to_binary(11), "1011");
        assert_eq!(decimal_to_binary(0), "0");
        assert_eq!(decimal_to_hex(214), "D6");
        assert_eq!(hex_to_decimal("d6"), Ok(214));
        assert_eq!(decimal_to_octal(26), "32");
        assert_eq!(octal_to_decimal("32"), Ok(26));
        assert_eq!(binary_to_hex("11010110"), Ok("D6".to_string()));
    }

    #[test]
    fn test_hex_to_binary_pads() {
        assert_eq!(hex_to_binary("D6"), Ok("11010110".to_string()));
        assert_eq!(hex_to_binary("1F"), Ok("00011111".to_string()));
        assert_eq!(hex_to_binary("00"), Ok("00000000".to_string()));
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(parse("", Radix::Binary), Err(NumeralError::Empty));
        assert_eq!(parse("-5", Radix::Decimal), Err(NumeralError::Negative));
        assert_eq!(
            parse("102", Radix::Binary),
            Err(NumeralError::InvalidDigit { digit: '2', radix: 2 })
        );
        assert!(matches!(parse("+7", Radix::Octal), Err(NumeralError::InvalidDigit { .. })));
        assert_eq!(parse("FFFFFFFFFFFFFFFFF", Radix::Hexadecimal), Err(NumeralError::Overflow));
    }

    #[test]
    fn test_convert_practice() {
        assert_eq!(convert(" 42 ", Radix::Decimal, Radix::Hexadecimal), Ok("2A".to_string()));
        assert_eq!(convert("2a", Radix::Hexadecimal, Radix::Binary), Ok("101010".to_string()));
        assert!(convert("9", Radix::Octal, Radix::Decimal).is_err());
    }

    #[test]
    fn test_convert_named() {
        assert_eq!(convert_named("255", "dec", "hex"), Ok("FF".to_string()));
        assert_eq!(convert_named("17", "8", "binary"), Ok("1111".to_string()));
        assert_eq!(
            convert_named("101", "bin", "base3"),
            Err(NumeralError::UnknownRadix("base3".to_string()))
        );
        assert!(matches!(
            convert_named("12", "binary", "decimal"),
            Err(NumeralError::InvalidDigit { .. })
        ));
    }

    #[test]
    fn test_radix_from_str() {
        assert_eq!("16".parse::<Radix>(), Ok(Radix::Hexadecimal));
        assert_eq!("Binary".parse::<Radix>(), Ok(Radix::Binary));
        assert!("7".parse::<Radix>().is_err());
    }

    proptest! {
        #[test]
        fn prop_binary_round_trip(b in "[01]{1,16}") {
            let value = binary_to_decimal(&b).unwrap();
            let stripped = b.trim_start_matches('0');
            let expected = if stripped.is_empty() { "0" } else { stripped };
            prop_assert_eq!(decimal_to_binary(value), expected);
        }

        #[test]
        fn prop_hex_round_trip(h in "[0-9A-F]{1,8}") {
            let value = hex_to_decimal(&h).unwrap();
            let stripped = h.trim_start_matches('0');
            let expected = if stripped.is_empty() { "0" } else { stripped };
            prop_assert_eq!(decimal_to_hex(value), expected);
        }

        #[test]
        fn prop_octal_round_trip(o in "[0-7]{1,10}") {
            let value = octal_to_decimal(&o).unwrap();
            let stripped = o.trim_start_matches('0');
            let expected = if stripped.is_empty() { "0" } else { stripped };
            prop_assert_eq!(decimal_to_octal(value), expected);
        }

        #[test]
        fn prop_hex_to_binary_width(h in "[0-9A-Fa-f]{1,12}") {
            let bin = hex_to_binary(&h).unwrap();
            prop_assert_eq!(bin.len(), 4 * h.len());
            prop_assert_eq!(binary_to_decimal(&bin).unwrap(), hex_to_decimal(&h).unwrap());
        }
    }
}
