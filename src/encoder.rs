//! Order-preserving textual encoding for decimal numbers.
//!
//! Values are rewritten into `<sign><bin>E<mantissa>` form, where the sign
//! marker is `+` for non-negative and `!` for negative values, the bin letter
//! maps the power-of-ten exponent into one of 52 letters, and the mantissa is
//! the significant digits with the point after the first digit. Negative
//! mantissas are stored as the ten's complement `10 - m` so that plain string
//! comparison of two encodings agrees with numeric comparison of the values
//! they encode. Zero has the single reserved spelling `+AE0`.
//!
//! # Examples
//!
//! ```
//! use lexidec::encoder::{decode, encode};
//!
//! assert_eq!(encode("123").unwrap(), "+cE1.23");
//! assert_eq!(encode("-1.0").unwrap(), "!ZE9");
//! assert_eq!(encode("0").unwrap(), "+AE0");
//! assert_eq!(decode("+cE1.23").unwrap().to_string(), "123");
//! ```

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::decimal::{DecimalParseError, DecimalValue};

/// Smallest exponent the bin tables cover.
pub const MIN_EXPONENT: i32 = -26;
/// Largest exponent the bin tables cover.
pub const MAX_EXPONENT: i32 = 25;

/// The reserved encoding of zero.
pub const ZERO_ENCODING: &str = "+AE0";

/// Error raised while encoding a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The input could not be read as a plain decimal number.
    InvalidNumber(DecimalParseError),
    /// The value's exponent falls outside [`MIN_EXPONENT`]..=[`MAX_EXPONENT`].
    ExponentOutOfRange(i32),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::InvalidNumber(err) => write!(f, "invalid decimal: {}", err),
            EncodeError::ExponentOutOfRange(exponent) => write!(
                f,
                "exponent {} outside the encodable range [{}, {}]",
                exponent, MIN_EXPONENT, MAX_EXPONENT
            ),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::InvalidNumber(err) => Some(err),
            EncodeError::ExponentOutOfRange(_) => None,
        }
    }
}

impl From<DecimalParseError> for EncodeError {
    fn from(err: DecimalParseError) -> Self {
        EncodeError::InvalidNumber(err)
    }
}

/// Error raised while decoding an encoded string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Empty input.
    Empty,
    /// First character was not a `+`/`!` sign marker.
    MissingSign(char),
    /// The bin letter does not appear in the table for the given sign.
    UnknownBinLetter(char),
    /// The `E` separator is missing.
    MissingMarker,
    /// The mantissa is absent, malformed, or not in canonical form.
    BadMantissa(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "empty encoded input"),
            DecodeError::MissingSign(c) => {
                write!(f, "expected '+' or '!' sign marker, found '{}'", c)
            }
            DecodeError::UnknownBinLetter(c) => write!(f, "unknown bin letter '{}'", c),
            DecodeError::MissingMarker => write!(f, "missing 'E' separator"),
            DecodeError::BadMantissa(detail) => write!(f, "bad mantissa: {}", detail),
        }
    }
}

impl std::error::Error for DecodeError {}

/// The two bijective exponent-to-letter tables, built once per process.
///
/// Non-negative values use a table where larger exponents map to larger
/// letters (`-26 → A` … `-1 → Z`, `0 → a` … `25 → z`); negative values use
/// the mirror image (`25 → A` … `0 → Z`, `-1 → a` … `-26 → z`), so that a
/// larger magnitude sorts earlier, which is what negative ordering needs.
pub struct ExponentTables {
    positive_letters: [char; 52],
    negative_letters: [char; 52],
    positive_exponents: HashMap<char, i32>,
    negative_exponents: HashMap<char, i32>,
}

impl ExponentTables {
    fn build() -> Self {
        let mut positive_letters = ['\0'; 52];
        let mut negative_letters = ['\0'; 52];
        let mut positive_exponents = HashMap::with_capacity(52);
        let mut negative_exponents = HashMap::with_capacity(52);
        for exponent in MIN_EXPONENT..=MAX_EXPONENT {
            let index = (exponent - MIN_EXPONENT) as usize;
            let positive = if exponent < 0 {
                (b'A' + (exponent - MIN_EXPONENT) as u8) as char
            } else {
                (b'a' + exponent as u8) as char
            };
            let negative = if exponent >= 0 {
                (b'A' + (MAX_EXPONENT - exponent) as u8) as char
            } else {
                (b'a' + (-exponent - 1) as u8) as char
            };
            positive_letters[index] = positive;
            negative_letters[index] = negative;
            positive_exponents.insert(positive, exponent);
            negative_exponents.insert(negative, exponent);
        }
        ExponentTables {
            positive_letters,
            negative_letters,
            positive_exponents,
            negative_exponents,
        }
    }

    /// Bin letter for a non-negative value's exponent.
    pub fn positive_letter(&self, exponent: i32) -> Option<char> {
        self.letter_in(&self.positive_letters, exponent)
    }

    /// Bin letter for a negative value's exponent.
    pub fn negative_letter(&self, exponent: i32) -> Option<char> {
        self.letter_in(&self.negative_letters, exponent)
    }

    /// Bin letter for an exponent under either sign.
    pub fn letter(&self, exponent: i32, negative: bool) -> Option<char> {
        if negative {
            self.negative_letter(exponent)
        } else {
            self.positive_letter(exponent)
        }
    }

    /// Exponent a bin letter stands for in the non-negative table.
    pub fn positive_exponent(&self, letter: char) -> Option<i32> {
        self.positive_exponents.get(&letter).copied()
    }

    /// Exponent a bin letter stands for in the negative table.
    pub fn negative_exponent(&self, letter: char) -> Option<i32> {
        self.negative_exponents.get(&letter).copied()
    }

    fn letter_in(&self, table: &[char; 52], exponent: i32) -> Option<char> {
        if (MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
            Some(table[(exponent - MIN_EXPONENT) as usize])
        } else {
            None
        }
    }
}

/// Shared table instance. Initialization is lazy and thread-safe; every
/// caller sees the same read-only tables.
pub fn tables() -> &'static ExponentTables {
    static TABLES: Lazy<ExponentTables> = Lazy::new(ExponentTables::build);
    &TABLES
}

/// Encode a decimal string.
///
/// The input is plain decimal notation (optional sign, digits, at most one
/// point). Leading/trailing zeros are normalized away before encoding, so
/// `"1.0"`, `"01"` and `"1"` share one encoding.
///
/// # Errors
///
/// [`EncodeError::InvalidNumber`] for unparseable input,
/// [`EncodeError::ExponentOutOfRange`] when the value needs an exponent
/// outside the 52-bin table.
pub fn encode(text: &str) -> Result<String, EncodeError> {
    let value: DecimalValue = text.parse()?;
    encode_value(&value)
}

/// Encode an already-parsed [`DecimalValue`].
pub fn encode_value(value: &DecimalValue) -> Result<String, EncodeError> {
    if value.is_zero() {
        return Ok(ZERO_ENCODING.to_string());
    }
    let exponent = value.exponent();
    let letter = tables()
        .letter(exponent, value.is_negative())
        .ok_or(EncodeError::ExponentOutOfRange(exponent))?;
    let mantissa = if value.is_negative() {
        format_mantissa(&complement_digits(value.digits()))
    } else {
        format_mantissa(value.digits())
    };
    let sign = if value.is_negative() { '!' } else { '+' };
    Ok(format!("{}{}E{}", sign, letter, mantissa))
}

/// Decode an encoded string back into a [`DecimalValue`].
///
/// Only canonical encodings are accepted: the exact output alphabet of
/// [`encode`]. Anything else fails with a [`DecodeError`] naming the defect.
pub fn decode(text: &str) -> Result<DecimalValue, DecodeError> {
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }
    if text == ZERO_ENCODING {
        return Ok(DecimalValue::zero());
    }
    let bytes = text.as_bytes();
    let negative = match bytes[0] {
        b'+' => false,
        b'!' => true,
        other => return Err(DecodeError::MissingSign(other as char)),
    };
    let letter = match bytes.get(1) {
        Some(&b) => b as char,
        None => return Err(DecodeError::MissingMarker),
    };
    let exponent = if negative {
        tables().negative_exponent(letter)
    } else {
        tables().positive_exponent(letter)
    }
    .ok_or(DecodeError::UnknownBinLetter(letter))?;
    if bytes.get(2) != Some(&b'E') {
        return Err(DecodeError::MissingMarker);
    }

    let stored = parse_mantissa(&text[3..])?;
    let digits = if negative {
        // Un-complement; the complement is its own inverse.
        if stored.iter().all(|&d| d == 0) {
            return Err(DecodeError::BadMantissa(
                "complement mantissa must be positive".to_string(),
            ));
        }
        let digits = complement_digits(&stored);
        // A stored `9.…` would un-complement to a leading zero digit,
        // which no canonical mantissa has.
        if digits[0] == 0 {
            return Err(DecodeError::BadMantissa(
                "complement mantissa starts above the canonical range".to_string(),
            ));
        }
        digits
    } else {
        if stored[0] == 0 {
            return Err(DecodeError::BadMantissa(
                "mantissa below 1 is reserved for the zero sentinel".to_string(),
            ));
        }
        stored
    };
    Ok(DecimalValue::from_parts(negative, digits, exponent))
}

/// Cheap shape test: could `text` be the output of [`encode`]?
///
/// Never rejects a real encoding; accepts some strings [`decode`] would
/// refuse (non-canonical mantissas), so it is a pre-filter, not a validator.
pub fn is_possibly_encoded(text: &str) -> bool {
    static ENCODED_SHAPE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[+!][A-Za-z]E\d(\.\d+)?$").unwrap());
    ENCODED_SHAPE.is_match(text)
}

/// Digit-wise ten's complement of a normalized mantissa: `10 - m`.
///
/// Interior digits become `9 - d`; the final digit becomes `10 - d`. The
/// final significant digit of a normalized mantissa is never zero, so no
/// carry can occur and the result is itself a normalized digit run. Applying
/// the complement twice returns the input.
pub(crate) fn complement_digits(digits: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = digits.iter().map(|&d| 9 - d).collect();
    if let Some(last) = out.last_mut() {
        *last += 1;
    }
    out
}

fn format_mantissa(digits: &[u8]) -> String {
    let mut out = String::with_capacity(digits.len() + 1);
    for (i, &d) in digits.iter().enumerate() {
        if i == 1 {
            out.push('.');
        }
        out.push((b'0' + d) as char);
    }
    out
}

fn parse_mantissa(mantissa: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = mantissa.as_bytes();
    let first = match bytes.first() {
        Some(&b) if b.is_ascii_digit() => b - b'0',
        Some(&b) => {
            return Err(DecodeError::BadMantissa(format!(
                "expected a leading digit, found '{}'",
                b as char
            )));
        }
        None => return Err(DecodeError::BadMantissa("missing mantissa".to_string())),
    };
    let mut digits = vec![first];
    if bytes.len() > 1 {
        if bytes[1] != b'.' {
            return Err(DecodeError::BadMantissa(
                "expected '.' after the leading digit".to_string(),
            ));
        }
        let fraction = &bytes[2..];
        if fraction.is_empty() {
            return Err(DecodeError::BadMantissa(
                "trailing decimal point".to_string(),
            ));
        }
        for &b in fraction {
            if !b.is_ascii_digit() {
                return Err(DecodeError::BadMantissa(format!(
                    "non-digit '{}' in fraction",
                    b as char
                )));
            }
            digits.push(b - b'0');
        }
        if digits.last() == Some(&0) {
            return Err(DecodeError::BadMantissa(
                "trailing zero in fraction".to_string(),
            ));
        }
    }
    Ok(digits)
}
