use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// An arbitrary-precision decimal number in normalized scientific form.
///
/// The value is `±d₀.d₁d₂… × 10^exponent` where `digits` holds the
/// significant digits most-significant first. Normalization guarantees that
/// the first and last stored digits are nonzero, so every value has exactly
/// one representation. Zero is the empty digit vector with exponent 0.
///
/// Unlike [`rust_decimal::Decimal`], this type has no precision ceiling: the
/// digit vector grows as needed, which the encoder relies on to round-trip
/// inputs of any length.
///
/// # Examples
///
/// ```
/// use lexidec::DecimalValue;
///
/// let value: DecimalValue = "123.456".parse().unwrap();
/// assert_eq!(value.exponent(), 2);
/// assert_eq!(value.digits(), &[1, 2, 3, 4, 5, 6]);
/// assert_eq!(value.to_string(), "123.456");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalValue {
    negative: bool,
    digits: Vec<u8>,
    exponent: i32,
}

/// Error raised when a string cannot be read as a plain decimal number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecimalParseError {
    /// Input was empty or contained only a sign.
    Empty,
    /// Input had punctuation but no digits (e.g. `"."` or `"-."`).
    NoDigits,
    /// More than one decimal point.
    MultiplePoints,
    /// A character outside sign/digits/point. Scientific notation such as
    /// `1e5` lands here.
    InvalidCharacter(char),
}

impl fmt::Display for DecimalParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalParseError::Empty => write!(f, "empty decimal input"),
            DecimalParseError::NoDigits => write!(f, "decimal input contains no digits"),
            DecimalParseError::MultiplePoints => write!(f, "multiple decimal points"),
            DecimalParseError::InvalidCharacter(c) => {
                write!(f, "invalid character '{}' in decimal input", c)
            }
        }
    }
}

impl std::error::Error for DecimalParseError {}

impl DecimalValue {
    /// The canonical zero value.
    pub fn zero() -> Self {
        DecimalValue {
            negative: false,
            digits: Vec::new(),
            exponent: 0,
        }
    }

    /// Build a value from already-normalized parts. Callers must pass
    /// significant digits with no leading or trailing zeros; zero digits
    /// collapse to the canonical zero regardless of sign and exponent.
    pub(crate) fn from_parts(negative: bool, digits: Vec<u8>, exponent: i32) -> Self {
        if digits.is_empty() {
            return DecimalValue::zero();
        }
        DecimalValue {
            negative,
            digits,
            exponent,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Significant digits, most-significant first. Empty for zero.
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Power of ten of the leading digit: `123.4` has exponent 2,
    /// `0.05` has exponent -2. Zero reports 0.
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Convert into a [`rust_decimal::Decimal`].
    ///
    /// # Errors
    ///
    /// Fails when the value needs more precision or range than `Decimal`'s
    /// 96-bit mantissa offers.
    pub fn to_decimal(&self) -> Result<Decimal, rust_decimal::Error> {
        Decimal::from_str(&self.to_string())
    }
}

impl FromStr for DecimalValue {
    type Err = DecimalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, rest) = match s.as_bytes().first() {
            None => return Err(DecimalParseError::Empty),
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        if rest.is_empty() {
            return Err(DecimalParseError::Empty);
        }

        let (integer_part, fractional_part) = match rest.find('.') {
            Some(pos) => {
                let (int, frac) = rest.split_at(pos);
                let frac = &frac[1..];
                if frac.contains('.') {
                    return Err(DecimalParseError::MultiplePoints);
                }
                (int, frac)
            }
            None => (rest, ""),
        };

        for b in integer_part.bytes().chain(fractional_part.bytes()) {
            if !b.is_ascii_digit() {
                return Err(DecimalParseError::InvalidCharacter(b as char));
            }
        }
        if integer_part.is_empty() && fractional_part.is_empty() {
            return Err(DecimalParseError::NoDigits);
        }

        // Locate the significant window of the digit stream.
        let leading_zeros = integer_part
            .bytes()
            .chain(fractional_part.bytes())
            .take_while(|&b| b == b'0')
            .count();
        let trailing_zeros = fractional_part
            .bytes()
            .rev()
            .chain(integer_part.bytes().rev())
            .take_while(|&b| b == b'0')
            .count();
        let total_len = integer_part.len() + fractional_part.len();
        if leading_zeros == total_len {
            return Ok(DecimalValue::zero());
        }
        let significant_len = total_len - leading_zeros - trailing_zeros;

        // Exponent comes from where the point sits relative to the first
        // significant digit.
        let int_significant = integer_part.trim_start_matches('0').len();
        let exponent = if int_significant > 0 {
            int_significant as i32 - 1
        } else {
            let frac_leading_zeros =
                fractional_part.len() - fractional_part.trim_start_matches('0').len();
            -(frac_leading_zeros as i32 + 1)
        };

        let digits: Vec<u8> = integer_part
            .bytes()
            .chain(fractional_part.bytes())
            .skip(leading_zeros)
            .take(significant_len)
            .map(|b| b - b'0')
            .collect();

        Ok(DecimalValue::from_parts(negative, digits, exponent))
    }
}

impl fmt::Display for DecimalValue {
    /// Plain (non-scientific) notation: `123`, `-0.05`, `1.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.negative {
            f.write_str("-")?;
        }
        let len = self.digits.len() as i32;
        if self.exponent >= len - 1 {
            // Integer, possibly padded with trailing zeros.
            for d in &self.digits {
                write!(f, "{}", d)?;
            }
            for _ in 0..(self.exponent - (len - 1)) {
                f.write_str("0")?;
            }
        } else if self.exponent >= 0 {
            let split = (self.exponent + 1) as usize;
            for d in &self.digits[..split] {
                write!(f, "{}", d)?;
            }
            f.write_str(".")?;
            for d in &self.digits[split..] {
                write!(f, "{}", d)?;
            }
        } else {
            f.write_str("0.")?;
            for _ in 0..(-self.exponent - 1) {
                f.write_str("0")?;
            }
            for d in &self.digits {
                write!(f, "{}", d)?;
            }
        }
        Ok(())
    }
}

impl PartialOrd for DecimalValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DecimalValue {
    fn cmp(&self, other: &Self) -> Ordering {
        // Sign classes first: negative < zero < positive.
        let self_class = if self.is_zero() {
            1
        } else if self.negative {
            0
        } else {
            2
        };
        let other_class = if other.is_zero() {
            1
        } else if other.negative {
            0
        } else {
            2
        };
        match self_class.cmp(&other_class) {
            Ordering::Equal if self_class == 1 => Ordering::Equal,
            Ordering::Equal => {
                let magnitude = self
                    .exponent
                    .cmp(&other.exponent)
                    .then_with(|| compare_digit_runs(&self.digits, &other.digits));
                if self.negative {
                    magnitude.reverse()
                } else {
                    magnitude
                }
            }
            unequal => unequal,
        }
    }
}

/// Compare two significant-digit runs of equal exponent. A run that is a
/// prefix of the other denotes the smaller magnitude.
fn compare_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    for (da, db) in a.iter().zip(b.iter()) {
        match da.cmp(db) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    a.len().cmp(&b.len())
}

impl From<i64> for DecimalValue {
    fn from(value: i64) -> Self {
        // i64 text is always a valid plain decimal.
        value
            .to_string()
            .parse()
            .unwrap_or_else(|_| DecimalValue::zero())
    }
}

impl From<Decimal> for DecimalValue {
    fn from(value: Decimal) -> Self {
        // Decimal's Display is plain notation, so this cannot fail.
        value
            .to_string()
            .parse()
            .unwrap_or_else(|_| DecimalValue::zero())
    }
}

impl TryFrom<&DecimalValue> for Decimal {
    type Error = rust_decimal::Error;

    fn try_from(value: &DecimalValue) -> Result<Self, Self::Error> {
        value.to_decimal()
    }
}
