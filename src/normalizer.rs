//! Facade trait tying encoding, decoding, and pattern rewriting together.
//!
//! Callers that store encoded numbers alongside other normalized text
//! usually want a single object with the whole surface. [`NumberNormalizer`]
//! is that object for decimal strings; the [`Normalizer`] trait keeps the
//! shape generic so other value domains can slot in.
//!
//! ```
//! use lexidec::normalizer::{Normalizer, NumberNormalizer};
//!
//! let n = NumberNormalizer;
//! assert_eq!(n.normalize("123").unwrap(), "+cE1.23");
//! assert_eq!(n.denormalize("+cE1.23").unwrap().to_string(), "123");
//! assert_eq!(n.normalize_regex(r"\d").unwrap(), r"\+aE\d|\+AE0");
//! assert!(!n.normalized_regex_is_lossy(r"\d").unwrap());
//! ```

use rust_decimal::Decimal;

use crate::encoder::{self, DecodeError, EncodeError};
use crate::transform;
use crate::validate::PatternError;

/// Errors that can occur while normalizing values or patterns
#[derive(Debug)]
pub enum NormalizerError {
    /// The value could not be encoded
    Encode(EncodeError),
    /// The encoded text could not be decoded
    Decode(DecodeError),
    /// The pattern could not be rewritten
    Pattern(PatternError),
    /// The decoded digits do not fit the target numeric type
    Value(rust_decimal::Error),
}

impl std::fmt::Display for NormalizerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizerError::Encode(e) => write!(f, "encode error: {}", e),
            NormalizerError::Decode(e) => write!(f, "decode error: {}", e),
            NormalizerError::Pattern(e) => write!(f, "{}", e),
            NormalizerError::Value(e) => write!(f, "value error: {}", e),
        }
    }
}

impl std::error::Error for NormalizerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NormalizerError::Encode(e) => Some(e),
            NormalizerError::Decode(e) => Some(e),
            NormalizerError::Pattern(e) => Some(e),
            NormalizerError::Value(e) => Some(e),
        }
    }
}

impl From<EncodeError> for NormalizerError {
    fn from(e: EncodeError) -> Self {
        NormalizerError::Encode(e)
    }
}

impl From<DecodeError> for NormalizerError {
    fn from(e: DecodeError) -> Self {
        NormalizerError::Decode(e)
    }
}

impl From<PatternError> for NormalizerError {
    fn from(e: PatternError) -> Self {
        NormalizerError::Pattern(e)
    }
}

impl From<rust_decimal::Error> for NormalizerError {
    fn from(e: rust_decimal::Error) -> Self {
        NormalizerError::Value(e)
    }
}

/// Bidirectional mapping between a value domain and its normalized text,
/// plus rewriting of patterns over the plain form into patterns over the
/// normalized form.
pub trait Normalizer<T> {
    /// Normalizes a plain value string into its encoded form.
    fn normalize(&self, value: &str) -> Result<String, NormalizerError>;

    /// Recovers the value behind an encoded string.
    fn denormalize(&self, text: &str) -> Result<T, NormalizerError>;

    /// Rewrites a pattern over plain values into one over encoded text.
    fn normalize_regex(&self, pattern: &str) -> Result<String, NormalizerError>;

    /// Reports whether the rewritten pattern matches more than the original.
    fn normalized_regex_is_lossy(&self, pattern: &str) -> Result<bool, NormalizerError>;
}

/// [`Normalizer`] over decimal numbers backed by the lexicographic encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberNormalizer;

impl Normalizer<Decimal> for NumberNormalizer {
    fn normalize(&self, value: &str) -> Result<String, NormalizerError> {
        Ok(encoder::encode(value)?)
    }

    fn denormalize(&self, text: &str) -> Result<Decimal, NormalizerError> {
        Ok(encoder::decode(text)?.to_decimal()?)
    }

    fn normalize_regex(&self, pattern: &str) -> Result<String, NormalizerError> {
        Ok(transform::normalize_pattern(pattern)?)
    }

    fn normalized_regex_is_lossy(&self, pattern: &str) -> Result<bool, NormalizerError> {
        Ok(transform::normalize_pattern_detailed(pattern)?.lossy)
    }
}
