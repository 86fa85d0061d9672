//! Line-oriented encode/decode/normalize for the CLI
//!
//! The three batch commands share one shape: take values from arguments or
//! stdin lines, apply one direction of the normalizer to each, and print
//! one output line per input line. Processing stops at the first failing
//! line so exit codes stay meaningful in pipelines.

use serde_json::json;

use super::CliError;
use crate::encoder;
use crate::normalizer::{Normalizer, NormalizerError, NumberNormalizer};
use crate::transform;

/// Which direction of the normalizer a batch applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// Plain decimal strings to encoded strings
    Encode,
    /// Encoded strings back to plain decimal strings
    Decode,
    /// Decimal-notation patterns to encoded-notation patterns
    Normalize,
}

/// Options for the encode, decode, and normalize commands
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// The direction to apply
    pub kind: BatchKind,
    /// Input lines, one value or pattern each
    pub values: Vec<String>,
    /// Emit one JSON object per line instead of bare output
    pub json: bool,
}

/// Apply a batch to every input line, in order.
///
/// Returns one output line per input line. In JSON mode each line is a
/// compact object carrying the input alongside the output; `normalize`
/// batches additionally report the lossiness verdict.
pub fn run_batch(options: &BatchOptions) -> Result<Vec<String>, CliError> {
    if options.values.is_empty() {
        return Err(CliError::NoInput);
    }

    let normalizer = NumberNormalizer;
    let mut lines = Vec::with_capacity(options.values.len());
    for value in &options.values {
        let line = match options.kind {
            BatchKind::Encode => {
                let output = normalizer.normalize(value).map_err(CliError::Normalizer)?;
                if options.json {
                    json!({ "input": value, "output": output }).to_string()
                } else {
                    output
                }
            }
            BatchKind::Decode => {
                // Decoded digits go straight back to text; routing through a
                // fixed-width numeric type would cap the precision.
                let output = encoder::decode(value)
                    .map_err(|e| CliError::Normalizer(NormalizerError::Decode(e)))?
                    .to_string();
                if options.json {
                    json!({ "input": value, "output": output }).to_string()
                } else {
                    output
                }
            }
            BatchKind::Normalize => {
                let normalized = transform::normalize_pattern_detailed(value)
                    .map_err(|e| CliError::Normalizer(NormalizerError::Pattern(e)))?;
                if options.json {
                    json!({
                        "input": value,
                        "output": normalized.pattern,
                        "lossy": normalized.lossy,
                    })
                    .to_string()
                } else {
                    normalized.pattern
                }
            }
        };
        lines.push(line);
    }
    Ok(lines)
}
