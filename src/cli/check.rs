//! Validate and rewrite numeric patterns

use super::CliError;
use crate::normalizer::NormalizerError;
use crate::transform::{self, NormalizedPattern};
use crate::validate;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The pattern to check
    pub pattern: String,
    /// Only validate syntax, don't rewrite
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// The pattern was rewritten
    Normalized(NormalizedPattern),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.syntax_only {
        validate::parse_pattern(&options.pattern)
            .map_err(|e| CliError::Normalizer(NormalizerError::Pattern(e)))?;
        return Ok(CheckResult::SyntaxValid);
    }

    let normalized = transform::normalize_pattern_detailed(&options.pattern)
        .map_err(|e| CliError::Normalizer(NormalizerError::Pattern(e)))?;
    Ok(CheckResult::Normalized(normalized))
}
