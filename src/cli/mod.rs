//! CLI support for lexidec
//!
//! Provides programmatic access to lexidec CLI functionality for embedding
//! in other tools (index builders, sync pipelines).

mod check;
mod docs;
mod onboard;
mod report;

pub use check::{execute_check, CheckOptions, CheckResult};
pub use docs::{get_doc_category, get_docs_overview, DocCategory};
pub use onboard::get_onboarding_content;
pub use report::{run_batch, BatchKind, BatchOptions};

use std::io;

use crate::normalizer::NormalizerError;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Encoding, decoding, or pattern error
    Normalizer(NormalizerError),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
    /// Unknown documentation category
    UnknownCategory(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Normalizer(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => {
                write!(f, "No input provided. Pass values as arguments or pipe them to stdin.")
            }
            CliError::UnknownCategory(c) => {
                write!(f, "Unknown category: '{}'\nRun 'lexidec docs' to see available categories.", c)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Normalizer(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NormalizerError> for CliError {
    fn from(e: NormalizerError) -> Self {
        CliError::Normalizer(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
