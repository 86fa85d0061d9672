pub mod ast;
pub mod decimal;
pub mod encoder;
pub mod lexer;
pub mod normalizer;
pub mod parser;
pub mod render;
pub mod transform;
pub mod validate;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{NodeId, NodeKind, PatternTree, Quantifier, Token};
pub use decimal::{DecimalParseError, DecimalValue};
pub use encoder::{decode, encode, DecodeError, EncodeError};
pub use lexer::Lexer;
pub use normalizer::{Normalizer, NormalizerError, NumberNormalizer};
pub use parser::Parser;
pub use render::{render, structural_eq};
pub use transform::{normalize_pattern, normalize_pattern_detailed, NormalizedPattern, TransformOptions};
pub use validate::{parse_pattern, PatternError, PatternSemanticError, PatternSyntaxError};
