//! Pattern validation for the numeric-regex dialect.
//!
//! Every failure mode has its own variant with a stable message; callers
//! surface these messages to users verbatim. Checks run in a fixed order:
//! blank input, host-engine compilation, raw character rules, then the
//! parse itself. Branch-level rules (sign placement, decimal points,
//! repetition limits) are enforced later, when the pattern is rewritten.

use regex::Regex;

use crate::ast::PatternTree;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Validation failure for a numeric pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern is not well formed
    Syntax(PatternSyntaxError),
    /// The pattern is well formed but cannot describe encoded numbers
    Semantic(PatternSemanticError),
}

/// Malformed pattern text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSyntaxError {
    /// Rejected by the host regex engine (unbalanced brackets, empty or
    /// reversed classes, dangling quantifiers)
    Uncompilable(String),
    /// Pattern ends with a bare `\`
    TrailingBackslash,
    /// Token that no grammar rule accepts at this position
    UnexpectedToken(String),
    /// Character class member other than a digit, a digit range, `.` or `-`
    DisallowedClassMember(char),
}

/// Well-formed pattern that falls outside the numeric dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSemanticError {
    /// Blank input
    EmptyPattern,
    /// Whitespace character anywhere in the pattern
    Whitespace,
    /// Any letter; encoded strings reserve letters for bin labels and `E`
    DisallowedLetter(char),
    /// Character outside the pattern alphabet
    DisallowedCharacter(char),
    /// `\\`
    EscapedBackslash,
    /// Escape other than `\d`, `\.`, `\-`
    UnsupportedEscape(char),
    /// `^` or `$` away from the pattern edges
    StrayAnchor,
    /// `()`
    EmptyGroup,
    /// Group inside a group
    NestedGroup,
    /// Any group, under options that disable group distribution
    UnsupportedGroup,
    /// Quantifier attached to a group
    GroupQuantifier,
    /// Sign with a quantifier other than `?`
    SignQuantifier,
    /// `-` anywhere but the start of a branch
    MisplacedMinus,
    /// More than one required decimal point in a branch
    MultiplePoints,
    /// Quantifier attached to a decimal point
    QuantifiedPoint,
    /// `.` or `-` inside a negated class
    NegatedClassMember(char),
    /// Second unbounded repetition in a branch
    MultipleOpenRepetitions,
    /// `{n}`/`{n,m}` bound past the supported maximum
    RepeatBoundTooLarge(u32),
    /// Alternation expansion past the supported maximum
    TooManyAlternatives(usize),
    /// Nothing left after removing `{0}` repetitions
    EmptyAfterTrimming,
    /// Pattern denotes no numeric value (a lone anchor, a lone point)
    NoNumericValue,
    /// Every matching value falls outside the encodable exponent range
    NoEncodableValue,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternError::Syntax(e) => write!(f, "Pattern syntax error: {}", e),
            PatternError::Semantic(e) => write!(f, "Unsupported pattern: {}", e),
        }
    }
}

impl std::fmt::Display for PatternSyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternSyntaxError::Uncompilable(msg) => {
                write!(f, "pattern does not compile as a regular expression: {}", msg)
            }
            PatternSyntaxError::TrailingBackslash => {
                write!(f, "pattern ends with a bare backslash")
            }
            PatternSyntaxError::UnexpectedToken(what) => {
                write!(f, "unexpected {} in pattern", what)
            }
            PatternSyntaxError::DisallowedClassMember(ch) => write!(
                f,
                "character class may only contain digits, digit ranges, '.' and '-', found '{}'",
                ch
            ),
        }
    }
}

impl std::fmt::Display for PatternSemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternSemanticError::EmptyPattern => write!(f, "empty pattern"),
            PatternSemanticError::Whitespace => {
                write!(f, "whitespace is not allowed in numeric patterns")
            }
            PatternSemanticError::DisallowedLetter(ch) => {
                write!(f, "letter '{}' is not allowed in numeric patterns", ch)
            }
            PatternSemanticError::DisallowedCharacter(ch) => {
                write!(f, "character '{}' is not allowed in numeric patterns", ch)
            }
            PatternSemanticError::EscapedBackslash => {
                write!(f, "escaped backslash is not allowed in numeric patterns")
            }
            PatternSemanticError::UnsupportedEscape(ch) => {
                write!(f, "unsupported escape sequence '\\{}'", ch)
            }
            PatternSemanticError::StrayAnchor => write!(
                f,
                "anchors may only appear at the very start or end of the pattern"
            ),
            PatternSemanticError::EmptyGroup => write!(f, "empty group"),
            PatternSemanticError::NestedGroup => write!(f, "nested groups are not supported"),
            PatternSemanticError::UnsupportedGroup => {
                write!(f, "groups are not supported in strict mode")
            }
            PatternSemanticError::GroupQuantifier => {
                write!(f, "quantifiers cannot be applied to groups")
            }
            PatternSemanticError::SignQuantifier => {
                write!(f, "a sign may be optional but not repeated")
            }
            PatternSemanticError::MisplacedMinus => {
                write!(f, "a minus sign may only appear at the start of a branch")
            }
            PatternSemanticError::MultiplePoints => {
                write!(f, "a branch may contain at most one decimal point")
            }
            PatternSemanticError::QuantifiedPoint => {
                write!(f, "quantifiers cannot be applied to a decimal point")
            }
            PatternSemanticError::NegatedClassMember(ch) => {
                write!(f, "negated classes may only contain digits, found '{}'", ch)
            }
            PatternSemanticError::MultipleOpenRepetitions => {
                write!(f, "a branch may contain at most one unbounded repetition")
            }
            PatternSemanticError::RepeatBoundTooLarge(n) => write!(
                f,
                "repetition bound {} exceeds the supported maximum of {}",
                n, MAX_REPEAT_BOUND
            ),
            PatternSemanticError::TooManyAlternatives(n) => write!(
                f,
                "pattern expands to {} alternatives, more than the supported maximum of {}",
                n, MAX_ALTERNATIVES
            ),
            PatternSemanticError::EmptyAfterTrimming => {
                write!(f, "pattern is empty after removing zero-length repetitions")
            }
            PatternSemanticError::NoNumericValue => {
                write!(f, "pattern does not denote any numeric value")
            }
            PatternSemanticError::NoEncodableValue => {
                write!(f, "pattern matches no value in the encodable exponent range")
            }
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatternError::Syntax(e) => Some(e),
            PatternError::Semantic(e) => Some(e),
        }
    }
}

impl std::error::Error for PatternSyntaxError {}

impl std::error::Error for PatternSemanticError {}

impl From<PatternSyntaxError> for PatternError {
    fn from(e: PatternSyntaxError) -> Self {
        PatternError::Syntax(e)
    }
}

impl From<PatternSemanticError> for PatternError {
    fn from(e: PatternSemanticError) -> Self {
        PatternError::Semantic(e)
    }
}

/// Largest count accepted in a `{n}`/`{n,m}` repetition.
pub const MAX_REPEAT_BOUND: u32 = 64;

/// Largest number of alternatives a pattern may expand into.
pub const MAX_ALTERNATIVES: usize = 512;

/// Checks everything that does not need a parse: blank input, host-engine
/// compilability, and the raw character rules. Runs before the lexer so a
/// stray letter is reported even when the pattern would already fail to
/// parse for another reason.
pub fn precheck(pattern: &str) -> Result<(), PatternError> {
    if pattern.trim().is_empty() {
        return Err(PatternSemanticError::EmptyPattern.into());
    }
    if let Err(e) = Regex::new(pattern) {
        return Err(PatternSyntaxError::Uncompilable(e.to_string()).into());
    }
    scan_raw(pattern)
}

fn scan_raw(pattern: &str) -> Result<(), PatternError> {
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                None => return Err(PatternSyntaxError::TrailingBackslash.into()),
                Some('\\') => return Err(PatternSemanticError::EscapedBackslash.into()),
                Some('d') | Some('.') | Some('-') => {}
                Some(c) if c.is_ascii_digit() => {}
                Some(c) => return Err(PatternSemanticError::UnsupportedEscape(c).into()),
            }
        } else if ch.is_whitespace() {
            return Err(PatternSemanticError::Whitespace.into());
        } else if ch.is_alphabetic() {
            return Err(PatternSemanticError::DisallowedLetter(ch).into());
        }
    }
    Ok(())
}

/// Full front half of the pipeline: [`precheck`], then lex and parse.
///
/// A tree coming out of here has sound structure (single-level groups,
/// anchors only at the edges, well-formed classes and repetitions). Whether
/// its branches denote encodable numbers is decided by the rewrite step.
pub fn parse_pattern(pattern: &str) -> Result<PatternTree, PatternError> {
    precheck(pattern)?;
    let mut parser = Parser::new(Lexer::new(pattern))?;
    parser.parse()
}
