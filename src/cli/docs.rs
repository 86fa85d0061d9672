//! Documentation content for lexidec CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Encoding,
    Ordering,
    Patterns,
    Normalization,
    Errors,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "encoding" | "encode" | "format" => Some(Self::Encoding),
            "ordering" | "order" | "sort" => Some(Self::Ordering),
            "patterns" | "pattern" | "regex" => Some(Self::Patterns),
            "normalization" | "normalize" | "rewrite" => Some(Self::Normalization),
            "errors" | "error" => Some(Self::Errors),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"LEXIDEC DOCUMENTATION

Lexidec encodes arbitrary-precision decimal numbers as short text strings
whose plain byte order equals numeric order, so encoded numbers sort
correctly in any system that compares strings. It also rewrites regular
expressions written against decimal notation into equivalent expressions
over the encoded form.

DOCUMENTATION CATEGORIES

  encoding          Wire format: sign, exponent letter, marker, mantissa
  ordering          Why byte comparison equals numeric comparison
  patterns          The accepted numeric-regex dialect and its limits
  normalization     Pattern rewriting and the lossiness verdict
  errors            Every failure mode and its message

QUICK REFERENCE

  +                 Sign of zero and positive numbers
  !                 Sign of negative numbers
  A-Z, a-z          Exponent letter, one per power of ten and sign
  E                 Fixed marker between letter and mantissa
  1.23              Mantissa, point after the first digit
  +AE0              Zero

Run 'lexidec doc <category>' for detailed documentation.
Run 'lexidec onboard' for a step-by-step tutorial.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_str(name) {
        Some(DocCategory::Encoding) => Ok(ENCODING_DOC),
        Some(DocCategory::Ordering) => Ok(ORDERING_DOC),
        Some(DocCategory::Patterns) => Ok(PATTERNS_DOC),
        Some(DocCategory::Normalization) => Ok(NORMALIZATION_DOC),
        Some(DocCategory::Errors) => Ok(ERRORS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const ENCODING_DOC: &str = r#"ENCODING - The Wire Format

SHAPE
  Every encoded number is one of:

    +AE0                          zero
    <sign><letter>E<mantissa>     everything else

  Examples:
    123       =>  +cE1.23
    5         =>  +aE5
    1000      =>  +dE1
    0.5       =>  +ZE5
    0.05      =>  +YE5
    0         =>  +AE0
    -1        =>  !ZE9
    -99       =>  !YE0.1
    -123      =>  !XE8.77

SIGN
  +    zero and positive numbers
  !    negative numbers

  '!' precedes '+' in ASCII, so every negative number sorts before
  zero and every positive number.

EXPONENT LETTER
  A number is normalized to d.ddd x 10^e with a single nonzero leading
  digit. The letter encodes e, one letter per exponent, chosen so that
  letters compare in the same direction as the values they stand for.

  Positive numbers (small exponents first):
    e = -26 .. -1   =>  A .. Z      (0.0..01 territory)
    e =   0 .. 25   =>  a .. z      (1 up to 26-digit integers)

  Negative numbers (large exponents first, order reversed):
    e =  25 ..  0   =>  A .. Z
    e =  -1 .. -26  =>  a .. z

  Exponents outside [-26, 25] cannot be encoded.

MANTISSA
  The significant digits with a point after the first one, trailing
  zeros removed. A single significant digit has no point: 5 => '5',
  not '5.0'.

  Negative numbers store the ten's complement of each digit so that
  larger magnitudes produce smaller text: every digit d becomes 9-d,
  except the last, which becomes 10-d.

    -123:  digits 1 2 3  =>  8 7 7  =>  !XE8.77

  The final 10-d step keeps the last stored digit nonzero, which is
  what makes the complement reversible.

ZERO
  Zero has no significant digits and gets the fixed spelling +AE0. It
  sorts after every '!' string and before every other '+' string.

CANONICAL FORM
  Encoding always emits exactly one spelling per value. Decoding
  accepts only that spelling: a mantissa with a trailing zero, a
  complement that decodes to a zero digit stream, or a letter outside
  the tables is rejected. See 'lexidec doc errors'.
"#;

const ORDERING_DOC: &str = r#"ORDERING - Byte Order Equals Numeric Order

THE PROPERTY
  For any two numbers a and b:

    a < b    if and only if    encode(a) < encode(b)  as plain bytes

  No custom comparator, collation, or numeric parsing is needed at
  read time. Encoded numbers sort correctly in flat files, key-value
  stores, text indexes, and anything else that compares strings.

WHY IT WORKS
  Comparison proceeds left to right, and every position is arranged to
  agree with numeric order:

  1. Sign first. '!' < '+' in ASCII, so negatives sort before zero
     and positives.

  2. Exponent letter second. Among positives, a bigger power of ten
     means a bigger number, and the letter tables grow with the
     exponent. Among negatives the tables are reversed: the biggest
     magnitudes (most negative values) get the earliest letters.

  3. Mantissa last. Equal sign and letter mean equal power of ten, so
     digit-by-digit comparison is numeric comparison. Negative
     mantissas are stored as ten's complements, which reverses their
     digit order to match the reversed numeric order of negatives.

  A shorter positive mantissa that is a prefix of a longer one sorts
  first, and the longer spelling only adds magnitude, so prefixes are
  safe. Negative mantissas never extend each other: a complement
  digit in the last position is always nonzero.

A SORTED SAMPLE
  The following encodings are in plain byte order, and the values they
  stand for are in numeric order:

    !XE8.77      -123
    !ZE9         -1
    !aE5         -0.5
    +AE0         0
    +ZE5         0.5
    +aE1         1
    +aE5         5
    +cE1.23      123
    +dE1         1000

BIJECTIVITY
  Each value has exactly one encoding and each valid encoding names
  exactly one value, so equality of encoded strings is equality of
  numbers. Range scans over encoded keys are value range scans.
"#;

const PATTERNS_DOC: &str = r#"PATTERNS - The Accepted Numeric-Regex Dialect

Patterns describe decimal numbers in ordinary notation, the shape
-?digits(.digits)?. The rewriter turns them into patterns over the
encoded form; see 'lexidec doc normalization'.

ATOMS
  0-9          Literal digit
  \d           Any digit
  .            Any digit (one position)
  [135]        Class of digits
  [1-5]        Digit range inside a class
  [^04]        Negated class, digits only
  \.           The decimal point
  \-  or  -    The minus sign, only at the start of a branch

QUANTIFIERS
  ?            Zero or one
  *            Zero or more
  +            One or more
  {3}          Exactly 3
  {2,}         2 or more
  {2,5}        2 to 5

  Quantifiers attach to digit atoms. The decimal point cannot be
  quantified, and a sign may be optional ('-?') but not repeated.
  Counted bounds may not exceed 64.

OPEN REPETITIONS
  '\d*', '[05]+', '{2,}' and similar unbounded repetitions are allowed
  once per branch. An unbounded '.' repetition ('.*', '.+', '.{2,}')
  stands for any written continuation, including a decimal point.

GROUPS
  One level of plain '(...)' groups with alternation inside:

    (1|2)3       matches 13 and 23
    -?(5|7)      matches 5, 7, -5, -7

  Groups are distributed before rewriting, so each group multiplies
  the branch count. The expanded pattern may not exceed 512 branches.
  Quantified groups and nested groups are not supported.

ANCHORS
  '^' at the very start and '$' at the very end are accepted and
  discarded. Matching is whole-string either way.

LIMITS
  - at most one decimal point per branch
  - at most one unbounded repetition per branch
  - counted repetition bounds at most 64
  - at most 512 expanded branches
  - no letters, whitespace, or escapes beyond \d \. \-
  - every branch must denote at least one encodable value
"#;

const NORMALIZATION_DOC: &str = r#"NORMALIZATION - Rewriting Patterns Over Encoded Text

WHAT IT DOES
  normalize takes a pattern over decimal notation and produces a
  pattern over encoded notation, such that for any decimal string s
  the original pattern matches s exactly when the rewritten pattern
  matches encode(s).

  Examples:
    123        =>  \+cE1\.23
    \d         =>  \+aE\d|\+AE0
    \d\d       =>  \+bE\d(\.\d)?|\+AE0
    0\.5       =>  \+ZE5
    -1\.0      =>  \!ZE9
    -?5        =>  \!ZE5|\+aE5
    (1|2)3     =>  \+bE1\.3|\+bE2\.3

HOW IT WORKS
  The pattern is split into branches, each branch into sign, integer
  part, and fraction part. Every branch is expanded into families of
  fixed written shape. A written shape pins down the count of integer
  digits, hence the exponent, hence the letter; the digit constraints
  are then re-expressed against the mantissa, complemented for
  negative branches. Families that share text across adjacent
  exponents merge into letter classes:

    -111.*     =>  \![A-X]E8\.8(9|8\d*[1-9])

  A branch that can match a spelling of zero ('0', '-0', '0.0', or a
  '\d' that can be '0') adds the zero alternative '\+AE0' once at the
  end.

MATCHED SPELLINGS
  Equivalence is stated over canonical decimal spellings: no leading
  zeros, no trailing fraction zeros, no lone '-'. Written forms the
  pattern forces are also honored where they cannot change the value:
  '0\d' covers 1 through 9 written as 01 to 09, '5\.0' covers 5, and
  a trailing '\.' after an open run is allowed.

THE LOSSINESS VERDICT
  Most patterns rewrite exactly. An unbounded digit run at the end of
  the integer part is the exception: every run length shares one
  mantissa text across a whole range of exponent letters, so the
  rewrite cannot tie written length to the letter:

    1\d*       =>  \+[a-z]E1(\.\d*[1-9])?      (lossy)

  The original matches 1, 10 to 19, 100 to 199, and so on. The
  rewrite also admits +aE1.5, the encoding of 1.5, which the original
  never matched. Widening is one-sided: a lossy rewrite can match
  encodings of values the original would not have matched, but it
  never misses a value the original matched.

  An unbounded '.' run with a nonzero minimum before further written
  material widens the same way. A run before further integer digits
  ('1\d*7') or after the point ('1\.5\d*') rewrites exactly.

  'lexidec check' and 'lexidec normalize --json' report the verdict
  per pattern.
"#;

const ERRORS_DOC: &str = r#"ERRORS - Failure Modes and Messages

All commands exit with status 1 and print the error on stderr.

ENCODE ERRORS
  Reported as "encode error: <detail>".

  invalid decimal: <detail>
    The input is not a decimal number: empty, a lone sign or point,
    a repeated point, or a non-digit character.

  exponent <e> outside the encodable range [-26, 25]
    The value's power of ten has no letter. Integers above 26 digits
    and fractions below 10^-26 territory cannot be encoded.

DECODE ERRORS
  Reported as "decode error: <detail>".

  empty encoded input
  expected '+' or '!' sign marker, found '<c>'
  unknown bin letter '<c>'
    The letter is not in the table for the string's sign.
  missing 'E' separator
  bad mantissa: <detail>
    Bad point placement, a non-digit, a trailing zero, a complement
    that is no valid complement, or any other non-canonical spelling.

PATTERN SYNTAX ERRORS
  Reported as "Pattern syntax error: <detail>".

  pattern does not compile as a regular expression: <engine message>
  pattern ends with a bare backslash
  unexpected <token> in pattern
  character class may only contain digits, digit ranges, '.' and '-'

PATTERN SEMANTIC ERRORS
  Reported as "Unsupported pattern: <detail>". The pattern is valid
  regex but falls outside the numeric dialect.

  empty pattern
  whitespace is not allowed in numeric patterns
  letter '<c>' is not allowed in numeric patterns
  character '<c>' is not allowed in numeric patterns
  escaped backslash is not allowed in numeric patterns
  unsupported escape sequence '\<c>'
  anchors may only appear at the very start or end of the pattern
  empty group / nested groups are not supported
  quantifiers cannot be applied to groups
  a sign may be optional but not repeated
  a minus sign may only appear at the start of a branch
  a branch may contain at most one decimal point
  quantifiers cannot be applied to a decimal point
  negated classes may only contain digits
  a branch may contain at most one unbounded repetition
  repetition bound <n> exceeds the supported maximum of 64
  pattern expands to <n> alternatives, more than the supported
    maximum of 512
  pattern is empty after removing zero-length repetitions
  pattern does not denote any numeric value
  pattern matches no value in the encodable exponent range

VALUE ERRORS
  A decoded number that does not fit the caller's numeric type is
  reported as "value error: <detail>" by the library; the CLI's
  decode command prints digits directly and does not hit this case.
"#;
