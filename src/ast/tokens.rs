/// Lexical token of the numeric-regex dialect.
///
/// The lexer resolves escape pairs, so a backslash never reaches the parser:
/// `\d`, `\.`, `\-` and escaped digits arrive as [`Token::Escaped`]. Every
/// other character is one token. Context decides meaning later: `-` is a
/// range dash inside a class but a sign literal outside, `^` negates a class
/// but anchors a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A bare digit `0`..`9`.
    ///
    /// # Examples
    /// ```text
    /// 4
    /// ```
    Digit(char),

    /// Bare `-`.
    Minus,

    /// Unescaped `.` (the digit wildcard).
    Wildcard,

    /// An escape pair, carrying the escaped character.
    ///
    /// # Examples
    /// ```text
    /// \d   Escaped('d')
    /// \.   Escaped('.')
    /// \-   Escaped('-')
    /// \5   Escaped('5')
    /// ```
    Escaped(char),

    /// `*`
    Star,
    /// `+`
    Plus,
    /// `?`
    Question,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `$`
    Dollar,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,` (legal only inside `{min,max}`)
    Comma,

    /// End of input.
    Eof,
}
