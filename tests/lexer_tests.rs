// tests/lexer_tests.rs

use lexidec::ast::Token;
use lexidec::lexer::Lexer;
use lexidec::validate::{PatternError, PatternSemanticError, PatternSyntaxError};

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("-", Token::Minus),
        (".", Token::Wildcard),
        ("*", Token::Star),
        ("+", Token::Plus),
        ("?", Token::Question),
        ("|", Token::Pipe),
        ("^", Token::Caret),
        ("$", Token::Dollar),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        ("{", Token::LBrace),
        ("}", Token::RBrace),
        (",", Token::Comma),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_digits() {
    for ch in '0'..='9' {
        let input = ch.to_string();
        let mut lexer = Lexer::new(&input);
        assert_eq!(lexer.next_token().unwrap(), Token::Digit(ch));
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_eof_is_repeatable() {
    let mut lexer = Lexer::new("");
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

// ============================================================================
// Escapes
// ============================================================================

#[test]
fn test_escape_pairs() {
    let test_cases = vec![
        (r"\d", Token::Escaped('d')),
        (r"\.", Token::Escaped('.')),
        (r"\-", Token::Escaped('-')),
        (r"\5", Token::Escaped('5')),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_trailing_backslash() {
    let mut lexer = Lexer::new("\\");
    assert_eq!(
        lexer.next_token(),
        Err(PatternError::Syntax(PatternSyntaxError::TrailingBackslash))
    );
}

#[test]
fn test_escaped_backslash() {
    let mut lexer = Lexer::new(r"\\");
    assert_eq!(
        lexer.next_token(),
        Err(PatternError::Semantic(
            PatternSemanticError::EscapedBackslash
        ))
    );
}

#[test]
fn test_unsupported_escape() {
    let mut lexer = Lexer::new(r"\w");
    assert_eq!(
        lexer.next_token(),
        Err(PatternError::Semantic(
            PatternSemanticError::UnsupportedEscape('w')
        ))
    );
}

// ============================================================================
// Token Streams
// ============================================================================

#[test]
fn test_signed_alternation() {
    let mut lexer = Lexer::new("-12(3|4)");
    assert_eq!(lexer.next_token(), Ok(Token::Minus));
    assert_eq!(lexer.next_token(), Ok(Token::Digit('1')));
    assert_eq!(lexer.next_token(), Ok(Token::Digit('2')));
    assert_eq!(lexer.next_token(), Ok(Token::LParen));
    assert_eq!(lexer.next_token(), Ok(Token::Digit('3')));
    assert_eq!(lexer.next_token(), Ok(Token::Pipe));
    assert_eq!(lexer.next_token(), Ok(Token::Digit('4')));
    assert_eq!(lexer.next_token(), Ok(Token::RParen));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_escapes_and_quantifiers() {
    let mut lexer = Lexer::new(r"\d*\.5{1,2}");
    assert_eq!(lexer.next_token(), Ok(Token::Escaped('d')));
    assert_eq!(lexer.next_token(), Ok(Token::Star));
    assert_eq!(lexer.next_token(), Ok(Token::Escaped('.')));
    assert_eq!(lexer.next_token(), Ok(Token::Digit('5')));
    assert_eq!(lexer.next_token(), Ok(Token::LBrace));
    assert_eq!(lexer.next_token(), Ok(Token::Digit('1')));
    assert_eq!(lexer.next_token(), Ok(Token::Comma));
    assert_eq!(lexer.next_token(), Ok(Token::Digit('2')));
    assert_eq!(lexer.next_token(), Ok(Token::RBrace));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_class_stream() {
    let mut lexer = Lexer::new("[1-5]");
    assert_eq!(lexer.next_token(), Ok(Token::LBracket));
    assert_eq!(lexer.next_token(), Ok(Token::Digit('1')));
    assert_eq!(lexer.next_token(), Ok(Token::Minus));
    assert_eq!(lexer.next_token(), Ok(Token::Digit('5')));
    assert_eq!(lexer.next_token(), Ok(Token::RBracket));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

// ============================================================================
// Rejected Characters
// ============================================================================

#[test]
fn test_rejects_letters_and_whitespace() {
    let mut lexer = Lexer::new("1E5");
    assert_eq!(lexer.next_token(), Ok(Token::Digit('1')));
    assert_eq!(
        lexer.next_token(),
        Err(PatternError::Semantic(
            PatternSemanticError::DisallowedLetter('E')
        ))
    );

    let mut lexer = Lexer::new("1 2");
    assert_eq!(lexer.next_token(), Ok(Token::Digit('1')));
    assert_eq!(
        lexer.next_token(),
        Err(PatternError::Semantic(PatternSemanticError::Whitespace))
    );
}

#[test]
fn test_rejects_other_characters() {
    let test_cases = vec!['#', '&', '@', '='];

    for ch in test_cases {
        let input = ch.to_string();
        let mut lexer = Lexer::new(&input);
        assert_eq!(
            lexer.next_token(),
            Err(PatternError::Semantic(
                PatternSemanticError::DisallowedCharacter(ch)
            )),
            "Failed for input: {}",
            ch
        );
    }
}

// ============================================================================
// Position Tracking
// ============================================================================

#[test]
fn test_position_advances_per_token() {
    let mut lexer = Lexer::new(r"1\d*");
    assert_eq!(lexer.position(), 0);
    lexer.next_token().unwrap();
    assert_eq!(lexer.position(), 1);
    lexer.next_token().unwrap();
    assert_eq!(lexer.position(), 3);
    lexer.next_token().unwrap();
    assert_eq!(lexer.position(), 4);
}
