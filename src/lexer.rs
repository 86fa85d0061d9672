use crate::ast::Token;
use crate::validate::{PatternError, PatternSemanticError, PatternSyntaxError};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Offset of the next unread character. Used in parser diagnostics.
    pub fn position(&self) -> usize {
        self.position
    }

    fn read_escape(&mut self) -> Result<Token, PatternError> {
        self.advance(); // Consume backslash
        match self.current_char() {
            None => Err(PatternError::Syntax(PatternSyntaxError::TrailingBackslash)),
            Some('\\') => Err(PatternError::Semantic(
                PatternSemanticError::EscapedBackslash,
            )),
            Some(ch) if ch == 'd' || ch == '.' || ch == '-' || ch.is_ascii_digit() => {
                self.advance();
                Ok(Token::Escaped(ch))
            }
            Some(ch) => Err(PatternError::Semantic(
                PatternSemanticError::UnsupportedEscape(ch),
            )),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, PatternError> {
        match self.current_char() {
            None => Ok(Token::Eof),
            Some('\\') => self.read_escape(),
            Some('-') => {
                self.advance();
                Ok(Token::Minus)
            }
            Some('.') => {
                self.advance();
                Ok(Token::Wildcard)
            }
            Some('*') => {
                self.advance();
                Ok(Token::Star)
            }
            Some('+') => {
                self.advance();
                Ok(Token::Plus)
            }
            Some('?') => {
                self.advance();
                Ok(Token::Question)
            }
            Some('|') => {
                self.advance();
                Ok(Token::Pipe)
            }
            Some('^') => {
                self.advance();
                Ok(Token::Caret)
            }
            Some('$') => {
                self.advance();
                Ok(Token::Dollar)
            }
            Some('(') => {
                self.advance();
                Ok(Token::LParen)
            }
            Some(')') => {
                self.advance();
                Ok(Token::RParen)
            }
            Some('[') => {
                self.advance();
                Ok(Token::LBracket)
            }
            Some(']') => {
                self.advance();
                Ok(Token::RBracket)
            }
            Some('{') => {
                self.advance();
                Ok(Token::LBrace)
            }
            Some('}') => {
                self.advance();
                Ok(Token::RBrace)
            }
            Some(',') => {
                self.advance();
                Ok(Token::Comma)
            }
            Some(ch) if ch.is_ascii_digit() => {
                self.advance();
                Ok(Token::Digit(ch))
            }
            Some(ch) if ch.is_whitespace() => {
                Err(PatternError::Semantic(PatternSemanticError::Whitespace))
            }
            Some(ch) if ch.is_alphabetic() => Err(PatternError::Semantic(
                PatternSemanticError::DisallowedLetter(ch),
            )),
            Some(ch) => Err(PatternError::Semantic(
                PatternSemanticError::DisallowedCharacter(ch),
            )),
        }
    }
}
