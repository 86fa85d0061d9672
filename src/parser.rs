use crate::{
    ast::{NodeId, NodeKind, PatternTree, Quantifier, Token},
    lexer::Lexer,
    validate::{PatternError, PatternSemanticError, PatternSyntaxError},
};

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, PatternError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
        })
    }

    fn advance(&mut self) -> Result<(), PatternError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected(&self) -> PatternError {
        PatternSyntaxError::UnexpectedToken(describe(&self.current_token)).into()
    }

    /// Parses a whole pattern into a tree.
    ///
    /// Anchors are accepted only as the first and last characters and become
    /// the first/last children of the root. A single branch attaches its
    /// elements directly to the root; `|` at the top level produces one
    /// `Alternation` child instead.
    pub fn parse(&mut self) -> Result<PatternTree, PatternError> {
        let mut tree = PatternTree::new();
        let root = tree.root();

        if self.current_token == Token::Caret {
            self.advance()?;
            let anchor = tree.push_detached(NodeKind::StartAnchor);
            tree.attach(root, anchor);
        }

        self.parse_body(&mut tree, root, false)?;

        if self.current_token == Token::Dollar {
            self.advance()?;
            if self.current_token != Token::Eof {
                return Err(PatternSemanticError::StrayAnchor.into());
            }
            let anchor = tree.push_detached(NodeKind::EndAnchor);
            tree.attach(root, anchor);
        }

        if self.current_token != Token::Eof {
            return Err(self.unexpected());
        }

        Ok(tree)
    }

    /// Parses branches up to the enclosing `)` or the end of the pattern and
    /// attaches them to `parent`.
    fn parse_body(
        &mut self,
        tree: &mut PatternTree,
        parent: NodeId,
        in_group: bool,
    ) -> Result<(), PatternError> {
        let first = self.parse_branch(tree, in_group)?;

        if self.current_token == Token::Pipe {
            let alternation = tree.push_detached(NodeKind::Alternation);
            attach_branch(tree, alternation, first);
            while self.current_token == Token::Pipe {
                self.advance()?;
                let elements = self.parse_branch(tree, in_group)?;
                attach_branch(tree, alternation, elements);
            }
            tree.attach(parent, alternation);
        } else if in_group {
            // A group always wraps its single branch in an Expression.
            let branch = tree.push_detached(NodeKind::Expression);
            for element in first {
                tree.attach(branch, element);
            }
            tree.attach(parent, branch);
        } else {
            for element in first {
                tree.attach(parent, element);
            }
        }

        Ok(())
    }

    /// Parses one branch and returns its element nodes, detached, in order.
    /// A quantified atom contributes two consecutive nodes: the atom and its
    /// `Repetition` sibling.
    fn parse_branch(
        &mut self,
        tree: &mut PatternTree,
        in_group: bool,
    ) -> Result<Vec<NodeId>, PatternError> {
        let mut elements = Vec::new();
        loop {
            match self.current_token {
                Token::Eof | Token::Pipe => break,
                Token::RParen if in_group => break,
                Token::Dollar if !in_group => break,
                Token::Caret | Token::Dollar => {
                    return Err(PatternSemanticError::StrayAnchor.into());
                }
                _ => self.parse_element(tree, &mut elements, in_group)?,
            }
        }
        Ok(elements)
    }

    fn parse_element(
        &mut self,
        tree: &mut PatternTree,
        elements: &mut Vec<NodeId>,
        in_group: bool,
    ) -> Result<(), PatternError> {
        let atom = match self.current_token {
            Token::Digit(ch) => {
                self.advance()?;
                tree.push_detached(NodeKind::SingleChar(ch))
            }
            Token::Minus => {
                self.advance()?;
                tree.push_detached(NodeKind::SingleChar('-'))
            }
            Token::Wildcard => {
                self.advance()?;
                tree.push_detached(NodeKind::AnyDigit)
            }
            Token::Escaped('d') => {
                self.advance()?;
                tree.push_detached(NodeKind::DigitClass)
            }
            Token::Escaped(ch) => {
                self.advance()?;
                tree.push_detached(NodeKind::EscapedChar(ch))
            }
            Token::LBracket => self.parse_class(tree)?,
            Token::LParen => {
                if in_group {
                    return Err(PatternSemanticError::NestedGroup.into());
                }
                self.parse_group(tree)?
            }
            _ => return Err(self.unexpected()),
        };
        elements.push(atom);

        if let Some((quantifier, lazy)) = self.parse_quantifier()? {
            let repetition = tree.push_detached(NodeKind::Repetition { quantifier, lazy });
            elements.push(repetition);
        }

        Ok(())
    }

    fn parse_group(&mut self, tree: &mut PatternTree) -> Result<NodeId, PatternError> {
        self.advance()?; // Consume '('
        let group = tree.push_detached(NodeKind::Group);
        self.parse_body(tree, group, true)?;
        if self.current_token != Token::RParen {
            return Err(self.unexpected());
        }
        self.advance()?;

        let body = tree.children(group)[0];
        if *tree.kind(body) == NodeKind::Expression && tree.children(body).is_empty() {
            return Err(PatternSemanticError::EmptyGroup.into());
        }
        Ok(group)
    }

    /// Parses `[...]` / `[^...]`. Members are digits, digit ranges, `.` and
    /// `-`. A bare `-` is a literal only where the host engine agrees it is
    /// one (leading, trailing, or escaped); anything the host would read as
    /// a non-digit range is rejected.
    fn parse_class(&mut self, tree: &mut PatternTree) -> Result<NodeId, PatternError> {
        self.advance()?; // Consume '['
        let negated = if self.current_token == Token::Caret {
            self.advance()?;
            true
        } else {
            false
        };
        let class = tree.push_detached(NodeKind::CharClass { negated });

        loop {
            match self.current_token {
                Token::RBracket => {
                    self.advance()?;
                    break;
                }
                Token::Eof => return Err(self.unexpected()),
                Token::Digit(start) => {
                    self.advance()?;
                    if self.current_token == Token::Minus {
                        self.advance()?;
                        match self.current_token {
                            Token::Digit(end) => {
                                self.advance()?;
                                let range = tree.push_detached(NodeKind::CharRange { start, end });
                                tree.attach(class, range);
                            }
                            Token::RBracket => {
                                // Trailing '-' after a digit: two literals.
                                if negated {
                                    return Err(PatternSemanticError::NegatedClassMember('-').into());
                                }
                                let digit = tree.push_detached(NodeKind::SingleChar(start));
                                tree.attach(class, digit);
                                let dash = tree.push_detached(NodeKind::SingleChar('-'));
                                tree.attach(class, dash);
                            }
                            _ => {
                                return Err(PatternSyntaxError::DisallowedClassMember(
                                    token_char(&self.current_token),
                                )
                                .into());
                            }
                        }
                    } else {
                        let digit = tree.push_detached(NodeKind::SingleChar(start));
                        tree.attach(class, digit);
                    }
                }
                Token::Wildcard => {
                    if negated {
                        return Err(PatternSemanticError::NegatedClassMember('.').into());
                    }
                    self.advance()?;
                    let point = tree.push_detached(NodeKind::SingleChar('.'));
                    tree.attach(class, point);
                }
                Token::Minus => {
                    let leading = tree.children(class).is_empty();
                    self.advance()?;
                    if matches!(self.current_token, Token::Digit(_)) && !leading {
                        // The host engine would read this as a range from a
                        // non-digit member; refuse rather than diverge.
                        return Err(PatternSyntaxError::DisallowedClassMember('-').into());
                    }
                    if negated {
                        return Err(PatternSemanticError::NegatedClassMember('-').into());
                    }
                    let dash = tree.push_detached(NodeKind::SingleChar('-'));
                    tree.attach(class, dash);
                }
                Token::Escaped(ch) if ch == '.' || ch == '-' => {
                    if negated {
                        return Err(PatternSemanticError::NegatedClassMember(ch).into());
                    }
                    self.advance()?;
                    let member = tree.push_detached(NodeKind::SingleChar(ch));
                    tree.attach(class, member);
                }
                Token::Escaped(ch) if ch.is_ascii_digit() => {
                    self.advance()?;
                    let digit = tree.push_detached(NodeKind::SingleChar(ch));
                    tree.attach(class, digit);
                }
                ref token => {
                    return Err(PatternSyntaxError::DisallowedClassMember(token_char(token)).into());
                }
            }
        }

        Ok(class)
    }

    fn parse_quantifier(&mut self) -> Result<Option<(Quantifier, bool)>, PatternError> {
        let quantifier = match self.current_token {
            Token::Star => {
                self.advance()?;
                Quantifier::ZeroOrMore
            }
            Token::Plus => {
                self.advance()?;
                Quantifier::OneOrMore
            }
            Token::Question => {
                self.advance()?;
                Quantifier::Optional
            }
            Token::LBrace => self.parse_counted()?,
            _ => return Ok(None),
        };

        let lazy = if self.current_token == Token::Question {
            self.advance()?;
            true
        } else {
            false
        };

        Ok(Some((quantifier, lazy)))
    }

    fn parse_counted(&mut self) -> Result<Quantifier, PatternError> {
        self.advance()?; // Consume '{'
        let min = self.parse_count()?;
        let quantifier = match self.current_token {
            Token::RBrace => Quantifier::Range {
                min,
                max: Some(min),
            },
            Token::Comma => {
                self.advance()?;
                match self.current_token {
                    Token::RBrace => Quantifier::Range { min, max: None },
                    Token::Digit(_) => {
                        let max = self.parse_count()?;
                        if self.current_token != Token::RBrace {
                            return Err(self.unexpected());
                        }
                        Quantifier::Range {
                            min,
                            max: Some(max),
                        }
                    }
                    _ => return Err(self.unexpected()),
                }
            }
            _ => return Err(self.unexpected()),
        };
        self.advance()?; // Consume '}'
        Ok(quantifier)
    }

    fn parse_count(&mut self) -> Result<u32, PatternError> {
        let mut value: u32 = 0;
        let mut seen = false;
        while let Token::Digit(ch) = self.current_token {
            seen = true;
            let digit = ch as u32 - '0' as u32;
            value = value.saturating_mul(10).saturating_add(digit);
            self.advance()?;
        }
        if !seen {
            return Err(self.unexpected());
        }
        Ok(value)
    }
}

fn attach_branch(tree: &mut PatternTree, alternation: NodeId, elements: Vec<NodeId>) {
    if elements.is_empty() {
        let empty = tree.push_detached(NodeKind::Empty);
        tree.attach(alternation, empty);
    } else {
        let branch = tree.push_detached(NodeKind::Expression);
        for element in elements {
            tree.attach(branch, element);
        }
        tree.attach(alternation, branch);
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Eof => "end of pattern".to_string(),
        Token::Digit(ch) => format!("'{}'", ch),
        Token::Escaped(ch) => format!("'\\{}'", ch),
        other => format!("'{}'", token_char(other)),
    }
}

/// The source character a structural token stands for.
fn token_char(token: &Token) -> char {
    match token {
        Token::Minus => '-',
        Token::Wildcard => '.',
        Token::Star => '*',
        Token::Plus => '+',
        Token::Question => '?',
        Token::Pipe => '|',
        Token::Caret => '^',
        Token::Dollar => '$',
        Token::LParen => '(',
        Token::RParen => ')',
        Token::LBracket => '[',
        Token::RBracket => ']',
        Token::LBrace => '{',
        Token::RBrace => '}',
        Token::Comma => ',',
        Token::Digit(ch) | Token::Escaped(ch) => *ch,
        Token::Eof => '\0',
    }
}
