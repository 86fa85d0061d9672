/// Repetition count attached to a [`NodeKind::Repetition`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `?`
    Optional,
    /// `{min}`, `{min,}` or `{min,max}`.
    Range { min: u32, max: Option<u32> },
}

impl Quantifier {
    /// Minimum and maximum repeat counts; `None` means unbounded.
    pub fn bounds(&self) -> (u32, Option<u32>) {
        match self {
            Quantifier::ZeroOrMore => (0, None),
            Quantifier::OneOrMore => (1, None),
            Quantifier::Optional => (0, Some(1)),
            Quantifier::Range { min, max } => (*min, *max),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.bounds().1.is_none()
    }

    /// True for `{0}` and `{0,0}`, which repeat nothing and are trimmed
    /// away before the transform runs.
    pub fn is_zero_length(&self) -> bool {
        matches!(self.bounds(), (0, Some(0)))
    }
}

/// Kind of a node in the pattern tree. One case per grammar production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Ordered sequence of child nodes.
    Expression,
    /// Branches separated by `|`. Always two or more children, each an
    /// `Expression` or `Empty`.
    Alternation,
    /// Parenthesized group wrapping exactly one `Expression` or
    /// `Alternation` child. Groups do not nest.
    Group,
    /// `[...]` or `[^...]`. Children are the `SingleChar`/`CharRange`
    /// members in written order.
    CharClass { negated: bool },
    /// Digit range member inside a character class.
    CharRange { start: char, end: char },
    /// `\d`.
    DigitClass,
    /// Unescaped `.`. Matches exactly one digit, except that an unbounded
    /// repetition of it stands for any continuation of the written number.
    AnyDigit,
    /// A bare literal character: a digit or `-`.
    SingleChar(char),
    /// An escaped literal character: `.`, `-`, or a digit.
    EscapedChar(char),
    /// Quantifier suffix. Its preceding sibling is the node it repeats.
    Repetition { quantifier: Quantifier, lazy: bool },
    /// `^` as the first child of the root.
    StartAnchor,
    /// `$` as the last child of the root.
    EndAnchor,
    /// An empty alternative, e.g. the second branch of `"1|"`.
    Empty,
}

impl NodeKind {
    /// True for nodes that consume exactly one character of input when
    /// matched.
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            NodeKind::CharClass { .. }
                | NodeKind::DigitClass
                | NodeKind::AnyDigit
                | NodeKind::SingleChar(_)
                | NodeKind::EscapedChar(_)
        )
    }

    /// True for nodes a quantifier may attach to.
    pub fn is_quantifiable(&self) -> bool {
        self.is_atom() || matches!(self, NodeKind::Group)
    }
}
