// tests/parser_tests.rs

use lexidec::ast::{NodeKind, Quantifier};
use lexidec::lexer::Lexer;
use lexidec::parser::Parser;
use lexidec::render::{pretty, render, structural_eq};
use lexidec::validate::{
    parse_pattern, PatternError, PatternSemanticError, PatternSyntaxError,
};

// ============================================================================
// Simple Branches
// ============================================================================

#[test]
fn test_literal_digits() {
    let tree = parse_pattern("123").unwrap();
    let children = tree.children(tree.root());
    assert_eq!(children.len(), 3);
    assert_eq!(*tree.kind(children[0]), NodeKind::SingleChar('1'));
    assert_eq!(*tree.kind(children[1]), NodeKind::SingleChar('2'));
    assert_eq!(*tree.kind(children[2]), NodeKind::SingleChar('3'));
}

#[test]
fn test_sign_and_point() {
    let tree = parse_pattern(r"-1\.5").unwrap();
    let children = tree.children(tree.root());
    assert_eq!(children.len(), 4);
    assert_eq!(*tree.kind(children[0]), NodeKind::SingleChar('-'));
    assert_eq!(*tree.kind(children[1]), NodeKind::SingleChar('1'));
    assert_eq!(*tree.kind(children[2]), NodeKind::EscapedChar('.'));
    assert_eq!(*tree.kind(children[3]), NodeKind::SingleChar('5'));
}

#[test]
fn test_digit_class_and_wildcard() {
    let tree = parse_pattern(r"\d.").unwrap();
    let children = tree.children(tree.root());
    assert_eq!(*tree.kind(children[0]), NodeKind::DigitClass);
    assert_eq!(*tree.kind(children[1]), NodeKind::AnyDigit);
}

// ============================================================================
// Alternation and Groups
// ============================================================================

#[test]
fn test_top_level_alternation() {
    let tree = parse_pattern("1|2").unwrap();
    let children = tree.children(tree.root());
    assert_eq!(children.len(), 1);
    assert_eq!(*tree.kind(children[0]), NodeKind::Alternation);

    let branches = tree.children(children[0]);
    assert_eq!(branches.len(), 2);
    for branch in branches {
        assert_eq!(*tree.kind(*branch), NodeKind::Expression);
        assert_eq!(tree.children(*branch).len(), 1);
    }
}

#[test]
fn test_group_with_alternation() {
    let tree = parse_pattern("(1|2)3").unwrap();
    let children = tree.children(tree.root());
    assert_eq!(children.len(), 2);
    assert_eq!(*tree.kind(children[0]), NodeKind::Group);
    assert_eq!(*tree.kind(children[1]), NodeKind::SingleChar('3'));

    let body = tree.children(children[0]);
    assert_eq!(body.len(), 1);
    assert_eq!(*tree.kind(body[0]), NodeKind::Alternation);
    assert_eq!(tree.children(body[0]).len(), 2);
}

#[test]
fn test_group_wraps_single_branch() {
    let tree = parse_pattern("(12)").unwrap();
    let group = tree.children(tree.root())[0];
    let body = tree.children(group);
    assert_eq!(body.len(), 1);
    assert_eq!(*tree.kind(body[0]), NodeKind::Expression);
    assert_eq!(tree.children(body[0]).len(), 2);
}

#[test]
fn test_empty_alternative_becomes_empty_node() {
    let tree = parse_pattern("(5|)").unwrap();
    let group = tree.children(tree.root())[0];
    let alternation = tree.children(group)[0];
    let branches = tree.children(alternation);
    assert_eq!(branches.len(), 2);
    assert_eq!(*tree.kind(branches[1]), NodeKind::Empty);
}

#[test]
fn test_group_errors() {
    assert_eq!(
        parse_pattern("()"),
        Err(PatternError::Semantic(PatternSemanticError::EmptyGroup))
    );
    assert_eq!(
        parse_pattern("(34(343|34))"),
        Err(PatternError::Semantic(PatternSemanticError::NestedGroup))
    );
}

// ============================================================================
// Character Classes
// ============================================================================

#[test]
fn test_class_members() {
    let tree = parse_pattern("[05]").unwrap();
    let class = tree.children(tree.root())[0];
    assert_eq!(*tree.kind(class), NodeKind::CharClass { negated: false });
    let members = tree.children(class);
    assert_eq!(*tree.kind(members[0]), NodeKind::SingleChar('0'));
    assert_eq!(*tree.kind(members[1]), NodeKind::SingleChar('5'));
}

#[test]
fn test_class_range() {
    let tree = parse_pattern("[1-5]").unwrap();
    let class = tree.children(tree.root())[0];
    let members = tree.children(class);
    assert_eq!(members.len(), 1);
    assert_eq!(
        *tree.kind(members[0]),
        NodeKind::CharRange {
            start: '1',
            end: '5'
        }
    );
}

#[test]
fn test_negated_class() {
    let tree = parse_pattern("[^04]").unwrap();
    let class = tree.children(tree.root())[0];
    assert_eq!(*tree.kind(class), NodeKind::CharClass { negated: true });
    assert_eq!(tree.children(class).len(), 2);
}

#[test]
fn test_class_literal_dash_and_point() {
    // Leading or trailing '-' is a literal, as the host engine reads it.
    let tree = parse_pattern("[-5]").unwrap();
    let class = tree.children(tree.root())[0];
    let members = tree.children(class);
    assert_eq!(*tree.kind(members[0]), NodeKind::SingleChar('-'));
    assert_eq!(*tree.kind(members[1]), NodeKind::SingleChar('5'));

    let tree = parse_pattern("[5-]").unwrap();
    let class = tree.children(tree.root())[0];
    let members = tree.children(class);
    assert_eq!(*tree.kind(members[0]), NodeKind::SingleChar('5'));
    assert_eq!(*tree.kind(members[1]), NodeKind::SingleChar('-'));

    let tree = parse_pattern(r"[.\.]").unwrap();
    let class = tree.children(tree.root())[0];
    let members = tree.children(class);
    assert_eq!(*tree.kind(members[0]), NodeKind::SingleChar('.'));
    assert_eq!(*tree.kind(members[1]), NodeKind::SingleChar('.'));
}

#[test]
fn test_negated_class_rejects_punctuation() {
    assert_eq!(
        parse_pattern("[^0.]"),
        Err(PatternError::Semantic(
            PatternSemanticError::NegatedClassMember('.')
        ))
    );
    assert_eq!(
        parse_pattern("[^-5]"),
        Err(PatternError::Semantic(
            PatternSemanticError::NegatedClassMember('-')
        ))
    );
}

// ============================================================================
// Quantifiers
// ============================================================================

#[test]
fn test_quantifier_forms() {
    let test_cases = vec![
        (r"\d*", Quantifier::ZeroOrMore),
        (r"\d+", Quantifier::OneOrMore),
        (r"\d?", Quantifier::Optional),
        (r"\d{3}", Quantifier::Range { min: 3, max: Some(3) }),
        (r"\d{2,}", Quantifier::Range { min: 2, max: None }),
        (r"\d{2,5}", Quantifier::Range { min: 2, max: Some(5) }),
    ];

    for (input, expected) in test_cases {
        let tree = parse_pattern(input).unwrap();
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 2, "Failed for input: {}", input);
        assert_eq!(
            *tree.kind(children[1]),
            NodeKind::Repetition {
                quantifier: expected,
                lazy: false
            },
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_lazy_quantifier() {
    let tree = parse_pattern(r"\d*?").unwrap();
    let children = tree.children(tree.root());
    assert_eq!(
        *tree.kind(children[1]),
        NodeKind::Repetition {
            quantifier: Quantifier::ZeroOrMore,
            lazy: true
        }
    );
}

#[test]
fn test_repetition_follows_its_atom() {
    let tree = parse_pattern(r"1\d{2}5").unwrap();
    let children = tree.children(tree.root());
    assert_eq!(children.len(), 4);
    assert_eq!(*tree.kind(children[1]), NodeKind::DigitClass);
    assert!(matches!(
        tree.kind(children[2]),
        NodeKind::Repetition { .. }
    ));
    assert_eq!(tree.prev_sibling(children[2]), Some(children[1]));
}

// ============================================================================
// Anchors
// ============================================================================

#[test]
fn test_anchors_at_edges() {
    let tree = parse_pattern("^-?5$").unwrap();
    let children = tree.children(tree.root());
    assert_eq!(*tree.kind(children[0]), NodeKind::StartAnchor);
    assert_eq!(
        *tree.kind(*children.last().unwrap()),
        NodeKind::EndAnchor
    );
}

#[test]
fn test_stray_anchor() {
    assert_eq!(
        parse_pattern("1^2"),
        Err(PatternError::Semantic(PatternSemanticError::StrayAnchor))
    );
}

// ============================================================================
// Precheck Rejections
// ============================================================================

#[test]
fn test_empty_pattern() {
    assert_eq!(
        parse_pattern(""),
        Err(PatternError::Semantic(PatternSemanticError::EmptyPattern))
    );
}

#[test]
fn test_uncompilable_pattern() {
    // From outside the dialect: the host engine rejects the empty class.
    assert!(matches!(
        parse_pattern("123[]"),
        Err(PatternError::Syntax(PatternSyntaxError::Uncompilable(_)))
    ));
    assert!(matches!(
        parse_pattern("12)"),
        Err(PatternError::Syntax(PatternSyntaxError::Uncompilable(_)))
    ));
}

#[test]
fn test_letters_rejected_before_parse() {
    assert_eq!(
        parse_pattern("12E3"),
        Err(PatternError::Semantic(
            PatternSemanticError::DisallowedLetter('E')
        ))
    );
}

#[test]
fn test_unexpected_token() {
    // Straight to the parser; precheck would blame the host engine first.
    let mut parser = Parser::new(Lexer::new("*5")).unwrap();
    assert_eq!(
        parser.parse(),
        Err(PatternError::Syntax(PatternSyntaxError::UnexpectedToken(
            "'*'".to_string()
        )))
    );
}

// ============================================================================
// Render Round Trip
// ============================================================================

#[test]
fn test_render_round_trip() {
    let patterns = vec![
        "123",
        r"-1\.5",
        r"\d{2,5}",
        r"\d*?",
        "(1|2)3",
        "-?(5|7)",
        "[0-9]",
        "[^04]",
        "[1-]",
        "^-?5$",
        ".*",
        "5{3}",
        "5{2,}",
        "(5|)",
    ];

    for pattern in patterns {
        let tree = parse_pattern(pattern).unwrap();
        assert_eq!(render(&tree), pattern, "Failed for pattern: {}", pattern);
    }
}

#[test]
fn test_render_unescapes_class_point() {
    let tree = parse_pattern(r"[\.]").unwrap();
    assert_eq!(render(&tree), "[.]");
}

// ============================================================================
// Pretty and Structural Equality
// ============================================================================

#[test]
fn test_pretty_dump() {
    let tree = parse_pattern("(1|2)3").unwrap();
    let dump = pretty(&tree);
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines[0], "Expression");
    assert_eq!(lines[1], "  Group");
    assert_eq!(lines[2], "    Alternation");
    assert_eq!(lines[3], "      Expression");
    assert_eq!(lines[4], "        SingleChar '1'");
    assert!(dump.contains("SingleChar '3'"));
}

#[test]
fn test_structural_equality() {
    let a = parse_pattern(r"1\d").unwrap();
    let b = parse_pattern(r"1\d").unwrap();
    let c = parse_pattern(r"1\d2").unwrap();
    assert!(structural_eq(&a, &b));
    assert!(!structural_eq(&a, &c));

    // The escaped and bare point members carry the same node kind.
    let escaped = parse_pattern(r"[\.]").unwrap();
    let bare = parse_pattern("[.]").unwrap();
    assert!(structural_eq(&escaped, &bare));
}
