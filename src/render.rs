//! Pattern tree rendering and structural comparison.
//!
//! [`render`] reproduces the textual form of a parsed tree, anchors and
//! quantifiers included, so that parsing and rendering round-trip. Escaped
//! characters inside classes come back in their plain spelling (`[\.]`
//! renders as `[.]`); everything else renders exactly as written.
//! [`pretty`] prints an indented structural dump for diagnostics, and
//! [`structural_eq`] compares two trees positionally, ignoring node ids.

use crate::ast::{NodeId, NodeKind, PatternTree, Quantifier};

/// Renders a whole tree back to pattern text.
pub fn render(tree: &PatternTree) -> String {
    render_node(tree, tree.root())
}

/// Renders one node and its subtree as pattern text.
pub fn render_node(tree: &PatternTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

fn write_node(tree: &PatternTree, id: NodeId, out: &mut String) {
    match tree.kind(id) {
        NodeKind::Expression => {
            for &child in tree.children(id) {
                write_node(tree, child, out);
            }
        }
        NodeKind::Alternation => {
            for (index, &branch) in tree.children(id).iter().enumerate() {
                if index > 0 {
                    out.push('|');
                }
                write_node(tree, branch, out);
            }
        }
        NodeKind::Group => {
            out.push('(');
            for &child in tree.children(id) {
                write_node(tree, child, out);
            }
            out.push(')');
        }
        NodeKind::CharClass { negated } => {
            out.push('[');
            if *negated {
                out.push('^');
            }
            for &member in tree.children(id) {
                write_node(tree, member, out);
            }
            out.push(']');
        }
        NodeKind::CharRange { start, end } => {
            out.push(*start);
            out.push('-');
            out.push(*end);
        }
        NodeKind::DigitClass => out.push_str("\\d"),
        NodeKind::AnyDigit => out.push('.'),
        NodeKind::SingleChar(c) => out.push(*c),
        NodeKind::EscapedChar(c) => {
            out.push('\\');
            out.push(*c);
        }
        NodeKind::Repetition { quantifier, lazy } => {
            out.push_str(&quantifier_text(quantifier));
            if *lazy {
                out.push('?');
            }
        }
        NodeKind::StartAnchor => out.push('^'),
        NodeKind::EndAnchor => out.push('$'),
        NodeKind::Empty => {}
    }
}

fn quantifier_text(quantifier: &Quantifier) -> String {
    match quantifier {
        Quantifier::ZeroOrMore => "*".to_string(),
        Quantifier::OneOrMore => "+".to_string(),
        Quantifier::Optional => "?".to_string(),
        Quantifier::Range { min, max: None } => format!("{{{},}}", min),
        Quantifier::Range {
            min,
            max: Some(max),
        } if min == max => format!("{{{}}}", min),
        Quantifier::Range {
            min,
            max: Some(max),
        } => format!("{{{},{}}}", min, max),
    }
}

/// Indented structural dump, one node per line.
pub fn pretty(tree: &PatternTree) -> String {
    let mut out = String::new();
    write_pretty(tree, tree.root(), 0, &mut out);
    out
}

fn write_pretty(tree: &PatternTree, id: NodeId, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(&node_label(tree.kind(id)));
    out.push('\n');
    for &child in tree.children(id) {
        write_pretty(tree, child, depth + 1, out);
    }
}

fn node_label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Expression => "Expression".to_string(),
        NodeKind::Alternation => "Alternation".to_string(),
        NodeKind::Group => "Group".to_string(),
        NodeKind::CharClass { negated: false } => "CharClass".to_string(),
        NodeKind::CharClass { negated: true } => "CharClass (negated)".to_string(),
        NodeKind::CharRange { start, end } => format!("CharRange {}-{}", start, end),
        NodeKind::DigitClass => "DigitClass".to_string(),
        NodeKind::AnyDigit => "AnyDigit".to_string(),
        NodeKind::SingleChar(c) => format!("SingleChar '{}'", c),
        NodeKind::EscapedChar(c) => format!("EscapedChar '{}'", c),
        NodeKind::Repetition { quantifier, lazy } => {
            let mut label = format!("Repetition {}", quantifier_text(quantifier));
            if *lazy {
                label.push_str(" (lazy)");
            }
            label
        }
        NodeKind::StartAnchor => "StartAnchor".to_string(),
        NodeKind::EndAnchor => "EndAnchor".to_string(),
        NodeKind::Empty => "Empty".to_string(),
    }
}

/// Positional equality of two trees, ignoring node ids.
pub fn structural_eq(a: &PatternTree, b: &PatternTree) -> bool {
    eq_node(a, a.root(), b, b.root())
}

fn eq_node(a: &PatternTree, left: NodeId, b: &PatternTree, right: NodeId) -> bool {
    if a.kind(left) != b.kind(right) {
        return false;
    }
    let left_children = a.children(left);
    let right_children = b.children(right);
    left_children.len() == right_children.len()
        && left_children
            .iter()
            .zip(right_children.iter())
            .all(|(&x, &y)| eq_node(a, x, b, y))
}
