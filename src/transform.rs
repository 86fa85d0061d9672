//! Rewrites numeric regex patterns into patterns over the encoded alphabet.
//!
//! The input dialect is a restricted regex over plain decimal notation:
//! digits, `\d`, character classes, `.` wildcards, an optional leading sign,
//! at most one decimal point per branch and the usual quantifiers.
//! [`normalize_pattern`] rewrites such a pattern so that it matches the
//! [`encode`](crate::encoder::encode)d spellings of the values the original
//! pattern matched in written form.
//!
//! The rewrite works branch by branch. Groups are distributed, signs and
//! point-capable classes split the branch, bounded quantifiers expand, and
//! each resulting digit-position sequence is mapped onto the exponent bins
//! it can reach. One alternative is emitted per bin family; consecutive bins
//! that share a mantissa pattern collapse into a letter class, so `\d\d`
//! emits one alternative while `1\d*5` emits one per reachable exponent.
//! Negative sequences render through the ten's-complement digit maps and are
//! emitted before their positive counterparts, which keeps the whole output
//! in value order.
//!
//! Equivalence is guaranteed over canonically written values (no redundant
//! zeros). Two open-ended shapes cannot pin mantissa length to an exponent
//! and over-match; they are reported through the `lossy` flag of
//! [`normalize_pattern_detailed`]. A lossy rewrite never under-matches.

use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::ast::{NodeId, NodeKind, PatternTree, Quantifier};
use crate::encoder::{MAX_EXPONENT, MIN_EXPONENT, ZERO_ENCODING, tables};
use crate::render::render_node;
use crate::validate::{
    MAX_ALTERNATIVES, MAX_REPEAT_BOUND, PatternError, PatternSemanticError, parse_pattern,
};

/// Knobs for [`normalize_pattern_with`].
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Distribute non-nested groups over their alternatives. When false,
    /// any group is rejected as unsupported.
    pub allow_groups: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions { allow_groups: true }
    }
}

/// A rewritten pattern plus its exactness verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPattern {
    /// The pattern over the encoded alphabet.
    pub pattern: String,
    /// True when the rewrite may match encodings of values the original
    /// pattern did not match. It never misses a value the original matched.
    pub lossy: bool,
}

/// Rewrites a numeric pattern into one over the encoded alphabet.
///
/// # Examples
///
/// ```
/// use lexidec::transform::normalize_pattern;
///
/// assert_eq!(normalize_pattern("123").unwrap(), r"\+cE1\.23");
/// assert_eq!(normalize_pattern(r"\d").unwrap(), r"\+aE\d|\+AE0");
/// assert_eq!(normalize_pattern("-?5").unwrap(), r"\!ZE5|\+aE5");
/// ```
pub fn normalize_pattern(pattern: &str) -> Result<String, PatternError> {
    Ok(normalize_pattern_detailed(pattern)?.pattern)
}

/// Like [`normalize_pattern`], returning the lossiness verdict as well.
pub fn normalize_pattern_detailed(pattern: &str) -> Result<NormalizedPattern, PatternError> {
    normalize_pattern_with(pattern, &TransformOptions::default())
}

/// Full-control entry point for the rewrite.
pub fn normalize_pattern_with(
    pattern: &str,
    options: &TransformOptions,
) -> Result<NormalizedPattern, PatternError> {
    let tree = parse_pattern(pattern)?;
    let branches = top_level_branches(&tree);

    let bound = expansion_bound(&tree, &branches);
    if bound > MAX_ALTERNATIVES {
        return Err(PatternSemanticError::TooManyAlternatives(bound).into());
    }

    let mut alternatives: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut lossy = false;
    let mut zero = false;

    for branch in &branches {
        for flat in distribute_groups(&tree, branch, options)? {
            let elements = classify_branch(&tree, &flat)?;
            let outcome = rewrite_flat_branch(elements)?;
            lossy |= outcome.lossy;
            zero |= outcome.zero;
            for alternative in outcome.alternatives {
                if seen.insert(alternative.clone()) {
                    alternatives.push(alternative);
                }
            }
        }
    }

    if zero {
        let sentinel = format!("\\{}", ZERO_ENCODING);
        if seen.insert(sentinel.clone()) {
            alternatives.push(sentinel);
        }
    }
    Ok(NormalizedPattern {
        pattern: alternatives.join("|"),
        lossy,
    })
}

// ---------------------------------------------------------------------------
// Branch collection and group distribution
// ---------------------------------------------------------------------------

/// The element lists of the pattern's top-level branches, anchors dropped.
fn top_level_branches(tree: &PatternTree) -> Vec<Vec<NodeId>> {
    let mut body: Vec<NodeId> = Vec::new();
    for &child in tree.children(tree.root()) {
        match tree.kind(child) {
            NodeKind::StartAnchor | NodeKind::EndAnchor => {}
            NodeKind::Alternation => {
                let mut branches = Vec::new();
                for &branch in tree.children(child) {
                    match tree.kind(branch) {
                        NodeKind::Empty => branches.push(Vec::new()),
                        _ => branches.push(tree.children(branch).to_vec()),
                    }
                }
                return branches;
            }
            _ => body.push(child),
        }
    }
    vec![body]
}

/// Upper bound on the number of concrete sequences the pattern expands to.
/// Every split the pipeline performs multiplies: group variants, bounded
/// quantifier widths, sign and point readings of a class.
fn expansion_bound(tree: &PatternTree, branches: &[Vec<NodeId>]) -> usize {
    let mut total: usize = 0;
    for branch in branches {
        let mut product: usize = 1;
        for (index, &element) in branch.iter().enumerate() {
            let factor = match tree.kind(element) {
                NodeKind::Group => {
                    let body = tree.children(element)[0];
                    match tree.kind(body) {
                        NodeKind::Alternation => tree.children(body).len().max(1),
                        _ => 1,
                    }
                }
                NodeKind::Repetition { quantifier, .. } => match quantifier.bounds() {
                    (min, Some(max)) if max >= min => (max - min) as usize + 1,
                    _ => 1,
                },
                NodeKind::CharClass { negated: false } => {
                    let mut splits = 1;
                    if class_member(tree, element, '.') {
                        splits += 1;
                    }
                    if index == 0 && class_member(tree, element, '-') {
                        splits += 1;
                    }
                    splits
                }
                NodeKind::SingleChar('-') | NodeKind::EscapedChar('-') if index == 0 => 2,
                _ => 1,
            };
            product = product.saturating_mul(factor);
        }
        total = total.saturating_add(product);
    }
    total
}

fn class_member(tree: &PatternTree, class: NodeId, wanted: char) -> bool {
    tree.children(class)
        .iter()
        .any(|&m| matches!(tree.kind(m), NodeKind::SingleChar(c) if *c == wanted))
}

/// Cartesian-expands every group in the branch over its alternatives. The
/// result is a list of flat element sequences containing atoms and their
/// `Repetition` siblings only.
fn distribute_groups(
    tree: &PatternTree,
    branch: &[NodeId],
    options: &TransformOptions,
) -> Result<Vec<Vec<NodeId>>, PatternError> {
    let mut flats: Vec<Vec<NodeId>> = vec![Vec::new()];
    let mut index = 0;
    while index < branch.len() {
        let element = branch[index];
        match tree.kind(element) {
            NodeKind::Group => {
                if !options.allow_groups {
                    return Err(PatternSemanticError::UnsupportedGroup.into());
                }
                if let Some(&next) = branch.get(index + 1) {
                    if matches!(tree.kind(next), NodeKind::Repetition { .. }) {
                        return Err(PatternSemanticError::GroupQuantifier.into());
                    }
                }
                let body = tree.children(element)[0];
                let variants: Vec<Vec<NodeId>> = match tree.kind(body) {
                    NodeKind::Alternation => tree
                        .children(body)
                        .iter()
                        .map(|&b| match tree.kind(b) {
                            NodeKind::Empty => Vec::new(),
                            _ => tree.children(b).to_vec(),
                        })
                        .collect(),
                    _ => vec![tree.children(body).to_vec()],
                };
                let mut next_flats = Vec::with_capacity(flats.len() * variants.len());
                for flat in &flats {
                    for variant in &variants {
                        let mut extended = flat.clone();
                        extended.extend_from_slice(variant);
                        next_flats.push(extended);
                    }
                }
                flats = next_flats;
            }
            _ => {
                for flat in &mut flats {
                    flat.push(element);
                }
            }
        }
        index += 1;
    }
    Ok(flats)
}

// ---------------------------------------------------------------------------
// Element classification
// ---------------------------------------------------------------------------

/// The digits 0-9 a single position can take, as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DigitSet(u16);

impl DigitSet {
    const FULL: DigitSet = DigitSet(0x3ff);

    fn empty() -> DigitSet {
        DigitSet(0)
    }

    fn insert(&mut self, digit: u8) {
        self.0 |= 1 << digit;
    }

    fn contains(self, digit: u8) -> bool {
        self.0 & (1 << digit) != 0
    }

    fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn is_full(self) -> bool {
        self.0 == Self::FULL.0
    }

    fn is_zero_only(self) -> bool {
        self.0 == 1
    }

    fn without_zero(self) -> DigitSet {
        DigitSet(self.0 & !1)
    }

    fn digits(self) -> impl Iterator<Item = u8> {
        (0u8..10).filter(move |d| self.contains(*d))
    }

    /// `d -> 9 - d` for every member; the interior digit map of the ten's
    /// complement.
    fn complement_interior(self) -> DigitSet {
        let mut out = DigitSet::empty();
        for d in self.digits() {
            out.insert(9 - d);
        }
        out
    }

    /// `d -> 10 - d` for every nonzero member; the final-digit map of the
    /// ten's complement. Canonical mantissas never end in zero, so zero has
    /// no image.
    fn complement_final(self) -> DigitSet {
        let mut out = DigitSet::empty();
        for d in self.without_zero().digits() {
            out.insert(10 - d);
        }
        out
    }
}

/// One classified branch element: what the atom can match, plus its
/// (unexpanded) quantifier.
#[derive(Debug, Clone)]
struct Element {
    set: DigitSet,
    has_point: bool,
    has_minus: bool,
    wildcard: bool,
    source: String,
    quantifier: Option<(Quantifier, bool)>,
}

impl Element {
    fn is_bare_minus(&self) -> bool {
        self.has_minus && self.set.is_empty() && !self.has_point
    }

    fn is_required_point(&self) -> bool {
        self.has_point && self.set.is_empty() && !self.has_minus
    }

    fn unbounded(&self) -> bool {
        matches!(self.quantifier, Some((q, _)) if q.is_unbounded())
    }
}

/// Walks a flat element list and classifies each atom. Zero-length
/// repetitions are trimmed here; branch-level shape errors (the repeat cap,
/// a second open repetition, stacked required points) are raised here too.
fn classify_branch(tree: &PatternTree, flat: &[NodeId]) -> Result<Vec<Element>, PatternError> {
    let mut elements: Vec<Element> = Vec::new();
    let mut had_any = false;
    let mut index = 0;
    while index < flat.len() {
        let atom = flat[index];
        had_any = true;
        let mut quantifier = None;
        if let Some(&next) = flat.get(index + 1) {
            if let NodeKind::Repetition {
                quantifier: q,
                lazy,
            } = tree.kind(next)
            {
                quantifier = Some((*q, *lazy));
                index += 1;
            }
        }
        index += 1;

        if let Some((q, _)) = quantifier {
            let (min, max) = q.bounds();
            if min > MAX_REPEAT_BOUND {
                return Err(PatternSemanticError::RepeatBoundTooLarge(min).into());
            }
            if let Some(max) = max {
                if max > MAX_REPEAT_BOUND {
                    return Err(PatternSemanticError::RepeatBoundTooLarge(max).into());
                }
            }
            if q.is_zero_length() {
                continue;
            }
        }
        elements.push(classify_atom(tree, atom, quantifier));
    }

    if !had_any {
        return Err(PatternSemanticError::NoNumericValue.into());
    }
    if elements.is_empty() {
        return Err(PatternSemanticError::EmptyAfterTrimming.into());
    }
    if elements.iter().filter(|e| e.unbounded()).count() > 1 {
        return Err(PatternSemanticError::MultipleOpenRepetitions.into());
    }
    if elements.iter().filter(|e| e.is_required_point()).count() > 1 {
        return Err(PatternSemanticError::MultiplePoints.into());
    }
    Ok(elements)
}

fn classify_atom(tree: &PatternTree, atom: NodeId, quantifier: Option<(Quantifier, bool)>) -> Element {
    let mut set = DigitSet::empty();
    let mut has_point = false;
    let mut has_minus = false;
    let mut wildcard = false;
    let mut source = render_node(tree, atom);

    match tree.kind(atom) {
        NodeKind::SingleChar('-') => has_minus = true,
        NodeKind::SingleChar(c) => set.insert(*c as u8 - b'0'),
        NodeKind::EscapedChar('.') => has_point = true,
        NodeKind::EscapedChar('-') => has_minus = true,
        NodeKind::EscapedChar(c) => {
            // An escaped digit in the output would read as a backreference.
            set.insert(*c as u8 - b'0');
            source = c.to_string();
        }
        NodeKind::DigitClass => set = DigitSet::FULL,
        NodeKind::AnyDigit => {
            set = DigitSet::FULL;
            wildcard = true;
        }
        NodeKind::CharClass { negated } => {
            for &member in tree.children(atom) {
                match tree.kind(member) {
                    NodeKind::SingleChar('.') => has_point = true,
                    NodeKind::SingleChar('-') => has_minus = true,
                    NodeKind::SingleChar(c) => set.insert(*c as u8 - b'0'),
                    NodeKind::CharRange { start, end } => {
                        for d in (*start as u8 - b'0')..=(*end as u8 - b'0') {
                            set.insert(d);
                        }
                    }
                    _ => {}
                }
            }
            if *negated {
                set = DigitSet(DigitSet::FULL.0 & !set.0);
            }
        }
        _ => {}
    }

    Element {
        set,
        has_point,
        has_minus,
        wildcard,
        source,
        quantifier,
    }
}

// ---------------------------------------------------------------------------
// Sign handling
// ---------------------------------------------------------------------------

/// Splits a classified branch over the signs it can match. Only the first
/// element may carry a minus; an unbounded leading wildcard absorbs the sign
/// as part of "any prefix".
fn split_sign(elements: Vec<Element>) -> Result<Vec<(bool, Vec<Element>)>, PatternError> {
    let mut variants: Vec<(bool, Vec<Element>)> = Vec::new();
    let first = &elements[0];

    if first.is_bare_minus() {
        let rest = elements[1..].to_vec();
        match first.quantifier {
            None => variants.push((true, rest)),
            Some((Quantifier::Optional, _)) => {
                variants.push((true, rest.clone()));
                variants.push((false, rest));
            }
            Some(_) => return Err(PatternSemanticError::SignQuantifier.into()),
        }
    } else if first.has_minus {
        // A leading class containing '-' reads as the sign or as one of its
        // other members.
        let rest = elements[1..].to_vec();
        let mut reduced = first.clone();
        reduced.has_minus = false;
        reduced.source = class_text(reduced.set);
        let reduced_usable = !reduced.set.is_empty() || reduced.has_point;
        match first.quantifier {
            None => {
                variants.push((true, rest.clone()));
                if reduced_usable {
                    let mut with = vec![reduced];
                    with.extend(rest);
                    variants.push((false, with));
                }
            }
            Some((Quantifier::Optional, _)) => {
                variants.push((true, rest.clone()));
                if reduced_usable {
                    let mut with = vec![Element {
                        quantifier: None,
                        ..reduced
                    }];
                    with.extend(rest.clone());
                    variants.push((false, with));
                }
                variants.push((false, rest));
            }
            Some(_) => return Err(PatternSemanticError::SignQuantifier.into()),
        }
    } else if first.wildcard && first.unbounded() {
        // "-12..." is a prefix like any other; the minimum length shrinks by
        // the sign character on the negative side.
        let mut negative = elements.clone();
        if let Some((q, lazy)) = first.quantifier {
            let (min, _) = q.bounds();
            negative[0].quantifier = Some((
                Quantifier::Range {
                    min: min.saturating_sub(1),
                    max: None,
                },
                lazy,
            ));
        }
        variants.push((true, negative));
        variants.push((false, elements));
    } else {
        variants.push((false, elements));
    }

    for (_, body) in &variants {
        if body.iter().any(|e| e.has_minus) {
            return Err(PatternSemanticError::MisplacedMinus.into());
        }
    }
    Ok(variants)
}

// ---------------------------------------------------------------------------
// Concrete sequences
// ---------------------------------------------------------------------------

/// One mantissa position with a rendering. `count` folds a run of identical
/// mandatory positions into a single counted piece.
#[derive(Debug, Clone)]
struct Atom {
    set: DigitSet,
    source: String,
    count: u32,
}

impl Atom {
    fn new(set: DigitSet, source: String) -> Atom {
        Atom {
            set,
            source,
            count: 1,
        }
    }

    fn source_piece(&self) -> String {
        counted_text(&self.source, self.count)
    }
}

/// The single unbounded repetition a sequence may carry.
#[derive(Debug, Clone)]
struct OpenRun {
    /// `None` marks a written-form wildcard: any continuation, point
    /// included. A digit set extends the digit string only.
    set: Option<DigitSet>,
    source: String,
    min: u32,
    lazy: bool,
}

impl OpenRun {
    fn is_wildcard(&self) -> bool {
        self.set.is_none()
    }

    fn digit_set(&self) -> DigitSet {
        self.set.unwrap_or(DigitSet::FULL)
    }
}

#[derive(Debug, Clone)]
enum Item {
    Atom(Atom),
    Point,
    Open(OpenRun),
}

#[derive(Debug, Clone)]
struct Sequence {
    negative: bool,
    items: Vec<Item>,
}

/// Expands one signed element list into concrete sequences: bounded
/// quantifiers multiply out, point-capable classes fork into their point and
/// digit readings. Readings that stack two points, or atoms that can match
/// no digit at all, drop the affected sequence rather than the pattern.
fn expand_sequences(negative: bool, elements: &[Element]) -> Result<Vec<Sequence>, PatternError> {
    let mut builders: Vec<Vec<Item>> = vec![Vec::new()];
    for element in elements {
        if element.has_point {
            if element.quantifier.is_some() {
                return Err(PatternSemanticError::QuantifiedPoint.into());
            }
            let mut next = Vec::new();
            for builder in &builders {
                let mut with_point = builder.clone();
                with_point.push(Item::Point);
                next.push(with_point);
                if !element.set.is_empty() {
                    let mut with_digit = builder.clone();
                    with_digit.push(Item::Atom(Atom::new(element.set, class_text(element.set))));
                    next.push(with_digit);
                }
            }
            builders = next;
            continue;
        }
        if element.set.is_empty() {
            // A position that matches no digit: no reading of this branch
            // denotes a number.
            builders.clear();
            break;
        }
        match element.quantifier {
            None => {
                for builder in &mut builders {
                    builder.push(Item::Atom(Atom::new(element.set, element.source.clone())));
                }
            }
            Some((quantifier, lazy)) => {
                let (min, max) = quantifier.bounds();
                match max {
                    None => {
                        let open = OpenRun {
                            set: if element.wildcard {
                                None
                            } else {
                                Some(element.set)
                            },
                            source: element.source.clone(),
                            min,
                            lazy,
                        };
                        for builder in &mut builders {
                            builder.push(Item::Open(open.clone()));
                        }
                    }
                    Some(max) => {
                        let mut next = Vec::new();
                        for builder in &builders {
                            for k in min..=max {
                                let mut widened = builder.clone();
                                for _ in 0..k {
                                    widened.push(Item::Atom(Atom::new(
                                        element.set,
                                        element.source.clone(),
                                    )));
                                }
                                next.push(widened);
                            }
                        }
                        builders = next;
                    }
                }
            }
        }
    }

    let mut sequences = Vec::new();
    for items in builders {
        let points = items.iter().filter(|i| matches!(i, Item::Point)).count();
        if points > 1 {
            continue;
        }
        let digits = items
            .iter()
            .any(|i| matches!(i, Item::Atom(_) | Item::Open(_)));
        if !digits {
            continue;
        }
        sequences.push(Sequence { negative, items });
    }
    Ok(sequences)
}

// ---------------------------------------------------------------------------
// Per-branch rewrite
// ---------------------------------------------------------------------------

struct BranchOutcome {
    alternatives: Vec<String>,
    lossy: bool,
    zero: bool,
}

/// Full rewrite of one flat branch: sign split, sequence expansion, family
/// rendering, and the letter-class emission in value order.
fn rewrite_flat_branch(elements: Vec<Element>) -> Result<BranchOutcome, PatternError> {
    let mut negative_pool: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    let mut positive_pool: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    let mut lossy = false;
    let mut zero = false;
    let mut had_sequence = false;

    for (negative, body) in split_sign(elements)? {
        for sequence in expand_sequences(negative, &body)? {
            had_sequence = true;
            zero |= zero_capable(&sequence);
            let rendered = render_sequence(&sequence)?;
            lossy |= rendered.lossy;
            let pool = if negative {
                &mut negative_pool
            } else {
                &mut positive_pool
            };
            for (exponent, text) in rendered.families {
                let texts = pool.entry(exponent).or_default();
                if !texts.contains(&text) {
                    texts.push(text);
                }
            }
        }
    }

    if !had_sequence {
        return Err(PatternSemanticError::NoNumericValue.into());
    }

    let mut alternatives = emit_pool(true, &negative_pool);
    alternatives.extend(emit_pool(false, &positive_pool));
    if alternatives.is_empty() && !zero {
        return Err(PatternSemanticError::NoEncodableValue.into());
    }
    Ok(BranchOutcome {
        alternatives,
        lossy,
        zero,
    })
}

/// True when the sequence can match a written form consisting of zeros
/// only (optionally signed or pointed); such a form denotes the value zero,
/// whose encoding is the reserved sentinel.
fn zero_capable(sequence: &Sequence) -> bool {
    let mut has_digit = false;
    for item in &sequence.items {
        match item {
            Item::Point => {}
            Item::Atom(atom) => {
                if !atom.set.contains(0) {
                    return false;
                }
                has_digit = true;
            }
            Item::Open(open) => {
                let supplies = open.is_wildcard() || open.digit_set().contains(0);
                if open.min > 0 && !supplies {
                    return false;
                }
                if supplies {
                    has_digit = true;
                }
            }
        }
    }
    has_digit
}

struct RenderedSequence {
    families: Vec<(i32, String)>,
    lossy: bool,
}

fn render_sequence(sequence: &Sequence) -> Result<RenderedSequence, PatternError> {
    let items = &sequence.items;
    let negative = sequence.negative;
    let point_at = items.iter().position(|i| matches!(i, Item::Point));
    let open_at = items.iter().position(|i| matches!(i, Item::Open(_)));

    let atoms = |range: &[Item]| -> Vec<Atom> {
        range
            .iter()
            .filter_map(|i| match i {
                Item::Atom(a) => Some(a.clone()),
                _ => None,
            })
            .collect()
    };

    match open_at {
        None => {
            let (ints, fracs) = match point_at {
                Some(p) => (atoms(&items[..p]), atoms(&items[p + 1..])),
                None => (atoms(items), Vec::new()),
            };
            Ok(RenderedSequence {
                families: fixed_families(negative, &ints, &fracs),
                lossy: false,
            })
        }
        Some(o) => {
            let open = match &items[o] {
                Item::Open(open) => open.clone(),
                _ => unreachable!(),
            };
            match point_at {
                None => {
                    let prefix = atoms(&items[..o]);
                    let suffix = atoms(&items[o + 1..]);
                    if suffix.is_empty() {
                        Ok(trailing_integer_open(negative, prefix, &open))
                    } else {
                        Ok(interior_integer_open(negative, &prefix, &open, &suffix))
                    }
                }
                Some(p) if o < p => {
                    let pre = atoms(&items[..o]);
                    let mid = atoms(&items[o + 1..p]);
                    let fracs = atoms(&items[p + 1..]);
                    Ok(counted_point_families(negative, &pre, &open, &mid, &fracs))
                }
                Some(p) => {
                    let ints = atoms(&items[..p]);
                    let pre_fracs = atoms(&items[p + 1..o]);
                    let post_fracs = atoms(&items[o + 1..]);
                    Ok(fraction_open_families(
                        negative, &ints, &pre_fracs, &open, &post_fracs,
                    ))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Fixed shapes
// ---------------------------------------------------------------------------

fn total_count(atoms: &[Atom]) -> u32 {
    atoms.iter().map(|a| a.count).sum()
}

fn strip_leading_forced(atoms: &[Atom]) -> Vec<Atom> {
    let from = atoms
        .iter()
        .position(|a| !a.set.is_zero_only())
        .unwrap_or(atoms.len());
    atoms[from..].to_vec()
}

fn strip_trailing_forced(atoms: &[Atom]) -> Vec<Atom> {
    let to = atoms
        .iter()
        .rposition(|a| !a.set.is_zero_only())
        .map_or(0, |i| i + 1);
    atoms[..to].to_vec()
}

/// Exponent families of a branch with no open repetition. Redundant zeros in
/// the written form are tolerated: leading integer zeros, trailing
/// fractional zeros and a bare trailing point all denote the same value as
/// the trimmed spelling.
fn fixed_families(negative: bool, ints: &[Atom], fracs: &[Atom]) -> Vec<(i32, String)> {
    let fracs = strip_trailing_forced(fracs);
    if fracs.is_empty() {
        let ints = strip_leading_forced(ints);
        let length = total_count(&ints);
        if length == 0 {
            // Zeros only; the sentinel alternative covers the value.
            return Vec::new();
        }
        let exponent = length as i32 - 1;
        if exponent > MAX_EXPONENT {
            return Vec::new();
        }
        let mantissa = strip_trailing_forced(&ints);
        let text = if negative {
            join_variants(&negative_integer_variants(&mantissa))
        } else {
            positive_integer_text(&mantissa)
        };
        return vec![(exponent, text)];
    }

    let ints = strip_leading_forced(ints);
    let length = total_count(&ints);
    if length == 0 {
        return sub_one_families(negative, &fracs);
    }
    if length == 1 && ints[0].set.contains(0) {
        // A single integer digit that may be zero covers the sub-one reading
        // as well as the one-digit-integer reading.
        let narrowed = Atom::new(ints[0].set.without_zero(), class_text(ints[0].set.without_zero()));
        let mut families = sub_one_families(negative, &fracs);
        families.extend(mixed_family(negative, &[narrowed], &fracs));
        return families;
    }
    mixed_family(negative, &ints, &fracs)
}

/// One family for an integer-and-fraction shape. All written positions are
/// significant: canonical strings carry no trailing fractional zero, so the
/// mantissa always spans the whole shape.
fn mixed_family(negative: bool, ints: &[Atom], fracs: &[Atom]) -> Vec<(i32, String)> {
    let exponent = total_count(ints) as i32 - 1;
    if exponent > MAX_EXPONENT {
        return Vec::new();
    }
    if negative {
        let mut pieces: Vec<String> = Vec::new();
        for (index, atom) in ints.iter().enumerate() {
            let set = if index == 0 {
                atom.set.without_zero()
            } else {
                atom.set
            };
            pieces.push(counted_text(&class_text(set.complement_interior()), atom.count));
        }
        for (index, atom) in fracs.iter().enumerate() {
            if index + 1 == fracs.len() {
                let last = atom.set.complement_final();
                if last.is_empty() {
                    return Vec::new();
                }
                pieces.push(class_text(last));
            } else {
                pieces.push(counted_text(
                    &class_text(atom.set.complement_interior()),
                    atom.count,
                ));
            }
        }
        vec![(exponent, join_pieces(&pieces))]
    } else {
        let mut pieces: Vec<String> = Vec::new();
        for atom in ints.iter().chain(fracs.iter()) {
            pieces.push(atom.source_piece());
        }
        vec![(exponent, join_pieces(&pieces))]
    }
}

/// Families of a sub-one shape: one per count of leading fractional zeros.
/// The first significant class drops zero; the rest of the fraction is
/// mandatory.
fn sub_one_families(negative: bool, fracs: &[Atom]) -> Vec<(i32, String)> {
    let mut families = Vec::new();
    let mut exponent = -1i32;
    for (z, first) in fracs.iter().enumerate() {
        if exponent < MIN_EXPONENT {
            break;
        }
        // Positions before the first significant digit must admit zero.
        if fracs[..z].iter().any(|a| !a.set.contains(0)) {
            break;
        }
        if first.count > 1 {
            // Folded runs never appear in fractions of fixed shapes.
            break;
        }
        let significant = first.set.without_zero();
        if significant.is_empty() {
            exponent -= 1;
            continue;
        }
        let rest = &fracs[z + 1..];
        let text = if negative {
            let mut pieces = Vec::new();
            if rest.is_empty() {
                pieces.push(class_text(first.set.complement_final()));
            } else {
                pieces.push(class_text(significant.complement_interior()));
                for (index, atom) in rest.iter().enumerate() {
                    if index + 1 == rest.len() {
                        let last = atom.set.complement_final();
                        if last.is_empty() {
                            return families;
                        }
                        pieces.push(class_text(last));
                    } else {
                        pieces.push(counted_text(
                            &class_text(atom.set.complement_interior()),
                            atom.count,
                        ));
                    }
                }
            }
            join_pieces(&pieces)
        } else {
            let mut pieces = vec![class_text(significant)];
            for atom in rest {
                pieces.push(atom.source_piece());
            }
            join_pieces(&pieces)
        };
        families.push((exponent, text));
        exponent -= 1;
    }
    families
}

/// Mantissa pattern of a positive pure-integer shape. Trailing positions
/// that admit zero may fall off the mantissa, which nests them in optional
/// groups; everything up to the last zero-free position is mandatory.
fn positive_integer_text(atoms: &[Atom]) -> String {
    let mandatory = mandatory_prefix(atoms);
    let mut text = atoms[0].source_piece();
    for atom in &atoms[1..mandatory] {
        text.push_str(&atom.source_piece());
    }
    let mut depth = 0;
    for (offset, atom) in atoms[mandatory..].iter().enumerate() {
        text.push('(');
        if mandatory == 1 && offset == 0 {
            text.push_str("\\.");
        }
        text.push_str(&atom.source_piece());
        depth += 1;
    }
    for _ in 0..depth {
        text.push_str(")?");
    }
    insert_point(text, atoms, mandatory)
}

/// Index of the first position allowed to fall off the mantissa: everything
/// from the last zero-free position back to the front stays.
fn mandatory_prefix(atoms: &[Atom]) -> usize {
    atoms
        .iter()
        .rposition(|a| !a.set.contains(0))
        .map_or(1, |i| i + 1)
}

/// Places the encoded `\.` after the first digit of a mandatory prefix
/// rendered by [`positive_integer_text`].
fn insert_point(text: String, atoms: &[Atom], mandatory: usize) -> String {
    if mandatory < 2 && atoms.len() < 2 {
        return text;
    }
    if mandatory < 2 {
        // The point lives inside the first optional group already.
        return text;
    }
    let first = atoms[0].source_piece();
    let mut out = String::with_capacity(text.len() + 2);
    out.push_str(&first);
    out.push_str("\\.");
    out.push_str(&text[first.len()..]);
    out
}

/// Variant piece lists of a negative pure-integer shape, one per possible
/// mantissa length. Interior digits map through `9 - d`, the final digit
/// through `10 - d`.
fn negative_integer_variants(atoms: &[Atom]) -> Vec<Vec<String>> {
    let mandatory = mandatory_prefix(atoms);
    let mut variants = Vec::new();
    for n in mandatory..=atoms.len() {
        if atoms[n - 1].count > 1 {
            continue;
        }
        let final_set = atoms[n - 1].set.complement_final();
        if final_set.is_empty() {
            continue;
        }
        let mut pieces = Vec::new();
        for (index, atom) in atoms[..n - 1].iter().enumerate() {
            let set = if index == 0 {
                atom.set.without_zero()
            } else {
                atom.set
            };
            pieces.push(counted_text(&class_text(set.complement_interior()), atom.count));
        }
        if n == 1 {
            pieces.push(class_text(atoms[0].set.complement_final()));
        } else {
            pieces.push(class_text(final_set));
        }
        variants.push(pieces);
    }
    variants
}

// ---------------------------------------------------------------------------
// Open repetitions
// ---------------------------------------------------------------------------

/// An open repetition at the end of the branch with no point written before
/// it. A digit run here lets the integer part grow without bound; the
/// emitted letter range cannot pin mantissa length to the exponent, so the
/// digit case over-matches and is flagged lossy. The wildcard case stands
/// for any continuation and is exact.
fn trailing_integer_open(
    negative: bool,
    mut prefix: Vec<Atom>,
    open: &OpenRun,
) -> RenderedSequence {
    let mut min = open.min;
    if open.is_wildcard() {
        // The bounded minimum of a wildcard consumes digits.
        for _ in 0..min {
            prefix.push(Atom::new(DigitSet::FULL, "\\d".to_string()));
        }
        min = 0;
    }
    // Forced leading zeros never reach the mantissa.
    prefix = strip_leading_forced(&prefix);
    if prefix.is_empty() {
        let source = if open.is_wildcard() {
            "\\d".to_string()
        } else {
            open.source.clone()
        };
        prefix.push(Atom::new(open.digit_set(), source));
        min = min.saturating_sub(1);
    }

    let low = (total_count(&prefix) + min) as i32 - 1;
    if low > MAX_EXPONENT {
        return RenderedSequence {
            families: Vec::new(),
            lossy: false,
        };
    }

    let set = open.digit_set();
    let zero_run = !open.is_wildcard() && set.without_zero().is_empty();
    let mut families = Vec::new();
    let mut lossy = false;

    let text = if zero_run {
        // The run can only append zeros; every extension shares the prefix
        // mantissa. No stem means the branch matches zeros alone, which the
        // sentinel alternative covers.
        let stem = strip_trailing_forced(&prefix);
        if stem.is_empty() {
            return RenderedSequence {
                families: Vec::new(),
                lossy: false,
            };
        }
        if negative {
            join_variants(&negative_integer_variants(&stem))
        } else {
            positive_integer_text(&stem)
        }
    } else if negative {
        let zeroable = open.is_wildcard() || min == 0 || set.contains(0);
        let mut variants = if zeroable {
            negative_integer_variants(&prefix)
        } else {
            Vec::new()
        };
        if open.is_wildcard() {
            variants.push(negative_tail_variant(&prefix, "\\d*".to_string(), "[1-9]".to_string()));
        } else {
            let interior = run_text(
                &class_text(set.complement_interior()),
                min.saturating_sub(1),
                open.lazy,
            );
            variants.push(negative_tail_variant(
                &prefix,
                interior,
                class_text(set.complement_final()),
            ));
            lossy = true;
        }
        join_variants(&variants)
    } else if open.is_wildcard() {
        positive_open_text(&prefix, ".*", open.lazy, true)
    } else {
        lossy = true;
        let zeroable = min == 0 || set.contains(0);
        let tail = format!(
            "{}{}",
            run_text(
                &class_text(set),
                if zeroable { 0 } else { min.saturating_sub(1) },
                open.lazy
            ),
            class_text(set.without_zero())
        );
        positive_open_text(&prefix, &tail, false, zeroable)
    };

    for exponent in low.max(0)..=MAX_EXPONENT {
        families.push((exponent, text.clone()));
    }

    // A one-digit prefix that admits zero also reaches the sub-one range
    // when the continuation may carry the point.
    if open.is_wildcard() && total_count(&prefix) == 1 && prefix[0].set.contains(0) {
        let text = if negative {
            join_variants(&vec![
                vec!["[1-9]".to_string()],
                vec!["[0-8]".to_string(), "\\d*".to_string(), "[1-9]".to_string()],
            ])
        } else {
            format!("[1-9]\\.?.{}", if open.lazy { "*?" } else { "*" })
        };
        for exponent in MIN_EXPONENT..=-1 {
            families.push((exponent, text.clone()));
        }
    }

    RenderedSequence { families, lossy }
}

fn negative_tail_variant(prefix: &[Atom], interior_run: String, final_class: String) -> Vec<String> {
    let mut pieces = Vec::new();
    for (index, atom) in prefix.iter().enumerate() {
        let set = if index == 0 {
            atom.set.without_zero()
        } else {
            atom.set
        };
        pieces.push(counted_text(&class_text(set.complement_interior()), atom.count));
    }
    pieces.push(interior_run);
    pieces.push(final_class);
    pieces
}

/// Renders the mantissa of a positive prefix followed by an open tail. The
/// tail sits inside the deepest optional level when the mantissa may stop
/// early, directly after the prefix otherwise.
fn positive_open_text(atoms: &[Atom], tail: &str, lazy_tail: bool, optional: bool) -> String {
    let tail_text = if lazy_tail && tail == ".*" {
        ".*?".to_string()
    } else {
        tail.to_string()
    };
    let wildcard_tail = tail_text.starts_with(".*");
    let mandatory = if optional { mandatory_prefix(atoms) } else { atoms.len() };

    let mut text = atoms[0].source_piece();
    for atom in &atoms[1..mandatory] {
        text.push_str(&atom.source_piece());
    }
    let nested = &atoms[mandatory..];
    if nested.is_empty() {
        let mut out = insert_point(text, atoms, mandatory);
        if !optional {
            if atoms.len() == 1 {
                out.push_str("\\.");
            }
            out.push_str(&tail_text);
        } else if atoms.len() == 1 {
            if wildcard_tail {
                out.push_str("\\.?");
                out.push_str(&tail_text);
            } else {
                out.push_str(&format!("(\\.{})?", tail_text));
            }
        } else if wildcard_tail {
            out.push_str(&tail_text);
        } else {
            out.push_str(&format!("({})?", tail_text));
        }
        return out;
    }

    let mut depth = 0;
    for (offset, atom) in nested.iter().enumerate() {
        text.push('(');
        if mandatory == 1 && offset == 0 {
            text.push_str("\\.");
        }
        text.push_str(&atom.source_piece());
        depth += 1;
    }
    if wildcard_tail {
        text.push_str(&tail_text);
    } else {
        text.push_str(&format!("({})?", tail_text));
    }
    for _ in 0..depth {
        text.push_str(")?");
    }
    insert_point(text, atoms, mandatory)
}

/// An open repetition between integer digits, with more digit atoms after it
/// and no written point in between. Each reachable exponent pins the run
/// length, so the families enumerate per exponent. A wildcard run may also
/// carry the written point, which adds the fraction-bearing and sub-one
/// readings.
fn interior_integer_open(
    negative: bool,
    prefix: &[Atom],
    open: &OpenRun,
    suffix: &[Atom],
) -> RenderedSequence {
    // Forced leading zeros never reach the mantissa.
    let prefix = strip_leading_forced(prefix);
    let mut families = Vec::new();
    let mut lossy = false;
    let run_set = open.digit_set();
    let run_source = if open.is_wildcard() {
        "\\d".to_string()
    } else {
        open.source.clone()
    };
    let pre = total_count(&prefix);
    let suf = total_count(suffix);

    // Integer-only readings, one per run length.
    let min_k = if open.is_wildcard() { 0 } else { open.min };
    let compress = suffix.iter().any(|a| !a.set.contains(0));
    let mut k = min_k;
    while (pre + k + suf) as i32 - 1 <= MAX_EXPONENT {
        let mut atoms = prefix.clone();
        push_run(&mut atoms, run_set, &run_source, k, compress, prefix.is_empty());
        atoms.extend_from_slice(suffix);
        families.extend(fixed_families(negative, &atoms, &[]));
        k += 1;
    }

    if open.is_wildcard() {
        if open.min > 0 {
            // Exact minimum-length carving is not worth the output size;
            // the shorter readings stay in and the result over-matches.
            lossy = true;
        }
        families.extend(wildcard_point_readings(negative, &prefix, open, suffix));
        families.extend(wildcard_sub_one_readings(negative, &prefix, open, suffix));
    }

    RenderedSequence { families, lossy }
}

fn push_run(
    atoms: &mut Vec<Atom>,
    set: DigitSet,
    source: &str,
    count: u32,
    compress: bool,
    leading: bool,
) {
    if count == 0 {
        return;
    }
    let mut remaining = count;
    if leading {
        atoms.push(Atom::new(set, source.to_string()));
        remaining -= 1;
    }
    if remaining == 0 {
        return;
    }
    if compress {
        let mut folded = Atom::new(set, source.to_string());
        folded.count = remaining;
        atoms.push(folded);
    } else {
        for _ in 0..remaining {
            atoms.push(Atom::new(set, source.to_string()));
        }
    }
}

/// Fraction-bearing readings of an interior wildcard: the run carries the
/// point, so the suffix lands in the fraction and every written position
/// stays significant.
fn wildcard_point_readings(
    negative: bool,
    prefix: &[Atom],
    open: &OpenRun,
    suffix: &[Atom],
) -> Vec<(i32, String)> {
    let pre = total_count(prefix);
    let mut families = Vec::new();
    let low = if pre == 0 { 0 } else { pre as i32 - 1 };
    for exponent in low..=MAX_EXPONENT {
        let run_min = (exponent + 1 - pre.max(1) as i32).max(0) as u32;
        let text = if negative {
            let mut pieces = Vec::new();
            if prefix.is_empty() {
                pieces.push("[0-8]".to_string());
            } else {
                for (index, atom) in prefix.iter().enumerate() {
                    let set = if index == 0 {
                        atom.set.without_zero()
                    } else {
                        atom.set
                    };
                    pieces.push(counted_text(&class_text(set.complement_interior()), atom.count));
                }
            }
            pieces.push(run_text("\\d", run_min, open.lazy));
            for (index, atom) in suffix.iter().enumerate() {
                if index + 1 == suffix.len() {
                    let last = atom.set.complement_final();
                    if last.is_empty() {
                        return families;
                    }
                    pieces.push(class_text(last));
                } else {
                    pieces.push(counted_text(
                        &class_text(atom.set.complement_interior()),
                        atom.count,
                    ));
                }
            }
            join_pieces(&pieces)
        } else {
            let mut pieces = Vec::new();
            if prefix.is_empty() {
                pieces.push("\\d".to_string());
            } else {
                for atom in prefix {
                    pieces.push(atom.source_piece());
                }
            }
            pieces.push(run_text("\\d", run_min, open.lazy));
            for atom in suffix {
                pieces.push(atom.source_piece());
            }
            join_pieces(&pieces)
        };
        families.push((exponent, text));
    }
    families
}

/// Sub-one readings of an interior wildcard: the run supplies the `0.`
/// prefix and any count of leading fractional zeros, so every sub-one bin is
/// reachable and the mantissa pattern does not depend on the bin.
fn wildcard_sub_one_readings(
    negative: bool,
    prefix: &[Atom],
    open: &OpenRun,
    suffix: &[Atom],
) -> Vec<(i32, String)> {
    let reachable = prefix.is_empty() || (total_count(prefix) == 1 && prefix[0].set.contains(0));
    if !reachable {
        return Vec::new();
    }
    let mut texts: Vec<String> = Vec::new();

    // The whole fraction may be the suffix alone.
    if let Some(text) = suffix_only_text(negative, suffix) {
        texts.push(text);
    }

    // Or the first significant digit comes out of the run.
    if negative {
        let mut pieces = vec!["[0-8]".to_string(), run_text("\\d", 0, open.lazy)];
        for (index, atom) in suffix.iter().enumerate() {
            if index + 1 == suffix.len() {
                let last = atom.set.complement_final();
                if last.is_empty() {
                    pieces.clear();
                    break;
                }
                pieces.push(class_text(last));
            } else {
                pieces.push(counted_text(
                    &class_text(atom.set.complement_interior()),
                    atom.count,
                ));
            }
        }
        if !pieces.is_empty() {
            texts.push(join_pieces(&pieces));
        }
    } else {
        let mut pieces = vec!["[1-9]".to_string(), run_text("\\d", 0, open.lazy)];
        for atom in suffix {
            pieces.push(atom.source_piece());
        }
        texts.push(join_pieces(&pieces));
    }

    let mut families = Vec::new();
    for exponent in MIN_EXPONENT..=-1 {
        for text in &texts {
            families.push((exponent, text.clone()));
        }
    }
    families
}

/// An open repetition in the integer part with a written point later in the
/// branch. The run carries digits only, so each reachable exponent pins its
/// length and the families synthesize into fixed shapes.
fn counted_point_families(
    negative: bool,
    pre: &[Atom],
    open: &OpenRun,
    mid: &[Atom],
    fracs: &[Atom],
) -> RenderedSequence {
    let pre = strip_leading_forced(pre);
    let run_set = open.digit_set();
    let run_source = if open.is_wildcard() {
        "\\d".to_string()
    } else {
        open.source.clone()
    };
    let fixed = total_count(&pre) + total_count(mid);
    // The run may only fold into a counted piece when the mantissa is known
    // to extend past it; otherwise each length decomposes separately.
    let compress =
        mid.iter().any(|a| !a.set.contains(0)) || !strip_trailing_forced(fracs).is_empty();
    let mut families = Vec::new();
    let mut k = open.min;
    while (fixed + k) as i32 - 1 <= MAX_EXPONENT {
        let mut ints = pre.clone();
        push_run(&mut ints, run_set, &run_source, k, compress, pre.is_empty());
        ints.extend_from_slice(mid);
        families.extend(fixed_families(negative, &ints, fracs));
        k += 1;
    }
    RenderedSequence {
        families,
        lossy: false,
    }
}

/// An open repetition after the written point. The exponent is pinned by the
/// integer part (or runs through the sub-one bins), and the run extends the
/// mantissa text verbatim, so the rewrite is exact.
fn fraction_open_families(
    negative: bool,
    ints: &[Atom],
    pre_fracs: &[Atom],
    open: &OpenRun,
    post_fracs: &[Atom],
) -> RenderedSequence {
    let ints = strip_leading_forced(ints);
    let length = total_count(&ints);
    let mut families = Vec::new();

    if length == 0 {
        families.extend(sub_one_run_families(negative, pre_fracs, open, post_fracs));
    } else if length == 1 && ints[0].set.contains(0) {
        families.extend(sub_one_run_families(negative, pre_fracs, open, post_fracs));
        let narrowed = Atom::new(ints[0].set.without_zero(), class_text(ints[0].set.without_zero()));
        families.extend(integer_fraction_run_family(
            negative, &[narrowed], pre_fracs, open, post_fracs,
        ));
    } else {
        families.extend(integer_fraction_run_family(
            negative, &ints, pre_fracs, open, post_fracs,
        ));
    }
    RenderedSequence {
        families,
        lossy: false,
    }
}

/// Single family: nonzero integer part, then a fraction containing the run.
fn integer_fraction_run_family(
    negative: bool,
    ints: &[Atom],
    pre_fracs: &[Atom],
    open: &OpenRun,
    post_fracs: &[Atom],
) -> Vec<(i32, String)> {
    let exponent = total_count(ints) as i32 - 1;
    if exponent > MAX_EXPONENT {
        return Vec::new();
    }

    if !negative {
        let mut pieces: Vec<String> = ints.iter().map(|a| a.source_piece()).collect();
        for atom in pre_fracs {
            pieces.push(atom.source_piece());
        }
        let run = run_text(open_body(open), open.min, open.lazy);
        if post_fracs.is_empty() {
            if pre_fracs.is_empty() && ints.len() == 1 && ints[0].count == 1 {
                // The encoded point appears only when the run is nonempty.
                return vec![(exponent, format!("{}\\.?{}", pieces[0], run))];
            }
            pieces.push(run);
            return vec![(exponent, join_pieces(&pieces))];
        }
        pieces.push(run);
        for atom in post_fracs {
            pieces.push(atom.source_piece());
        }
        return vec![(exponent, join_pieces(&pieces))];
    }

    let interior_ints: Vec<String> = ints
        .iter()
        .enumerate()
        .map(|(index, atom)| {
            let set = if index == 0 {
                atom.set.without_zero()
            } else {
                atom.set
            };
            counted_text(&class_text(set.complement_interior()), atom.count)
        })
        .collect();

    if !post_fracs.is_empty() {
        // The written form always ends at the last fixed position.
        let mut pieces = interior_ints;
        for atom in pre_fracs {
            pieces.push(counted_text(
                &class_text(atom.set.complement_interior()),
                atom.count,
            ));
        }
        pieces.push(run_text(
            &class_text(open.digit_set().complement_interior()),
            open.min,
            open.lazy,
        ));
        for (index, atom) in post_fracs.iter().enumerate() {
            if index + 1 == post_fracs.len() {
                let last = atom.set.complement_final();
                if last.is_empty() {
                    return Vec::new();
                }
                pieces.push(class_text(last));
            } else {
                pieces.push(counted_text(
                    &class_text(atom.set.complement_interior()),
                    atom.count,
                ));
            }
        }
        return vec![(exponent, join_pieces(&pieces))];
    }

    // Tail run: the mantissa ends at the last written digit, wherever the
    // run stops.
    let set = open.digit_set();
    let mut variants: Vec<Vec<String>> = Vec::new();
    if open.min == 0 {
        if pre_fracs.is_empty() {
            variants.extend(negative_integer_variants(ints));
        } else {
            let mut pieces = interior_ints.clone();
            for (index, atom) in pre_fracs.iter().enumerate() {
                if index + 1 == pre_fracs.len() {
                    let last = atom.set.complement_final();
                    if last.is_empty() {
                        pieces.clear();
                        break;
                    }
                    pieces.push(class_text(last));
                } else {
                    pieces.push(counted_text(
                        &class_text(atom.set.complement_interior()),
                        atom.count,
                    ));
                }
            }
            if !pieces.is_empty() {
                variants.push(pieces);
            }
        }
    }
    let final_class = if open.is_wildcard() {
        "[1-9]".to_string()
    } else {
        class_text(set.complement_final())
    };
    if !final_class.is_empty() && !set.without_zero().is_empty() {
        let mut pieces = interior_ints;
        for atom in pre_fracs {
            pieces.push(counted_text(
                &class_text(atom.set.complement_interior()),
                atom.count,
            ));
        }
        pieces.push(run_text(
            &class_text(set.complement_interior()),
            open.min.saturating_sub(1),
            open.lazy,
        ));
        pieces.push(final_class);
        variants.push(pieces);
    }
    if variants.is_empty() {
        return Vec::new();
    }
    vec![(exponent, join_variants(&variants))]
}

/// Sub-one families where the fraction contains the run. The run can supply
/// leading zeros, the first significant digit, or both, so the bins walk
/// down from the written prefix to the table floor.
fn sub_one_run_families(
    negative: bool,
    pre_fracs: &[Atom],
    open: &OpenRun,
    post_fracs: &[Atom],
) -> Vec<(i32, String)> {
    let mut families = Vec::new();

    // First significant digit inside the written prefix: the run is still
    // ahead and renders whole.
    for (z, first) in pre_fracs.iter().enumerate() {
        let exponent = -(z as i32) - 1;
        if exponent < MIN_EXPONENT {
            return families;
        }
        if pre_fracs[..z].iter().any(|a| !a.set.contains(0)) {
            return families;
        }
        let significant = first.set.without_zero();
        if significant.is_empty() {
            continue;
        }
        let rest = &pre_fracs[z + 1..];
        if let Some(text) =
            sub_one_run_text(negative, significant, first.set, rest, open, open.min, post_fracs)
        {
            families.push((exponent, text));
        }
    }

    // First significant digit supplied by the run, after some run zeros.
    if pre_fracs.iter().all(|a| a.set.contains(0)) {
        let set = open.digit_set();
        let can_sig = open.is_wildcard() || !set.without_zero().is_empty();
        let can_zero = open.is_wildcard() || set.contains(0);
        if can_sig {
            let base = pre_fracs.len() as i32;
            let mut extra = 0u32;
            loop {
                let exponent = -base - (extra as i32) - 1;
                if exponent < MIN_EXPONENT {
                    break;
                }
                if extra > 0 && !can_zero {
                    break;
                }
                let remaining = open.min.saturating_sub(extra + 1);
                if let Some(text) = run_significant_text(negative, open, remaining, post_fracs) {
                    families.push((exponent, text));
                }
                extra += 1;
            }
        }

        // Or the run contributes zeros only (or nothing at all) and the
        // first significant digit sits in the written suffix. The text does
        // not depend on the zero count; the emitter collapses the bins into
        // a letter class.
        if !post_fracs.is_empty() && (open.min == 0 || can_zero) {
            if let Some(text) = suffix_only_text(negative, post_fracs) {
                let base = pre_fracs.len() as i32;
                let mut extra = open.min;
                loop {
                    let exponent = -base - (extra as i32) - 1;
                    if exponent < MIN_EXPONENT {
                        break;
                    }
                    families.push((exponent, text.clone()));
                    if !can_zero {
                        break;
                    }
                    extra += 1;
                }
            }
        }
    }
    families
}

/// Mantissa text of a sub-one reading whose whole fraction is a fixed
/// written suffix, first position narrowed to its significant digits.
fn suffix_only_text(negative: bool, suffix: &[Atom]) -> Option<String> {
    let significant = suffix[0].set.without_zero();
    if significant.is_empty() {
        return None;
    }
    if !negative {
        let mut pieces = vec![class_text(significant)];
        for atom in &suffix[1..] {
            pieces.push(atom.source_piece());
        }
        return Some(join_pieces(&pieces));
    }
    if suffix.len() == 1 {
        return Some(class_text(suffix[0].set.complement_final()));
    }
    let mut pieces = vec![class_text(significant.complement_interior())];
    for (index, atom) in suffix[1..].iter().enumerate() {
        if index + 2 == suffix.len() {
            let last = atom.set.complement_final();
            if last.is_empty() {
                return None;
            }
            pieces.push(class_text(last));
        } else {
            pieces.push(counted_text(
                &class_text(atom.set.complement_interior()),
                atom.count,
            ));
        }
    }
    Some(join_pieces(&pieces))
}

/// Text of a sub-one family whose first significant digit is a written
/// atom, with the run still to come. Returns `None` when the complement
/// maps leave nothing to match.
fn sub_one_run_text(
    negative: bool,
    significant: DigitSet,
    first_full: DigitSet,
    rest: &[Atom],
    open: &OpenRun,
    run_min: u32,
    post_fracs: &[Atom],
) -> Option<String> {
    if !negative {
        let mut pieces = vec![class_text(significant)];
        for atom in rest {
            pieces.push(atom.source_piece());
        }
        if post_fracs.is_empty() && rest.is_empty() {
            let run = run_text(open_body(open), run_min, open.lazy);
            if run_min == 0 {
                return Some(format!("{}\\.?{}", pieces[0], run));
            }
            return Some(format!("{}\\.{}", pieces[0], run));
        }
        pieces.push(run_text(open_body(open), run_min, open.lazy));
        for atom in post_fracs {
            pieces.push(atom.source_piece());
        }
        return Some(join_pieces(&pieces));
    }

    let set = open.digit_set();
    if post_fracs.is_empty() {
        // Tail run behind the first significant digit.
        let mut variants: Vec<Vec<String>> = Vec::new();
        if run_min == 0 && rest.is_empty() {
            variants.push(vec![class_text(first_full.complement_final())]);
        } else if run_min == 0 && !rest.is_empty() {
            let mut pieces = vec![class_text(significant.complement_interior())];
            let mut ok = true;
            for (index, atom) in rest.iter().enumerate() {
                if index + 1 == rest.len() {
                    let last = atom.set.complement_final();
                    if last.is_empty() {
                        ok = false;
                        break;
                    }
                    pieces.push(class_text(last));
                } else {
                    pieces.push(counted_text(
                        &class_text(atom.set.complement_interior()),
                        atom.count,
                    ));
                }
            }
            if ok {
                variants.push(pieces);
            }
        }
        let final_class = if open.is_wildcard() {
            "[1-9]".to_string()
        } else if set.without_zero().is_empty() {
            String::new()
        } else {
            class_text(set.complement_final())
        };
        if !final_class.is_empty() {
            let mut pieces = vec![class_text(significant.complement_interior())];
            for atom in rest {
                pieces.push(counted_text(
                    &class_text(atom.set.complement_interior()),
                    atom.count,
                ));
            }
            pieces.push(run_text(
                &class_text(set.complement_interior()),
                run_min.saturating_sub(1),
                open.lazy,
            ));
            pieces.push(final_class);
            variants.push(pieces);
        }
        if variants.is_empty() {
            return None;
        }
        return Some(join_variants(&variants));
    }

    // Fixed written suffix after the run: the mantissa always runs to it.
    let mut pieces = vec![class_text(significant.complement_interior())];
    for atom in rest {
        pieces.push(counted_text(
            &class_text(atom.set.complement_interior()),
            atom.count,
        ));
    }
    pieces.push(run_text(
        &class_text(set.complement_interior()),
        run_min,
        open.lazy,
    ));
    for (index, atom) in post_fracs.iter().enumerate() {
        if index + 1 == post_fracs.len() {
            let last = atom.set.complement_final();
            if last.is_empty() {
                return None;
            }
            pieces.push(class_text(last));
        } else {
            pieces.push(counted_text(
                &class_text(atom.set.complement_interior()),
                atom.count,
            ));
        }
    }
    Some(join_pieces(&pieces))
}

/// Text of a sub-one family whose first significant digit comes from the
/// run itself.
fn run_significant_text(
    negative: bool,
    open: &OpenRun,
    remaining_min: u32,
    post_fracs: &[Atom],
) -> Option<String> {
    let set = open.digit_set();
    let significant = if open.is_wildcard() {
        DigitSet::FULL.without_zero()
    } else {
        set.without_zero()
    };
    if significant.is_empty() {
        return None;
    }

    if !negative {
        let first = class_text(significant);
        let run = run_text(open_body(open), remaining_min, open.lazy);
        if post_fracs.is_empty() {
            if remaining_min == 0 {
                return Some(format!("{}\\.?{}", first, run));
            }
            return Some(format!("{}\\.{}", first, run));
        }
        let mut pieces = vec![first, run];
        for atom in post_fracs {
            pieces.push(atom.source_piece());
        }
        return Some(join_pieces(&pieces));
    }

    if post_fracs.is_empty() {
        let mut variants: Vec<Vec<String>> = Vec::new();
        if remaining_min == 0 {
            variants.push(vec![class_text(if open.is_wildcard() {
                DigitSet::FULL.complement_final()
            } else {
                set.complement_final()
            })]);
        }
        let final_class = if open.is_wildcard() {
            "[1-9]".to_string()
        } else if set.without_zero().is_empty() {
            String::new()
        } else {
            class_text(set.complement_final())
        };
        if !final_class.is_empty() {
            variants.push(vec![
                class_text(significant.complement_interior()),
                run_text(
                    &class_text(set.complement_interior()),
                    remaining_min.saturating_sub(1),
                    open.lazy,
                ),
                final_class,
            ]);
        }
        if variants.is_empty() {
            return None;
        }
        return Some(join_variants(&variants));
    }

    let mut pieces = vec![
        class_text(significant.complement_interior()),
        run_text(&class_text(set.complement_interior()), remaining_min, open.lazy),
    ];
    for (index, atom) in post_fracs.iter().enumerate() {
        if index + 1 == post_fracs.len() {
            let last = atom.set.complement_final();
            if last.is_empty() {
                return None;
            }
            pieces.push(class_text(last));
        } else {
            pieces.push(counted_text(
                &class_text(atom.set.complement_interior()),
                atom.count,
            ));
        }
    }
    Some(join_pieces(&pieces))
}

fn open_body(open: &OpenRun) -> &str {
    if open.is_wildcard() {
        "."
    } else {
        open.source.as_str()
    }
}

// ---------------------------------------------------------------------------
// Text assembly
// ---------------------------------------------------------------------------

/// Joins mantissa pieces, placing the encoded `\.` after the first digit.
fn join_pieces(pieces: &[String]) -> String {
    let mut out = pieces[0].clone();
    if pieces.len() > 1 {
        out.push_str("\\.");
        for piece in &pieces[1..] {
            out.push_str(piece);
        }
    }
    out
}

/// Joins variant piece lists into one fragment. A common prefix is factored
/// out when every variant shares it and keeps a nonempty remainder;
/// otherwise the variants join flat inside plain parentheses.
fn join_variants(variants: &[Vec<String>]) -> String {
    let variants: Vec<&Vec<String>> = variants.iter().filter(|v| !v.is_empty()).collect();
    if variants.is_empty() {
        return String::new();
    }
    if variants.len() == 1 {
        return join_pieces(variants[0]);
    }

    let mut shared = 0;
    'outer: loop {
        if variants.iter().any(|v| v.len() <= shared + 1) {
            break;
        }
        let candidate = &variants[0][shared];
        for variant in &variants[1..] {
            if &variant[shared] != candidate {
                break 'outer;
            }
        }
        shared += 1;
    }

    if shared == 0 {
        let joined: Vec<String> = variants.iter().map(|v| join_pieces(v)).collect();
        return format!("({})", joined.join("|"));
    }

    let prefix: Vec<String> = variants[0][..shared].to_vec();
    let mut out = join_pieces(&prefix);
    if shared == 1 {
        out.push_str("\\.");
    }
    let tails: Vec<String> = variants
        .iter()
        .map(|v| v[shared..].concat())
        .collect();
    out.push('(');
    out.push_str(&tails.join("|"));
    out.push(')');
    out
}

/// Character-class text for a digit set: `\d` when full, the bare digit when
/// single, bracketed ranges otherwise.
fn class_text(set: DigitSet) -> String {
    if set.is_full() {
        return "\\d".to_string();
    }
    let digits: Vec<u8> = set.digits().collect();
    if digits.len() == 1 {
        return ((b'0' + digits[0]) as char).to_string();
    }
    let mut out = String::from("[");
    let mut index = 0;
    while index < digits.len() {
        let start = digits[index];
        let mut end = start;
        while index + 1 < digits.len() && digits[index + 1] == end + 1 {
            index += 1;
            end = digits[index];
        }
        if end - start >= 2 {
            out.push((b'0' + start) as char);
            out.push('-');
            out.push((b'0' + end) as char);
        } else {
            for d in start..=end {
                out.push((b'0' + d) as char);
            }
        }
        index += 1;
    }
    out.push(']');
    out
}

/// Class text for a run of bin letters. Consecutive table entries are
/// consecutive in ASCII except across the case seam, which simply yields two
/// ranges in one class.
fn letter_class(letters: &[char]) -> String {
    if letters.len() == 1 {
        return letters[0].to_string();
    }
    let mut out = String::from("[");
    let mut index = 0;
    while index < letters.len() {
        let start = letters[index] as u8;
        let mut end = start;
        while index + 1 < letters.len() && letters[index + 1] as u8 == end + 1 {
            index += 1;
            end = letters[index] as u8;
        }
        if end - start >= 2 {
            out.push(start as char);
            out.push('-');
            out.push(end as char);
        } else {
            for c in start..=end {
                out.push(c as char);
            }
        }
        index += 1;
    }
    out.push(']');
    out
}

fn run_text(body: &str, min: u32, lazy: bool) -> String {
    let quantifier = match min {
        0 => "*".to_string(),
        1 => "+".to_string(),
        n => format!("{{{},}}", n),
    };
    format!("{}{}{}", body, quantifier, if lazy { "?" } else { "" })
}

fn counted_text(body: &str, count: u32) -> String {
    match count {
        0 => String::new(),
        1 => body.to_string(),
        n => format!("{}{{{}}}", body, n),
    }
}

// ---------------------------------------------------------------------------
// Family emission
// ---------------------------------------------------------------------------

/// Formats one pool of (exponent, mantissa) families as alternatives.
/// Consecutive exponents sharing the same mantissa texts collapse into a
/// letter class. Negative pools emit largest magnitude first, so the whole
/// output reads in value order.
fn emit_pool(negative: bool, pool: &BTreeMap<i32, Vec<String>>) -> Vec<String> {
    let entries: Vec<(i32, &Vec<String>)> = pool.iter().map(|(e, v)| (*e, v)).collect();
    let mut groups: Vec<(Vec<i32>, &Vec<String>)> = Vec::new();
    for (exponent, texts) in entries {
        match groups.last_mut() {
            Some((exponents, present))
                if *present == texts && exponents.last() == Some(&(exponent - 1)) =>
            {
                exponents.push(exponent);
            }
            _ => groups.push((vec![exponent], texts)),
        }
    }
    if negative {
        groups.reverse();
    }

    let sign = if negative { "\\!" } else { "\\+" };
    let mut out = Vec::new();
    for (exponents, texts) in groups {
        let mut letters: Vec<char> = exponents
            .iter()
            .filter_map(|&e| tables().letter(e, negative))
            .collect();
        if negative {
            letters.reverse();
        }
        if letters.is_empty() {
            continue;
        }
        let class = letter_class(&letters);
        for text in texts {
            out.push(format!("{}{}E{}", sign, class, text));
        }
    }
    out
}
