// tests/transform_tests.rs

use lexidec::transform::{
    normalize_pattern, normalize_pattern_detailed, normalize_pattern_with, NormalizedPattern,
    TransformOptions,
};
use lexidec::validate::{PatternError, PatternSemanticError, PatternSyntaxError};

fn rewrite(pattern: &str) -> String {
    match normalize_pattern(pattern) {
        Ok(out) => out,
        Err(e) => panic!("rewrite of {:?} failed: {}", pattern, e),
    }
}

fn rewrite_err(pattern: &str) -> PatternError {
    match normalize_pattern_detailed(pattern) {
        Ok(out) => panic!("rewrite of {:?} unexpectedly produced {:?}", pattern, out.pattern),
        Err(e) => e,
    }
}

fn is_lossy(pattern: &str) -> bool {
    normalize_pattern_detailed(pattern).unwrap().lossy
}

fn alternatives(pattern: &str) -> Vec<String> {
    rewrite(pattern).split('|').map(str::to_string).collect()
}

// ============================================================================
// Fixed Integers
// ============================================================================

#[test]
fn test_literal_integer() {
    assert_eq!(rewrite("123"), r"\+cE1\.23");
}

#[test]
fn test_single_digit() {
    assert_eq!(rewrite("5"), r"\+aE5");
}

#[test]
fn test_digit_class() {
    assert_eq!(rewrite(r"\d"), r"\+aE\d|\+AE0");
}

#[test]
fn test_two_digit_classes() {
    assert_eq!(rewrite(r"\d\d"), r"\+bE\d(\.\d)?|\+AE0");
}

#[test]
fn test_three_digit_classes() {
    assert_eq!(rewrite(r"\d\d\d"), r"\+cE\d(\.\d(\d)?)?|\+AE0");
}

#[test]
fn test_fixed_digit_then_class() {
    assert_eq!(rewrite(r"1\d"), r"\+bE1(\.\d)?");
}

#[test]
fn test_class_then_fixed_digit() {
    assert_eq!(rewrite(r"\d5"), r"\+bE\d\.5");
}

#[test]
fn test_wildcard_single() {
    assert_eq!(rewrite("."), r"\+aE.|\+AE0");
}

// ============================================================================
// Negative Integers
// ============================================================================

#[test]
fn test_negative_literal() {
    assert_eq!(rewrite("-123"), r"\!XE8\.77");
}

#[test]
fn test_negative_two_digit_classes() {
    assert_eq!(rewrite(r"-\d\d"), r"\!YE([1-9]|[0-8]\.[1-9])|\+AE0");
}

#[test]
fn test_optional_sign_digit() {
    assert_eq!(rewrite("-?5"), r"\!ZE5|\+aE5");
}

#[test]
fn test_optional_sign_class() {
    assert_eq!(rewrite(r"-?\d"), r"\!ZE[1-9]|\+aE\d|\+AE0");
}

// ============================================================================
// Zero Spellings
// ============================================================================

#[test]
fn test_zero_literal() {
    assert_eq!(rewrite("0"), r"\+AE0");
}

#[test]
fn test_negative_zero() {
    assert_eq!(rewrite("-0"), r"\+AE0");
}

#[test]
fn test_doubled_zero() {
    assert_eq!(rewrite("00"), r"\+AE0");
}

#[test]
fn test_zero_point_zero() {
    assert_eq!(rewrite(r"0\.0"), r"\+AE0");
}

#[test]
fn test_optional_sign_zero() {
    assert_eq!(rewrite("-?0"), r"\+AE0");
}

#[test]
fn test_zero_run() {
    assert_eq!(rewrite("0*"), r"\+AE0");
}

#[test]
fn test_all_zero_wide_repeat() {
    // Every digit may be zero, so only the sentinel survives the exponent cap.
    assert_eq!(rewrite(r"\d{27}"), r"\+AE0");
}

#[test]
fn test_zero_alternative() {
    assert_eq!(rewrite("0|5"), r"\+aE5|\+AE0");
}

// ============================================================================
// Character Classes
// ============================================================================

#[test]
fn test_class_with_zero() {
    assert_eq!(rewrite("[05]"), r"\+aE[05]|\+AE0");
}

#[test]
fn test_two_classes_with_zero() {
    assert_eq!(rewrite("[05][05]"), r"\+bE[05](\.[05])?|\+AE0");
}

#[test]
fn test_class_range() {
    assert_eq!(rewrite("[1-3]"), r"\+aE[1-3]");
}

#[test]
fn test_full_range_keeps_written_form() {
    assert_eq!(rewrite("[0-9]"), r"\+aE[0-9]|\+AE0");
}

#[test]
fn test_negated_class() {
    assert_eq!(rewrite("[^0-5]"), r"\+aE[^0-5]");
}

#[test]
fn test_negative_negated_class() {
    assert_eq!(rewrite("-[^0-5]"), r"\!ZE[1-4]");
}

#[test]
fn test_negative_class_with_zero() {
    assert_eq!(rewrite("-[05]"), r"\!ZE5|\+AE0");
}

#[test]
fn test_point_class_alone() {
    assert_eq!(rewrite("[.5]"), r"\+aE5");
}

#[test]
fn test_point_class_after_digit() {
    assert_eq!(rewrite("1[.5]"), r"\+aE1|\+bE1\.5");
}

#[test]
fn test_minus_class_leading() {
    assert_eq!(rewrite("[-1]2"), r"\!ZE8|\+bE1\.2");
}

#[test]
fn test_minus_class_optional() {
    assert_eq!(rewrite("[-1]?2"), r"\!ZE8|\+aE2|\+bE1\.2");
}

// ============================================================================
// Fractions and Sub-one Shapes
// ============================================================================

#[test]
fn test_sub_one_fraction() {
    assert_eq!(rewrite(r"0\.5"), r"\+ZE5");
}

#[test]
fn test_bare_point_fraction() {
    assert_eq!(rewrite(r"\.5"), r"\+ZE5");
}

#[test]
fn test_sub_one_second_place() {
    assert_eq!(rewrite(r"0\.05"), r"\+YE5");
}

#[test]
fn test_negative_sub_one() {
    assert_eq!(rewrite(r"-0\.5"), r"\!aE5");
}

#[test]
fn test_forced_trailing_zero_folds() {
    assert_eq!(rewrite(r"-1\.0"), r"\!ZE9");
    assert_eq!(rewrite(r"0\.50"), rewrite(r"0\.5"));
}

#[test]
fn test_class_point_class() {
    assert_eq!(rewrite(r"\d\.\d"), r"\+ZE[1-9]|\+aE[1-9]\.\d|\+AE0");
}

#[test]
fn test_negative_class_point_class() {
    assert_eq!(rewrite(r"-\d\.\d"), r"\!ZE[0-8]\.[1-9]|\!aE[1-9]|\+AE0");
}

#[test]
fn test_range_point_range() {
    assert_eq!(rewrite(r"[2-4]\.[2-4]"), r"\+aE[2-4]\.[2-4]");
}

#[test]
fn test_negative_range_point_range() {
    assert_eq!(rewrite(r"-[2-4]\.[2-4]"), r"\!ZE[5-7]\.[6-8]");
}

// ============================================================================
// Bounded Quantifiers
// ============================================================================

#[test]
fn test_exact_repeat_matches_expansion() {
    assert_eq!(rewrite(r"\d{2}"), rewrite(r"\d\d"));
}

#[test]
fn test_wildcard_exact_repeat() {
    assert_eq!(rewrite(".{2}"), r"\+bE.(\..)?|\+AE0");
}

#[test]
fn test_fixed_digit_repeat() {
    assert_eq!(rewrite("5{3}"), r"\+cE5\.55");
}

#[test]
fn test_repeat_range() {
    assert_eq!(rewrite("5{2,3}"), r"\+bE5\.5|\+cE5\.55");
}

#[test]
fn test_class_repeat_range() {
    assert_eq!(
        rewrite(r"\d{1,5}"),
        r"\+aE\d|\+bE\d(\.\d)?|\+cE\d(\.\d(\d)?)?|\+dE\d(\.\d(\d(\d)?)?)?|\+eE\d(\.\d(\d(\d(\d)?)?)?)?|\+AE0"
    );
}

#[test]
fn test_widest_exact_repeat() {
    let out = rewrite(r"\d{26}");
    assert!(out.starts_with(r"\+zE\d(\.\d"));
    assert!(out.ends_with(r"|\+AE0"));
    assert_eq!(out.split('|').count(), 2);
}

// ============================================================================
// Open Integer Tails
// ============================================================================

#[test]
fn test_open_class_run() {
    assert_eq!(rewrite(r"\d*"), r"\+[a-z]E\d(\.\d*[1-9])?|\+AE0");
}

#[test]
fn test_open_class_run_plus() {
    assert_eq!(rewrite(r"\d+"), r"\+[a-z]E\d(\.\d*[1-9])?|\+AE0");
}

#[test]
fn test_stem_then_open_run() {
    assert_eq!(rewrite(r"1\d*"), r"\+[a-z]E1(\.\d*[1-9])?");
}

#[test]
fn test_long_stem_then_open_run() {
    assert_eq!(rewrite(r"12\d*"), r"\+[b-z]E1\.2(\d*[1-9])?");
}

#[test]
fn test_stem_with_zero_then_open_run() {
    assert_eq!(rewrite(r"10\d*"), r"\+[b-z]E1(\.0(\d*[1-9])?)?");
}

#[test]
fn test_zero_only_run() {
    assert_eq!(rewrite("50*"), r"\+[a-z]E5");
}

#[test]
fn test_negative_zero_only_run() {
    assert_eq!(rewrite("-50*"), r"\![A-Z]E5");
}

#[test]
fn test_negative_stem_then_open_run() {
    assert_eq!(rewrite(r"-12\d*"), r"\![A-Y]E8\.(8|7\d*[1-9])");
}

#[test]
fn test_negative_trailing_wildcard() {
    assert_eq!(rewrite("-111.*"), r"\![A-X]E8\.8(9|8\d*[1-9])");
}

#[test]
fn test_trailing_wildcard_plus() {
    assert_eq!(rewrite("1.+"), r"\+[b-z]E1(\.\d.*)?");
}

#[test]
fn test_bare_wildcard_run() {
    assert_eq!(
        rewrite(".*"),
        r"\![A-Za-z]E([1-9]|[0-8]\.\d*[1-9])|\+[A-Z]E[1-9]\.?.*|\+[a-z]E\d\.?.*|\+AE0"
    );
}

// ============================================================================
// Interior and Fraction Runs
// ============================================================================

#[test]
fn test_interior_class_run() {
    let alts = alternatives(r"1\d*7");
    assert_eq!(alts.len(), 25);
    assert_eq!(alts[0], r"\+bE1\.7");
    assert_eq!(alts[1], r"\+cE1\.\d7");
    assert_eq!(alts[2], r"\+dE1\.\d{2}7");
    assert_eq!(alts[24], r"\+zE1\.\d{24}7");
    assert!(!is_lossy(r"1\d*7"));
}

#[test]
fn test_interior_wildcard_run() {
    let alts = alternatives("1.*7");
    assert_eq!(alts.len(), 51);
    assert_eq!(alts[0], r"\+aE1\.\d*7");
    assert_eq!(alts[1], r"\+bE1\.7");
    assert_eq!(alts[2], r"\+bE1\.\d+7");
    assert_eq!(alts[3], r"\+cE1\.\d7");
    assert_eq!(alts[4], r"\+cE1\.\d{2,}7");
}

#[test]
fn test_interior_wildcard_min_matches_star() {
    assert_eq!(rewrite("1.+7"), rewrite("1.*7"));
}

#[test]
fn test_fraction_tail_run() {
    assert_eq!(rewrite(r"1\.5\d*"), r"\+aE1\.5\d*");
}

#[test]
fn test_fraction_tail_run_lazy() {
    assert_eq!(rewrite(r"1\.5\d*?"), r"\+aE1\.5\d*?");
}

#[test]
fn test_fraction_interior_run() {
    assert_eq!(rewrite(r"1\.\d*5"), r"\+aE1\.\d*5");
}

#[test]
fn test_sub_one_interior_run() {
    assert_eq!(rewrite(r"0\.\d*5"), r"\+[A-Z]E[1-9]\.\d*5|\+[A-Z]E5");
}

#[test]
fn test_run_before_counted_point() {
    let alts = alternatives(r"\d*\.5");
    assert_eq!(alts.len(), 27);
    assert_eq!(alts[0], r"\+ZE5");
    assert_eq!(alts[1], r"\+aE[1-9]\.5");
    assert_eq!(alts[2], r"\+bE\d\.\d5");
    assert_eq!(alts[3], r"\+cE\d\.\d{2}5");
    assert_eq!(alts[26], r"\+zE\d\.\d{25}5");
    assert!(!is_lossy(r"\d*\.5"));
}

// ============================================================================
// Alternation, Groups, and Anchors
// ============================================================================

#[test]
fn test_group_alternation() {
    assert_eq!(rewrite("(1|2)3"), r"\+bE1\.3|\+bE2\.3");
}

#[test]
fn test_plain_group_is_transparent() {
    assert_eq!(rewrite("(12)3"), rewrite("123"));
}

#[test]
fn test_mid_branch_group() {
    assert_eq!(rewrite("1(2|3)4"), r"\+cE1\.24|\+cE1\.34");
}

#[test]
fn test_two_groups_distribute() {
    assert_eq!(rewrite("(1|2)(3|4)"), r"\+bE1\.3|\+bE1\.4|\+bE2\.3|\+bE2\.4");
}

#[test]
fn test_group_with_empty_alternative() {
    assert_eq!(rewrite("(5|)7"), r"\+aE7|\+bE5\.7");
}

#[test]
fn test_anchors_are_dropped() {
    assert_eq!(rewrite("^123$"), rewrite("123"));
}

#[test]
fn test_top_level_alternation_pools() {
    assert_eq!(rewrite(r"\d|5"), r"\+aE\d|\+aE5|\+AE0");
}

#[test]
fn test_sign_alternation_matches_optional_sign() {
    assert_eq!(rewrite("-5|5"), rewrite("-?5"));
}

// ============================================================================
// Lossiness Verdicts
// ============================================================================

#[test]
fn test_fixed_shapes_are_exact() {
    assert_eq!(
        normalize_pattern_detailed(r"\d\d").unwrap(),
        NormalizedPattern {
            pattern: r"\+bE\d(\.\d)?|\+AE0".to_string(),
            lossy: false,
        }
    );
}

#[test]
fn test_open_integer_tail_is_lossy() {
    assert!(is_lossy(r"\d*"));
    assert!(is_lossy(r"1\d*"));
    assert!(is_lossy(r"12\d*"));
}

#[test]
fn test_zero_only_run_is_exact() {
    assert!(!is_lossy("50*"));
    assert!(!is_lossy("-50*"));
}

#[test]
fn test_trailing_wildcard_is_exact() {
    assert!(!is_lossy(".*"));
    assert!(!is_lossy("1.+"));
    assert!(!is_lossy("-111.*"));
}

#[test]
fn test_interior_wildcard_min_is_lossy() {
    assert!(!is_lossy("1.*7"));
    assert!(is_lossy("1.+7"));
}

#[test]
fn test_fraction_runs_are_exact() {
    assert!(!is_lossy(r"1\.5\d*"));
    assert!(!is_lossy(r"0\.\d*5"));
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_options_default_allows_groups() {
    assert!(TransformOptions::default().allow_groups);
}

#[test]
fn test_strict_mode_rejects_groups() {
    let options = TransformOptions { allow_groups: false };
    assert_eq!(
        normalize_pattern_with("(1|2)3", &options).unwrap_err(),
        PatternError::Semantic(PatternSemanticError::UnsupportedGroup)
    );
}

#[test]
fn test_strict_mode_passes_plain_patterns() {
    let options = TransformOptions { allow_groups: false };
    let out = normalize_pattern_with("123", &options).unwrap();
    assert_eq!(out.pattern, r"\+cE1\.23");
    assert!(!out.lossy);
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_rejects_empty_pattern() {
    assert_eq!(
        rewrite_err(""),
        PatternError::Semantic(PatternSemanticError::EmptyPattern)
    );
}

#[test]
fn test_rejects_uncompilable_pattern() {
    assert!(matches!(
        rewrite_err("123[]"),
        PatternError::Syntax(PatternSyntaxError::Uncompilable(_))
    ));
}

#[test]
fn test_rejects_nested_group() {
    assert_eq!(
        rewrite_err("(34(343|34))"),
        PatternError::Semantic(PatternSemanticError::NestedGroup)
    );
}

#[test]
fn test_rejects_empty_group() {
    assert_eq!(
        rewrite_err("()"),
        PatternError::Semantic(PatternSemanticError::EmptyGroup)
    );
}

#[test]
fn test_rejects_group_quantifier() {
    assert_eq!(
        rewrite_err("(1|2)*"),
        PatternError::Semantic(PatternSemanticError::GroupQuantifier)
    );
}

#[test]
fn test_rejects_sign_quantifier() {
    assert_eq!(
        rewrite_err("-*5"),
        PatternError::Semantic(PatternSemanticError::SignQuantifier)
    );
}

#[test]
fn test_rejects_misplaced_minus() {
    assert_eq!(
        rewrite_err("1-2"),
        PatternError::Semantic(PatternSemanticError::MisplacedMinus)
    );
    assert_eq!(
        rewrite_err("--5"),
        PatternError::Semantic(PatternSemanticError::MisplacedMinus)
    );
}

#[test]
fn test_rejects_multiple_points() {
    assert_eq!(
        rewrite_err(r"1\.2\.3"),
        PatternError::Semantic(PatternSemanticError::MultiplePoints)
    );
}

#[test]
fn test_rejects_quantified_point() {
    assert_eq!(
        rewrite_err(r"1\.?2"),
        PatternError::Semantic(PatternSemanticError::QuantifiedPoint)
    );
}

#[test]
fn test_rejects_two_open_runs() {
    assert_eq!(
        rewrite_err(r"\d*\d*"),
        PatternError::Semantic(PatternSemanticError::MultipleOpenRepetitions)
    );
}

#[test]
fn test_rejects_large_repeat_bound() {
    assert_eq!(
        rewrite_err(r"\d{65}"),
        PatternError::Semantic(PatternSemanticError::RepeatBoundTooLarge(65))
    );
    assert_eq!(
        rewrite_err(r"\d{2,70}"),
        PatternError::Semantic(PatternSemanticError::RepeatBoundTooLarge(70))
    );
}

#[test]
fn test_rejects_excessive_expansion() {
    let pattern = "(1|2|3|4)".repeat(5);
    assert_eq!(
        rewrite_err(&pattern),
        PatternError::Semantic(PatternSemanticError::TooManyAlternatives(1024))
    );
}

#[test]
fn test_rejects_pattern_trimmed_to_nothing() {
    assert_eq!(
        rewrite_err("5{0}"),
        PatternError::Semantic(PatternSemanticError::EmptyAfterTrimming)
    );
}

#[test]
fn test_rejects_patterns_without_value() {
    assert_eq!(
        rewrite_err(r"\."),
        PatternError::Semantic(PatternSemanticError::NoNumericValue)
    );
    assert_eq!(
        rewrite_err("-"),
        PatternError::Semantic(PatternSemanticError::NoNumericValue)
    );
    assert_eq!(
        rewrite_err("5|"),
        PatternError::Semantic(PatternSemanticError::NoNumericValue)
    );
}

#[test]
fn test_rejects_values_beyond_exponent_range() {
    assert_eq!(
        rewrite_err(r"1\d{26}"),
        PatternError::Semantic(PatternSemanticError::NoEncodableValue)
    );
    assert_eq!(
        rewrite_err("[1-9]{27}"),
        PatternError::Semantic(PatternSemanticError::NoEncodableValue)
    );
}

#[test]
fn test_rejects_stray_anchor() {
    assert_eq!(
        rewrite_err("1^2"),
        PatternError::Semantic(PatternSemanticError::StrayAnchor)
    );
}

#[test]
fn test_rejects_negated_point() {
    assert_eq!(
        rewrite_err("[^.1]"),
        PatternError::Semantic(PatternSemanticError::NegatedClassMember('.'))
    );
}

#[test]
fn test_rejects_whitespace() {
    assert_eq!(
        rewrite_err("1 2"),
        PatternError::Semantic(PatternSemanticError::Whitespace)
    );
}

#[test]
fn test_rejects_letters() {
    assert_eq!(
        rewrite_err("1a"),
        PatternError::Semantic(PatternSemanticError::DisallowedLetter('a'))
    );
}

#[test]
fn test_limit_error_messages() {
    assert_eq!(
        rewrite_err(r"\d{65}").to_string(),
        "Unsupported pattern: repetition bound 65 exceeds the supported maximum of 64"
    );
    assert_eq!(
        rewrite_err(&"(1|2|3|4)".repeat(5)).to_string(),
        "Unsupported pattern: pattern expands to 1024 alternatives, more than the supported maximum of 512"
    );
}
