use std::sync::Arc;

use folio::application::services::{FormulaNormalizer, find_formula_spans};

use crate::helpers::{FakeFormulaConverter, fast_policy};

#[tokio::test]
async fn given_text_without_formulas_when_normalizing_then_text_is_unchanged() {
    let converter = Arc::new(FakeFormulaConverter::new());
    let normalizer = FormulaNormalizer::new(converter.clone(), 4);
    let text = "Plain prose with no maths, only words and well-known phrases.\n\n  Indented line.";

    let normalized = normalizer.normalize(text, fast_policy()).await;

    assert_eq!(normalized.text, text);
    assert_eq!(normalized.converted, 0);
    assert_eq!(normalized.failed, 0);
    assert_eq!(converter.call_count(), 0);
}

#[tokio::test]
async fn given_one_span_timing_out_when_normalizing_then_other_span_is_replaced() {
    let converter = Arc::new(FakeFormulaConverter::new().timing_out_on("y ="));
    let normalizer = FormulaNormalizer::new(converter.clone(), 4);

    let normalized = normalizer
        .normalize("Solve x^2 + 1 = 0 and y = 3x - 2 today.", fast_policy())
        .await;

    assert_eq!(normalized.text, "Solve $x^2+1=0$ and y = 3x - 2 today.");
    assert_eq!(normalized.converted, 1);
    assert_eq!(normalized.failed, 1);
    // The timed-out span is retried once.
    assert_eq!(converter.call_count(), 3);
}

#[tokio::test]
async fn given_repeated_span_when_normalizing_then_converted_once_and_replaced_everywhere() {
    let converter = Arc::new(FakeFormulaConverter::new());
    let normalizer = FormulaNormalizer::new(converter.clone(), 4);

    let normalized = normalizer
        .normalize("First x^2 + 1 = 0, then x^2 + 1 = 0 again.", fast_policy())
        .await;

    assert_eq!(normalized.text, "First $x^2+1=0$, then $x^2+1=0$ again.");
    assert_eq!(normalized.converted, 2);
    assert_eq!(converter.call_count(), 1);
}

#[tokio::test]
async fn given_formula_span_when_normalizing_then_surrounding_bytes_are_stable() {
    let converter = Arc::new(FakeFormulaConverter::new());
    let normalizer = FormulaNormalizer::new(converter, 2);
    let prefix = "Line one.\n\n   The area is ";
    let suffix = " , measured   twice.\n";
    let text = format!("{prefix}r^2{suffix}");

    let normalized = normalizer.normalize(&text, fast_policy()).await;

    assert!(normalized.text.starts_with(prefix));
    assert!(normalized.text.ends_with(suffix));
    assert_eq!(normalized.text, format!("{prefix}$r^2${suffix}"));
}

#[test]
fn given_mixed_text_when_finding_spans_then_returns_formula_ranges_in_order() {
    let text = "The area is A = pi r^2 and the sum is 1/2 + 1/3.";

    let spans: Vec<&str> = find_formula_spans(text)
        .into_iter()
        .map(|range| &text[range])
        .collect();

    assert_eq!(spans, vec!["A = pi", "r^2", "1/2 + 1/3"]);
}

#[test]
fn given_hyphenated_words_and_ranges_when_finding_spans_then_none_match() {
    assert!(find_formula_spans("Read pages 10-12 of the well-known book, and/or skim it.").is_empty());
}

fn spans_of(text: &str) -> Vec<&str> {
    find_formula_spans(text)
        .into_iter()
        .map(|range| &text[range])
        .collect()
}

#[test]
fn given_parenthesized_operand_when_finding_spans_then_equation_is_one_span() {
    assert_eq!(spans_of("x = (a + b) / 2"), vec!["x = (a + b) / 2"]);
}

#[test]
fn given_nested_parentheses_when_finding_spans_then_whole_equation_is_one_span() {
    let text = "Quadratic Formula: x = (-b ± √(b^2 - 4ac)) / 2a";

    assert_eq!(spans_of(text), vec!["x = (-b ± √(b^2 - 4ac)) / 2a"]);
}

#[test]
fn given_parenthetical_prose_when_finding_spans_then_none_match() {
    assert!(spans_of("Plain prose with no maths (only words) and well-known phrases.").is_empty());
}
