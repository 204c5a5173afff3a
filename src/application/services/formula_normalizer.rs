use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::application::ports::FormulaConverter;

use super::fan_out::fan_out_ordered;
use super::resilience::{CallPolicy, call_with_retry};

/// Parenthesized group, one nesting level deep, e.g. `(-b ± √(b^2 - 4ac))`.
const GROUP: &str = r"\([^()\n]{0,40}(?:\([^()\n]{0,40}\))?[^()\n]{0,40}\)";
const ATOM: &str = r"\\[A-Za-z]+|[A-Za-z0-9]+(?:\.[0-9]+)?|\.\.\.|[√∑∫∏∞∂πθαβγδελμσφωΔΣΠΩ]";
const SCRIPTS: &str = r"(?:[_^](?:\{[^{}\n]{1,24}\}|[A-Za-z0-9]+))*[⁰¹²³⁴⁵⁶⁷⁸⁹₀₁₂₃₄₅₆₇₈₉]*";
const OPERATOR: &str = r"[ \t]*(?:<=|>=|!=|[=+\-*/<>≤≥≠±×÷·])[ \t]*";

/// Operands joined by operators. An operand is an atom or a group, with an
/// optional call argument and scripts.
static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    let term = format!(r"[-+]?(?:{ATOM}|{GROUP})(?:{GROUP})?{SCRIPTS}");
    Regex::new(&format!("{term}(?:{OPERATOR}{term})*")).unwrap()
});

static GREEK_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:alpha|beta|gamma|delta|epsilon|theta|lambda|mu|pi|sigma|phi|omega)\b")
        .unwrap()
});

const STRONG_MARKERS: &str = "=<>^_\\≤≥≠±√∑∫∏∞∂≈⁰¹²³⁴⁵⁶⁷⁸⁹₀₁₂₃₄₅₆₇₈₉";
const ARITHMETIC: &str = "+*/×÷·";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText {
    pub text: String,
    pub converted: usize,
    pub failed: usize,
}

/// Replaces formula-like spans with canonical markup, leaving every other
/// byte of the text untouched.
pub struct FormulaNormalizer {
    converter: Arc<dyn FormulaConverter>,
    max_in_flight: usize,
}

impl FormulaNormalizer {
    pub fn new(converter: Arc<dyn FormulaConverter>, max_in_flight: usize) -> Self {
        Self {
            converter,
            max_in_flight,
        }
    }

    #[tracing::instrument(skip(self, text, policy), fields(chars = text.len()))]
    pub async fn normalize(&self, text: &str, policy: CallPolicy) -> NormalizedText {
        let spans = find_formula_spans(text);
        if spans.is_empty() {
            return NormalizedText {
                text: text.to_string(),
                ..NormalizedText::default()
            };
        }

        let mut distinct: Vec<&str> = Vec::new();
        for span in &spans {
            let candidate = &text[span.clone()];
            if !distinct.contains(&candidate) {
                distinct.push(candidate);
            }
        }

        let converted = fan_out_ordered(distinct.clone(), self.max_in_flight, |_, span| {
            self.convert_span(span, policy)
        })
        .await;

        let markup: HashMap<&str, Option<String>> = distinct.into_iter().zip(converted).collect();

        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;
        let mut result = NormalizedText::default();
        for span in spans {
            output.push_str(&text[cursor..span.start]);
            let raw = &text[span.clone()];
            match markup.get(raw) {
                Some(Some(replacement)) => {
                    output.push_str(replacement);
                    result.converted += 1;
                }
                _ => {
                    output.push_str(raw);
                    result.failed += 1;
                }
            }
            cursor = span.end;
        }
        output.push_str(&text[cursor..]);

        tracing::debug!(
            converted = result.converted,
            failed = result.failed,
            "Formula normalization complete"
        );

        result.text = output;
        result
    }

    async fn convert_span(&self, span: &str, policy: CallPolicy) -> Option<String> {
        match call_with_retry("formula_convert", policy, || self.converter.convert(span)).await {
            Ok(markup) => Some(markup),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    span_chars = span.len(),
                    "Formula conversion failed, keeping raw text"
                );
                None
            }
        }
    }
}

/// Byte ranges of formula-like spans, in text order and non-overlapping.
pub fn find_formula_spans(text: &str) -> Vec<Range<usize>> {
    CANDIDATE
        .find_iter(text)
        .filter(|m| looks_like_formula(m.as_str()))
        .map(|m| m.range())
        .collect()
}

fn looks_like_formula(span: &str) -> bool {
    if span.chars().any(|c| STRONG_MARKERS.contains(c)) {
        return true;
    }
    if GREEK_NAME.is_match(span) {
        return true;
    }
    has_simple_arithmetic(span)
}

/// An arithmetic operator with a bare number or single letter on either side,
/// e.g. `1/2` or `a * b`, but not `and/or`.
fn has_simple_arithmetic(span: &str) -> bool {
    if !span.chars().any(|c| ARITHMETIC.contains(c)) {
        return false;
    }
    span.split(|c: char| ARITHMETIC.contains(c) || c.is_whitespace())
        .filter(|operand| !operand.is_empty())
        .any(|operand| {
            operand.chars().all(|c| c.is_ascii_digit() || c == '.')
                || (operand.chars().count() == 1 && operand.chars().all(char::is_alphabetic))
        })
}
