use std::sync::Arc;
use std::time::Duration;

use folio::application::services::{ContentStructurer, FALLBACK_TOPIC, Segmenter};

use crate::helpers::{FakeGenerator, fast_policy};

fn structurer(generator: Arc<FakeGenerator>) -> ContentStructurer {
    ContentStructurer::new(generator, Segmenter::default(), 4)
}

#[tokio::test(start_paused = true)]
async fn given_variable_latency_when_structuring_then_units_follow_reading_order() {
    let generator = Arc::new(FakeGenerator::new("Biology").with_latency(|segment| {
        let index: u64 = segment
            .trim_start_matches("Paragraph ")
            .trim_end_matches('.')
            .parse()
            .unwrap_or(0);
        Duration::from_millis(300 - index * 40)
    }));
    let text = (0..6)
        .map(|i| format!("Paragraph {i}."))
        .collect::<Vec<_>>()
        .join("\n\n");

    let structured = structurer(generator).structure(&text, None, fast_policy()).await;

    let contents: Vec<&str> = structured.units.iter().map(|u| u.content()).collect();
    let expected: Vec<String> = (0..6).map(|i| format!("Notes: Paragraph {i}.")).collect();
    assert_eq!(contents, expected);
    assert_eq!(structured.report.segments, 6);
    assert_eq!(structured.report.emitted, 6);
}

#[tokio::test]
async fn given_trivial_segment_when_generator_returns_nothing_then_unit_is_dropped() {
    let generator = Arc::new(FakeGenerator::new("Biology").empty_for("Page 7"));

    let structured = structurer(generator)
        .structure("Cells are the unit of life.\n\nPage 7", None, fast_policy())
        .await;

    assert_eq!(structured.units.len(), 1);
    assert_eq!(structured.report.empty, 1);
    assert_eq!(structured.report.failed, 0);
}

#[tokio::test]
async fn given_failing_segment_when_structuring_then_retried_once_and_skipped() {
    let generator = Arc::new(FakeGenerator::new("Biology").failing_for("broken"));

    let structured = structurer(generator.clone())
        .structure(
            "Mitochondria make energy.\n\nThis one is broken.\n\nRibosomes make proteins.",
            None,
            fast_policy(),
        )
        .await;

    let contents: Vec<&str> = structured.units.iter().map(|u| u.content()).collect();
    assert_eq!(
        contents,
        vec![
            "Notes: Mitochondria make energy.",
            "Notes: Ribosomes make proteins."
        ]
    );
    assert_eq!(structured.report.failed, 1);
    assert_eq!(generator.call_count(), 4);
}

#[tokio::test]
async fn given_blank_generated_topic_when_structuring_then_falls_back_to_hint() {
    let generator = Arc::new(FakeGenerator::new(""));

    let structured = structurer(generator)
        .structure("Fractions have numerators.", Some("  Arithmetic "), fast_policy())
        .await;

    assert_eq!(structured.units[0].topic(), "Arithmetic");
}

#[tokio::test]
async fn given_blank_generated_topic_and_no_hint_when_structuring_then_uses_general_content() {
    let generator = Arc::new(FakeGenerator::new("   "));

    let structured = structurer(generator)
        .structure("Fractions have numerators.", None, fast_policy())
        .await;

    assert_eq!(structured.units[0].topic(), FALLBACK_TOPIC);
}

#[tokio::test]
async fn given_heading_segment_when_generator_gives_no_subtopic_then_heading_is_used() {
    let generator = Arc::new(FakeGenerator::new("Algebra"));

    let structured = structurer(generator)
        .structure(
            "Chapter 2 Linear Equations\nA linear equation has degree one.",
            None,
            fast_policy(),
        )
        .await;

    assert_eq!(structured.units.len(), 1);
    assert_eq!(structured.units[0].subtopic(), "Chapter 2 Linear Equations");
}

#[tokio::test]
async fn given_plain_segment_when_generator_gives_no_subtopic_then_subtopic_is_empty() {
    let generator = Arc::new(FakeGenerator::new("Algebra"));

    let structured = structurer(generator)
        .structure("Variables stand for numbers.", None, fast_policy())
        .await;

    assert_eq!(structured.units[0].subtopic(), "");
}

#[tokio::test]
async fn given_empty_text_when_structuring_then_no_calls_and_no_units() {
    let generator = Arc::new(FakeGenerator::new("Algebra"));

    let structured = structurer(generator.clone())
        .structure("   \n\n ", None, fast_policy())
        .await;

    assert!(structured.units.is_empty());
    assert_eq!(structured.report.segments, 0);
    assert_eq!(generator.call_count(), 0);
}
