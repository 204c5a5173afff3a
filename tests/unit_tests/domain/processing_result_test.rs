use std::time::Duration;

use folio::domain::{
    ContentBreakdown, ContentUnit, GENERATION_UNAVAILABLE_MESSAGE, NO_CONTENT_MESSAGE,
    ProcessingResult, ProcessingStats,
};

fn unit(content: &str) -> ContentUnit {
    ContentUnit::new("Algebra", "", content).unwrap()
}

#[test]
fn given_items_when_succeeded_then_total_items_matches() {
    let result = ProcessingResult::succeeded(
        "raw".to_string(),
        vec![unit("a"), unit("b")],
        Some("Math".to_string()),
        Duration::from_millis(1500),
        ContentBreakdown::default(),
        ProcessingStats::default(),
    );

    assert!(result.success());
    assert_eq!(result.total_items(), 2);
    assert_eq!(result.total_items(), result.content_items().len());
    assert_eq!(result.error(), None);
    assert_eq!(result.topic(), Some("Math"));
    assert_eq!(result.processing_time(), Duration::from_millis(1500));
}

#[test]
fn given_no_items_when_succeeded_then_becomes_no_content_failure() {
    let result = ProcessingResult::succeeded(
        String::new(),
        Vec::new(),
        None,
        Duration::from_millis(10),
        ContentBreakdown::default(),
        ProcessingStats::default(),
    );

    assert!(!result.success());
    assert!(result.content_items().is_empty());
    assert_eq!(result.total_items(), 0);
    assert_eq!(result.error(), Some(NO_CONTENT_MESSAGE));
}

#[test]
fn given_no_items_after_failed_segments_when_succeeded_then_reports_generation_outage() {
    let stats = ProcessingStats {
        segments: 2,
        segments_failed: 2,
        ..ProcessingStats::default()
    };

    let result = ProcessingResult::succeeded(
        "Some extracted text".to_string(),
        Vec::new(),
        None,
        Duration::from_millis(10),
        ContentBreakdown::default(),
        stats,
    );

    assert!(!result.success());
    assert_eq!(result.error(), Some(GENERATION_UNAVAILABLE_MESSAGE));
    assert_eq!(result.stats().segments_failed, 2);
    assert_eq!(result.original_text(), "Some extracted text");
}

#[test]
fn given_failure_when_built_then_carries_error_and_no_items() {
    let result = ProcessingResult::failed("bad input", String::new(), None);

    assert!(!result.success());
    assert!(result.content_items().is_empty());
    assert_eq!(result.error(), Some("bad input"));
}

#[test]
fn given_result_when_serialized_then_durations_are_seconds() {
    let stats = ProcessingStats {
        total_time: Duration::from_millis(2500),
        ..ProcessingStats::default()
    };
    let result = ProcessingResult::succeeded(
        "raw".to_string(),
        vec![unit("a")],
        None,
        Duration::from_millis(500),
        ContentBreakdown::default(),
        stats,
    );

    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["processing_time"], 0.5);
    assert_eq!(json["stats"]["total_time"], 2.5);
    assert_eq!(json["total_items"], 1);
    assert_eq!(json["content_items"][0]["topic"], "Algebra");
    assert!(json["processed_at"].is_string());
}
