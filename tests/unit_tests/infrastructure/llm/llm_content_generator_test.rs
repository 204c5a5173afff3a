use folio::application::ports::{CapabilityError, GenerationError};
use folio::infrastructure::llm::{ChatError, generation_error, parse_generated_content};
use reqwest::StatusCode;

#[test]
fn given_bare_json_when_parsing_then_fields_are_trimmed() {
    let reply = r#"{"topic":" Algebra ","subtopic":" Linear equations ","content":" Solve for x. "}"#;

    let generated = parse_generated_content(reply).unwrap();

    assert_eq!(generated.topic, "Algebra");
    assert_eq!(generated.subtopic.as_deref(), Some("Linear equations"));
    assert_eq!(generated.content, "Solve for x.");
}

#[test]
fn given_fenced_json_when_parsing_then_fence_is_stripped() {
    let reply = "```json\n{\"topic\":\"Biology\",\"subtopic\":\"Cells\",\"content\":\"Cells divide.\"}\n```";

    let generated = parse_generated_content(reply).unwrap();

    assert_eq!(generated.topic, "Biology");
    assert_eq!(generated.content, "Cells divide.");
}

#[test]
fn given_json_inside_prose_when_parsing_then_embedded_object_is_used() {
    let reply = "Sure! Here is the note:\n{\"topic\":\"Physics\",\"content\":\"F = ma\"}\nHope it helps.";

    let generated = parse_generated_content(reply).unwrap();

    assert_eq!(generated.topic, "Physics");
    assert_eq!(generated.subtopic, None);
    assert_eq!(generated.content, "F = ma");
}

#[test]
fn given_json_array_when_parsing_then_first_element_wins() {
    let reply = r#"[{"topic":"History","subtopic":"","content":"First"},{"topic":"History","content":"Second"}]"#;

    let generated = parse_generated_content(reply).unwrap();

    assert_eq!(generated.content, "First");
    assert_eq!(generated.subtopic, None);
}

#[test]
fn given_blank_content_when_parsing_then_empty_result() {
    let reply = r#"{"topic":"History","content":"   "}"#;
    assert!(matches!(
        parse_generated_content(reply),
        Err(GenerationError::EmptyResult)
    ));
}

#[test]
fn given_plain_prose_when_parsing_then_empty_result() {
    assert!(matches!(
        parse_generated_content("I cannot help with that."),
        Err(GenerationError::EmptyResult)
    ));
    assert!(matches!(parse_generated_content("[]"), Err(GenerationError::EmptyResult)));
}

#[test]
fn given_rejected_request_when_mapping_then_permanent_empty_result() {
    let error = generation_error(ChatError::Rejected(StatusCode::BAD_REQUEST));

    assert!(matches!(error, GenerationError::EmptyResult));
    assert!(!error.is_transient());
}

#[test]
fn given_unreadable_reply_when_mapping_then_permanent_empty_result() {
    let error = generation_error(ChatError::InvalidResponse("expected value".to_string()));

    assert!(matches!(error, GenerationError::EmptyResult));
    assert!(!error.is_transient());
}

#[test]
fn given_outage_or_timeout_when_mapping_then_transient() {
    let outage = generation_error(ChatError::Unavailable("HTTP 503".to_string()));
    let timeout = generation_error(ChatError::Timeout);

    assert!(matches!(outage, GenerationError::CapabilityUnavailable(_)));
    assert!(outage.is_transient());
    assert!(matches!(timeout, GenerationError::Timeout));
    assert!(timeout.is_transient());
}
