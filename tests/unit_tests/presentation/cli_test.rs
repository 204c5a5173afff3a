use std::path::Path;
use std::time::Duration;

use clap::Parser;
use folio::domain::{ContentBreakdown, ContentUnit, MediaType, ProcessingResult, ProcessingStats};
use folio::presentation::{Cli, CliError, MediaTypeArg, load_document, render_output, resolve_media_type};

fn one_unit_result() -> ProcessingResult {
    ProcessingResult::succeeded(
        "Cells divide.".to_string(),
        vec![ContentUnit::new("Biology", "Cells", "Cells divide by mitosis.").unwrap()],
        Some("Biology".to_string()),
        Duration::from_millis(1500),
        ContentBreakdown::default(),
        ProcessingStats::default(),
    )
}

#[test]
fn given_arguments_when_parsing_then_flags_are_set() {
    let cli = Cli::try_parse_from([
        "folio",
        "notes.bin",
        "--topic",
        "Algebra",
        "--media-type",
        "pdf",
        "--items-only",
    ])
    .unwrap();

    assert_eq!(cli.input, Path::new("notes.bin"));
    assert_eq!(cli.topic.as_deref(), Some("Algebra"));
    assert_eq!(cli.media_type, Some(MediaTypeArg::Pdf));
    assert!(cli.items_only);
    assert!(!cli.compact);
}

#[test]
fn given_missing_input_when_parsing_then_error() {
    assert!(Cli::try_parse_from(["folio"]).is_err());
}

#[test]
fn given_explicit_type_when_resolving_then_it_wins() {
    let resolved = resolve_media_type(Some(MediaTypeArg::Image), Path::new("scan.pdf"), b"%PDF-1.4");
    assert_eq!(resolved, Some(MediaType::Image));
}

#[test]
fn given_known_extension_when_resolving_then_extension_is_used() {
    assert_eq!(
        resolve_media_type(None, Path::new("dir/Board.JPG"), b""),
        Some(MediaType::Image)
    );
    assert_eq!(
        resolve_media_type(None, Path::new("notes.pdf"), b""),
        Some(MediaType::Pdf)
    );
}

#[test]
fn given_unknown_extension_when_resolving_then_magic_bytes_decide() {
    assert_eq!(
        resolve_media_type(None, Path::new("upload.bin"), b"%PDF-1.7\n"),
        Some(MediaType::Pdf)
    );
    assert_eq!(resolve_media_type(None, Path::new("upload.bin"), b"hello"), None);
}

#[tokio::test]
async fn given_missing_file_when_loading_then_read_error_names_path() {
    let path = Path::new("/nonexistent/folio/notes.pdf");

    let error = load_document(path, None).await.unwrap_err();

    assert!(matches!(&error, CliError::Read { path: p, .. } if p == path));
    assert!(error.to_string().contains("notes.pdf"));
}

#[tokio::test]
async fn given_file_on_disk_when_loading_then_document_has_name_and_type() {
    let path = std::env::temp_dir().join(format!("folio-{}.dat", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, b"%PDF-1.5\n%%EOF").await.unwrap();

    let loaded = load_document(&path, None).await;
    let _ = tokio::fs::remove_file(&path).await;

    let document = loaded.unwrap();
    assert_eq!(document.media_type, MediaType::Pdf);
    assert!(document.filename.starts_with("folio-"));
    assert_eq!(document.size_bytes(), 14);
}

#[tokio::test]
async fn given_unrecognizable_file_when_loading_then_unknown_media_type() {
    let path = std::env::temp_dir().join(format!("folio-{}.dat", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, b"plain words").await.unwrap();

    let loaded = load_document(&path, None).await;
    let _ = tokio::fs::remove_file(&path).await;

    assert!(matches!(loaded, Err(CliError::UnknownMediaType(_))));
}

#[test]
fn given_result_when_rendering_full_then_includes_envelope_fields() {
    let rendered = render_output(&one_unit_result(), false, false).unwrap();

    let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["total_items"], 1);
    assert_eq!(json["processing_time"], 1.5);
    assert_eq!(json["content_items"][0]["topic"], "Biology");
    assert!(rendered.contains('\n'));
}

#[test]
fn given_items_only_compact_when_rendering_then_single_line_array() {
    let rendered = render_output(&one_unit_result(), true, true).unwrap();

    assert!(!rendered.contains('\n'));
    let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(1));
    assert_eq!(json[0]["subtopic"], "Cells");
}
