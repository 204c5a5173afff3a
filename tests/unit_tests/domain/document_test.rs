use folio::domain::{Document, MediaType};

#[test]
fn given_image_document_when_created_then_page_count_is_one() {
    let document = Document::new("scan.png", MediaType::Image, vec![1u8, 2, 3]);

    assert_eq!(document.page_count(), Some(1));
    assert_eq!(document.size_bytes(), 3);
    assert_eq!(document.filename, "scan.png");
}

#[test]
fn given_pdf_document_when_created_then_page_count_is_unknown() {
    let document = Document::new("notes.pdf", MediaType::Pdf, b"%PDF-1.5".to_vec());
    assert_eq!(document.page_count(), None);
}

#[test]
fn given_pdf_document_when_declaring_page_count_then_it_is_kept() {
    let document = Document::new("notes.pdf", MediaType::Pdf, b"%PDF-1.5".to_vec()).with_page_count(12);
    assert_eq!(document.page_count(), Some(12));
}

#[test]
fn given_image_document_when_declaring_page_count_then_it_stays_one() {
    let document = Document::new("scan.png", MediaType::Image, vec![0u8]).with_page_count(5);
    assert_eq!(document.page_count(), Some(1));
}

#[test]
fn given_two_documents_when_created_then_ids_differ() {
    let a = Document::new("a.png", MediaType::Image, vec![0u8]);
    let b = Document::new("b.png", MediaType::Image, vec![0u8]);
    assert_ne!(a.id, b.id);
}

#[test]
fn given_known_extensions_when_resolving_media_type_then_maps_correctly() {
    assert_eq!(MediaType::from_extension("Lecture.PDF"), Some(MediaType::Pdf));
    assert_eq!(MediaType::from_extension("board.jpeg"), Some(MediaType::Image));
    assert_eq!(MediaType::from_extension("board.tiff"), Some(MediaType::Image));
    assert_eq!(MediaType::from_extension("notes.docx"), None);
    assert_eq!(MediaType::from_extension("no_extension"), None);
}

#[test]
fn given_mime_types_when_resolving_media_type_then_maps_correctly() {
    assert_eq!(MediaType::from_mime("application/pdf"), Some(MediaType::Pdf));
    assert_eq!(MediaType::from_mime("image/png"), Some(MediaType::Image));
    assert_eq!(MediaType::from_mime("text/plain"), None);
}

#[test]
fn given_magic_bytes_when_sniffing_then_detects_format() {
    assert_eq!(MediaType::sniff(b"%PDF-1.7\n..."), Some(MediaType::Pdf));
    assert_eq!(MediaType::sniff(b"\x89PNG\r\n\x1a\n...."), Some(MediaType::Image));
    assert_eq!(MediaType::sniff(b"\xff\xd8\xff\xe0...."), Some(MediaType::Image));
    assert_eq!(MediaType::sniff(b"GIF89a..."), Some(MediaType::Image));
    assert_eq!(MediaType::sniff(b"hello world"), None);
}
