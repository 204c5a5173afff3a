use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::application::ports::{PdfObject, PdfPage, PdfReadError, PdfReader};

use super::drawing_scanner::{Bounds, scan_drawings};
use super::pdf_rasterizer::rasterize_page;
use super::text_sanitizer::sanitize_extracted_text;

pub const MAX_PAGES_DUE_TO_RAM_USAGE: usize = 200;
const MAX_PAGE_TREE_DEPTH: usize = 32;

/// Page text and object introspection through lopdf, page rendering through
/// pdfium.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfPdfReader;

impl LopdfPdfReader {
    pub fn new() -> Self {
        Self
    }
}

impl PdfReader for LopdfPdfReader {
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    fn read_pages(&self, data: &[u8]) -> Result<Vec<PdfPage>, PdfReadError> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| {
            if e.to_string().to_lowercase().contains("decrypt") {
                PdfReadError::Encrypted
            } else {
                PdfReadError::Malformed(e.to_string())
            }
        })?;

        if doc.is_encrypted() {
            return Err(PdfReadError::Encrypted);
        }

        let page_ids = doc.get_pages();
        if page_ids.len() > MAX_PAGES_DUE_TO_RAM_USAGE {
            tracing::warn!(
                page_count = page_ids.len(),
                limit = MAX_PAGES_DUE_TO_RAM_USAGE,
                "PDF exceeds page limit, reading the leading pages only"
            );
        }

        let pages = page_ids
            .iter()
            .take(MAX_PAGES_DUE_TO_RAM_USAGE)
            .map(|(&number, &page_id)| read_page(&doc, number, page_id))
            .collect();

        Ok(pages)
    }

    fn rasterize_page(&self, data: &[u8], page_index: usize) -> Result<Vec<u8>, PdfReadError> {
        rasterize_page(data, page_index)
    }
}

fn read_page(doc: &LopdfDocument, number: u32, page_id: ObjectId) -> PdfPage {
    let text = match doc.extract_text(&[number]) {
        Ok(text) => sanitize_extracted_text(&text),
        Err(e) => {
            tracing::debug!(page = number, error = %e, "No native text layer on page");
            String::new()
        }
    };

    let mut objects = page_images(doc, page_id);

    let drawings = doc
        .get_page_content(page_id)
        .ok()
        .and_then(|content| lopdf::content::Content::decode(&content).ok())
        .map(|content| scan_drawings(&content.operations, media_box(doc, page_id)))
        .unwrap_or_default();
    objects.extend(drawings);

    PdfPage {
        number,
        text,
        objects,
    }
}

/// Page size, following `Parent` links since `MediaBox` is inheritable.
fn media_box(doc: &LopdfDocument, page_id: ObjectId) -> Option<Bounds> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(rect) = node.get(b"MediaBox") {
            let values: Vec<f32> = resolve_array(doc, rect)?
                .iter()
                .filter_map(|value| value.as_float().ok())
                .collect();
            let [x0, y0, x1, y1] = values.as_slice() else {
                return None;
            };
            return Some(Bounds {
                min_x: x0.min(*x1),
                min_y: y0.min(*y1),
                max_x: x0.max(*x1),
                max_y: y0.max(*y1),
            });
        }
        node = doc.get_dictionary(node.get(b"Parent").ok()?.as_reference().ok()?).ok()?;
    }
    None
}

fn resolve_array<'a>(doc: &'a LopdfDocument, object: &'a Object) -> Option<&'a Vec<Object>> {
    match object {
        Object::Reference(r) => doc.get_object(*r).ok()?.as_array().ok(),
        Object::Array(values) => Some(values),
        _ => None,
    }
}

fn page_images(doc: &LopdfDocument, page_id: ObjectId) -> Vec<PdfObject> {
    let Some(xobjects) = doc
        .get_dictionary(page_id)
        .ok()
        .and_then(|page| page.get(b"Resources").ok())
        .and_then(|resources| resolve_dictionary(doc, resources))
        .and_then(|resources| resources.get(b"XObject").ok())
        .and_then(|xobjects| resolve_dictionary(doc, xobjects))
    else {
        return Vec::new();
    };

    xobjects
        .iter()
        .filter_map(|(_, obj)| obj.as_reference().ok())
        .filter_map(|obj_ref| image_object(doc, obj_ref))
        .collect()
}

fn image_object(doc: &LopdfDocument, obj_ref: ObjectId) -> Option<PdfObject> {
    let Ok(Object::Stream(stream)) = doc.get_object(obj_ref) else {
        return None;
    };
    let dict = &stream.dict;

    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let dimension = |key: &[u8]| {
        dict.get(key)
            .ok()
            .and_then(|value| value.as_i64().ok())
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(0)
    };

    // JPEG streams are self-contained; other filters need the colour space
    // and bit depth to reassemble, so they are sized but not decoded.
    let encoded = (filter_name(dict).as_deref() == Some("DCTDecode"))
        .then(|| stream.content.clone());

    Some(PdfObject::Image {
        width: dimension(&b"Width"[..]),
        height: dimension(&b"Height"[..]),
        encoded,
    })
}

fn filter_name(dict: &Dictionary) -> Option<String> {
    let name = match dict.get(b"Filter").ok()? {
        Object::Name(name) => name.as_slice(),
        Object::Array(filters) => filters.first()?.as_name().ok()?,
        _ => return None,
    };
    Some(String::from_utf8_lossy(name).into_owned())
}

fn resolve_dictionary<'a>(doc: &'a LopdfDocument, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Reference(r) => doc.get_dictionary(*r).ok(),
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}
