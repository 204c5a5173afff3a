use image::ImageFormat;
use pdfium_render::prelude::*;

use crate::application::ports::PdfReadError;

pub const RENDER_DPI: f32 = 150.0;

/// Renders one zero-based page to PNG through the system pdfium library.
pub(super) fn rasterize_page(data: &[u8], page_index: usize) -> Result<Vec<u8>, PdfReadError> {
    let pdfium = Pdfium::new(
        Pdfium::bind_to_system_library()
            .map_err(|e| PdfReadError::Rasterization(format!("pdfium bind failed: {e}")))?,
    );

    let doc = pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(|e| PdfReadError::Malformed(format!("pdfium open failed: {e}")))?;

    let index = u16::try_from(page_index).map_err(|_| PdfReadError::PageOutOfRange(page_index))?;
    if index >= doc.pages().len() {
        return Err(PdfReadError::PageOutOfRange(page_index));
    }

    let page = doc.pages().get(index).map_err(|e| {
        PdfReadError::Rasterization(format!("page {page_index} access failed: {e}"))
    })?;

    let width = (page.width().value * RENDER_DPI / 72.0) as i32;
    let height = (page.height().value * RENDER_DPI / 72.0) as i32;

    let bitmap = page
        .render_with_config(
            &PdfRenderConfig::new()
                .set_target_width(width)
                .set_target_height(height),
        )
        .map_err(|e| {
            PdfReadError::Rasterization(format!("render page {page_index} failed: {e}"))
        })?;

    let mut png_bytes: Vec<u8> = Vec::new();
    bitmap
        .as_image()
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| {
            PdfReadError::Rasterization(format!("PNG encode page {page_index} failed: {e}"))
        })?;

    Ok(png_bytes)
}
