//! Text extraction through rasterization and OCR

use super::{ensure_document, ordered_pages};
use crate::artifact::{Artifact, ImageFormat, TransformResult, Upload, MIME_TEXT};
use crate::deadline::Deadline;
use crate::engine::Engines;
use crate::error::Result;
use tracing::{debug, info};

pub const EXTRACTED_TEXT_FILENAME: &str = "Extracted_Text.txt";

/// Appends one page's text preceded by its `--- Page N ---` delimiter.
pub fn append_page(out: &mut String, page: usize, text: &str) {
    out.push_str(&format!("--- Page {page} ---\n{text}\n\n"));
}

/// Renders every page to PNG, recognizes each one and joins the text in page order.
///
/// Any failure aborts the whole extraction; partial text is never returned.
pub fn extract_text(
    engines: &Engines,
    upload: &Upload,
    deadline: Deadline,
) -> Result<TransformResult> {
    ensure_document(upload)?;
    debug!(
        bytes = upload.len(),
        rasterizer = engines.rasterizer.name(),
        recognizer = engines.recognizer.name(),
        "extracting text"
    );

    let rendered = engines
        .rasterizer
        .rasterize(upload.as_bytes(), ImageFormat::Png, deadline)?;
    let pages = ordered_pages(rendered)?;

    let mut text = String::new();
    for image in &pages {
        deadline.check("ocr")?;
        let page_text = engines.recognizer.recognize(image, deadline)?;
        debug!(page = image.page, chars = page_text.len(), "recognized page");
        append_page(&mut text, image.page, &page_text);
    }

    info!(pages = pages.len(), chars = text.len(), "extracted text");
    Ok(TransformResult::new(Artifact::new(
        EXTRACTED_TEXT_FILENAME,
        MIME_TEXT,
        text.into_bytes(),
    )))
}
