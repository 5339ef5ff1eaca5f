//! Page rendering to PNG or JPEG

use super::{ensure_document, ordered_pages};
use crate::archive::Archive;
use crate::artifact::{Artifact, ImageFormat, TransformResult, Upload, MIME_ZIP};
use crate::deadline::Deadline;
use crate::engine::Engines;
use crate::error::Result;
use tracing::{debug, info};

pub const ARCHIVE_FILENAME: &str = "Converted_Images.zip";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterizeParams {
    pub format: ImageFormat,
}

impl RasterizeParams {
    /// Builds parameters from the raw `format` form value, falling back to JPEG.
    pub fn from_form(format: Option<&str>) -> Self {
        Self {
            format: ImageFormat::from_form(format),
        }
    }
}

/// Renders every page of the upload.
///
/// A single-page document comes back as one image named `Page_1.<ext>`;
/// anything longer comes back as a ZIP with one `Page_<n>.<ext>` entry per
/// page, in page order.
pub fn rasterize(
    engines: &Engines,
    upload: &Upload,
    params: &RasterizeParams,
    deadline: Deadline,
) -> Result<TransformResult> {
    ensure_document(upload)?;
    debug!(
        bytes = upload.len(),
        format = %params.format,
        rasterizer = engines.rasterizer.name(),
        "rasterizing document"
    );

    let rendered = engines
        .rasterizer
        .rasterize(upload.as_bytes(), params.format, deadline)?;
    let mut pages = ordered_pages(rendered)?;

    if pages.len() == 1 {
        let page = pages.remove(0);
        info!(pages = 1, bytes = page.bytes.len(), "rasterized single page");
        return Ok(TransformResult::new(Artifact::new(
            page.file_name(),
            params.format.mime_type(),
            page.bytes,
        )));
    }

    let mut archive = Archive::new();
    for page in pages {
        archive.push(page.file_name(), page.bytes);
    }
    let zip = archive.to_zip()?;

    info!(pages = archive.len(), bytes = zip.len(), "rasterized into archive");
    Ok(TransformResult::new(Artifact::new(
        ARCHIVE_FILENAME,
        MIME_ZIP,
        zip,
    )))
}
