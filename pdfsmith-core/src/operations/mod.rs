//! Document transformations
//!
//! Each operation takes one [`Upload`] plus its typed parameters, calls exactly
//! one engine family from [`Engines`](crate::Engines), and produces a single
//! [`TransformResult`](crate::TransformResult). Operations are synchronous and
//! share nothing, so any number may run concurrently on blocking workers.

pub mod compress;
pub mod convert;
pub mod ocr;
pub mod protect;
pub mod rasterize;
pub mod unlock;

#[cfg(test)]
mod rasterize_tests;

pub use compress::{compress, COMPRESSED_FILENAME};
pub use convert::{convert_to_docx, CONVERTED_FILENAME};
pub use ocr::{extract_text, EXTRACTED_TEXT_FILENAME};
pub use protect::{protect, ProtectParams, PROTECTED_FILENAME};
pub use rasterize::{rasterize, RasterizeParams, ARCHIVE_FILENAME};
pub use unlock::{unlock, UnlockParams, UNLOCKED_FILENAME};

use crate::artifact::{PageImage, Upload};
use crate::error::{Result, TransformError};
use tracing::debug;

/// Name of the multipart field carrying the document
pub const FILE_FIELD: &str = "file";

/// Rejects an empty upload, which is what a browser sends when no file was picked.
pub(crate) fn ensure_document(upload: &Upload) -> Result<()> {
    let filename = upload.filename.as_deref().unwrap_or("<unnamed>");
    if upload.is_empty() {
        debug!(filename, "rejecting empty upload");
        return Err(TransformError::MissingInput(FILE_FIELD.to_string()));
    }
    debug!(filename, bytes = upload.len(), "accepted upload");
    Ok(())
}

/// Puts rendered pages in page order and numbers them `1..=n`.
///
/// Engines may report gaps or start elsewhere; output names always follow
/// the position in the document.
pub(crate) fn ordered_pages(mut pages: Vec<PageImage>) -> Result<Vec<PageImage>> {
    if pages.is_empty() {
        return Err(TransformError::InvalidOutput(
            "rasterizer produced no pages".to_string(),
        ));
    }
    pages.sort_by_key(|image| image.page);
    for (index, image) in pages.iter_mut().enumerate() {
        image.page = index + 1;
    }
    Ok(pages)
}

/// Debug output for parameter structs that carry a password
pub(crate) struct Redacted;

impl std::fmt::Debug for Redacted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("\"<redacted>\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ImageFormat;
    use crate::error::ErrorKind;

    #[test]
    fn test_empty_upload_is_missing_input() {
        let err = ensure_document(&Upload::new(Vec::new())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingInput);
        assert_eq!(err.to_string(), "Missing file");
    }

    #[test]
    fn test_non_empty_upload_passes() {
        assert!(ensure_document(&Upload::new(b"x".to_vec())).is_ok());
    }

    #[test]
    fn test_named_upload_passes() {
        let upload = Upload::new(b"%PDF".to_vec()).with_filename("scan.pdf");
        assert!(ensure_document(&upload).is_ok());
    }

    fn page(page: usize) -> PageImage {
        PageImage {
            page,
            format: ImageFormat::Png,
            bytes: vec![page as u8],
        }
    }

    #[test]
    fn test_ordered_pages_renumbers_densely() {
        let pages = ordered_pages(vec![page(9), page(4), page(12)]).unwrap();
        let numbering: Vec<(usize, u8)> = pages.iter().map(|p| (p.page, p.bytes[0])).collect();
        assert_eq!(numbering, vec![(1, 4), (2, 9), (3, 12)]);
    }

    #[test]
    fn test_ordered_pages_rejects_empty() {
        let err = ordered_pages(Vec::new()).unwrap_err();
        assert!(matches!(err, TransformError::InvalidOutput(_)));
        assert_eq!(err.kind(), ErrorKind::ProcessingFailed);
    }
}
