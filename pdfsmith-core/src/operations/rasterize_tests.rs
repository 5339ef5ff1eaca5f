//! Tests for page rendering and multi-page packaging

use super::rasterize::{rasterize, RasterizeParams};
use crate::artifact::{ImageFormat, PageImage, Upload};
use crate::deadline::Deadline;
use crate::engine::mock::{sample_pdf, MockRasterizer};
use crate::engine::{Engines, Rasterizer};
use crate::error::{ErrorKind, Result};
use crate::scratch::ScratchSpace;
use std::io::Cursor;
use std::sync::Arc;
use zip::ZipArchive;

fn engines() -> Engines {
    Engines::mock(ScratchSpace::system())
}

fn entry_names(zip_bytes: Vec<u8>) -> Vec<String> {
    let mut zip = ZipArchive::new(Cursor::new(zip_bytes)).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Emits pages out of order to prove the operation sorts them
struct ShuffledRasterizer;

impl Rasterizer for ShuffledRasterizer {
    fn rasterize(
        &self,
        _pdf: &[u8],
        format: ImageFormat,
        _deadline: Deadline,
    ) -> Result<Vec<PageImage>> {
        Ok([3, 1, 2]
            .into_iter()
            .map(|page| PageImage {
                page,
                format,
                bytes: vec![page as u8],
            })
            .collect())
    }

    fn name(&self) -> &str {
        "shuffled"
    }
}

/// Reports whatever page numbers it was built with
struct NumberedRasterizer(Vec<usize>);

impl Rasterizer for NumberedRasterizer {
    fn rasterize(
        &self,
        _pdf: &[u8],
        format: ImageFormat,
        _deadline: Deadline,
    ) -> Result<Vec<PageImage>> {
        Ok(self
            .0
            .iter()
            .map(|&page| PageImage {
                page,
                format,
                bytes: vec![page as u8],
            })
            .collect())
    }

    fn name(&self) -> &str {
        "numbered"
    }
}

struct BlankRasterizer;

impl Rasterizer for BlankRasterizer {
    fn rasterize(
        &self,
        _pdf: &[u8],
        _format: ImageFormat,
        _deadline: Deadline,
    ) -> Result<Vec<PageImage>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "blank"
    }
}

#[test]
fn test_single_page_defaults_to_jpeg() {
    let result = rasterize(
        &engines(),
        &Upload::new(sample_pdf(1)),
        &RasterizeParams::from_form(None),
        Deadline::none(),
    )
    .unwrap();

    assert_eq!(result.artifact.filename, "Page_1.jpg");
    assert_eq!(result.artifact.mime_type, "image/jpeg");
    assert!(result.artifact.bytes.starts_with(b"\xFF\xD8\xFF"));
}

#[test]
fn test_single_page_png() {
    let result = rasterize(
        &engines(),
        &Upload::new(sample_pdf(1)),
        &RasterizeParams::from_form(Some("png")),
        Deadline::none(),
    )
    .unwrap();

    assert_eq!(result.artifact.filename, "Page_1.png");
    assert_eq!(result.artifact.mime_type, "image/png");
}

#[test]
fn test_unknown_format_falls_back_to_jpeg() {
    let result = rasterize(
        &engines(),
        &Upload::new(sample_pdf(1)),
        &RasterizeParams::from_form(Some("webp")),
        Deadline::none(),
    )
    .unwrap();

    assert_eq!(result.artifact.filename, "Page_1.jpg");
}

#[test]
fn test_multi_page_is_archived_in_order() {
    let result = rasterize(
        &engines(),
        &Upload::new(sample_pdf(11)),
        &RasterizeParams::from_form(Some("png")),
        Deadline::none(),
    )
    .unwrap();

    assert_eq!(result.artifact.filename, "Converted_Images.zip");
    assert_eq!(result.artifact.mime_type, "application/zip");

    let expected: Vec<String> = (1..=11).map(|n| format!("Page_{n}.png")).collect();
    assert_eq!(entry_names(result.artifact.bytes), expected);
}

#[test]
fn test_archive_is_deterministic() {
    let run = || {
        rasterize(
            &engines(),
            &Upload::new(sample_pdf(3)),
            &RasterizeParams::default(),
            Deadline::none(),
        )
        .unwrap()
        .artifact
        .bytes
    };
    assert_eq!(run(), run());
}

#[test]
fn test_out_of_order_pages_are_sorted() {
    let mut engines = engines();
    engines.rasterizer = Arc::new(ShuffledRasterizer);

    let result = rasterize(
        &engines,
        &Upload::new(sample_pdf(3)),
        &RasterizeParams::default(),
        Deadline::none(),
    )
    .unwrap();

    assert_eq!(
        entry_names(result.artifact.bytes),
        vec!["Page_1.jpg", "Page_2.jpg", "Page_3.jpg"]
    );
}

#[test]
fn test_no_pages_is_processing_failure() {
    let mut engines = engines();
    engines.rasterizer = Arc::new(BlankRasterizer);

    let err = rasterize(
        &engines,
        &Upload::new(sample_pdf(1)),
        &RasterizeParams::default(),
        Deadline::none(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProcessingFailed);
}

#[test]
fn test_rasterizer_failure_propagates() {
    let mut engines = engines();
    engines.rasterizer = Arc::new(MockRasterizer::failing("syntax error in content stream"));

    let err = rasterize(
        &engines,
        &Upload::new(sample_pdf(2)),
        &RasterizeParams::default(),
        Deadline::none(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "mock-rasterizer failed: syntax error in content stream"
    );
}

#[test]
fn test_single_page_is_always_page_one() {
    let mut engines = engines();
    engines.rasterizer = Arc::new(NumberedRasterizer(vec![5]));

    let result = rasterize(
        &engines,
        &Upload::new(sample_pdf(1)),
        &RasterizeParams::from_form(Some("png")),
        Deadline::none(),
    )
    .unwrap();

    assert_eq!(result.artifact.filename, "Page_1.png");
    assert_eq!(result.artifact.bytes, vec![5]);
}

#[test]
fn test_gapped_page_numbers_are_renumbered() {
    let mut engines = engines();
    engines.rasterizer = Arc::new(NumberedRasterizer(vec![7, 2, 30]));

    let result = rasterize(
        &engines,
        &Upload::new(sample_pdf(3)),
        &RasterizeParams::default(),
        Deadline::none(),
    )
    .unwrap();

    assert_eq!(
        entry_names(result.artifact.bytes),
        vec!["Page_1.jpg", "Page_2.jpg", "Page_3.jpg"]
    );
}
