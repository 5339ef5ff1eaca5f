//! Deterministic in-memory engines
//!
//! These fakes stand in for the system binaries in tests and local
//! development. They understand a tiny document dialect produced by
//! [`sample_pdf`]: a `%PDF-` header followed by one `%%Page n` line per page.
//!
//! ```rust
//! use pdfsmith::engine::mock::{sample_pdf, MockRasterizer};
//! use pdfsmith::engine::Rasterizer;
//! use pdfsmith::{Deadline, ImageFormat};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pages = MockRasterizer::new()
//!     .rasterize(&sample_pdf(3), ImageFormat::Png, Deadline::none())?;
//! assert_eq!(pages.len(), 3);
//! assert_eq!(pages[2].page, 3);
//! # Ok(())
//! # }
//! ```

use super::{
    DocumentConverter, EncryptionPolicy, OptimizeOptions, PdfCodec, Rasterizer, TextRecognizer,
};
use crate::artifact::{ImageFormat, PageImage};
use crate::deadline::Deadline;
use crate::error::{Result, TransformError};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const PDF_HEADER: &[u8] = b"%PDF-";
const PAGE_MARKER: &[u8] = b"%%Page ";
const ENCRYPTED_MARKER: &[u8] = b"%MockEncrypted ";
const LINEARIZED_MARKER: &[u8] = b"%Linearized\n";

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SIGNATURE: &[u8] = b"\xFF\xD8\xFF\xE0";

/// Leading bytes of every document the mock converter writes
pub const MOCK_DOCX_SIGNATURE: &[u8] = b"PK\x03\x04";

/// Builds a document with `pages` pages that every mock engine accepts.
pub fn sample_pdf(pages: usize) -> Vec<u8> {
    let mut pdf = b"%PDF-1.7\n".to_vec();
    for page in 1..=pages {
        pdf.extend_from_slice(PAGE_MARKER);
        pdf.extend_from_slice(format!("{page}\n").as_bytes());
    }
    pdf.extend_from_slice(b"%%EOF\n");
    pdf
}

fn is_encrypted(pdf: &[u8]) -> bool {
    pdf.starts_with(ENCRYPTED_MARKER)
}

fn ensure_pdf(tool: &str, pdf: &[u8]) -> Result<()> {
    if pdf.starts_with(PDF_HEADER) {
        Ok(())
    } else {
        Err(TransformError::engine(tool, "not a PDF file"))
    }
}

fn count_pages(pdf: &[u8]) -> usize {
    pdf.split(|b| *b == b'\n')
        .filter(|line| line.starts_with(PAGE_MARKER))
        .count()
}

/// Splits an encrypted mock document into its password and plaintext.
fn split_encrypted(pdf: &[u8]) -> Option<(&[u8], &[u8])> {
    let rest = pdf.strip_prefix(ENCRYPTED_MARKER)?;
    let newline = rest.iter().position(|b| *b == b'\n')?;
    Some((&rest[..newline], &rest[newline + 1..]))
}

/// Codec that "encrypts" by prefixing a marker line carrying the password
#[derive(Debug, Default)]
pub struct MockCodec {
    failure: Option<String>,
}

impl MockCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
        }
    }

    fn preflight(&self, deadline: Deadline) -> Result<()> {
        deadline.check(self.name())?;
        match &self.failure {
            Some(message) => Err(TransformError::engine(self.name(), message.clone())),
            None => Ok(()),
        }
    }
}

impl PdfCodec for MockCodec {
    fn decrypt(&self, pdf: &[u8], password: &str, deadline: Deadline) -> Result<Vec<u8>> {
        self.preflight(deadline)?;
        if is_encrypted(pdf) {
            let (expected, plain) = split_encrypted(pdf)
                .ok_or_else(|| TransformError::engine(self.name(), "damaged encryption header"))?;
            if expected != password.as_bytes() {
                return Err(TransformError::IncorrectPassword);
            }
            return Ok(plain.to_vec());
        }
        ensure_pdf(self.name(), pdf)?;
        Ok(pdf.to_vec())
    }

    fn encrypt(
        &self,
        pdf: &[u8],
        policy: &EncryptionPolicy,
        deadline: Deadline,
    ) -> Result<Vec<u8>> {
        self.preflight(deadline)?;
        if is_encrypted(pdf) {
            return Err(TransformError::IncorrectPassword);
        }
        ensure_pdf(self.name(), pdf)?;

        let mut out = ENCRYPTED_MARKER.to_vec();
        out.extend_from_slice(policy.user_password.as_bytes());
        out.push(b'\n');
        out.extend_from_slice(pdf);
        Ok(out)
    }

    fn optimize(
        &self,
        pdf: &[u8],
        options: OptimizeOptions,
        deadline: Deadline,
    ) -> Result<Vec<u8>> {
        self.preflight(deadline)?;
        if is_encrypted(pdf) {
            return Err(TransformError::IncorrectPassword);
        }
        ensure_pdf(self.name(), pdf)?;

        let header_end = pdf
            .iter()
            .position(|b| *b == b'\n')
            .map_or(pdf.len(), |i| i + 1);
        let (header, body) = pdf.split_at(header_end);

        let mut out = header.to_vec();
        if options.linearize {
            out.extend_from_slice(LINEARIZED_MARKER);
        }
        out.extend_from_slice(body);
        Ok(out)
    }

    fn name(&self) -> &str {
        "mock-codec"
    }
}

/// Rasterizer emitting one tiny signature-only image per `%%Page` line
#[derive(Debug, Default)]
pub struct MockRasterizer {
    failure: Option<String>,
}

impl MockRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
        }
    }
}

impl Rasterizer for MockRasterizer {
    fn rasterize(
        &self,
        pdf: &[u8],
        format: ImageFormat,
        deadline: Deadline,
    ) -> Result<Vec<PageImage>> {
        deadline.check(self.name())?;
        if let Some(message) = &self.failure {
            return Err(TransformError::engine(self.name(), message.clone()));
        }
        if is_encrypted(pdf) {
            return Err(TransformError::engine(self.name(), "document is password protected"));
        }
        ensure_pdf(self.name(), pdf)?;

        let pages = count_pages(pdf);
        if pages == 0 {
            return Err(TransformError::InvalidOutput(
                "document has no pages".to_string(),
            ));
        }

        let signature = match format {
            ImageFormat::Png => PNG_SIGNATURE,
            ImageFormat::Jpeg => JPEG_SIGNATURE,
        };
        Ok((1..=pages)
            .map(|page| {
                let mut bytes = signature.to_vec();
                bytes.extend_from_slice(format!("page {page}").as_bytes());
                PageImage {
                    page,
                    format,
                    bytes,
                }
            })
            .collect())
    }

    fn name(&self) -> &str {
        "mock-rasterizer"
    }
}

/// Recognizer that reports which page it was shown
#[derive(Debug, Default)]
pub struct MockRecognizer {
    fail_on_page: Option<usize>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recognizer that fails when it reaches `page`
    pub fn failing_on_page(page: usize) -> Self {
        Self {
            fail_on_page: Some(page),
        }
    }
}

impl TextRecognizer for MockRecognizer {
    fn recognize(&self, image: &PageImage, deadline: Deadline) -> Result<String> {
        deadline.check(self.name())?;
        if self.fail_on_page == Some(image.page) {
            return Err(TransformError::engine(
                self.name(),
                format!("unreadable image on page {}", image.page),
            ));
        }
        Ok(format!("Recognized text on page {}", image.page))
    }

    fn name(&self) -> &str {
        "mock-recognizer"
    }
}

/// How [`MockConverter`] behaves when called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConverterBehavior {
    #[default]
    Succeed,
    /// Write partial output, then fail
    Fail,
    /// Succeed without writing anything
    ProduceNothing,
}

/// Converter that records the paths it was handed
#[derive(Debug, Default)]
pub struct MockConverter {
    behavior: ConverterBehavior,
    seen: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl MockConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: ConverterBehavior) -> Self {
        Self {
            behavior,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Every `(input, output)` pair passed to [`DocumentConverter::convert`]
    pub fn seen_paths(&self) -> Vec<(PathBuf, PathBuf)> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

impl DocumentConverter for MockConverter {
    fn convert(&self, input: &Path, output: &Path, deadline: Deadline) -> Result<()> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((input.to_path_buf(), output.to_path_buf()));
        }
        deadline.check(self.name())?;

        let pdf = std::fs::read(input)?;
        ensure_pdf(self.name(), &pdf)?;

        match self.behavior {
            ConverterBehavior::Succeed => {
                let mut docx = MOCK_DOCX_SIGNATURE.to_vec();
                docx.extend_from_slice(format!("mock-docx pages={}", count_pages(&pdf)).as_bytes());
                std::fs::write(output, docx)?;
                Ok(())
            }
            ConverterBehavior::Fail => {
                std::fs::write(output, MOCK_DOCX_SIGNATURE)?;
                Err(TransformError::engine(self.name(), "layout analysis crashed"))
            }
            ConverterBehavior::ProduceNothing => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "mock-converter"
    }
}
