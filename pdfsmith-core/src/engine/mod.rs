//! Black-box document engines
//!
//! Every transformation delegates its heavy lifting to exactly one engine.
//! The engines sit behind small synchronous traits so that operations can be
//! exercised against deterministic fakes ([`mock`]) and deployed against the
//! system binaries:
//!
//! - [`PdfCodec`]: decryption, encryption and optimized re-serialization (`qpdf`)
//! - [`Rasterizer`]: page rendering (`pdftoppm`)
//! - [`TextRecognizer`]: OCR on a single page image (`tesseract`)
//! - [`DocumentConverter`]: PDF to DOCX via file paths (`soffice`)
//!
//! All calls block. Callers running inside an async runtime are expected to
//! move them onto a blocking worker.

use crate::artifact::{ImageFormat, PageImage};
use crate::config::EngineConfig;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::scratch::ScratchSpace;
use std::path::Path;
use std::sync::Arc;

pub mod mock;
mod poppler;
mod process;
mod qpdf;
mod soffice;
mod tesseract;

pub use poppler::PdftoppmRasterizer;
pub use qpdf::QpdfCodec;
pub use soffice::SofficeConverter;
pub use tesseract::TesseractRecognizer;

/// Encryption applied by [`PdfCodec::encrypt`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionPolicy {
    /// Password needed to open the document
    pub user_password: String,
    /// Password granting full permissions
    pub owner_password: String,
    /// Whether text and graphics may be extracted
    pub allow_extraction: bool,
}

impl EncryptionPolicy {
    /// One password for both opening and administering the document, with
    /// content extraction disabled and all other permissions left at the
    /// engine defaults.
    pub fn single_password(password: &str) -> Self {
        Self {
            user_password: password.to_string(),
            owner_password: password.to_string(),
            allow_extraction: false,
        }
    }
}

/// Rewrites applied by [`PdfCodec::optimize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeOptions {
    /// Reorder objects for incremental ("fast web view") rendering
    pub linearize: bool,
    /// Pack objects into compressed object and cross-reference streams
    pub object_streams: bool,
}

impl OptimizeOptions {
    pub fn maximum() -> Self {
        Self {
            linearize: true,
            object_streams: true,
        }
    }
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self::maximum()
    }
}

/// PDF parse-and-rewrite engine
pub trait PdfCodec: Send + Sync {
    /// Opens `pdf` with `password` and re-serializes it without encryption.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::IncorrectPassword`](crate::TransformError::IncorrectPassword)
    /// when the password does not open the document.
    fn decrypt(&self, pdf: &[u8], password: &str, deadline: Deadline) -> Result<Vec<u8>>;

    /// Re-serializes `pdf` encrypted according to `policy`.
    fn encrypt(&self, pdf: &[u8], policy: &EncryptionPolicy, deadline: Deadline)
        -> Result<Vec<u8>>;

    /// Re-serializes `pdf` with the requested size and layout optimizations.
    fn optimize(&self, pdf: &[u8], options: OptimizeOptions, deadline: Deadline)
        -> Result<Vec<u8>>;

    fn name(&self) -> &str;
}

/// Renders every page of a PDF to an image
pub trait Rasterizer: Send + Sync {
    /// Returns one image per page, ordered by page number starting at 1.
    fn rasterize(&self, pdf: &[u8], format: ImageFormat, deadline: Deadline)
        -> Result<Vec<PageImage>>;

    fn name(&self) -> &str;
}

/// Optical character recognition over a single page image
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &PageImage, deadline: Deadline) -> Result<String>;

    fn name(&self) -> &str;
}

/// Converts a PDF on disk into an editable word-processing document on disk
pub trait DocumentConverter: Send + Sync {
    /// Reads `input` and writes the converted document to `output`,
    /// replacing whatever is there.
    fn convert(&self, input: &Path, output: &Path, deadline: Deadline) -> Result<()>;

    fn name(&self) -> &str;
}

/// The full set of engines an operation may call, plus scratch storage.
///
/// Cloning is cheap; every engine is shared behind an `Arc`.
#[derive(Clone)]
pub struct Engines {
    pub codec: Arc<dyn PdfCodec>,
    pub rasterizer: Arc<dyn Rasterizer>,
    pub recognizer: Arc<dyn TextRecognizer>,
    pub converter: Arc<dyn DocumentConverter>,
    pub scratch: ScratchSpace,
}

impl Engines {
    /// Engines backed by the qpdf, poppler, tesseract and LibreOffice binaries.
    pub fn system(config: &EngineConfig) -> Self {
        let scratch = ScratchSpace::new(&config.scratch_root);
        Self {
            codec: Arc::new(QpdfCodec::new(&config.tools.qpdf, scratch.clone())),
            rasterizer: Arc::new(PdftoppmRasterizer::new(
                &config.tools.pdftoppm,
                config.dpi,
                scratch.clone(),
            )),
            recognizer: Arc::new(TesseractRecognizer::new(
                &config.tools.tesseract,
                &config.ocr_language,
                scratch.clone(),
            )),
            converter: Arc::new(SofficeConverter::new(&config.tools.soffice, scratch.clone())),
            scratch,
        }
    }

    /// In-memory fakes for tests and local development.
    pub fn mock(scratch: ScratchSpace) -> Self {
        Self {
            codec: Arc::new(mock::MockCodec::new()),
            rasterizer: Arc::new(mock::MockRasterizer::new()),
            recognizer: Arc::new(mock::MockRecognizer::new()),
            converter: Arc::new(mock::MockConverter::new()),
            scratch,
        }
    }
}

impl std::fmt::Debug for Engines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engines")
            .field("codec", &self.codec.name())
            .field("rasterizer", &self.rasterizer.name())
            .field("recognizer", &self.recognizer.name())
            .field("converter", &self.converter.name())
            .field("scratch", &self.scratch.root())
            .finish()
    }
}
