//! # pdfsmith
//!
//! Request-scoped PDF transformations over pluggable engines.
//!
//! ## Operations
//!
//! - [`unlock`](operations::unlock): remove a document password
//! - [`protect`](operations::protect): add a password and restrict extraction
//! - [`compress`](operations::compress): linearize and pack object streams
//! - [`extract_text`](operations::extract_text): OCR every page into one text file
//! - [`rasterize`](operations::rasterize): render pages to PNG or JPEG
//! - [`convert_to_docx`](operations::convert_to_docx): produce an editable document
//!
//! Every operation takes an [`Upload`], a set of [`Engines`] and a
//! [`Deadline`], and returns a [`TransformResult`] or a [`TransformError`]
//! whose [`ErrorKind`] tells a transport how to report it.
//!
//! ## Quick Start
//!
//! ```rust
//! use pdfsmith::engine::mock::sample_pdf;
//! use pdfsmith::operations::{rasterize, RasterizeParams};
//! use pdfsmith::{Deadline, Engines, ScratchSpace, Upload};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engines = Engines::mock(ScratchSpace::system());
//! let upload = Upload::new(sample_pdf(3));
//!
//! let params = RasterizeParams::from_form(Some("png"));
//! let result = rasterize(&engines, &upload, &params, Deadline::none())?;
//! assert_eq!(result.artifact.filename, "Converted_Images.zip");
//! # Ok(())
//! # }
//! ```
//!
//! Production deployments use [`Engines::system`], which shells out to
//! `qpdf`, `pdftoppm`, `tesseract` and `soffice`.

pub mod archive;
pub mod artifact;
pub mod config;
pub mod deadline;
pub mod engine;
pub mod error;
pub mod operations;
pub mod scratch;

pub use archive::Archive;
pub use artifact::{
    Artifact, ImageFormat, PageImage, SizeMetrics, TransformResult, Upload, MIME_DOCX, MIME_PDF,
    MIME_TEXT, MIME_ZIP,
};
pub use config::{EngineConfig, ToolPaths};
pub use deadline::Deadline;
pub use engine::Engines;
pub use error::{ErrorKind, Result, TransformError};
pub use scratch::{ScratchDir, ScratchFile, ScratchSpace, SCRATCH_PREFIX};

/// Current version of pdfsmith
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
