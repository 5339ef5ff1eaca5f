//! Request-scoped inputs and outputs of a transformation

use std::fmt;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT: &str = "text/plain; charset=utf-8";
pub const MIME_ZIP: &str = "application/zip";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// An uploaded document
#[derive(Debug, Clone)]
pub struct Upload {
    /// File name as sent by the client, if any
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Output format for rasterized pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    Png,
    #[default]
    Jpeg,
}

impl ImageFormat {
    /// Parses a client-supplied format name.
    ///
    /// Only `png` (any case, surrounding whitespace ignored) selects PNG.
    /// Everything else, including no value at all, falls back to JPEG.
    pub fn from_form(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("png") => ImageFormat::Png,
            _ => ImageFormat::Jpeg,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "png"),
            ImageFormat::Jpeg => write!(f, "jpeg"),
        }
    }
}

/// One rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// 1-based page number in the source document
    pub page: usize,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl PageImage {
    /// Download name for this page, e.g. `Page_3.png`
    pub fn file_name(&self) -> String {
        format!("Page_{}.{}", self.page, self.format.extension())
    }
}

/// Byte counts reported alongside compressed output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMetrics {
    pub original_bytes: usize,
    pub produced_bytes: usize,
}

/// A single downloadable file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(filename: impl Into<String>, mime_type: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// What an operation hands back to the transport
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub artifact: Artifact,
    pub metrics: Option<SizeMetrics>,
}

impl TransformResult {
    pub fn new(artifact: Artifact) -> Self {
        Self {
            artifact,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: SizeMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}
