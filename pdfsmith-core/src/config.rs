//! Engine configuration, resolved once at startup

use std::path::PathBuf;

/// Default rasterization resolution for OCR and image export
pub const DEFAULT_DPI: u32 = 200;

/// Default tesseract language pack
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Locations of the external binaries the system engines shell out to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub qpdf: PathBuf,
    pub pdftoppm: PathBuf,
    pub tesseract: PathBuf,
    pub soffice: PathBuf,
}

impl ToolPaths {
    /// Defaults for the host operating system.
    ///
    /// Windows installers do not put these tools on `PATH`, so the usual
    /// install locations are used there. Everywhere else the bare binary
    /// names are resolved through `PATH`.
    pub fn for_host() -> Self {
        if cfg!(windows) {
            Self {
                qpdf: PathBuf::from(r"C:\Program Files\qpdf\bin\qpdf.exe"),
                pdftoppm: PathBuf::from(r"C:\poppler\Library\bin\pdftoppm.exe"),
                tesseract: PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe"),
                soffice: PathBuf::from(r"C:\Program Files\LibreOffice\program\soffice.exe"),
            }
        } else {
            Self {
                qpdf: PathBuf::from("qpdf"),
                pdftoppm: PathBuf::from("pdftoppm"),
                tesseract: PathBuf::from("tesseract"),
                soffice: PathBuf::from("soffice"),
            }
        }
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self::for_host()
    }
}

/// Immutable settings shared by every engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub tools: ToolPaths,
    /// Resolution used when rendering pages to images
    pub dpi: u32,
    /// Tesseract language selection, e.g. `eng` or `eng+deu`
    pub ocr_language: String,
    /// Directory under which scratch storage is allocated
    pub scratch_root: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tools: ToolPaths::for_host(),
            dpi: DEFAULT_DPI,
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            scratch_root: std::env::temp_dir(),
        }
    }
}
