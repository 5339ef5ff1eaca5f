use crate::state::{ServiceConfig, DEFAULT_MAX_UPLOAD_MB, DEFAULT_TIMEOUT_SECS};
use clap::Parser;
use pdfsmith::config::{DEFAULT_DPI, DEFAULT_OCR_LANGUAGE};
use pdfsmith::{EngineConfig, ToolPaths};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line options, each with an environment variable fallback
#[derive(Parser, Debug)]
#[command(
    name = "pdfsmith-api",
    about = "HTTP service for unlocking, protecting, compressing, OCR and converting PDFs",
    version,
    author
)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "PDFSMITH_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Path to the qpdf binary
    #[arg(long, env = "PDFSMITH_QPDF")]
    pub qpdf: Option<PathBuf>,

    /// Path to the poppler pdftoppm binary
    #[arg(long, env = "PDFSMITH_PDFTOPPM")]
    pub pdftoppm: Option<PathBuf>,

    /// Path to the tesseract binary
    #[arg(long, env = "PDFSMITH_TESSERACT")]
    pub tesseract: Option<PathBuf>,

    /// Path to the LibreOffice soffice binary
    #[arg(long, env = "PDFSMITH_SOFFICE")]
    pub soffice: Option<PathBuf>,

    /// Rendering resolution for OCR and image export
    #[arg(long, env = "PDFSMITH_DPI", default_value_t = DEFAULT_DPI)]
    pub dpi: u32,

    /// Tesseract language, e.g. "eng" or "eng+deu"
    #[arg(long, env = "PDFSMITH_OCR_LANGUAGE", default_value = DEFAULT_OCR_LANGUAGE)]
    pub ocr_language: String,

    /// Per-request processing limit in seconds
    #[arg(long, env = "PDFSMITH_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Largest accepted upload in MiB
    #[arg(long, env = "PDFSMITH_MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    pub max_upload_mb: usize,

    /// Directory for scratch files (defaults to the OS temp dir)
    #[arg(long, env = "PDFSMITH_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        let host = ToolPaths::for_host();
        EngineConfig {
            tools: ToolPaths {
                qpdf: self.qpdf.clone().unwrap_or(host.qpdf),
                pdftoppm: self.pdftoppm.clone().unwrap_or(host.pdftoppm),
                tesseract: self.tesseract.clone().unwrap_or(host.tesseract),
                soffice: self.soffice.clone().unwrap_or(host.soffice),
            },
            dpi: self.dpi,
            ocr_language: self.ocr_language.clone(),
            scratch_root: self
                .scratch_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
        }
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            request_timeout: Duration::from_secs(self.timeout_secs),
            max_upload_bytes: self.max_upload_mb.saturating_mul(1024 * 1024),
        }
    }
}
