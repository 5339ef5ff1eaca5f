//! [`DocumentConverter`] backed by a headless LibreOffice

use super::process::Tool;
use super::DocumentConverter;
use crate::deadline::Deadline;
use crate::error::{Result, TransformError};
use crate::scratch::ScratchSpace;
use std::path::{Path, PathBuf};
use tracing::debug;

const TOOL: &str = "soffice";
const SOURCE_STEM: &str = "source";
const DOCX_FILTER: &str = "docx:MS Word 2007 XML";

pub struct SofficeConverter {
    program: PathBuf,
    scratch: ScratchSpace,
}

impl SofficeConverter {
    pub fn new(program: impl Into<PathBuf>, scratch: ScratchSpace) -> Self {
        Self {
            program: program.into(),
            scratch,
        }
    }
}

/// `file://` URL form LibreOffice expects for `-env:UserInstallation`
fn file_url(path: &Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{path}")
    } else {
        format!("file:///{path}")
    }
}

impl DocumentConverter for SofficeConverter {
    fn convert(&self, input: &Path, output: &Path, deadline: Deadline) -> Result<()> {
        // A private profile per call; LibreOffice refuses to run two
        // conversions against the same user installation.
        let dir = self.scratch.dir()?;
        let profile = dir.join("profile");
        let out_dir = dir.join("out");
        std::fs::create_dir(&out_dir)?;

        // soffice names its output after the input stem
        let source = dir.join(format!("{SOURCE_STEM}.pdf"));
        std::fs::copy(input, &source)?;

        let run = Tool::new(TOOL, &self.program)
            .arg("--headless")
            .arg("--norestore")
            .arg(format!("-env:UserInstallation={}", file_url(&profile)))
            .arg("--infer_filter=writer_pdf_import")
            .arg("--convert-to")
            .arg(DOCX_FILTER)
            .arg("--outdir")
            .arg(&out_dir)
            .arg(&source)
            .run(&dir, deadline)?;
        if !run.success() {
            return Err(run.failure(TOOL));
        }

        let produced = out_dir.join(format!("{SOURCE_STEM}.docx"));
        if !produced.is_file() {
            let detail = run.stderr.trim();
            return Err(TransformError::engine(
                TOOL,
                if detail.is_empty() {
                    "conversion produced no output".to_string()
                } else {
                    format!("conversion produced no output: {detail}")
                },
            ));
        }

        let bytes = std::fs::copy(&produced, output)?;
        debug!(bytes, "converted document");
        Ok(())
    }

    fn name(&self) -> &str {
        TOOL
    }
}
