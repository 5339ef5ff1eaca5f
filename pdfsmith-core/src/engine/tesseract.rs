//! [`TextRecognizer`] backed by the tesseract command-line tool
//!
//! # Installation
//!
//! ## macOS
//! ```bash
//! brew install tesseract
//! ```
//!
//! ## Ubuntu/Debian
//! ```bash
//! sudo apt-get install tesseract-ocr
//! sudo apt-get install tesseract-ocr-deu  # additional languages
//! ```
//!
//! ## Windows
//! Download from: https://github.com/UB-Mannheim/tesseract/wiki

use super::process::Tool;
use super::TextRecognizer;
use crate::artifact::PageImage;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::scratch::ScratchSpace;
use std::path::PathBuf;

const TOOL: &str = "tesseract";
const OUTPUT_BASE: &str = "out";

pub struct TesseractRecognizer {
    program: PathBuf,
    language: String,
    scratch: ScratchSpace,
}

impl TesseractRecognizer {
    pub fn new(program: impl Into<PathBuf>, language: &str, scratch: ScratchSpace) -> Self {
        Self {
            program: program.into(),
            language: language.to_string(),
            scratch,
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &PageImage, deadline: Deadline) -> Result<String> {
        let dir = self.scratch.dir()?;
        let input = dir.write(&image.file_name(), &image.bytes)?;

        // tesseract appends `.txt` to the output base itself
        let run = Tool::new(TOOL, &self.program)
            .arg(&input)
            .arg(dir.join(OUTPUT_BASE))
            .arg("-l")
            .arg(&self.language)
            .run(&dir, deadline)?;
        if !run.success() {
            return Err(run.failure(TOOL));
        }

        let text = std::fs::read(dir.join(format!("{OUTPUT_BASE}.txt")))?;
        Ok(String::from_utf8_lossy(&text).into_owned())
    }

    fn name(&self) -> &str {
        TOOL
    }
}
