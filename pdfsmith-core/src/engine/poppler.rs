//! [`Rasterizer`] backed by poppler's `pdftoppm`

use super::process::Tool;
use super::Rasterizer;
use crate::artifact::{ImageFormat, PageImage};
use crate::deadline::Deadline;
use crate::error::{Result, TransformError};
use crate::scratch::ScratchSpace;
use std::path::{Path, PathBuf};
use tracing::debug;

const TOOL: &str = "pdftoppm";
const PAGE_ROOT: &str = "page";

pub struct PdftoppmRasterizer {
    program: PathBuf,
    dpi: u32,
    scratch: ScratchSpace,
}

impl PdftoppmRasterizer {
    pub fn new(program: impl Into<PathBuf>, dpi: u32, scratch: ScratchSpace) -> Self {
        Self {
            program: program.into(),
            dpi,
            scratch,
        }
    }
}

fn format_flag(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "-png",
        ImageFormat::Jpeg => "-jpeg",
    }
}

/// Page number encoded in a pdftoppm output name such as `page-07.jpg`.
///
/// pdftoppm zero-pads the number to the width of the page count, so the
/// names only sort correctly once parsed.
fn page_number(file_name: &str, format: ImageFormat) -> Option<usize> {
    file_name
        .strip_prefix(PAGE_ROOT)?
        .strip_prefix('-')?
        .strip_suffix(format.extension())?
        .strip_suffix('.')?
        .parse()
        .ok()
}

fn collect_pages(dir: &Path, format: ImageFormat) -> Result<Vec<PageImage>> {
    let mut numbered = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(page) = name.to_str().and_then(|n| page_number(n, format)) {
            numbered.push((page, entry.path()));
        }
    }

    if numbered.is_empty() {
        return Err(TransformError::InvalidOutput(
            "pdftoppm produced no pages".to_string(),
        ));
    }
    numbered.sort_by_key(|(page, _)| *page);

    numbered
        .into_iter()
        .enumerate()
        .map(|(index, (_, path))| -> Result<PageImage> {
            Ok(PageImage {
                page: index + 1,
                format,
                bytes: std::fs::read(path)?,
            })
        })
        .collect()
}

impl Rasterizer for PdftoppmRasterizer {
    fn rasterize(
        &self,
        pdf: &[u8],
        format: ImageFormat,
        deadline: Deadline,
    ) -> Result<Vec<PageImage>> {
        let dir = self.scratch.dir()?;
        let input = dir.write("input.pdf", pdf)?;
        let pages_dir = dir.join("pages");
        std::fs::create_dir(&pages_dir)?;

        let run = Tool::new(TOOL, &self.program)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(format_flag(format))
            .arg(&input)
            .arg(pages_dir.join(PAGE_ROOT))
            .run(&dir, deadline)?;

        if !run.success() {
            if run.stderr.contains("Incorrect password") {
                return Err(TransformError::engine(TOOL, "document is password protected"));
            }
            return Err(run.failure(TOOL));
        }

        let pages = collect_pages(&pages_dir, format)?;
        debug!(pages = pages.len(), %format, dpi = self.dpi, "rasterized document");
        Ok(pages)
    }

    fn name(&self) -> &str {
        TOOL
    }
}
