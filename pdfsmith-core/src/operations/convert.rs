//! PDF to editable word-processing document

use super::ensure_document;
use crate::artifact::{Artifact, TransformResult, Upload, MIME_DOCX};
use crate::deadline::Deadline;
use crate::engine::Engines;
use crate::error::{Result, TransformError};
use tracing::{debug, info};

pub const CONVERTED_FILENAME: &str = "Converted_Document.docx";

/// Converts the upload to DOCX through the path-based converter.
///
/// The upload is written to a scratch `.pdf`, the converter writes a scratch
/// `.docx`, and the result is read back into memory. Both scratch files are
/// owned by this call and removed before it returns, on success and on every
/// error path.
pub fn convert_to_docx(
    engines: &Engines,
    upload: &Upload,
    deadline: Deadline,
) -> Result<TransformResult> {
    ensure_document(upload)?;
    debug!(bytes = upload.len(), converter = engines.converter.name(), "converting document");

    let mut input = engines.scratch.file(".pdf")?;
    input.write_all(upload.as_bytes())?;
    let output = engines.scratch.file(".docx")?;

    engines
        .converter
        .convert(input.path(), output.path(), deadline)?;
    let docx = output.read()?;

    drop(output);
    drop(input);

    if docx.is_empty() {
        return Err(TransformError::InvalidOutput(format!(
            "{} produced an empty document",
            engines.converter.name()
        )));
    }

    info!(input = upload.len(), output = docx.len(), "converted document");
    Ok(TransformResult::new(Artifact::new(
        CONVERTED_FILENAME,
        MIME_DOCX,
        docx,
    )))
}
