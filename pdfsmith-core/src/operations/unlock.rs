//! Password removal

use super::{ensure_document, Redacted};
use crate::artifact::{Artifact, TransformResult, Upload, MIME_PDF};
use crate::deadline::Deadline;
use crate::engine::Engines;
use crate::error::Result;
use tracing::{debug, info};

pub const UNLOCKED_FILENAME: &str = "Unlocked.pdf";

#[derive(Clone)]
pub struct UnlockParams {
    /// The only credential tried when opening the document
    pub password: String,
}

impl std::fmt::Debug for UnlockParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnlockParams")
            .field("password", &Redacted)
            .finish()
    }
}

/// Opens the upload with `params.password` and re-serializes it unencrypted.
///
/// A wrong password surfaces as
/// [`ErrorKind::AuthenticationFailed`](crate::ErrorKind::AuthenticationFailed);
/// no document bytes are returned in that case. An unencrypted upload is
/// simply re-serialized.
pub fn unlock(
    engines: &Engines,
    upload: &Upload,
    params: &UnlockParams,
    deadline: Deadline,
) -> Result<TransformResult> {
    ensure_document(upload)?;
    debug!(bytes = upload.len(), codec = engines.codec.name(), "unlocking document");

    let pdf = engines
        .codec
        .decrypt(upload.as_bytes(), &params.password, deadline)?;

    info!(input = upload.len(), output = pdf.len(), "unlocked document");
    Ok(TransformResult::new(Artifact::new(
        UNLOCKED_FILENAME,
        MIME_PDF,
        pdf,
    )))
}
