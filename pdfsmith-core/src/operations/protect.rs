//! Password protection

use super::{ensure_document, Redacted};
use crate::artifact::{Artifact, TransformResult, Upload, MIME_PDF};
use crate::deadline::Deadline;
use crate::engine::{EncryptionPolicy, Engines};
use crate::error::Result;
use tracing::{debug, info};

pub const PROTECTED_FILENAME: &str = "Protected.pdf";

#[derive(Clone)]
pub struct ProtectParams {
    /// Used as both the open and the owner password
    pub password: String,
}

impl std::fmt::Debug for ProtectParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtectParams")
            .field("password", &Redacted)
            .finish()
    }
}

/// Encrypts the upload with a single password and extraction disabled.
///
/// Password strength is not checked; an empty password is accepted.
pub fn protect(
    engines: &Engines,
    upload: &Upload,
    params: &ProtectParams,
    deadline: Deadline,
) -> Result<TransformResult> {
    ensure_document(upload)?;
    debug!(bytes = upload.len(), codec = engines.codec.name(), "protecting document");

    let policy = EncryptionPolicy::single_password(&params.password);
    let pdf = engines
        .codec
        .encrypt(upload.as_bytes(), &policy, deadline)
        .map_err(|e| e.without_credentials(engines.codec.name()))?;

    info!(input = upload.len(), output = pdf.len(), "protected document");
    Ok(TransformResult::new(Artifact::new(
        PROTECTED_FILENAME,
        MIME_PDF,
        pdf,
    )))
}
