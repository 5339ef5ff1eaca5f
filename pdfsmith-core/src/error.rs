use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a [`TransformError`].
///
/// Transports map this to a status code; nothing finer-grained is part of the
/// public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required file or form field was absent
    MissingInput,
    /// The supplied password does not open the document
    AuthenticationFailed,
    /// Any other engine, I/O or packaging failure
    ProcessingFailed,
}

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Missing {0}")]
    MissingInput(String),

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("{tool} failed: {message}")]
    Engine { tool: String, message: String },

    #[error("{tool} is not available: {source}")]
    EngineUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} exceeded the {}s processing limit", .limit.as_secs())]
    TimedOut { stage: String, limit: Duration },

    #[error("Invalid engine output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl TransformError {
    pub fn engine(tool: impl Into<String>, message: impl Into<String>) -> Self {
        TransformError::Engine {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::MissingInput(_) => ErrorKind::MissingInput,
            TransformError::IncorrectPassword => ErrorKind::AuthenticationFailed,
            TransformError::Engine { .. }
            | TransformError::EngineUnavailable { .. }
            | TransformError::TimedOut { .. }
            | TransformError::InvalidOutput(_)
            | TransformError::Io(_)
            | TransformError::Archive(_) => ErrorKind::ProcessingFailed,
        }
    }

    /// Demotes a password rejection to a plain engine failure.
    ///
    /// Only decryption reports [`ErrorKind::AuthenticationFailed`]; every other
    /// operation treats an encrypted input as a document it cannot process.
    pub(crate) fn without_credentials(self, tool: &str) -> Self {
        match self {
            TransformError::IncorrectPassword => {
                TransformError::engine(tool, "document is password protected")
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
