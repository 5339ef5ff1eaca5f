//! Size optimization

use super::ensure_document;
use crate::artifact::{Artifact, SizeMetrics, TransformResult, Upload, MIME_PDF};
use crate::deadline::Deadline;
use crate::engine::{Engines, OptimizeOptions};
use crate::error::Result;
use tracing::{debug, info};

pub const COMPRESSED_FILENAME: &str = "Compressed_Document.pdf";

/// Re-serializes the upload linearized and with generated object streams.
///
/// The result is returned even when it is larger than the input; both sizes
/// travel in [`TransformResult::metrics`].
pub fn compress(engines: &Engines, upload: &Upload, deadline: Deadline) -> Result<TransformResult> {
    ensure_document(upload)?;
    let original_bytes = upload.len();
    debug!(bytes = original_bytes, codec = engines.codec.name(), "compressing document");

    let pdf = engines
        .codec
        .optimize(upload.as_bytes(), OptimizeOptions::maximum(), deadline)
        .map_err(|e| e.without_credentials(engines.codec.name()))?;

    let metrics = SizeMetrics {
        original_bytes,
        produced_bytes: pdf.len(),
    };
    info!(
        original = metrics.original_bytes,
        compressed = metrics.produced_bytes,
        "compressed document"
    );

    Ok(
        TransformResult::new(Artifact::new(COMPRESSED_FILENAME, MIME_PDF, pdf))
            .with_metrics(metrics),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::{sample_pdf, MockCodec};
    use crate::error::ErrorKind;
    use crate::scratch::ScratchSpace;
    use std::sync::Arc;

    #[test]
    fn test_metrics_match_exact_lengths() {
        let engines = Engines::mock(ScratchSpace::system());
        let upload = Upload::new(sample_pdf(3));

        let result = compress(&engines, &upload, Deadline::none()).unwrap();
        let metrics = result.metrics.unwrap();

        assert_eq!(result.artifact.filename, "Compressed_Document.pdf");
        assert_eq!(metrics.original_bytes, upload.len());
        assert_eq!(metrics.produced_bytes, result.artifact.len());
    }

    #[test]
    fn test_larger_output_is_still_returned() {
        let engines = Engines::mock(ScratchSpace::system());
        let upload = Upload::new(sample_pdf(1));

        let result = compress(&engines, &upload, Deadline::none()).unwrap();
        let metrics = result.metrics.unwrap();
        // the mock only ever adds a linearization marker
        assert!(metrics.produced_bytes > metrics.original_bytes);
    }

    #[test]
    fn test_engine_failure_is_processing_failure() {
        let mut engines = Engines::mock(ScratchSpace::system());
        engines.codec = Arc::new(MockCodec::failing("xref stream is damaged"));

        let err = compress(&engines, &Upload::new(sample_pdf(1)), Deadline::none()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProcessingFailed);
        assert_eq!(err.to_string(), "mock-codec failed: xref stream is damaged");
    }
}
