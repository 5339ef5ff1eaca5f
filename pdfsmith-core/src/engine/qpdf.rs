//! [`PdfCodec`] backed by the qpdf command-line tool

use super::process::{Tool, ToolRun};
use super::{EncryptionPolicy, OptimizeOptions, PdfCodec};
use crate::deadline::Deadline;
use crate::error::{Result, TransformError};
use crate::scratch::ScratchSpace;
use std::path::PathBuf;
use tracing::debug;

const TOOL: &str = "qpdf";

/// qpdf exits with 3 when it succeeded but had to repair the input
const EXIT_WARNINGS: i32 = 3;

const KEY_BITS: &str = "--bits=256";

pub struct QpdfCodec {
    program: PathBuf,
    scratch: ScratchSpace,
}

impl QpdfCodec {
    pub fn new(program: impl Into<PathBuf>, scratch: ScratchSpace) -> Self {
        Self {
            program: program.into(),
            scratch,
        }
    }

    /// Runs `qpdf @args input.pdf output.pdf` and returns the output bytes.
    ///
    /// Options travel through an argument file so passwords never appear on
    /// the process command line.
    fn rewrite(&self, pdf: &[u8], options: &[String], deadline: Deadline) -> Result<Vec<u8>> {
        let dir = self.scratch.dir()?;
        let input = dir.write("input.pdf", pdf)?;
        let output = dir.join("output.pdf");
        let args = dir.write("qpdf.args", options.join("\n").as_bytes())?;

        let mut arg_ref = std::ffi::OsString::from("@");
        arg_ref.push(&args);

        let run = Tool::new(TOOL, &self.program)
            .arg(arg_ref)
            .arg(&input)
            .arg(&output)
            .run(&dir, deadline)?;
        check(&run)?;

        Ok(std::fs::read(&output)?)
    }
}

fn check(run: &ToolRun) -> Result<()> {
    if run.success() {
        return Ok(());
    }
    if run.exit_code() == Some(EXIT_WARNINGS) {
        debug!(warnings = %run.stderr.trim(), "qpdf repaired input");
        return Ok(());
    }
    if run.stderr.contains("invalid password") {
        return Err(TransformError::IncorrectPassword);
    }
    Err(run.failure(TOOL))
}

fn ensure_single_line(password: &str) -> Result<()> {
    if password.contains(['\n', '\r']) {
        return Err(TransformError::engine(
            TOOL,
            "passwords containing line breaks are not supported",
        ));
    }
    Ok(())
}

fn encrypt_options(policy: &EncryptionPolicy) -> Vec<String> {
    let mut options = vec![
        "--encrypt".to_string(),
        format!("--user-password={}", policy.user_password),
        format!("--owner-password={}", policy.owner_password),
        KEY_BITS.to_string(),
    ];
    if !policy.allow_extraction {
        options.push("--extract=n".to_string());
    }
    if policy.owner_password.is_empty() {
        options.push("--allow-insecure".to_string());
    }
    options.push("--".to_string());
    options
}

fn optimize_options(options: OptimizeOptions) -> Vec<String> {
    let mut args = Vec::new();
    if options.linearize {
        args.push("--linearize".to_string());
    }
    if options.object_streams {
        args.push("--object-streams=generate".to_string());
    }
    args
}

impl PdfCodec for QpdfCodec {
    fn decrypt(&self, pdf: &[u8], password: &str, deadline: Deadline) -> Result<Vec<u8>> {
        if password.contains(['\n', '\r']) {
            return Err(TransformError::IncorrectPassword);
        }
        let options = vec![format!("--password={password}"), "--decrypt".to_string()];
        self.rewrite(pdf, &options, deadline)
    }

    fn encrypt(
        &self,
        pdf: &[u8],
        policy: &EncryptionPolicy,
        deadline: Deadline,
    ) -> Result<Vec<u8>> {
        ensure_single_line(&policy.user_password)?;
        ensure_single_line(&policy.owner_password)?;
        self.rewrite(pdf, &encrypt_options(policy), deadline)
    }

    fn optimize(
        &self,
        pdf: &[u8],
        options: OptimizeOptions,
        deadline: Deadline,
    ) -> Result<Vec<u8>> {
        self.rewrite(pdf, &optimize_options(options), deadline)
    }

    fn name(&self) -> &str {
        TOOL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_options_single_password() {
        let options = encrypt_options(&EncryptionPolicy::single_password("s3cret"));
        assert_eq!(
            options,
            vec![
                "--encrypt",
                "--user-password=s3cret",
                "--owner-password=s3cret",
                "--bits=256",
                "--extract=n",
                "--",
            ]
        );
    }

    #[test]
    fn test_encrypt_options_empty_password_allows_insecure() {
        let options = encrypt_options(&EncryptionPolicy::single_password(""));
        assert!(options.contains(&"--allow-insecure".to_string()));
        assert_eq!(options.last().map(String::as_str), Some("--"));
    }

    #[test]
    fn test_optimize_options() {
        assert_eq!(
            optimize_options(OptimizeOptions::maximum()),
            vec!["--linearize", "--object-streams=generate"]
        );
        let none = OptimizeOptions {
            linearize: false,
            object_streams: false,
        };
        assert!(optimize_options(none).is_empty());
    }

    #[test]
    fn test_multiline_password_rejected_before_spawning() {
        let codec = QpdfCodec::new("/nonexistent/qpdf", ScratchSpace::system());
        let policy = EncryptionPolicy::single_password("a\nb");
        let err = codec
            .encrypt(b"%PDF-1.7", &policy, Deadline::none())
            .unwrap_err();
        assert!(matches!(err, TransformError::Engine { .. }));

        let err = codec.decrypt(b"%PDF-1.7", "a\r\nb", Deadline::none()).unwrap_err();
        assert!(matches!(err, TransformError::IncorrectPassword));
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let root = tempfile::tempdir().unwrap();
        let codec = QpdfCodec::new("/nonexistent/qpdf", ScratchSpace::new(root.path()));
        let err = codec
            .optimize(b"%PDF-1.7", OptimizeOptions::maximum(), Deadline::none())
            .unwrap_err();
        assert!(matches!(err, TransformError::EngineUnavailable { .. }));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
