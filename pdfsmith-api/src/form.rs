//! Multipart form decoding shared by every document route

use crate::error::AppError;
use axum::extract::Multipart;
use pdfsmith::operations::FILE_FIELD;
use pdfsmith::{TransformError, Upload};
use std::collections::HashMap;
use tracing::debug;

pub const PASSWORD_FIELD: &str = "password";
pub const FORMAT_FIELD: &str = "format";

/// A decoded `multipart/form-data` submission.
///
/// When a field name repeats, the first occurrence wins and later ones are
/// skipped unread.
#[derive(Default)]
pub struct DocumentForm {
    upload: Option<Upload>,
    fields: HashMap<String, String>,
}

impl DocumentForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == FILE_FIELD {
                if form.upload.is_some() {
                    continue;
                }
                let filename = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await?;
                let mut upload = Upload::new(bytes.to_vec());
                if let Some(filename) = filename {
                    upload = upload.with_filename(filename);
                }
                form.upload = Some(upload);
            } else if !form.fields.contains_key(&name) {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        debug!(
            upload_bytes = form.upload.as_ref().map(Upload::len),
            fields = form.fields.len(),
            "read multipart form"
        );
        Ok(form)
    }

    /// Takes the uploaded document, failing when no `file` part was sent.
    pub fn take_upload(&mut self) -> Result<Upload, TransformError> {
        self.upload
            .take()
            .ok_or_else(|| TransformError::MissingInput(FILE_FIELD.to_string()))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// A text field that must be present. An empty value is accepted.
    pub fn require(&self, name: &str) -> Result<String, TransformError> {
        self.text(name)
            .map(str::to_owned)
            .ok_or_else(|| TransformError::MissingInput(name.to_string()))
    }
}

impl std::fmt::Debug for DocumentForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("DocumentForm")
            .field("upload_bytes", &self.upload.as_ref().map(Upload::len))
            .field("fields", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfsmith::ErrorKind;

    fn form_with(fields: &[(&str, &str)]) -> DocumentForm {
        DocumentForm {
            upload: None,
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_missing_upload() {
        let mut form = form_with(&[]);
        let err = form.take_upload().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingInput);
        assert_eq!(err.to_string(), "Missing file");
    }

    #[test]
    fn test_require_accepts_empty_value() {
        let form = form_with(&[(PASSWORD_FIELD, "")]);
        assert_eq!(form.require(PASSWORD_FIELD).unwrap(), "");
    }

    #[test]
    fn test_require_missing_field() {
        let form = form_with(&[(FORMAT_FIELD, "png")]);
        let err = form.require(PASSWORD_FIELD).unwrap_err();
        assert_eq!(err.to_string(), "Missing password");
    }

    #[test]
    fn test_debug_hides_values() {
        let form = form_with(&[(PASSWORD_FIELD, "hunter2")]);
        let rendered = format!("{form:?}");
        assert!(rendered.contains("password"));
        assert!(!rendered.contains("hunter2"));
    }
}
