//! # pdfsmith-api
//!
//! HTTP front end for the pdfsmith document transformations
//!

mod api;
mod cli;
mod error;
mod form;
mod state;

pub use api::{
    app, compress_pdf, convert_to_word, health_check, ocr_pdf, pdf_to_images, protect_pdf,
    unlock_pdf, HealthResponse, X_COMPRESSED_SIZE, X_ORIGINAL_SIZE,
};
pub use cli::Cli;
pub use error::AppError;
pub use form::{DocumentForm, FORMAT_FIELD, PASSWORD_FIELD};
pub use state::{AppState, ServiceConfig, DEFAULT_MAX_UPLOAD_MB, DEFAULT_TIMEOUT_SECS};
