use crate::error::AppError;
use crate::form::{DocumentForm, FORMAT_FIELD, PASSWORD_FIELD};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use pdfsmith::operations::{self, ProtectParams, RasterizeParams, UnlockParams};
use pdfsmith::TransformResult;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Size of the uploaded document, set on `/compress` responses
pub const X_ORIGINAL_SIZE: HeaderName = HeaderName::from_static("x-original-size");

/// Size of the optimized document, set on `/compress` responses
pub const X_COMPRESSED_SIZE: HeaderName = HeaderName::from_static("x-compressed-size");

/// Response for the health check endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Build the application router with all routes configured
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Document operations
        .route("/unlock", post(unlock_pdf))
        .route("/protect", post(protect_pdf))
        .route("/compress", post(compress_pdf))
        .route("/ocr", post(ocr_pdf))
        .route("/pdf-to-img", post(pdf_to_images))
        .route("/pdf-to-word", post(convert_to_word))
        // Monitoring
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin may call the service. Custom response headers are only
/// readable from scripts when listed here.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            X_ORIGINAL_SIZE,
            X_COMPRESSED_SIZE,
            header::CONTENT_DISPOSITION,
        ])
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "pdfsmith API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Remove the password from an encrypted document
pub async fn unlock_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = DocumentForm::read(multipart).await?;
    let upload = form.take_upload()?;
    let params = UnlockParams {
        password: form.require(PASSWORD_FIELD)?,
    };

    let result = state
        .run(move |engines, deadline| operations::unlock(engines, &upload, &params, deadline))
        .await?;
    attachment(result)
}

/// Encrypt a document with a single password and block text extraction
pub async fn protect_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = DocumentForm::read(multipart).await?;
    let upload = form.take_upload()?;
    let params = ProtectParams {
        password: form.require(PASSWORD_FIELD)?,
    };

    let result = state
        .run(move |engines, deadline| operations::protect(engines, &upload, &params, deadline))
        .await?;
    attachment(result)
}

/// Linearize and pack object streams, reporting both sizes in headers
pub async fn compress_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = DocumentForm::read(multipart).await?;
    let upload = form.take_upload()?;

    let result = state
        .run(move |engines, deadline| operations::compress(engines, &upload, deadline))
        .await?;
    attachment(result)
}

/// OCR every page into one text file
pub async fn ocr_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = DocumentForm::read(multipart).await?;
    let upload = form.take_upload()?;

    let result = state
        .run(move |engines, deadline| operations::extract_text(engines, &upload, deadline))
        .await?;
    attachment(result)
}

/// Render pages to images; several pages come back as a ZIP
pub async fn pdf_to_images(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = DocumentForm::read(multipart).await?;
    let upload = form.take_upload()?;
    let params = RasterizeParams::from_form(form.text(FORMAT_FIELD));

    let result = state
        .run(move |engines, deadline| operations::rasterize(engines, &upload, &params, deadline))
        .await?;
    attachment(result)
}

/// Convert to an editable word-processing document
pub async fn convert_to_word(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = DocumentForm::read(multipart).await?;
    let upload = form.take_upload()?;

    let result = state
        .run(move |engines, deadline| operations::convert_to_docx(engines, &upload, deadline))
        .await?;
    attachment(result)
}

/// Turns a transformation result into a file download.
fn attachment(result: TransformResult) -> Result<Response, AppError> {
    let TransformResult { artifact, metrics } = result;
    info!(
        filename = %artifact.filename,
        bytes = artifact.len(),
        "sending artifact"
    );

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, artifact.mime_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        )
        .header(header::CONTENT_LENGTH, artifact.len());

    if let Some(metrics) = metrics {
        builder = builder
            .header(X_ORIGINAL_SIZE, metrics.original_bytes)
            .header(X_COMPRESSED_SIZE, metrics.produced_bytes);
    }

    Ok(builder.body(Body::from(artifact.bytes))?)
}
