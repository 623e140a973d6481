//! Image upload and analysis.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use sl_vision::{analyze_image, decode_image, AnalysisReport};
use utoipa::ToSchema;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::storage::{allowed_file, secure_filename};

/// Multipart form field carrying the image.
pub const FILE_FIELD: &str = "file";

// ============================================================================
// Request / response types
// ============================================================================

/// Multipart body of `POST /upload`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// Image file (png, jpg, jpeg, gif).
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Successful analysis.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /upload
///
/// Saves the uploaded image, runs the structure analysis on it, writes the
/// annotated copy to the result directory, and returns the summary.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Analysis complete", body = AnalysisResponse),
        (status = 400, description = "Missing file, bad extension, or unreadable image"),
        (status = 413, description = "Upload exceeds the size limit"),
    )
)]
pub async fn upload_image(
    State(ctx): State<AppContext>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let result = match multipart {
        Ok(multipart) => handle_upload(ctx, multipart).await,
        // Not a multipart request at all, so there is no file part either.
        Err(rejection) => {
            tracing::debug!("Multipart rejection: {rejection}");
            Err(sl_core::Error::validation("No file uploaded").into())
        }
    };
    result
        .map(Json)
        .map_err(|e| e.with_request_id(request_id))
}

async fn handle_upload(
    ctx: AppContext,
    mut multipart: Multipart,
) -> Result<AnalysisResponse, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        upload = Some((filename, data));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err(sl_core::Error::validation("No file uploaded").into());
    };
    if filename.is_empty() {
        return Err(sl_core::Error::validation("No selected file").into());
    }
    if !allowed_file(&filename) {
        return Err(sl_core::Error::validation("File type not allowed").into());
    }

    let stored_name = secure_filename(&filename);
    tracing::info!(
        filename = %stored_name,
        bytes = data.len(),
        "Received upload"
    );

    let store = ctx.store.clone();
    let detector = ctx.detector.clone();
    let params = ctx.params;

    let report = tokio::task::spawn_blocking(move || -> sl_core::Result<AnalysisReport> {
        store.save_upload(&stored_name, &data)?;
        let image = decode_image(&data)?;
        let analysis = analyze_image(&image, &params, detector.as_ref());
        let output_image = store.save_result(&analysis.annotated)?;
        Ok(analysis.into_report(output_image))
    })
    .await
    .map_err(|e| sl_core::Error::Internal(format!("Analysis task failed: {e}")))??;

    tracing::info!(
        output = %report.output_image,
        parts = report.number_of_parts,
        "Analysis complete"
    );

    Ok(AnalysisResponse {
        message: "Analysis complete".to_string(),
        report,
    })
}
