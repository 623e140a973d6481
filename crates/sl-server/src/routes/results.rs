//! Serving annotated result images.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::context::AppContext;
use crate::error::AppError;
use crate::storage::content_type_for;

/// GET /results/{filename}
#[utoipa::path(
    get,
    path = "/results/{filename}",
    params(("filename" = String, Path, description = "Name returned as `output_image`")),
    responses(
        (status = 200, description = "The annotated image", body = [u8], content_type = "image/png"),
        (status = 404, description = "No such result"),
    )
)]
pub async fn get_result(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let path = ctx
        .store
        .result_path(&filename)
        .ok_or_else(|| sl_core::Error::not_found("result", &filename))?;

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(sl_core::Error::not_found("result", &filename).into());
        }
        Err(e) => return Err(sl_core::Error::from(e).into()),
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type_for(&filename))],
        data,
    ))
}
