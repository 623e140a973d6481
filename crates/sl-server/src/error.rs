//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`sl_core::Error`] so that route handlers
//! can return `Result<T, AppError>` and use `?` on core results.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: sl_core::Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: sl_core::Error) -> Self {
        Self {
            inner,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: String) -> Self {
        self.request_id = Some(id);
        self
    }

    pub fn inner(&self) -> &sl_core::Error {
        &self.inner
    }
}

impl From<sl_core::Error> for AppError {
    fn from(e: sl_core::Error) -> Self {
        Self::new(e)
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        let inner = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            sl_core::Error::PayloadTooLarge(e.body_text())
        } else {
            sl_core::Error::validation(format!("Malformed multipart body: {}", e.body_text()))
        };
        Self::new(inner)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
        }

        let code = match &self.inner {
            sl_core::Error::NotFound { .. } => "not_found",
            sl_core::Error::Validation(_) => "validation_error",
            sl_core::Error::PayloadTooLarge(_) => "payload_too_large",
            sl_core::Error::Io { .. } => "io_error",
            sl_core::Error::Image { .. } => "image_error",
            sl_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.inner.to_string(),
            "code": code,
            "request_id": self.request_id,
        });

        (status, axum::Json(body)).into_response()
    }
}
