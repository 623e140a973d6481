//! Per-request correlation ids.
//!
//! Every request carries a [`RequestId`]: the caller's `x-request-id` when it
//! sent a usable one, a fresh UUID otherwise. Upload failures echo it in the
//! JSON error body, and all logs for the request run inside a span tagged
//! with it.

use std::fmt;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Longest caller-supplied id that is accepted as is.
const MAX_LEN: usize = 128;

/// Correlation id stored in the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse the caller's id when it is non-empty, short, and header-safe.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(&X_REQUEST_ID)?.to_str().ok()?.trim();
        (!value.is_empty() && value.len() <= MAX_LEN).then(|| Self(value.to_string()))
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tag the request with a [`RequestId`] and copy it onto the response.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = RequestId::from_headers(request.headers()).unwrap_or_else(RequestId::generate);
    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    request.extensions_mut().insert(id.clone());
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        response.headers_mut().insert(X_REQUEST_ID.clone(), value);
    }
    response
}
