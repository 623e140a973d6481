//! Axum router construction.
//!
//! Builds the full application router with all routes, middleware layers,
//! and static file serving.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::upload::upload_image,
        routes::results::get_result,
    ),
    components(schemas(
        routes::upload::UploadForm,
        routes::upload::AnalysisResponse,
        sl_vision::AnalysisReport,
        sl_vision::BoundingBox,
        sl_vision::DetectedObject,
    ))
)]
pub struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = ctx.config.server.max_upload_bytes;

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/upload",
            post(routes::upload::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/results/{filename}", get(routes::results::get_result))
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Static front-end; must be in place before the layers so it shares them.
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        } else {
            tracing::warn!("Static directory {:?} does not exist; GET / disabled", dir);
        }
    }

    app.layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
