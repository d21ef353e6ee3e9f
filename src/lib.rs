pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;

use crate::config::ProxyConfig;
use crate::services::media_service::MediaService;
use crate::services::records::FileRecordStore;
use axum::{Json, Router, http::HeaderValue, middleware::from_fn, routing::get};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::files::stream_file,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "files", description = "Media delivery"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn FileRecordStore>,
    pub media: Arc<MediaService>,
    pub config: ProxyConfig,
}

impl AppState {
    pub fn new(media: MediaService, config: ProxyConfig) -> Self {
        Self {
            records: media.records().clone(),
            media: Arc::new(media),
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/health", get(api::handlers::health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/:file_id", get(api::handlers::files::stream_file))
        .layer(cors)
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Any origin unless an explicit list is configured.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any).expose_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .expose_headers(Any)
}
