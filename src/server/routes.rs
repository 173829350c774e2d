// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    health_handler, image_handler, metrics_handler, not_found_handler, prompt_handler,
    remove_background_handler,
};
use super::middleware::{request_id_layers, track_metrics};
use crate::bria::BriaClient;
use crate::config::AppConfig;
use crate::error::Result;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Room left on top of the image itself for multipart headers and flag fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub bria_client: Arc<BriaClient>,
}

pub fn create_router(config: AppConfig, bria_client: BriaClient) -> Result<Router> {
    let body_limit = config.limits.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    let state = AppState {
        config,
        bria_client: Arc::new(bria_client),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/prompt/:text", get(prompt_handler))
        .route("/image/:text", get(image_handler))
        .route("/removebg", post(remove_background_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // Runs after routing so the matched path is available as a label
        .route_layer(middleware::from_fn(track_metrics))
        .fallback(not_found_handler)
        // Replaces axum's 2MB default; multipart reads past it fail with 413
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
