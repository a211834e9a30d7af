use axum::{Router, routing::{get, post}};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    alert_handler, health_handler, metrics_handler, send_markdown, send_markdown_default,
    send_text, send_text_default, usage_handler,
};
use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(usage_handler).post(alert_handler))
        .route("/api/send", post(send_text_default))
        .route("/api/send/{target}", post(send_text))
        .route("/api/send/markdown", post(send_markdown_default))
        .route("/api/send/markdown/{target}", post(send_markdown))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
