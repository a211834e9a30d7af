use axum::{Json, body::Bytes, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use std::sync::Arc;

use crate::error::AppError;
use crate::metrics::{RATE_LIMITED, REQUEST_TOTAL};
use crate::models::{self, MessageEnvelope};
use crate::state::AppState;
use crate::targets::DEFAULT_TARGET;

pub async fn usage_handler() -> &'static str {
    "请调用 POST 请求来发送消息"
}

/// Alert intake for monitoring tools posting to `/`.
///
/// Always forwards to the default target. Apart from a rate-limit rejection
/// (429) the caller always gets a 200, so the alert source never sees a
/// failure status and starts retrying.
pub async fn alert_handler(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    REQUEST_TOTAL.inc();

    if !state.rate_limiter.admit(DEFAULT_TARGET) {
        RATE_LIMITED.inc();
        tracing::warn!(target_name = DEFAULT_TARGET, "rate limit exceeded on alert intake");
        return AppError::RateLimited.into_response();
    }

    let envelope = MessageEnvelope::text(models::alert_text(&body));

    let outcome = match state.targets.get(DEFAULT_TARGET) {
        Some(target) => state.forwarder.send(&target.url, &envelope).await.map_err(|e| e.to_string()),
        None => Err("default target is not configured".to_string()),
    };

    let body = match outcome {
        Ok(result) => {
            tracing::info!(response = %result, "alert forwarded");
            json!({
                "status": "ok",
                "message": "消息已发送",
                "wechatResult": result,
            })
        }
        Err(e) => {
            tracing::error!("alert forwarding failed: {}", e);
            json!({
                "status": "ok",
                "message": "消息发送过程中出现错误，但已记录",
                "error": e,
            })
        }
    };

    (StatusCode::OK, Json(body)).into_response()
}
