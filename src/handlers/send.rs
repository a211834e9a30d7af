use axum::{Json, body::Bytes, extract::{Path, State}};
use serde_json::Value;
use std::sync::Arc;

use crate::error::AppError;
use crate::metrics::{RATE_LIMITED, REQUEST_TOTAL, UPSTREAM_ERRORS};
use crate::models::{self, MessageEnvelope};
use crate::state::AppState;
use crate::targets::{DEFAULT_TARGET, Target};

#[derive(Clone, Copy)]
enum Kind {
    Text,
    Markdown,
}

pub async fn send_text_default(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    relay(&state, DEFAULT_TARGET, Kind::Text, &body).await
}

pub async fn send_text(
    State(state): State<Arc<AppState>>,
    Path(target): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    relay(&state, &target, Kind::Text, &body).await
}

pub async fn send_markdown_default(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    relay(&state, DEFAULT_TARGET, Kind::Markdown, &body).await
}

pub async fn send_markdown(
    State(state): State<Arc<AppState>>,
    Path(target): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    relay(&state, &target, Kind::Markdown, &body).await
}

// lookup -> rate limit -> validate -> forward
async fn relay(state: &AppState, name: &str, kind: Kind, body: &[u8]) -> Result<Json<Value>, AppError> {
    REQUEST_TOTAL.inc();

    let target = state.targets.get(name).ok_or(AppError::NotFound)?;

    if !state.rate_limiter.admit(name) {
        RATE_LIMITED.inc();
        tracing::warn!(target_name = %name, "rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    let envelope = build_envelope(kind, body)?;
    forward(state, target, &envelope).await.map(Json)
}

fn build_envelope(kind: Kind, body: &[u8]) -> Result<MessageEnvelope, AppError> {
    let body = models::parse_object(body)?;
    let content = models::required_content(&body)?;

    Ok(match kind {
        Kind::Text => MessageEnvelope::text_with_mentions(
            content,
            models::list_or_empty(&body, "mentioned_list"),
            models::list_or_empty(&body, "mentioned_mobile_list"),
        ),
        Kind::Markdown => MessageEnvelope::markdown(content),
    })
}

async fn forward(state: &AppState, target: &Target, envelope: &MessageEnvelope) -> Result<Value, AppError> {
    let result = state.forwarder.send(&target.url, envelope).await?;

    if !models::upstream_ok(&result) {
        UPSTREAM_ERRORS.inc();
        tracing::warn!(target_name = %target.name, response = %result, "upstream rejected message");
        return Err(AppError::UpstreamRejected(result));
    }

    Ok(result)
}
