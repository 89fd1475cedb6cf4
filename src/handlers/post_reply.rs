use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;
use std::sync::Arc;

use crate::error::AppError;
use crate::metrics::REQUEST_TOTAL;
use crate::models::PostReplyRequest;
use crate::state::AppState;

// Platform JSON is passed through as-is on success
pub async fn post_reply_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PostReplyRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    REQUEST_TOTAL.with_label_values(&["post-reply"]).inc();

    let missing = || AppError::Validation("text and tweetId required".to_string());
    let Json(req) = payload.map_err(|_| missing())?;
    let text = req.text.unwrap_or_default();
    let post_id = req.tweet_id.map(|id| id.into_string()).unwrap_or_default();

    tracing::info!(
        post_id = %post_id,
        post_content = req.tweet_text.as_deref().unwrap_or("(not sent)"),
        reply = %text,
        "post-reply request"
    );

    let data = state.platform.post_reply(&text, &post_id).await?;
    Ok(Json(data))
}
