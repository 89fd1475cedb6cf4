use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use crate::error::AppError;
use crate::metrics::REQUEST_TOTAL;
use crate::models::{ReplyRequest, ReplyResponse};
use crate::state::AppState;

pub async fn reply_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReplyRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, AppError> {
    REQUEST_TOTAL.with_label_values(&["reply"]).inc();

    let missing = || AppError::Validation("tweetText required".to_string());
    let Json(req) = payload.map_err(|_| missing())?;
    let tweet_text = req.tweet_text.filter(|t| !t.trim().is_empty()).ok_or_else(missing)?;

    let reply_text = state
        .completion
        .generate_reply(&tweet_text, req.author_handle.as_deref())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "/reply failed"))?;

    Ok(Json(ReplyResponse { reply_text }))
}
