use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use crate::error::AppError;
use crate::metrics::REQUEST_TOTAL;
use crate::models::{SuggestRequest, SuggestResponse};
use crate::state::AppState;

pub async fn suggest_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> Result<Json<SuggestResponse>, AppError> {
    REQUEST_TOTAL.with_label_values(&["suggest-post"]).inc();

    let not_array = || AppError::Validation("tweets array required".to_string());
    let Json(req) = payload.map_err(|_| not_array())?;
    let tweets = req.tweets.ok_or_else(not_array)?;

    let suggested_post = state
        .completion
        .suggest_post(&tweets)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "/suggest-post failed"))?;

    Ok(Json(SuggestResponse { suggested_post }))
}
