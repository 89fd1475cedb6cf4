use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub const PERMISSION_HINT: &str = "X app is not allowed to post. In developer.x.com, open your app settings: set App permissions to 'Read and write', enable OAuth 1.0a, then regenerate your Access Token and Secret.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // bad or missing request input
    #[error("{0}")]
    Validation(String),

    // input that normalizes down to nothing
    #[error("tweetText is empty after normalization")]
    EmptyInput,

    // completion API key missing
    #[error("{0}")]
    Configuration(String),

    // posting credentials missing
    #[error("{0}")]
    NotConfigured(String),

    #[error("Too many requests. Try again in a minute.")]
    RateLimited,

    #[error("{message}")]
    Completion { status: u16, message: String },

    #[error("{body}")]
    Platform { status: u16, body: String },

    #[error("{}", PERMISSION_HINT)]
    Permission,

    #[error("Model returned an empty reply. Try again.")]
    EmptyCompletion,

    // completion API unreachable, timed out or sent an unreadable body
    #[error("completion request failed: {0}")]
    CompletionRequest(reqwest::Error),

    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::EmptyInput => StatusCode::BAD_REQUEST,
            AppError::NotConfigured(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Permission => StatusCode::FORBIDDEN,
            AppError::Platform { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Http(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_)
            | AppError::Completion { .. }
            | AppError::EmptyCompletion
            | AppError::CompletionRequest(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut message = self.to_string();
        if message.is_empty() {
            message = "X API error".to_string();
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
