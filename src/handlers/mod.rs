mod health;
mod metrics;
mod post_reply;
mod reply;
mod suggest;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::rate_limit::{limit_reply, limit_suggest};
use crate::state::AppState;

pub use health::{health_handler, root_handler};
pub use metrics::metrics_handler;
pub use post_reply::post_reply_handler;
pub use reply::reply_handler;
pub use suggest::suggest_handler;

// every route, limiter applied per route group
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(
            "/reply",
            post(reply_handler).layer(middleware::from_fn_with_state(state.clone(), limit_reply)),
        )
        .route(
            "/suggest-post",
            post(suggest_handler)
                .layer(middleware::from_fn_with_state(state.clone(), limit_suggest)),
        )
        .route("/post-reply", post(post_reply_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::completion::CompletionClient;
    use crate::config::{CompletionConfig, PlatformConfig, RateLimitConfig};
    use crate::platform::PlatformClient;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;

    pub fn completion_config(base_url: String) -> CompletionConfig {
        CompletionConfig {
            api_key: Some("sk-test".into()),
            model: "test/model".into(),
            referer: "https://example.test".into(),
            title: "ReplyGuy".into(),
            base_url,
        }
    }

    pub fn platform_config(post_url: String) -> PlatformConfig {
        PlatformConfig {
            consumer_key: Some("ck".into()),
            consumer_secret: Some("cs".into()),
            access_token: Some("at".into()),
            access_token_secret: Some("ats".into()),
            post_url,
        }
    }

    pub fn app(
        completion: CompletionConfig,
        platform: PlatformConfig,
        limits: RateLimitConfig,
    ) -> Router {
        let http = reqwest::Client::new();
        let state = Arc::new(AppState::new(
            CompletionClient::new(http.clone(), completion),
            PlatformClient::new(http, platform),
            limits,
        ));
        build_router(state)
    }

    pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}
