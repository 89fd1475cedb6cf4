// Posts replies to X on behalf of the single configured account.

use std::time::Instant;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::config::PlatformConfig;
use crate::error::AppError;
use crate::metrics::{UPSTREAM_ERRORS, UPSTREAM_LATENCY};
use crate::models::{CreatePost, InReplyTo};
use crate::normalize::{CHAR_BUDGET, take_chars};
use crate::oauth::{self, OAuthCredentials};

pub struct PlatformClient {
    http: reqwest::Client,
    config: PlatformConfig,
}

impl PlatformClient {
    pub fn new(http: reqwest::Client, config: PlatformConfig) -> Self {
        Self { http, config }
    }

    // All four secrets or nothing
    pub fn credentials(&self) -> Option<OAuthCredentials> {
        Some(OAuthCredentials {
            consumer_key: self.config.consumer_key.clone()?,
            consumer_secret: self.config.consumer_secret.clone()?,
            token: self.config.access_token.clone()?,
            token_secret: self.config.access_token_secret.clone()?,
        })
    }

    // Posts `text` as a reply to `post_id` and returns the platform's JSON.
    pub async fn post_reply(&self, text: &str, post_id: &str) -> Result<Value, AppError> {
        let text = take_chars(text.trim(), CHAR_BUDGET);
        let post_id = post_id.trim();
        if text.is_empty() || post_id.is_empty() {
            return Err(AppError::Validation("text and tweetId required".to_string()));
        }

        let creds = self.credentials().ok_or_else(|| {
            AppError::NotConfigured(
                "Set X_API_KEY, X_API_SECRET, X_ACCESS_TOKEN, X_ACCESS_TOKEN_SECRET in .env"
                    .to_string(),
            )
        })?;

        let auth = oauth::authorization_header(
            &creds,
            "POST",
            &self.config.post_url,
            &oauth::fresh_nonce(),
            oauth::now_timestamp(),
        )?;

        let body = CreatePost {
            text,
            reply: InReplyTo {
                in_reply_to_tweet_id: post_id,
            },
        };

        let start = Instant::now();
        let res = self
            .http
            .post(&self.config.post_url)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await.unwrap_or_default();
            UPSTREAM_LATENCY.observe(start.elapsed().as_secs_f64());
            UPSTREAM_ERRORS.with_label_values(&["platform"]).inc();
            tracing::warn!(post_id, status = status.as_u16(), error = %err_text, "post-reply failed");

            if is_permission_problem(status, &err_text) {
                return Err(AppError::Permission);
            }
            return Err(AppError::Platform {
                status: status.as_u16(),
                body: err_text,
            });
        }

        let data: Value = res.json().await?;
        UPSTREAM_LATENCY.observe(start.elapsed().as_secs_f64());
        tracing::info!(
            post_id,
            reply_id = data.pointer("/data/id").and_then(serde_json::Value::as_str).unwrap_or("?"),
            reply = text,
            "post-reply ok"
        );
        Ok(data)
    }
}

// 403 whose body names both oauth1 and permissions: app is read-only or OAuth1 is off
fn is_permission_problem(status: StatusCode, body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    status == StatusCode::FORBIDDEN && body.contains("oauth1") && body.contains("permissions")
}
