use clap::Parser;
use std::time::Duration;

// CLI argument structure, every flag falls back to an env var
#[derive(Parser, Debug, Clone)]
#[command(name = "reply-gateway")]
#[command(about = "Reply generation and posting proxy for the ReplyGuy extension")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    // OpenRouter API key
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub openrouter_api_key: Option<String>,

    #[arg(long, env = "OPENROUTER_MODEL", default_value = "openai/gpt-4o-mini")]
    pub model: String,

    #[arg(long, env = "OPENROUTER_REFERER", default_value = "https://github.com")]
    pub referer: String,

    #[arg(long, env = "OPENROUTER_TITLE", default_value = "ReplyGuy")]
    pub title: String,

    #[arg(long, env = "OPENROUTER_BASE_URL", default_value = "https://openrouter.ai/api/v1")]
    pub completion_url: String,

    // X (Twitter) OAuth 1.0a credentials for the posting account
    #[arg(long, env = "X_API_KEY", hide_env_values = true)]
    pub x_api_key: Option<String>,

    #[arg(long, env = "X_API_SECRET", hide_env_values = true)]
    pub x_api_secret: Option<String>,

    #[arg(long, env = "X_ACCESS_TOKEN", hide_env_values = true)]
    pub x_access_token: Option<String>,

    #[arg(long, env = "X_ACCESS_TOKEN_SECRET", hide_env_values = true)]
    pub x_access_token_secret: Option<String>,

    #[arg(long, env = "X_POST_URL", default_value = "https://api.x.com/2/tweets")]
    pub post_url: String,

    // Deadline for every upstream call, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub upstream_timeout: u64,

    // Rate limit window in milliseconds
    #[arg(long, env = "RATE_WINDOW_MS", default_value_t = 60_000)]
    pub rate_window_ms: u64,

    // Max /reply requests per window per client
    #[arg(long, env = "RATE_LIMIT_REPLY", default_value_t = 60)]
    pub rate_limit_reply: u32,

    // Max /suggest-post requests per window per client
    #[arg(long, env = "RATE_LIMIT_SUGGEST", default_value_t = 20)]
    pub rate_limit_suggest: u32,
}

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub referer: String,
    pub title: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_token_secret: Option<String>,
    pub post_url: String,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub reply: u32,
    pub suggest: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(60_000),
            reply: 60,
            suggest: 20,
        }
    }
}

// empty strings from .env count as unset
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Args {
    pub fn completion(&self) -> CompletionConfig {
        CompletionConfig {
            api_key: non_empty(&self.openrouter_api_key),
            model: self.model.clone(),
            referer: self.referer.clone(),
            title: self.title.clone(),
            base_url: self.completion_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn platform(&self) -> PlatformConfig {
        PlatformConfig {
            consumer_key: non_empty(&self.x_api_key),
            consumer_secret: non_empty(&self.x_api_secret),
            access_token: non_empty(&self.x_access_token),
            access_token_secret: non_empty(&self.x_access_token_secret),
            post_url: self.post_url.clone(),
        }
    }

    pub fn rate_limits(&self) -> RateLimitConfig {
        RateLimitConfig {
            window: Duration::from_millis(self.rate_window_ms),
            reply: self.rate_limit_reply,
            suggest: self.rate_limit_suggest,
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}
