use crate::completion::CompletionClient;
use crate::config::RateLimitConfig;
use crate::platform::PlatformClient;
use crate::rate_limit::RateLimiter;
// app's shared state, built once at startup

pub struct AppState {
    pub completion: CompletionClient,
    pub platform: PlatformClient,
    pub rate_limiter: RateLimiter, // shared by every route group, keys are prefixed
    pub limits: RateLimitConfig,
}

impl AppState {
    pub fn new(completion: CompletionClient, platform: PlatformClient, limits: RateLimitConfig) -> Self {
        Self {
            completion,
            platform,
            rate_limiter: RateLimiter::new(limits.window),
            limits,
        }
    }
}
