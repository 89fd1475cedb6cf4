use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::metrics::RATE_LIMITED;
use crate::state::AppState;

// Rate limit entry - tracks requests per client/route key
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: Instant,
}

// Fixed-window counters, every entry lives at most one window
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    window: Duration,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            window,
        }
    }

    pub fn check_and_increment(&self, key: &str, limit: u32) -> bool {
        self.check_at(key, limit, Instant::now())
    }

    pub fn check_at(&self, key: &str, limit: u32, now: Instant) -> bool {
        // sweep before taking the entry lock, retain locks every shard
        self.sweep(now);

        // entry() holds the shard lock, so reset + increment is atomic per key
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                window_start: now,
            });

        //window expired..? Reset it
        if now.saturating_duration_since(entry.window_start) > self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= limit
    }

    fn sweep(&self, now: Instant) {
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.window_start) <= self.window);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// Logical route groups with their own counters
#[derive(Debug, Clone, Copy)]
pub enum RouteGroup {
    Reply,
    Suggest,
}

impl RouteGroup {
    fn prefix(self) -> &'static str {
        match self {
            RouteGroup::Reply => "reply",
            RouteGroup::Suggest => "suggest",
        }
    }

    fn limit(self, state: &AppState) -> u32 {
        match self {
            RouteGroup::Reply => state.limits.reply,
            RouteGroup::Suggest => state.limits.suggest,
        }
    }
}

// Client address, or a shared placeholder when the server runs without connect info
fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn enforce(
    group: RouteGroup,
    state: Arc<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = format!("{}:{}", group.prefix(), client_key(&req));
    if !state.rate_limiter.check_and_increment(&key, group.limit(&state)) {
        RATE_LIMITED.inc();
        tracing::warn!(%key, "rate limit exceeded");
        return Err(AppError::RateLimited);
    }
    Ok(next.run(req).await)
}

pub async fn limit_reply(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(RouteGroup::Reply, state, req, next).await
}

pub async fn limit_suggest(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(RouteGroup::Suggest, state, req, next).await
}
