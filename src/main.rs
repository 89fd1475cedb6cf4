mod completion;
mod config;
mod error;
mod handlers;
mod metrics;
mod models;
mod normalize;
mod oauth;
mod platform;
mod rate_limit;
mod retry;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::completion::CompletionClient;
use crate::config::Args;
use crate::platform::PlatformClient;
use crate::state::AppState;

// this is main async function with tokio
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional, real env vars win
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // parse cli arguments
    let args = Args::parse();

    // one client for both upstreams, bounded so a hung upstream can't pin a request forever
    let client = reqwest::Client::builder()
        .timeout(args.upstream_timeout())
        .build()?;

    let completion = args.completion();
    let platform = args.platform();
    let limits = args.rate_limits();

    if completion.api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY not set, /reply and /suggest-post will fail");
    }

    let platform_client = PlatformClient::new(client.clone(), platform);
    let posting_ready = platform_client.credentials().is_some();

    let state = Arc::new(AppState::new(
        CompletionClient::new(client, completion),
        platform_client,
        limits,
    ));
    let model = state.completion.model().to_string();

    let app = handlers::build_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("ReplyGuy backend running on http://localhost:{}", args.port);
    tracing::info!(%model, "Completion model");
    tracing::info!(posting_ready, "X posting credentials");
    tracing::info!(
        "Rate limit: {} reply / {} suggest requests per {} ms",
        limits.reply,
        limits.suggest,
        limits.window.as_millis()
    );

    // connect info feeds the per-client rate limit key
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
