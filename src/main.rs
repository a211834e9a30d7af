mod config;
mod error;
mod forwarder;
mod handlers;
mod metrics;
mod models;
mod rate_limit;
mod router;
mod state;
mod targets;
mod time_fmt;

use anyhow::Context;
use clap::Parser; // for cli
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Args;
use crate::forwarder::Forwarder;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;
use crate::targets::TargetRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // parse cli arguments / environment
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&args.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let targets = TargetRegistry::parse(&args.targets).context("invalid --targets")?;

    // creating shared state
    let state = Arc::new(AppState {
        targets,
        rate_limiter: RateLimiter::new(args.rate_limit, args.rate_window()),
        forwarder: Forwarder::new(reqwest::Client::new()),
    });

    let app = router::app(Arc::clone(&state));

    let addr = args.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("Relay running on http://{}", addr);
    tracing::info!(targets = ?state.targets.names(), "Forwarding targets loaded");
    tracing::info!(
        "Rate limit: {} calls per {} seconds per target",
        state.rate_limiter.max(),
        state.rate_limiter.window().as_secs()
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
