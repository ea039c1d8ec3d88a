//! Reportview API Server
//!
//! Run with: cargo run --bin reportview
//!
//! # Configuration
//!
//! Read from `REPORTVIEW_CONFIG` when set, else from the default search
//! paths (see [`Config::load_default`]). `REPORTVIEW_*` variables override
//! file values; `RUST_LOG` overrides the configured log level.

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

use reportview::api::{serve, AppState};
use reportview::config::Config;
use reportview::dispatch::Dispatcher;
use reportview::logging::{init_tracing, with_bootstrap_tracing, TracingLog};
use reportview::view::{RefreshOutcome, ReportsView};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::var("REPORTVIEW_CONFIG") {
        Ok(path) => Config::load_with_env(&PathBuf::from(&path))
            .with_context(|| format!("loading config from {}", path))?,
        Err(_) => with_bootstrap_tracing("info", Config::load_default),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting Reportview server v{}", env!("CARGO_PKG_VERSION"));

    let source = reportview::source::from_config(&config.source)
        .context("creating report source")?;
    tracing::info!("Report source: {}", source.describe());

    let log = TracingLog::shared();
    let dispatcher = Dispatcher::from_config(&config, log.clone());
    let view = Arc::new(ReportsView::new(source, dispatcher, log));

    if config.api.refresh_on_start {
        let view = Arc::clone(&view);
        tokio::spawn(async move {
            match view.refresh().await {
                Ok(RefreshOutcome::Loaded { items, charts, .. }) => {
                    tracing::info!(items, charts, "Initial reports loaded")
                }
                Ok(RefreshOutcome::Stale { .. }) => {}
                Err(e) => tracing::warn!("Initial fetch failed: {}", e),
            }
        });
    }

    let state = AppState::new(view, config.api.clone());
    serve(state, &config.api).await?;

    tracing::info!("Reportview server stopped");
    Ok(())
}
