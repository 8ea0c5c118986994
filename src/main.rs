//! Sustainable Shopping Assistant — Binary Entrypoint
//! Boots the Axum HTTP server, wiring config, catalog, session state, and metrics.

use shuttle_axum::ShuttleAxum;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sustainable_shopping::api::{self, AppState};
use sustainable_shopping::metrics::Metrics;

/// Enable compact tracing logs when ASSISTANT_LOG=1.
/// Filter comes from RUST_LOG, defaulting to info for the crate's targets.
fn enable_tracing() {
    let on = std::env::var("ASSISTANT_LOG")
        .ok()
        .is_some_and(|v| v == "1");
    if !on {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("catalog=info,learning=info,recommend=info,api=info,config=info,warn")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    enable_tracing();

    let state = AppState::from_env()?;
    let metrics = Metrics::init(state.catalog.len())?;
    info!(
        items = state.catalog.len(),
        skipped = state.catalog.skipped.len(),
        "assistant ready"
    );

    let router = api::router(state).merge(metrics.router());
    Ok(router.into())
}
