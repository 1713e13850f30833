//! OiWatch service entrypoint
//!
//! Spawns the refresh worker and serves the read API.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use oiwatch::config::AppConfig;
use oiwatch::nse::{http_client, MarketClient, ProviderEndpoints, SessionAuthenticator};
use oiwatch::refresh::RefreshWorker;
use oiwatch::server;
use oiwatch::snapshot::SnapshotStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("oiwatch=info")),
        )
        .init();

    let cfg = AppConfig::load()?;
    info!(
        base_url = %cfg.provider.base_url,
        poll_interval_secs = cfg.refresh.poll_interval_secs,
        "starting oiwatch"
    );

    let http = http_client(Duration::from_secs(cfg.provider.request_timeout_secs));
    let endpoints = ProviderEndpoints::new(&cfg.provider.base_url);
    let authenticator = SessionAuthenticator::new(http.clone(), endpoints.bootstrap());
    let client = MarketClient::new(http);

    let store = Arc::new(SnapshotStore::new());

    let worker = RefreshWorker::new(
        authenticator,
        client,
        endpoints,
        Arc::clone(&store),
        &cfg.refresh,
    );
    tokio::spawn(worker.run());

    server::start_server(store, cfg.server.port).await
}
