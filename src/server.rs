//! HTTP read surface
//!
//! Two read-only endpoints serving the latest published snapshot per
//! instrument. Readers never see an error: either the most recent good
//! snapshot or an explicit empty result before the first cycle completes.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::snapshot::{InstrumentSnapshot, SnapshotStore};
use crate::types::Instrument;

/// Response envelope shared by all endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Successful call with nothing published yet.
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

/// Create the router with all endpoints
pub fn create_router(store: Arc<SnapshotStore>) -> Router {
    Router::new()
        .route("/nifty", get(get_nifty))
        .route("/banknifty", get(get_bank_nifty))
        .with_state(store)
        // CORS for browser frontends
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// GET /nifty - latest NIFTY snapshot
async fn get_nifty(State(store): State<Arc<SnapshotStore>>) -> impl IntoResponse {
    snapshot_response(&store, Instrument::Nifty).await
}

/// GET /banknifty - latest BANKNIFTY snapshot
async fn get_bank_nifty(State(store): State<Arc<SnapshotStore>>) -> impl IntoResponse {
    snapshot_response(&store, Instrument::BankNifty).await
}

async fn snapshot_response(
    store: &SnapshotStore,
    instrument: Instrument,
) -> Json<ApiResponse<InstrumentSnapshot>> {
    match store.latest(instrument).await {
        Some(snapshot) => Json(ApiResponse::success(snapshot.as_ref().clone())),
        None => Json(ApiResponse::empty()),
    }
}

/// Start the read API server
pub async fn start_server(store: Arc<SnapshotStore>, port: u16) -> anyhow::Result<()> {
    let app = create_router(store);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    info!("read API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
