// Health endpoint
// Decision: Served outside the API prefix so liveness checks do not depend on API_PREFIX
// Decision: A failed storage ping reports 503 with status "unavailable"

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::storage::StorageBackend;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Storage backend kind ("mongodb" or "memory")
    pub storage: String,
}

/// State for health endpoint
#[derive(Clone)]
pub struct HealthState {
    pub db: Arc<StorageBackend>,
}

pub fn routes(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, label) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("Health check storage ping failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage: state.db.kind().to_string(),
        }),
    )
}
