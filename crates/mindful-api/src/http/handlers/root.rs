//! Liveness handlers.
//!
//! Endpoints:
//! - GET /api/  - Liveness message
//! - GET /health - Status and build version

use axum::Json;
use serde_json::{json, Value};

/// Liveness message returned by `GET /api/`.
pub const LIVENESS_MESSAGE: &str = "Mindful Mind API is running";

/// GET /api/ - Liveness message.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": LIVENESS_MESSAGE }))
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
