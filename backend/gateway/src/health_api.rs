//! Gateway Health API

use axum::Json;
use serde_json::{Value, json};

/// Handler for `GET /api/health`
pub async fn get_health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "labelscan",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
