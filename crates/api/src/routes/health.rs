use axum::Json;
use serde_json::{json, Value};

/// Operational liveness probe. No store access — reflects process liveness,
/// not database reachability.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
