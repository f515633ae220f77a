use axum::extract::State;
use serde_json::{Value, json};

use super::json::PrettyJson;
use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up; reports whether the store answers")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> PrettyJson<Value> {
    let database = match state.db().ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!("Database ping failed: {}", e);
            "unavailable"
        }
    };

    PrettyJson(json!({
        "status": "ok",
        "service": "books-api",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database
    }))
}
