//! `GET /api/services`: dashboard status feed.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn list_services(State(state): State<AppState>) -> Response {
    match state.status.snapshot().await {
        Ok(snapshot) => {
            metrics::record_status_fetch("ok");
            (StatusCode::OK, Json(snapshot)).into_response()
        }
        Err(e) => {
            metrics::record_status_fetch("error");
            tracing::error!(error = %e, "Argo CD fetch error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
