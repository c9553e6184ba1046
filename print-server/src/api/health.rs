//! Public routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | / | GET | no |
//! | /health | GET | no |

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::AppState;

#[derive(Serialize)]
pub struct WelcomeResponse {
    response: &'static str,
}

/// GET / - liveness message
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        response: "Hello, welcome to this receipt printing API!",
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    /// Whether the printer device is attached
    printer: bool,
}

/// GET /health - service and printer status
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let connector = state.connector.clone();
    let printer = tokio::task::spawn_blocking(move || connector.is_online())
        .await
        .unwrap_or(false);

    Json(HealthResponse {
        status: if printer { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        printer,
    })
}
