//! HTTP API
//!
//! Print routes sit behind the per-client rate limiter; `/` and `/health`
//! do not.

pub mod health;
pub mod print;
pub mod query;

use axum::{Router, middleware, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::print_rate_limit;
use crate::core::AppState;

pub fn router(state: AppState) -> Router {
    let print_routes = Router::new()
        .route("/print", get(print::print_text))
        .route("/pmarkdown", get(print::print_markdown))
        .route("/part", get(print::print_part))
        .route("/qr", get(print::print_qr))
        .route("/cut", get(print::cut))
        .route("/image", get(print::print_image))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            print_rate_limit,
        ));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(print_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
