use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    let ops = Router::new()
        .route("/health", get(handlers::ops::health_check))
        .route("/metrics", get(handlers::ops::render_metrics));

    let api = Router::new()
        // Categorization
        .route("/api/categorize", post(handlers::categorize::categorize))
        // Stored transactions
        .route(
            "/api/transactions",
            get(handlers::transactions::list).post(handlers::transactions::write),
        )
        .route("/api/transactions/filter", post(handlers::transactions::filter_new))
        .route("/api/transactions/summary", get(handlers::transactions::summary))
        .route("/api/transactions/:id", get(handlers::transactions::detail))
        // Spreadsheet sync
        .route("/api/sync", post(handlers::sync::sync_sheet));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    ops.merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
