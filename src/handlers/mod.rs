pub mod analytics;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Monthly analytics
        .route("/:user_id/analytics/monthly", get(analytics::get_monthly))
        .route(
            "/:user_id/analytics/monthly/generate",
            post(analytics::generate_monthly),
        )
        .route(
            "/:user_id/analytics/monthly/:month/recompute",
            put(analytics::recompute_monthly),
        )
        .route(
            "/:user_id/analytics/monthly/:month/delete",
            delete(analytics::delete_monthly),
        )
        // Weekly analytics
        .route(
            "/:user_id/analytics/weekly/last7",
            get(analytics::get_weekly_last7),
        )
        .route(
            "/:user_id/analytics/weekly/last7/generate",
            post(analytics::generate_weekly_last7),
        )
        .route(
            "/:user_id/analytics/weekly/last7/recompute",
            put(analytics::recompute_weekly_last7),
        )
        .route(
            "/:user_id/analytics/weekly/last7/delete",
            delete(analytics::delete_weekly_last7),
        )
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
