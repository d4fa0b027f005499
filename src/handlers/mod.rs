pub mod reports;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Monthly reports pulled from the upstream report API
        .route(
            "/api/reports/monthly-by-category",
            get(reports::monthly_by_category),
        )
        .route(
            "/api/reports/monthly-by-subcategory",
            get(reports::monthly_by_subcategory),
        )
        // Charts for report data supplied by the caller
        .route("/api/charts/by-category", post(reports::category_chart))
        .route("/api/charts/by-subcategory", post(reports::subcategory_chart))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
