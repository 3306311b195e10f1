use axum::{
    Router,
    routing::get,
};

use crate::handlers;
use crate::services::search::CaregiverSearchService;

pub fn caregiver_routes(service: CaregiverSearchService) -> Router {
    Router::new()
        .route("/search", get(handlers::search_caregivers))
        .route("/search/detailed", get(handlers::search_caregivers_detailed))
        .route("/search/status", get(handlers::search_status))
        .with_state(service)
}
