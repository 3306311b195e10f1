use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    routing::get,
};

use caregiver_cell::router::caregiver_routes;
use caregiver_cell::services::CaregiverSearchService;
use patient_cell::router::patient_routes;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

/// Builds the long-lived clients once and hands them to each cell.
pub fn create_router(config: Arc<AppConfig>) -> Result<Router> {
    let supabase = SupabaseClient::new(&config);
    let search = CaregiverSearchService::from_config(&config, supabase.clone())?;

    Ok(Router::new()
        .route("/", get(|| async { "Caregiver Match API is running!" }))
        .nest("/caregivers", caregiver_routes(search))
        .nest("/patients", patient_routes(config.clone(), supabase)))
}
