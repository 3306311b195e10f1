use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::PatientBootstrapService;

#[derive(Clone)]
pub struct PatientState {
    pub bootstrap: PatientBootstrapService,
}

pub fn patient_routes(config: Arc<AppConfig>, supabase: SupabaseClient) -> Router {
    let state = PatientState {
        bootstrap: PatientBootstrapService::new(supabase),
    };

    Router::new()
        .route("/ensure", post(handlers::ensure_patient))
        .route("/me", get(handlers::get_my_patient))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(state)
}
