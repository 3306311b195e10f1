use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::SearchResponse;
use crate::services::query::parse_query;
use crate::services::scoring::RankingStrategy;
use crate::services::search::CaregiverSearchService;

#[derive(Debug, Deserialize)]
pub struct CaregiverSearchParams {
    pub query: Option<String>,
    pub lang: Option<String>,
}

#[axum::debug_handler]
pub async fn search_caregivers(
    State(service): State<CaregiverSearchService>,
    Query(params): Query<CaregiverSearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    run_search(&service, params, RankingStrategy::Simple).await
}

#[axum::debug_handler]
pub async fn search_caregivers_detailed(
    State(service): State<CaregiverSearchService>,
    Query(params): Query<CaregiverSearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    run_search(&service, params, RankingStrategy::Keyword).await
}

#[axum::debug_handler]
pub async fn search_status(
    State(service): State<CaregiverSearchService>,
) -> Json<Value> {
    Json(json!({
        "ai_enabled": service.ai_enabled(),
    }))
}

async fn run_search(
    service: &CaregiverSearchService,
    params: CaregiverSearchParams,
    strategy: RankingStrategy,
) -> Result<Json<SearchResponse>, AppError> {
    // Validation happens before any network or database work.
    let query = parse_query(params.query.as_deref(), params.lang.as_deref())?;

    let response = service.search(query, strategy).await?;

    Ok(Json(response))
}
