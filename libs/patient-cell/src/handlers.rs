use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{EnsurePatientRequest, EnsurePatientResponse, Patient};
use crate::router::PatientState;

/// Called once when a session is established. Safe to repeat.
#[axum::debug_handler]
pub async fn ensure_patient(
    State(state): State<PatientState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    request: Option<Json<EnsurePatientRequest>>,
) -> Result<Json<EnsurePatientResponse>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let ensured = state.bootstrap
        .ensure_patient(&user, request, auth.token())
        .await?;

    Ok(Json(ensured))
}

#[axum::debug_handler]
pub async fn get_my_patient(
    State(state): State<PatientState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Patient>, AppError> {
    let patient = state.bootstrap
        .get_patient_for_user(&user.id, auth.token())
        .await?;

    Ok(Json(patient))
}
