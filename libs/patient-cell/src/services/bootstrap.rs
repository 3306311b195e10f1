use anyhow::{Result, anyhow};
use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Method,
};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use shared_database::supabase::SupabaseClient;
use shared_models::auth::User;

use crate::models::{
    AppUser, EnsurePatientRequest, EnsurePatientResponse, Patient, PatientError, DEFAULT_ROLE,
};

/// Materializes the application user and patient rows for an authenticated identity.
/// Every call is an upsert keyed on the identity id, so repeating it is harmless.
#[derive(Clone)]
pub struct PatientBootstrapService {
    supabase: SupabaseClient,
}

impl PatientBootstrapService {
    pub fn new(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }

    pub async fn ensure_patient(
        &self,
        identity: &User,
        request: EnsurePatientRequest,
        auth_token: &str,
    ) -> Result<EnsurePatientResponse, PatientError> {
        debug!("Ensuring user and patient records for {}", identity.id);

        let user_row = user_upsert_body(identity);
        let user: AppUser = self
            .upsert("users", "id", user_row, auth_token)
            .await
            .map_err(|e| PatientError::Upsert("user record", e))?;

        let patient_row = patient_upsert_body(identity, &request);
        let patient: Patient = self
            .upsert("patients", "user_id", patient_row, auth_token)
            .await
            .map_err(|e| PatientError::Upsert("patient record", e))?;

        info!("User {} bootstrapped with patient {}", user.id, patient.id);

        Ok(EnsurePatientResponse { user, patient })
    }

    pub async fn get_patient_for_user(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Patient, PatientError> {
        let rows: Vec<Patient> = self
            .supabase
            .select_eq("patients", "*", &[("user_id", user_id)], Some(auth_token))
            .await
            .map_err(PatientError::Read)?;

        rows.into_iter().next().ok_or(PatientError::NotFound)
    }

    async fn upsert<T>(&self, table: &str, conflict_column: &str, row: Value, auth_token: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Prefer",
            HeaderValue::from_static("resolution=merge-duplicates,return=representation"),
        );

        let path = format!("/rest/v1/{}?on_conflict={}", table, conflict_column);
        let rows: Vec<T> = self
            .supabase
            .request_with_headers(Method::POST, &path, Some(auth_token), Some(row), Some(headers))
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Upsert into {} returned no rows", table))
    }
}

pub fn user_upsert_body(identity: &User) -> Value {
    json!({
        "id": identity.id,
        "email": identity.email,
        "phone": identity.phone,
        "role": identity
            .role
            .as_deref()
            .filter(|role| *role != "authenticated")
            .unwrap_or(DEFAULT_ROLE),
        "updated_at": Utc::now().to_rfc3339(),
    })
}

/// Only fields we actually know are sent, so a repeat call never blanks out edited values.
pub fn patient_upsert_body(identity: &User, request: &EnsurePatientRequest) -> Value {
    let mut row = Map::new();
    row.insert("user_id".to_string(), json!(identity.id));

    let known = [
        ("first_name", request.first_name.as_deref().or(identity.metadata_str("first_name"))),
        ("last_name", request.last_name.as_deref().or(identity.metadata_str("last_name"))),
        ("phone_number", request.phone_number.as_deref().or(identity.phone.as_deref())),
    ];

    for (column, value) in known {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            row.insert(column.to_string(), json!(value));
        }
    }

    row.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
    Value::Object(row)
}
