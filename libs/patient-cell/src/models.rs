use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_models::error::AppError;
use thiserror::Error;

pub const DEFAULT_ROLE: &str = "patient";

/// Application-level user row, keyed on the identity provider's user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Optional profile hints sent at session start. Anything missing comes from the token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnsurePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsurePatientResponse {
    pub user: AppUser,
    pub patient: Patient,
}

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("Patient profile not found")]
    NotFound,

    #[error("Failed to save {0}")]
    Upsert(&'static str, #[source] anyhow::Error),

    #[error("Failed to read patient profile")]
    Read(#[source] anyhow::Error),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::Upsert(_, ref source) | PatientError::Read(ref source) => {
                tracing::error!("Patient store failure: {:#}", source);
                AppError::database(err.to_string(), "The patient directory could not be updated")
            }
        }
    }
}
