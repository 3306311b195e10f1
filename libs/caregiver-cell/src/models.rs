use serde::{Deserialize, Serialize};
use shared_models::error::AppError;
use thiserror::Error;

/// Response language for match reasons and the extraction prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    /// Unknown or missing tags fall back to English.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()) {
            Some(t) if t == "hi" || t.starts_with("hi-") => Language::Hi,
            _ => Language::En,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
        }
    }
}

/// Free-text patient input. Never persisted.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub language: Language,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub confidence: f32,
}

impl Intent {
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }
}

/// Result of the optional AI enrichment step. `Fallback` is an expected state, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentOutcome {
    Enriched { intent: Intent, model: String },
    Fallback,
}

/// A caregiver row as stored in the `caregivers` relation. Read-only here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Caregiver {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub consultation_fee: Option<f64>,
    #[serde(default)]
    pub home_visit_fee: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub total_reviews: Option<i32>,
    #[serde(default)]
    pub experience_years: Option<i32>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    #[serde(flatten)]
    pub caregiver: Caregiver,
    pub display_name: String,
    pub match_score: u32,
    pub match_reason: String,
    pub ai_powered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub results: Vec<ScoredResult>,
    pub ai_analysis: Option<Intent>,
    pub query_processed: String,
    pub symptoms_found: Vec<String>,
    pub specializations_searched: Vec<String>,
    pub total_caregivers: usize,
    pub ai_model_used: String,
    pub language: Language,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Query parameter is required")]
    EmptyQuery,

    #[error("Failed to fetch caregivers")]
    CandidateFetch(#[source] anyhow::Error),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::EmptyQuery => AppError::BadRequest(err.to_string()),
            SearchError::CandidateFetch(ref source) => {
                tracing::error!("Caregiver fetch failed: {:#}", source);
                AppError::database(err.to_string(), "The caregiver directory could not be read")
            }
        }
    }
}
