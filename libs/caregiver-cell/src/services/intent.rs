use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, header};
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::{Intent, IntentOutcome, Language, SearchQuery};
use crate::services::catalog::{canonical_specialization, ALLOWED_SPECIALIZATIONS};

/// Source of structured intent for a free-text query.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    fn model_name(&self) -> &str;

    /// `allowed` is the closed set of specialization labels the result may use.
    async fn extract(&self, query: &str, language: Language, allowed: &[&str]) -> Result<Intent>;
}

/// Runs the extractor if one is configured and folds every failure into `Fallback`.
pub async fn extract_intent(
    extractor: Option<&dyn IntentExtractor>,
    query: &SearchQuery,
) -> IntentOutcome {
    let Some(extractor) = extractor else {
        debug!("No intent extractor configured, using keyword matching");
        return IntentOutcome::Fallback;
    };

    match extractor.extract(&query.text, query.language, ALLOWED_SPECIALIZATIONS).await {
        Ok(intent) if !intent.is_empty() => {
            debug!("Intent extracted by {}: {:?}", extractor.model_name(), intent);
            IntentOutcome::Enriched {
                intent,
                model: extractor.model_name().to_string(),
            }
        }
        Ok(_) => {
            debug!("Intent extractor returned no symptoms, using keyword matching");
            IntentOutcome::Fallback
        }
        Err(e) => {
            warn!("Intent extraction failed, using keyword matching: {:#}", e);
            IntentOutcome::Fallback
        }
    }
}

/// Chat-completions backed extractor.
pub struct OpenAiIntentExtractor {
    http_client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiIntentExtractor {
    /// Returns `Ok(None)` when no API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.openai_api_key.clone() else {
            return Ok(None);
        };

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.intent_timeout_secs.max(1)))
            .build()?;

        Ok(Some(Self {
            http_client,
            api_key,
            endpoint: format!("{}/chat/completions", config.openai_base_url.trim_end_matches('/')),
            model: config.openai_model.clone(),
        }))
    }

    fn request_body(&self, query: &str, language: Language, allowed: &[&str]) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a medical intake assistant for a home-care booking service. You only reply with a single JSON object."
                },
                {
                    "role": "user",
                    "content": build_prompt(query, language, allowed)
                }
            ],
            "temperature": 0.1,
            "max_tokens": 300
        })
    }
}

#[async_trait]
impl IntentExtractor for OpenAiIntentExtractor {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn extract(&self, query: &str, language: Language, allowed: &[&str]) -> Result<Intent> {
        let response = self.http_client.post(&self.endpoint)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&self.request_body(query, language, allowed))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Chat completion error ({}): {}", status, error_text));
        }

        let ai_response: Value = response.json().await?;
        let content = ai_response["choices"][0]["message"]["content"].as_str()
            .ok_or_else(|| anyhow!("Invalid chat completion response format"))?;

        parse_intent(content, allowed)
    }
}

pub fn build_prompt(query: &str, language: Language, allowed: &[&str]) -> String {
    format!(
        "Analyze this patient request (written in {language}) and identify the symptoms \
         and the caregiver specializations that fit it.\n\
         Request: \"{query}\"\n\
         Choose specializations ONLY from this list: {labels}.\n\
         Respond with JSON only, in exactly this shape:\n\
         {{\"symptoms\": [\"...\"], \"specializations\": [\"...\"], \"confidence\": 0.0}}\n\
         confidence is a number between 0 and 1.",
        language = language.display_name(),
        query = query.replace('"', "'"),
        labels = allowed.join(", "),
    )
}

/// Greedy span from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    static SPAN: OnceLock<Regex> = OnceLock::new();
    let re = SPAN.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"));
    re.find(text).map(|m| m.as_str())
}

/// Decodes model output into a sanitized `Intent`.
pub fn parse_intent(content: &str, allowed: &[&str]) -> Result<Intent> {
    let span = extract_json_object(content)
        .ok_or_else(|| anyhow!("No JSON object in model response"))?;
    let raw: Intent = serde_json::from_str(span)?;
    Ok(sanitize(raw, allowed))
}

fn sanitize(raw: Intent, allowed: &[&str]) -> Intent {
    let mut symptoms: Vec<String> = Vec::new();
    for symptom in raw.symptoms {
        let symptom = symptom.trim();
        if !symptom.is_empty() && !symptoms.iter().any(|s| s.eq_ignore_ascii_case(symptom)) {
            symptoms.push(symptom.to_string());
        }
    }

    let mut specializations: Vec<String> = Vec::new();
    for label in raw.specializations {
        match canonical_specialization(&label, allowed) {
            Some(canonical) if !specializations.iter().any(|s| s == canonical) => {
                specializations.push(canonical.to_string());
            }
            Some(_) => {}
            None => debug!("Dropping unknown specialization from model output: {}", label),
        }
    }

    let confidence = if raw.confidence.is_finite() {
        raw.confidence.clamp(0.0, 1.0)
    } else {
        0.0
    };

    Intent { symptoms, specializations, confidence }
}
