use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{IntentOutcome, SearchError, SearchQuery, SearchResponse};
use crate::services::caregiver::{CaregiverRepository, SupabaseCaregiverRepository};
use crate::services::fallback;
use crate::services::intent::{extract_intent, IntentExtractor, OpenAiIntentExtractor};
use crate::services::query::normalize;
use crate::services::scoring::{rank, MatchCriteria, RankingStrategy};

pub const KEYWORD_MATCHING_MODEL: &str = "keyword_matching";

/// Runs one search: optional AI enrichment, keyword fallback, candidate fetch, ranking.
/// Holds only shared handles; every call works on its own candidate set.
#[derive(Clone)]
pub struct CaregiverSearchService {
    repository: Arc<dyn CaregiverRepository>,
    extractor: Option<Arc<dyn IntentExtractor>>,
    result_limit: usize,
}

impl CaregiverSearchService {
    pub fn new(
        repository: Arc<dyn CaregiverRepository>,
        extractor: Option<Arc<dyn IntentExtractor>>,
        result_limit: usize,
    ) -> Self {
        Self {
            repository,
            extractor,
            result_limit,
        }
    }

    /// Wires the Supabase-backed repository and, when a key is configured, the chat-completions extractor.
    pub fn from_config(config: &AppConfig, supabase: SupabaseClient) -> Result<Self> {
        let extractor = OpenAiIntentExtractor::from_config(config)?
            .map(|e| Arc::new(e) as Arc<dyn IntentExtractor>);

        Ok(Self::new(
            Arc::new(SupabaseCaregiverRepository::new(supabase)),
            extractor,
            config.search_result_limit,
        ))
    }

    pub fn ai_enabled(&self) -> bool {
        self.extractor.is_some()
    }

    pub async fn search(
        &self,
        query: SearchQuery,
        strategy: RankingStrategy,
    ) -> Result<SearchResponse, SearchError> {
        let query_processed = normalize(&query.text);
        debug!("Caregiver search for '{}' ({})", query_processed, query.language.as_str());

        let outcome = extract_intent(self.extractor.as_deref(), &query).await;

        let (ai_analysis, symptoms, specializations, ai_model_used) = match outcome {
            IntentOutcome::Enriched { intent, model } => {
                let specializations = if intent.specializations.is_empty() {
                    fallback::classify(&query_processed)
                } else {
                    intent.specializations.clone()
                };
                (Some(intent.clone()), intent.symptoms, specializations, model)
            }
            IntentOutcome::Fallback => (
                None,
                fallback::sniff_symptoms(&query_processed),
                fallback::classify(&query_processed),
                KEYWORD_MATCHING_MODEL.to_string(),
            ),
        };

        let candidates = self
            .repository
            .fetch_active_verified()
            .await
            .map_err(SearchError::CandidateFetch)?;

        let criteria = MatchCriteria {
            specializations: specializations.clone(),
            symptoms: symptoms.clone(),
            language: query.language,
            ai_powered: ai_analysis.is_some(),
        };

        let results = rank(&candidates, &criteria, strategy, self.result_limit);

        info!(
            "Caregiver search ranked {} of {} candidates using {}",
            results.len(),
            candidates.len(),
            ai_model_used
        );

        Ok(SearchResponse {
            success: true,
            results,
            ai_analysis,
            query_processed,
            symptoms_found: symptoms,
            specializations_searched: specializations,
            total_caregivers: candidates.len(),
            ai_model_used,
            language: query.language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::anyhow;
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use crate::models::{Caregiver, Intent, Language};

    struct StaticRepository {
        caregivers: Vec<Caregiver>,
        calls: AtomicUsize,
    }

    impl StaticRepository {
        fn new(caregivers: Vec<Caregiver>) -> Arc<Self> {
            Arc::new(Self { caregivers, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl CaregiverRepository for StaticRepository {
        async fn fetch_active_verified(&self) -> Result<Vec<Caregiver>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.caregivers.clone())
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl CaregiverRepository for FailingRepository {
        async fn fetch_active_verified(&self) -> Result<Vec<Caregiver>> {
            Err(anyhow!("connection refused"))
        }
    }

    struct FixedExtractor(Intent);

    #[async_trait]
    impl IntentExtractor for FixedExtractor {
        fn model_name(&self) -> &str {
            "gpt-test"
        }

        async fn extract(&self, _query: &str, _language: Language, _allowed: &[&str]) -> Result<Intent> {
            Ok(self.0.clone())
        }
    }

    fn caregiver(id: &str, specializations: &[&str]) -> Caregiver {
        Caregiver {
            id: id.to_string(),
            first_name: format!("Caregiver {}", id),
            specializations: specializations.iter().map(|s| s.to_string()).collect(),
            is_verified: true,
            is_active: true,
            ..Caregiver::default()
        }
    }

    fn query(text: &str) -> SearchQuery {
        SearchQuery { text: text.to_string(), language: Language::En }
    }

    #[tokio::test]
    async fn wound_query_without_ai_uses_keyword_matching() {
        let repo = StaticRepository::new(vec![
            caregiver("1", &["Elder Care"]),
            caregiver("2", &["Wound Care"]),
        ]);
        let service = CaregiverSearchService::new(repo, None, 10);

        let response = service.search(query("I have a wound"), RankingStrategy::Simple).await.unwrap();

        assert_eq!(response.specializations_searched, vec!["Wound Care"]);
        assert_eq!(response.ai_model_used, "keyword_matching");
        assert_eq!(response.symptoms_found, vec!["wound"]);
        assert!(response.ai_analysis.is_none());
        assert_eq!(response.results[0].caregiver.id, "2");
        assert_eq!(response.results[0].match_score, 95);
        assert!(response.results.iter().all(|r| !r.ai_powered));
    }

    #[tokio::test]
    async fn enriched_intent_drives_ranking() {
        let intent = Intent {
            symptoms: vec!["fever".to_string()],
            specializations: vec!["General Care".to_string()],
            confidence: 0.8,
        };
        let repo = StaticRepository::new(vec![
            caregiver("1", &["Wound Care"]),
            caregiver("2", &["General Care"]),
        ]);
        let service = CaregiverSearchService::new(repo, Some(Arc::new(FixedExtractor(intent.clone()))), 10);

        let response = service.search(query("I have fever"), RankingStrategy::Simple).await.unwrap();

        assert_eq!(response.ai_analysis, Some(intent));
        assert_eq!(response.ai_model_used, "gpt-test");
        assert_eq!(response.specializations_searched, vec!["General Care"]);
        assert!(response.results.iter().all(|r| r.ai_powered));
        assert_eq!(response.results[0].caregiver.id, "2");
    }

    #[tokio::test]
    async fn enriched_intent_without_specializations_borrows_fallback() {
        let intent = Intent {
            symptoms: vec!["swelling".to_string()],
            specializations: vec![],
            confidence: 0.4,
        };
        let service = CaregiverSearchService::new(
            StaticRepository::new(vec![]),
            Some(Arc::new(FixedExtractor(intent))),
            10,
        );

        let response = service.search(query("swelling in elderly father"), RankingStrategy::Simple).await.unwrap();
        assert_eq!(response.specializations_searched, vec!["Elder Care"]);
        assert_eq!(response.symptoms_found, vec!["swelling"]);
    }

    #[tokio::test]
    async fn no_candidates_is_success() {
        let service = CaregiverSearchService::new(StaticRepository::new(vec![]), None, 10);

        let response = service.search(query("need help"), RankingStrategy::Simple).await.unwrap();
        assert!(response.success);
        assert!(response.results.is_empty());
        assert_eq!(response.total_caregivers, 0);
        assert_eq!(response.specializations_searched, vec!["General Care"]);
    }

    #[tokio::test]
    async fn repository_failure_is_reported() {
        let service = CaregiverSearchService::new(Arc::new(FailingRepository), None, 10);
        let result = service.search(query("wound"), RankingStrategy::Simple).await;
        assert_matches!(result, Err(SearchError::CandidateFetch(_)));
    }

    #[tokio::test]
    async fn repeated_searches_are_identical() {
        let repo = StaticRepository::new(
            (0..12).map(|i| caregiver(&format!("{:02}", 11 - i), &["Elder Care"])).collect(),
        );
        let service = CaregiverSearchService::new(repo.clone(), None, 10);

        let first = service.search(query("elderly care"), RankingStrategy::Simple).await.unwrap();
        let second = service.search(query("elderly care"), RankingStrategy::Simple).await.unwrap();

        assert_eq!(first.results, second.results);
        assert_eq!(first.results.len(), 10);
        assert_eq!(first.total_caregivers, 12);
        assert_eq!(repo.calls.load(Ordering::SeqCst), 2);
    }
}
