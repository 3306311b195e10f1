use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use shared_database::supabase::SupabaseClient;

use crate::models::Caregiver;

const CAREGIVER_TABLE: &str = "caregivers";

/// Read access to the caregiver directory.
#[async_trait]
pub trait CaregiverRepository: Send + Sync {
    /// Every active and verified caregiver, in storage order.
    async fn fetch_active_verified(&self) -> Result<Vec<Caregiver>>;
}

pub struct SupabaseCaregiverRepository {
    supabase: SupabaseClient,
}

impl SupabaseCaregiverRepository {
    pub fn new(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl CaregiverRepository for SupabaseCaregiverRepository {
    async fn fetch_active_verified(&self) -> Result<Vec<Caregiver>> {
        let rows: Vec<Value> = self.supabase.select_eq(
            CAREGIVER_TABLE,
            "*",
            &[("is_active", "true"), ("is_verified", "true")],
            None,
        ).await?;

        let total = rows.len();
        let caregivers: Vec<Caregiver> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Caregiver>(row) {
                Ok(caregiver) => Some(caregiver),
                Err(e) => {
                    warn!("Skipping malformed caregiver row: {}", e);
                    None
                }
            })
            .collect();

        debug!("Fetched {} active caregivers ({} rows)", caregivers.len(), total);
        Ok(caregivers)
    }
}
