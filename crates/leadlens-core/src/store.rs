//! Lead record store seam

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::types::{AudioAnalysisResult, LeadData, OsiProfile};

/// Keyed lead record store.
///
/// Persistence is an external collaborator: the pipeline only needs reads by
/// id, whole-record upserts, and the two incremental writes it performs
/// after analysis. Implementations decide durability.
#[trait_variant::make(LeadRecordStore: Send)]
pub trait LocalLeadRecordStore {
    /// Fetch a lead by id
    async fn get(&self, lead_id: &str) -> Result<Option<LeadData>, StoreError>;

    /// Fetch several leads; ids with no record are skipped
    async fn get_many(&self, lead_ids: &[String]) -> Result<Vec<LeadData>, StoreError>;

    /// Insert or replace a lead record
    async fn put(&self, lead: &LeadData) -> Result<(), StoreError>;

    /// Append a derived analysis row to an existing lead
    async fn append_audio(
        &self,
        lead_id: &str,
        analysis: &AudioAnalysisResult,
    ) -> Result<(), StoreError>;

    /// Overwrite the OSI block of an existing lead
    async fn update_osi(&self, lead_id: &str, osi: &OsiProfile) -> Result<(), StoreError>;

    /// Overwrite the composite score of an existing lead
    async fn update_score(&self, lead_id: &str, score: Option<f64>) -> Result<(), StoreError>;
}

/// In-memory store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    leads: RwLock<HashMap<String, LeadData>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeadRecordStore for MemoryStore {
    async fn get(&self, lead_id: &str) -> Result<Option<LeadData>, StoreError> {
        Ok(self.leads.read().await.get(lead_id).cloned())
    }

    async fn get_many(&self, lead_ids: &[String]) -> Result<Vec<LeadData>, StoreError> {
        let leads = self.leads.read().await;
        Ok(lead_ids.iter().filter_map(|id| leads.get(id).cloned()).collect())
    }

    async fn put(&self, lead: &LeadData) -> Result<(), StoreError> {
        self.leads.write().await.insert(lead.id.clone(), lead.clone());
        Ok(())
    }

    async fn append_audio(
        &self,
        lead_id: &str,
        analysis: &AudioAnalysisResult,
    ) -> Result<(), StoreError> {
        let mut leads = self.leads.write().await;
        let lead = leads
            .get_mut(lead_id)
            .ok_or_else(|| StoreError::NotFound(lead_id.to_string()))?;
        lead.audios.push(analysis.clone());
        Ok(())
    }

    async fn update_osi(&self, lead_id: &str, osi: &OsiProfile) -> Result<(), StoreError> {
        let mut leads = self.leads.write().await;
        let lead = leads
            .get_mut(lead_id)
            .ok_or_else(|| StoreError::NotFound(lead_id.to_string()))?;
        lead.osi = osi.clone();
        Ok(())
    }

    async fn update_score(&self, lead_id: &str, score: Option<f64>) -> Result<(), StoreError> {
        let mut leads = self.leads.write().await;
        let lead = leads
            .get_mut(lead_id)
            .ok_or_else(|| StoreError::NotFound(lead_id.to_string()))?;
        lead.overall_score = score;
        Ok(())
    }
}
