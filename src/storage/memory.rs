//! In-memory store

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};

use crate::error::Result;
use crate::traits::{OffenseStore, SettingsStore};
use crate::types::{CommunityConfig, CommunityId, OffenseEntry, OffenseKey, OffenseRecord};

/// Process-local settings and offense store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    configs: RwLock<HashMap<CommunityId, CommunityConfig>>,
    offenses: Mutex<HashMap<OffenseKey, OffenseRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of offense records across all communities.
    pub async fn record_count(&self) -> usize {
        self.offenses.lock().await.len()
    }
}

#[async_trait]
impl SettingsStore for InMemoryStore {
    async fn load_config(&self, community: CommunityId) -> Result<Option<CommunityConfig>> {
        Ok(self.configs.read().await.get(&community).cloned())
    }

    async fn save_config(&self, community: CommunityId, config: &CommunityConfig) -> Result<()> {
        self.configs.write().await.insert(community, config.clone());
        Ok(())
    }

    async fn remove_config(&self, community: CommunityId) -> Result<()> {
        self.configs.write().await.remove(&community);
        Ok(())
    }
}

#[async_trait]
impl OffenseStore for InMemoryStore {
    async fn load_record(&self, key: OffenseKey) -> Result<Option<OffenseRecord>> {
        Ok(self.offenses.lock().await.get(&key).cloned())
    }

    async fn save_record(&self, key: OffenseKey, record: &OffenseRecord) -> Result<()> {
        self.offenses.lock().await.insert(key, record.clone());
        Ok(())
    }

    async fn clear_community(&self, community: CommunityId) -> Result<usize> {
        let mut offenses = self.offenses.lock().await;
        let before = offenses.len();
        offenses.retain(|key, _| key.community != community);
        Ok(before - offenses.len())
    }

    async fn append_offense(&self, key: OffenseKey, entry: OffenseEntry) -> Result<u64> {
        Ok(self.offenses.lock().await.entry(key).or_default().push(entry))
    }
}
