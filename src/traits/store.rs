//! Storage traits
//!
//! Settings and offense history are injected into the engine through these
//! traits; nothing in the crate keeps module-level mutable state.

use async_trait::async_trait;

use crate::error::ModerationError;
use crate::types::{CommunityConfig, CommunityId, OffenseEntry, OffenseKey, OffenseRecord};

/// Per-community settings, single-key granularity.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Stored config, or `None` if the community was never configured.
    async fn load_config(
        &self,
        community: CommunityId,
    ) -> Result<Option<CommunityConfig>, ModerationError>;

    async fn save_config(
        &self,
        community: CommunityId,
        config: &CommunityConfig,
    ) -> Result<(), ModerationError>;

    async fn remove_config(&self, community: CommunityId) -> Result<(), ModerationError>;

    /// Stored config or defaults.
    async fn config_or_default(
        &self,
        community: CommunityId,
    ) -> Result<CommunityConfig, ModerationError> {
        Ok(self.load_config(community).await?.unwrap_or_default())
    }
}

/// Durable offense records keyed by (community, user).
#[async_trait]
pub trait OffenseStore: Send + Sync {
    async fn load_record(&self, key: OffenseKey) -> Result<Option<OffenseRecord>, ModerationError>;

    async fn save_record(
        &self,
        key: OffenseKey,
        record: &OffenseRecord,
    ) -> Result<(), ModerationError>;

    /// Remove every record in a community; returns how many were removed.
    async fn clear_community(&self, community: CommunityId) -> Result<usize, ModerationError>;

    /// Append one entry and return the new offense count.
    ///
    /// The default is a plain read-modify-write and is not atomic against
    /// concurrent callers on the same key. Stores that can increment
    /// atomically should override it.
    async fn append_offense(
        &self,
        key: OffenseKey,
        entry: OffenseEntry,
    ) -> Result<u64, ModerationError> {
        let mut record = self.load_record(key).await?.unwrap_or_default();
        let count = record.push(entry);
        self.save_record(key, &record).await?;
        Ok(count)
    }
}
