//! Offense Ledger
//!
//! Per-(community, user) offense counters and history, persisted through an
//! injected [`OffenseStore`]. Appends for the same key are serialized through
//! a keyed async mutex, so a store using the default read-modify-write
//! `append_offense` cannot lose increments to concurrent messages from the
//! same author. Duplicate deliveries of one message still count twice.

mod locks;

pub use locks::{KeyGuard, KeyedLocks};

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::defaults::enforcement::RESET_CONFIRMATION_PHRASE;
use crate::error::{ModerationError, Result};
use crate::traits::OffenseStore;
use crate::types::{Category, CommunityId, OffenseEntry, OffenseKey, OffenseRecord, UserId};

/// Offense history facade over a store.
#[derive(Clone)]
pub struct OffenseLedger {
    store: Arc<dyn OffenseStore>,
    locks: Arc<KeyedLocks<OffenseKey>>,
}

impl std::fmt::Debug for OffenseLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffenseLedger")
            .field("pending_keys", &self.locks.len())
            .finish_non_exhaustive()
    }
}

impl OffenseLedger {
    pub fn new(store: Arc<dyn OffenseStore>) -> Self {
        Self {
            store,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Record one offense and return the user's new offense count.
    #[instrument(level = "debug", skip_all, fields(community = %community, user = %user, category = %category))]
    pub async fn record_offense(
        &self,
        community: CommunityId,
        user: UserId,
        category: Category,
        message_snippet: &str,
    ) -> Result<u64> {
        let key = OffenseKey::new(community, user);
        let _guard = self.locks.lock(key).await;
        let count = self
            .store
            .append_offense(key, OffenseEntry::new(category, message_snippet))
            .await?;
        debug!(count, "offense recorded");
        Ok(count)
    }

    /// Full record for administrative queries; empty if the user has none.
    pub async fn history(&self, community: CommunityId, user: UserId) -> Result<OffenseRecord> {
        Ok(self
            .store
            .load_record(OffenseKey::new(community, user))
            .await?
            .unwrap_or_default())
    }

    /// Wipe every record in a community.
    ///
    /// Refuses unless `confirmation` matches [`RESET_CONFIRMATION_PHRASE`]
    /// exactly; nothing is touched on refusal.
    pub async fn reset(&self, community: CommunityId, confirmation: &str) -> Result<usize> {
        if confirmation != RESET_CONFIRMATION_PHRASE {
            return Err(ModerationError::confirmation_required(
                RESET_CONFIRMATION_PHRASE,
            ));
        }
        let removed = self.store.clear_community(community).await?;
        info!(community = %community, removed, "offense records reset");
        Ok(removed)
    }
}
