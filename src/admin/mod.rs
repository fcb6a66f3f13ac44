//! Administrative configuration
//!
//! The mutations an administrator command surface triggers. Command parsing
//! itself lives outside the crate; inputs arrive either typed or as raw
//! strings that go through [`parse`] first. Every error here is meant to be
//! shown back to the invoking administrator.

pub mod parse;

pub use parse::{parse_categories, parse_channel_mention, parse_role_mention};

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use crate::defaults::enforcement::RESET_CONFIRMATION_PHRASE;
use crate::error::{ModerationError, Result};
use crate::ledger::OffenseLedger;
use crate::traits::SettingsStore;
use crate::types::{Category, ChannelId, CommunityConfig, CommunityId, OffenseRecord, RoleId, UserId};

/// Summary of a community reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSummary {
    pub offense_records_removed: usize,
}

/// Applies administrator changes to settings and offense history.
#[derive(Clone)]
pub struct AdminService {
    settings: Arc<dyn SettingsStore>,
    ledger: OffenseLedger,
}

impl AdminService {
    pub fn new(settings: Arc<dyn SettingsStore>, ledger: OffenseLedger) -> Self {
        Self { settings, ledger }
    }

    /// Effective configuration (defaults when never configured).
    pub async fn show_config(&self, community: CommunityId) -> Result<CommunityConfig> {
        self.settings.config_or_default(community).await
    }

    pub async fn set_moderator_role(
        &self,
        community: CommunityId,
        role: RoleId,
    ) -> Result<CommunityConfig> {
        self.update(community, |cfg| cfg.moderator_role_id = Some(role))
            .await
    }

    pub async fn set_logging_channel(
        &self,
        community: CommunityId,
        channel: ChannelId,
    ) -> Result<CommunityConfig> {
        self.update(community, |cfg| cfg.logging_channel_id = Some(channel))
            .await
    }

    /// Replace the active filter set; it must not be empty.
    pub async fn set_active_filters(
        &self,
        community: CommunityId,
        filters: BTreeSet<Category>,
    ) -> Result<CommunityConfig> {
        self.update(community, |cfg| cfg.active_filters = filters)
            .await
    }

    pub async fn set_timeout_minutes(
        &self,
        community: CommunityId,
        minutes: u32,
    ) -> Result<CommunityConfig> {
        self.update(community, |cfg| cfg.timeout_minutes = minutes)
            .await
    }

    pub async fn offense_history(
        &self,
        community: CommunityId,
        user: UserId,
    ) -> Result<OffenseRecord> {
        self.ledger.history(community, user).await
    }

    /// Delete every offense record and the stored configuration.
    ///
    /// Requires `confirmation` to equal [`RESET_CONFIRMATION_PHRASE`].
    pub async fn reset_community(
        &self,
        community: CommunityId,
        confirmation: &str,
    ) -> Result<ResetSummary> {
        if confirmation != RESET_CONFIRMATION_PHRASE {
            return Err(ModerationError::confirmation_required(
                RESET_CONFIRMATION_PHRASE,
            ));
        }
        let offense_records_removed = self.ledger.reset(community, confirmation).await?;
        self.settings.remove_config(community).await?;
        info!(community = %community, offense_records_removed, "community data reset");
        Ok(ResetSummary {
            offense_records_removed,
        })
    }

    /// Load, mutate, validate, save. Nothing is written if validation fails.
    async fn update<F>(&self, community: CommunityId, mutate: F) -> Result<CommunityConfig>
    where
        F: FnOnce(&mut CommunityConfig) + Send,
    {
        let mut config = self.settings.config_or_default(community).await?;
        mutate(&mut config);
        let config = config.validated()?;
        self.settings.save_config(community, &config).await?;
        info!(community = %community, "community configuration updated");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    fn service() -> (AdminService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let ledger = OffenseLedger::new(store.clone());
        (AdminService::new(store.clone(), ledger), store)
    }

    #[tokio::test]
    async fn first_change_creates_config_from_defaults() {
        let (admin, store) = service();
        let c = CommunityId(1);
        assert!(store.load_config(c).await.unwrap().is_none());

        let cfg = admin.set_moderator_role(c, RoleId(9)).await.unwrap();
        assert_eq!(cfg.moderator_role_id, Some(RoleId(9)));
        assert_eq!(cfg.timeout_minutes, 5);
        assert_eq!(store.load_config(c).await.unwrap(), Some(cfg));
    }

    #[tokio::test]
    async fn invalid_changes_are_not_saved() {
        let (admin, store) = service();
        let c = CommunityId(1);
        admin.set_timeout_minutes(c, 10).await.unwrap();

        assert!(matches!(
            admin.set_timeout_minutes(c, 0).await,
            Err(ModerationError::InvalidConfiguration(_))
        ));
        assert!(admin.set_active_filters(c, BTreeSet::new()).await.is_err());

        let stored = store.load_config(c).await.unwrap().unwrap();
        assert_eq!(stored.timeout_minutes, 10);
        assert_eq!(stored.active_filters, Category::baseline());
    }

    #[tokio::test]
    async fn reset_wipes_config_and_history() {
        let (admin, store) = service();
        let c = CommunityId(3);
        admin
            .set_logging_channel(c, ChannelId(44))
            .await
            .unwrap();
        admin
            .ledger
            .record_offense(c, UserId(1), Category::Insult, "x")
            .await
            .unwrap();

        let err = admin.reset_community(c, "yes").await.unwrap_err();
        assert!(matches!(err, ModerationError::ConfirmationRequired { .. }));
        assert!(store.load_config(c).await.unwrap().is_some());

        let summary = admin
            .reset_community(c, RESET_CONFIRMATION_PHRASE)
            .await
            .unwrap();
        assert_eq!(summary.offense_records_removed, 1);
        assert!(store.load_config(c).await.unwrap().is_none());
        assert!(admin.offense_history(c, UserId(1)).await.unwrap().is_empty());
    }
}
