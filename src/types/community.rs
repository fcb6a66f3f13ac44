//! Per-community configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::{Validate, ValidationError};

use super::category::Category;
use super::ids::{ChannelId, RoleId};
use crate::defaults;
use crate::error::Result;

/// Moderation settings for one community.
///
/// Owned by the settings store; the engine reads one snapshot per message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommunityConfig {
    /// Role pinged on ESCALATE and SANCTION.
    pub moderator_role_id: Option<RoleId>,
    /// Channel receiving audit posts.
    pub logging_channel_id: Option<ChannelId>,
    #[validate(custom(function = "validate_filters"))]
    pub active_filters: BTreeSet<Category>,
    #[validate(range(min = 1, max = 40320))]
    pub timeout_minutes: u32,
}

fn validate_filters(filters: &BTreeSet<Category>) -> std::result::Result<(), ValidationError> {
    if filters.is_empty() {
        return Err(ValidationError::new("active_filters_empty")
            .with_message("at least one filter category must be active".into()));
    }
    Ok(())
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            moderator_role_id: None,
            logging_channel_id: None,
            active_filters: Category::baseline(),
            timeout_minutes: defaults::community::TIMEOUT_MINUTES,
        }
    }
}

impl CommunityConfig {
    /// Validate and return `self`, for use at store/admin boundaries.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn filter_count(&self) -> usize {
        self.active_filters.len()
    }

    pub fn is_active(&self, category: Category) -> bool {
        self.active_filters.contains(&category)
    }
}
