//! Offense history records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::ids::{CommunityId, UserId};

/// Store key for one user's record inside one community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OffenseKey {
    pub community: CommunityId,
    pub user: UserId,
}

impl OffenseKey {
    pub const fn new(community: CommunityId, user: UserId) -> Self {
        Self { community, user }
    }
}

/// A single recorded offense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffenseEntry {
    pub category: Category,
    pub message_snippet: String,
    pub recorded_at: DateTime<Utc>,
}

impl OffenseEntry {
    pub fn new(category: Category, message_snippet: impl Into<String>) -> Self {
        Self {
            category,
            message_snippet: message_snippet.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// Offense counter and append-only history for one (community, user).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffenseRecord {
    pub offense_count: u64,
    pub history: Vec<OffenseEntry>,
}

impl OffenseRecord {
    /// Append an entry and bump the counter; returns the new count.
    pub fn push(&mut self, entry: OffenseEntry) -> u64 {
        self.history.push(entry);
        self.offense_count += 1;
        self.offense_count
    }

    pub fn is_empty(&self) -> bool {
        self.offense_count == 0
    }

    pub fn last(&self) -> Option<&OffenseEntry> {
        self.history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_increments_and_appends_in_order() {
        let mut record = OffenseRecord::default();
        assert!(record.is_empty());
        assert_eq!(record.push(OffenseEntry::new(Category::Insult, "a")), 1);
        assert_eq!(record.push(OffenseEntry::new(Category::Threat, "b")), 2);
        assert_eq!(record.history.len(), 2);
        assert_eq!(record.last().map(|e| e.category), Some(Category::Threat));
    }
}
