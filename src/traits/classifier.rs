//! Content classifier capability trait

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};

use crate::error::ModerationError;
use crate::types::Category;

/// External scorer producing per-category confidence values.
///
/// Implementations report every failure (network, quota, malformed
/// response) as an error; callers treat any error as "skip this message".
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn analyze(
        &self,
        text: &str,
        requested: &BTreeSet<Category>,
    ) -> Result<HashMap<Category, f64>, ModerationError>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        "classifier"
    }
}
