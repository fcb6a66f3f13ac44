//! # modguard - chat moderation decision engine
//!
//! Turns classifier scores for a chat message into an enforcement decision
//! and carries it out against a chat platform.
//!
#![deny(unsafe_code)]

//! ## Pipeline
//!
//! - **Scoring**: per-category scores are reduced to a dominant category and
//!   an aggregate severity ([`scoring::ScoreAggregator`]).
//! - **Thresholds**: the severity is placed in a tier whose bounds scale with
//!   the number of active filters ([`scoring::ThresholdPolicy`]).
//! - **Offense tracking**: every actionable message bumps a per-user counter
//!   scoped to its community ([`ledger::OffenseLedger`]).
//! - **Enforcement**: warn, delete, and for the top tier time the author out
//!   ([`enforcement::EnforcementExecutor`]). A failed step never stops the
//!   ones after it.
//!
//! Collaborators (classifier, chat platform, stores) are injected through the
//! traits in [`traits`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use modguard::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let coordinator = ModerationCoordinator::builder()
//!     .classifier(Arc::new(PerspectiveClassifier::new(PerspectiveConfig::from_env()?)?))
//!     .platform(my_platform)
//!     .settings(store.clone())
//!     .offenses(store)
//!     .config(EngineConfig::from_env()?)
//!     .build()?;
//!
//! let outcome = coordinator.process(&message).await;
//! ```

pub mod admin;
pub mod config;
pub mod coordinator;
pub mod defaults;
pub mod enforcement;
pub mod error;
pub mod ledger;
pub mod providers;
pub mod retry;
pub mod scoring;
pub mod storage;
pub mod telemetry;
pub mod traits;
pub mod types;

pub use config::{EngineConfig, SanctionScaling};
pub use coordinator::{ModerationCoordinator, ModerationOutcome};
pub use error::{ModerationError, Result};

/// Commonly used types and traits
pub mod prelude {
    pub use crate::admin::{
        AdminService, ResetSummary, parse_categories, parse_channel_mention, parse_role_mention,
    };
    pub use crate::config::{EngineConfig, SanctionScaling};
    pub use crate::coordinator::{
        AbortReason, DispatchStats, IgnoreReason, ModerationCoordinator, ModerationOutcome,
        ModerationRecord, PipelineState,
    };
    pub use crate::enforcement::{EnforcementExecutor, EnforcementReport, StepOutcome, SubOperation};
    pub use crate::error::{ModerationError, Result};
    pub use crate::ledger::OffenseLedger;
    pub use crate::providers::{PerspectiveClassifier, PerspectiveConfig};
    pub use crate::retry::RetryPolicy;
    pub use crate::scoring::{ScoreAggregator, SeverityVerdict, ThresholdPolicy, ThresholdTriple, Tier};
    pub use crate::storage::{InMemoryStore, JsonFileStore};
    pub use crate::traits::{
        Channel, ChatPlatform, Classifier, MessageHandle, OffenseStore, Role, SettingsStore,
    };
    pub use crate::types::{
        Author, Category, ChannelId, CommunityConfig, CommunityId, InboundMessage, MessageId,
        OffenseRecord, RoleId, ScoreSet, UserId,
    };
}
