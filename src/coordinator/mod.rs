//! Moderation Coordinator
//!
//! Drives one inbound message through the pipeline:
//!
//! ```text
//! RECEIVED → SCORED → VERDICT_COMPUTED → ENFORCED → LOGGED
//!     └──────────┴──────────┴────────────→ ABORTED
//! ```
//!
//! Each message is processed in a single pass with no retries. A failed
//! classifier call, an empty score set or a below-threshold verdict abort
//! that message only; nothing carries over to the next one. Processing the
//! same message twice records two offenses.

pub mod audit;
mod dispatch;

pub use audit::{AuditDelivery, AuditLogger, AuditRecord, AuditStep};
pub use dispatch::DispatchStats;

use std::fmt;
use std::sync::Arc;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::enforcement::{EnforcementExecutor, EnforcementReport};
use crate::error::{ModerationError, Result};
use crate::ledger::OffenseLedger;
use crate::scoring::{ScoreAggregator, SeverityVerdict, ThresholdPolicy, ThresholdTriple, Tier};
use crate::traits::{ChatPlatform, Classifier, OffenseStore, SettingsStore};
use crate::types::{CommunityConfig, CommunityId, InboundMessage, ScoreSet};

/// Pipeline position of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Received,
    Scored,
    VerdictComputed,
    Enforced,
    Logged,
    Aborted,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineState::Received => "RECEIVED",
            PipelineState::Scored => "SCORED",
            PipelineState::VerdictComputed => "VERDICT_COMPUTED",
            PipelineState::Enforced => "ENFORCED",
            PipelineState::Logged => "LOGGED",
            PipelineState::Aborted => "ABORTED",
        })
    }
}

/// Why a message never entered the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    OwnMessage,
    BotAuthor,
    DirectMessage,
    EmptyContent,
}

/// Why a pipeline stopped before enforcement.
#[derive(Debug, Clone, PartialEq)]
pub enum AbortReason {
    SettingsUnavailable(ModerationError),
    InvalidConfiguration(ModerationError),
    Classifier(ModerationError),
    EmptyScoreSet,
    BelowNotify { severity: f64 },
}

/// A message that went all the way through enforcement.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationRecord {
    pub trace_id: Uuid,
    pub community: CommunityId,
    pub verdict: SeverityVerdict,
    pub thresholds: ThresholdTriple,
    pub tier: Tier,
    /// `None` when the offense store failed; enforcement still ran.
    pub offense_count: Option<u64>,
    pub report: EnforcementReport,
    pub audit: AuditDelivery,
}

/// Terminal result of processing one message.
#[derive(Debug, Clone, PartialEq)]
pub enum ModerationOutcome {
    Ignored(IgnoreReason),
    Aborted {
        /// Last state reached before aborting.
        at: PipelineState,
        reason: AbortReason,
    },
    Completed(Box<ModerationRecord>),
}

impl ModerationOutcome {
    pub fn final_state(&self) -> Option<PipelineState> {
        match self {
            ModerationOutcome::Ignored(_) => None,
            ModerationOutcome::Aborted { .. } => Some(PipelineState::Aborted),
            ModerationOutcome::Completed(_) => Some(PipelineState::Logged),
        }
    }

    pub fn record(&self) -> Option<&ModerationRecord> {
        match self {
            ModerationOutcome::Completed(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ModerationOutcome::Completed(_))
    }
}

/// Orchestrates scoring, classification, offense tracking and enforcement.
pub struct ModerationCoordinator {
    classifier: Arc<dyn Classifier>,
    platform: Arc<dyn ChatPlatform>,
    settings: Arc<dyn SettingsStore>,
    ledger: OffenseLedger,
    executor: EnforcementExecutor,
    audit: AuditLogger,
    aggregator: ScoreAggregator,
    config: EngineConfig,
}

static_assertions::assert_impl_all!(ModerationCoordinator: Send, Sync);

impl fmt::Debug for ModerationCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModerationCoordinator")
            .field("classifier", &self.classifier.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ModerationCoordinator {
    pub fn builder() -> ModerationCoordinatorBuilder {
        ModerationCoordinatorBuilder::default()
    }

    pub fn ledger(&self) -> &OffenseLedger {
        &self.ledger
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one message through the whole pipeline.
    pub async fn process(&self, message: &InboundMessage) -> ModerationOutcome {
        let Some(community) = message.community else {
            return ModerationOutcome::Ignored(IgnoreReason::DirectMessage);
        };
        if message.author.id == self.platform.current_user() {
            return ModerationOutcome::Ignored(IgnoreReason::OwnMessage);
        }
        if message.author.is_bot {
            return ModerationOutcome::Ignored(IgnoreReason::BotAuthor);
        }
        if message.content.trim().is_empty() {
            return ModerationOutcome::Ignored(IgnoreReason::EmptyContent);
        }

        let trace_id = Uuid::new_v4();
        let span = info_span!(
            "moderate",
            trace_id = %trace_id,
            community = %community,
            message = %message.id,
            user = %message.author.id
        );
        self.run_pipeline(trace_id, community, message)
            .instrument(span)
            .await
    }

    async fn run_pipeline(
        &self,
        trace_id: Uuid,
        community: CommunityId,
        message: &InboundMessage,
    ) -> ModerationOutcome {
        let mut state = PipelineState::Received;

        let config = match self.settings.config_or_default(community).await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "settings unavailable, skipping message");
                return abort(state, AbortReason::SettingsUnavailable(e));
            }
        };
        // Stores can be edited by hand; reject what the admin path would.
        let config = match config.validated() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "community configuration rejected");
                return abort(state, AbortReason::InvalidConfiguration(e));
            }
        };
        let thresholds = match ThresholdPolicy::thresholds(config.filter_count()) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "community configuration rejected");
                return abort(state, AbortReason::InvalidConfiguration(e));
            }
        };

        let scores = match self.score(&message.content, &config).await {
            Ok(scores) => scores,
            Err(ModerationError::EmptyScoreSet) => {
                return abort(state, AbortReason::EmptyScoreSet);
            }
            Err(e) => {
                warn!(classifier = self.classifier.name(), error = %e, "classifier call failed");
                return abort(state, AbortReason::Classifier(e));
            }
        };
        state = PipelineState::Scored;

        let verdict = match self.aggregator.aggregate(&scores) {
            Ok(v) => v,
            Err(_) => {
                debug!("no usable scores for active filters");
                return abort(state, AbortReason::EmptyScoreSet);
            }
        };
        let tier = ThresholdPolicy::classify(verdict.aggregate_severity, &thresholds);
        state = PipelineState::VerdictComputed;
        debug!(
            category = %verdict.dominant_category,
            score = verdict.dominant_score,
            severity = verdict.aggregate_severity,
            tier = %tier,
            "verdict computed"
        );
        if tier == Tier::BelowNotify {
            return abort(
                state,
                AbortReason::BelowNotify {
                    severity: verdict.aggregate_severity,
                },
            );
        }

        let offense_count = match self
            .ledger
            .record_offense(
                community,
                message.author.id,
                verdict.dominant_category,
                &message.snippet(self.config.snippet_max_chars),
            )
            .await
        {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(error = %e, "offense not recorded, enforcing as first offense");
                None
            }
        };

        let report = self
            .executor
            .enforce(message, &verdict, tier, offense_count.unwrap_or(1), &config)
            .await;
        state = PipelineState::Enforced;
        debug!(state = %state, "enforcement complete");

        let record = AuditRecord::new(trace_id, community, message, &verdict, offense_count, &report);
        let audit = self.audit.emit(&record, &config).await;

        ModerationOutcome::Completed(Box::new(ModerationRecord {
            trace_id,
            community,
            verdict,
            thresholds,
            tier,
            offense_count,
            report,
            audit,
        }))
    }

    async fn score(&self, text: &str, config: &CommunityConfig) -> Result<ScoreSet> {
        let raw = self.classifier.analyze(text, &config.active_filters).await?;
        let scores = ScoreSet::from_raw(raw, &config.active_filters);
        if scores.is_empty() {
            return Err(ModerationError::EmptyScoreSet);
        }
        Ok(scores)
    }
}

fn abort(at: PipelineState, reason: AbortReason) -> ModerationOutcome {
    debug!(at = %at, reason = ?reason, "pipeline aborted");
    ModerationOutcome::Aborted { at, reason }
}

/// Builder for [`ModerationCoordinator`]
#[derive(Default)]
pub struct ModerationCoordinatorBuilder {
    classifier: Option<Arc<dyn Classifier>>,
    platform: Option<Arc<dyn ChatPlatform>>,
    settings: Option<Arc<dyn SettingsStore>>,
    offenses: Option<Arc<dyn OffenseStore>>,
    config: Option<EngineConfig>,
}

impl ModerationCoordinatorBuilder {
    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn ChatPlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn offenses(mut self, offenses: Arc<dyn OffenseStore>) -> Self {
        self.offenses = Some(offenses);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<ModerationCoordinator> {
        let missing = |what: &str| {
            ModerationError::InvalidConfiguration(format!("coordinator requires a {what}"))
        };
        let classifier = self.classifier.ok_or_else(|| missing("classifier"))?;
        let platform = self.platform.ok_or_else(|| missing("platform"))?;
        let settings = self.settings.ok_or_else(|| missing("settings store"))?;
        let offenses = self.offenses.ok_or_else(|| missing("offense store"))?;
        let config = self.config.unwrap_or_default();

        Ok(ModerationCoordinator {
            executor: EnforcementExecutor::new(platform.clone(), config.clone()),
            audit: AuditLogger::new(platform.clone(), config.audit_min_severity),
            ledger: OffenseLedger::new(offenses),
            aggregator: ScoreAggregator::new(),
            classifier,
            platform,
            settings,
            config,
        })
    }
}
