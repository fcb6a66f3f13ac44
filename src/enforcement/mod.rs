//! Enforcement Executor
//!
//! Runs the ordered action sequence for a classified message:
//!
//! ```text
//! resolve-role (ESCALATE+) → send-warning → delete-message → apply-timeout (SANCTION)
//! ```
//!
//! Every step fails on its own: a refused or missing target is recorded in
//! the [`EnforcementReport`], logged, and the next step still runs.

pub mod report;
pub mod warnings;

pub use report::{EnforcementReport, StepOutcome, StepRecord, SubOperation};
pub use warnings::{base_warning, compose_warning, timeout_reason};

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::config::EngineConfig;
use crate::error::ModerationError;
use crate::scoring::{SeverityVerdict, Tier};
use crate::traits::{ChatPlatform, Role};
use crate::types::{CommunityConfig, InboundMessage};

/// Executes enforcement against the chat platform.
#[derive(Clone)]
pub struct EnforcementExecutor {
    platform: Arc<dyn ChatPlatform>,
    config: EngineConfig,
}

impl std::fmt::Debug for EnforcementExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnforcementExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EnforcementExecutor {
    pub fn new(platform: Arc<dyn ChatPlatform>, config: EngineConfig) -> Self {
        Self { platform, config }
    }

    /// Timeout applied on SANCTION for an author with `offense_count` offenses.
    pub fn sanction_duration(&self, community: &CommunityConfig, offense_count: u64) -> Duration {
        self.config
            .sanction_scaling
            .timeout_for(community.timeout_minutes, offense_count)
            .min(self.config.max_timeout)
    }

    /// Perform the actions for `tier`. Never fails as a whole; inspect the
    /// returned report for per-step outcomes.
    #[instrument(
        level = "debug",
        skip_all,
        fields(message = %message.id, tier = %tier, category = %verdict.dominant_category)
    )]
    pub async fn enforce(
        &self,
        message: &InboundMessage,
        verdict: &SeverityVerdict,
        tier: Tier,
        offense_count: u64,
        config: &CommunityConfig,
    ) -> EnforcementReport {
        let mut report = EnforcementReport::new(tier);
        if !tier.requires_action() {
            return report;
        }

        let role = if tier.escalates() {
            self.resolve_moderator_role(message, config, &mut report).await
        } else {
            None
        };

        let timeout =
            (tier == Tier::Sanction).then(|| self.sanction_duration(config, offense_count));
        report.timeout = timeout;

        let text = compose_warning(
            &message.author.mention(),
            verdict.dominant_category,
            tier,
            timeout,
            role.as_ref().map(Role::mention).as_deref(),
        );
        // NOTIFY warnings clean themselves up; higher tiers stay for moderators.
        let auto_expire = (tier == Tier::Notify).then_some(self.config.warning_ttl);
        match self
            .platform
            .send_message(message.channel, &text, auto_expire)
            .await
        {
            Ok(handle) => {
                report.warning = Some(handle);
                report.record(SubOperation::SendWarning, StepOutcome::Succeeded);
            }
            Err(e) => report.record(SubOperation::SendWarning, StepOutcome::Failed(e)),
        }
        report.warning_text = Some(text);

        match self.platform.delete_message(message).await {
            Ok(()) => report.record(SubOperation::DeleteMessage, StepOutcome::Succeeded),
            Err(e) => report.record(SubOperation::DeleteMessage, StepOutcome::Failed(e)),
        }

        if let Some(duration) = timeout {
            self.apply_timeout(message, verdict, duration, &mut report).await;
        }

        info!(
            author = %message.author.id,
            failures = report.failures().count(),
            "enforcement finished"
        );
        report
    }

    async fn resolve_moderator_role(
        &self,
        message: &InboundMessage,
        config: &CommunityConfig,
        report: &mut EnforcementReport,
    ) -> Option<Role> {
        let Some(community) = message.community else {
            report.record(
                SubOperation::ResolveRole,
                StepOutcome::Skipped("message is not in a community".into()),
            );
            return None;
        };
        let Some(role_id) = config.moderator_role_id else {
            report.record(
                SubOperation::ResolveRole,
                StepOutcome::Skipped(format!(
                    "no moderator role configured for community {community}"
                )),
            );
            return None;
        };

        match self.platform.resolve_role(community, role_id).await {
            Ok(Some(role)) => {
                report.record(SubOperation::ResolveRole, StepOutcome::Succeeded);
                Some(role)
            }
            Ok(None) => {
                report.record(
                    SubOperation::ResolveRole,
                    StepOutcome::Failed(ModerationError::ResourceNotFound(format!(
                        "role {role_id} in community {community}"
                    ))),
                );
                None
            }
            Err(e) => {
                report.record(SubOperation::ResolveRole, StepOutcome::Failed(e));
                None
            }
        }
    }

    async fn apply_timeout(
        &self,
        message: &InboundMessage,
        verdict: &SeverityVerdict,
        duration: Duration,
        report: &mut EnforcementReport,
    ) {
        let Some(community) = message.community else {
            report.record(
                SubOperation::ApplyTimeout,
                StepOutcome::Skipped("message is not in a community".into()),
            );
            return;
        };
        let reason = timeout_reason(verdict.dominant_category, verdict.dominant_score);
        match self
            .platform
            .timeout_user(community, message.author.id, duration, &reason)
            .await
        {
            Ok(()) => report.record(SubOperation::ApplyTimeout, StepOutcome::Succeeded),
            Err(e) => {
                if matches!(e, ModerationError::PermissionDenied(_)) {
                    warn!(
                        community = %community,
                        "missing permission to time out members"
                    );
                }
                report.record(SubOperation::ApplyTimeout, StepOutcome::Failed(e));
            }
        }
    }
}
