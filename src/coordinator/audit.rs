//! Audit records
//!
//! Every enforced message produces one [`AuditRecord`]. It is always logged
//! on the `modguard::audit` target and, when the community has a logging
//! channel, posted there as well.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::enforcement::{EnforcementReport, StepOutcome};
use crate::scoring::{SeverityVerdict, Tier};
use crate::traits::ChatPlatform;
use crate::types::{Category, ChannelId, CommunityConfig, CommunityId, InboundMessage, MessageId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditStep {
    pub op: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Serializable summary of one moderation decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub trace_id: Uuid,
    pub at: DateTime<Utc>,
    pub community: CommunityId,
    pub channel: ChannelId,
    pub message_id: MessageId,
    pub author_id: UserId,
    pub author_name: String,
    pub content: String,
    pub category: Category,
    pub score: f64,
    pub aggregate_severity: f64,
    pub tier: Tier,
    pub offense_count: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub steps: Vec<AuditStep>,
}

impl AuditRecord {
    pub fn new(
        trace_id: Uuid,
        community: CommunityId,
        message: &InboundMessage,
        verdict: &SeverityVerdict,
        offense_count: Option<u64>,
        report: &EnforcementReport,
    ) -> Self {
        let steps = report
            .steps
            .iter()
            .map(|step| AuditStep {
                op: step.op.as_str(),
                status: step.outcome.label(),
                detail: match &step.outcome {
                    StepOutcome::Succeeded => None,
                    StepOutcome::Skipped(reason) => Some(reason.clone()),
                    StepOutcome::Failed(error) => Some(error.to_string()),
                },
            })
            .collect();

        Self {
            trace_id,
            at: Utc::now(),
            community,
            channel: message.channel,
            message_id: message.id,
            author_id: message.author.id,
            author_name: message.author.name.clone(),
            content: message.content.clone(),
            category: verdict.dominant_category,
            score: verdict.dominant_score,
            aggregate_severity: verdict.aggregate_severity,
            tier: report.tier,
            offense_count,
            timeout_secs: report.timeout.map(|d| d.as_secs()),
            steps,
        }
    }

    /// Human-readable form posted to the logging channel.
    pub fn render(&self) -> String {
        let mut lines = vec![
            "**Message Moderated**".to_string(),
            format!("Author: {}", self.author_id.mention()),
            format!("Channel: {}", self.channel.mention()),
            format!("Message: {}", self.content),
            format!("Offense Type: {}", self.category),
            format!("Score: {:.3}", self.score),
            format!("Severity: {:.3} ({})", self.aggregate_severity, self.tier),
        ];
        if let Some(count) = self.offense_count {
            lines.push(format!("Offense Count: {count}"));
        }
        if let Some(secs) = self.timeout_secs {
            lines.push(format!("Timeout Duration: {} minutes", secs / 60));
        }
        let actions = self
            .steps
            .iter()
            .map(|s| format!("{}={}", s.op, s.status))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Actions: {actions}"));
        lines.join("\n")
    }
}

/// Where an audit record ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditDelivery {
    /// Log only; no logging channel configured.
    LogOnly,
    /// Severity under the configured floor; log only.
    BelowFloor,
    Posted,
    /// Channel post failed; the log entry was still written.
    Failed(String),
}

/// Emits audit records to the log and the community's logging channel.
#[derive(Clone)]
pub struct AuditLogger {
    platform: Arc<dyn ChatPlatform>,
    min_severity: Option<f64>,
}

impl AuditLogger {
    pub fn new(platform: Arc<dyn ChatPlatform>, min_severity: Option<f64>) -> Self {
        Self {
            platform,
            min_severity,
        }
    }

    pub async fn emit(&self, record: &AuditRecord, config: &CommunityConfig) -> AuditDelivery {
        match serde_json::to_string(record) {
            Ok(json) => info!(target: "modguard::audit", record = %json, "moderation audit"),
            Err(e) => warn!(target: "modguard::audit", error = %e, "audit record not serializable"),
        }

        let Some(channel_id) = config.logging_channel_id else {
            return AuditDelivery::LogOnly;
        };
        if self
            .min_severity
            .is_some_and(|floor| record.aggregate_severity < floor)
        {
            return AuditDelivery::BelowFloor;
        }

        let channel = match self.platform.resolve_channel(record.community, channel_id).await {
            Ok(Some(channel)) => channel,
            Ok(None) => {
                warn!(community = %record.community, channel = %channel_id, "logging channel not found");
                return AuditDelivery::Failed(format!("logging channel {channel_id} not found"));
            }
            Err(e) => {
                warn!(community = %record.community, error = %e, "logging channel lookup failed");
                return AuditDelivery::Failed(e.to_string());
            }
        };

        match self.platform.send_message(channel.id, &record.render(), None).await {
            Ok(_) => AuditDelivery::Posted,
            Err(e) => {
                warn!(community = %record.community, channel = %channel.id, error = %e, "audit post failed");
                AuditDelivery::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enforcement::SubOperation;
    use crate::error::ModerationError;
    use crate::types::Author;

    #[test]
    fn render_lists_fields_and_actions() {
        let message = InboundMessage::new(
            11,
            Author::new(22, "mallory"),
            Some(CommunityId(1)),
            33,
            "nasty words",
        );
        let verdict = SeverityVerdict {
            dominant_category: Category::Insult,
            dominant_score: 0.8123,
            aggregate_severity: 2.5,
        };
        let mut report = EnforcementReport::new(Tier::Sanction);
        report.record(SubOperation::SendWarning, StepOutcome::Succeeded);
        report.record(
            SubOperation::DeleteMessage,
            StepOutcome::Failed(ModerationError::ResourceNotFound("message 11".into())),
        );
        report.timeout = Some(std::time::Duration::from_secs(300));

        let record = AuditRecord::new(Uuid::nil(), CommunityId(1), &message, &verdict, Some(3), &report);
        let text = record.render();
        assert!(text.contains("Author: <@22>"));
        assert!(text.contains("Channel: <#33>"));
        assert!(text.contains("Message: nasty words"));
        assert!(text.contains("Offense Type: INSULT"));
        assert!(text.contains("Score: 0.812"));
        assert!(text.contains("Severity: 2.500 (SANCTION)"));
        assert!(text.contains("Timeout Duration: 5 minutes"));
        assert!(text.contains("Actions: send_warning=ok, delete_message=failed"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tier"], "SANCTION");
        assert_eq!(json["steps"][1]["detail"], "Resource not found: message 11");
        assert!(json["steps"][0].get("detail").is_none());
    }
}
