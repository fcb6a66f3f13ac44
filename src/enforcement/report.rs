//! Enforcement report

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ModerationError;
use crate::scoring::Tier;
use crate::traits::MessageHandle;

/// One independently failing platform action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubOperation {
    ResolveRole,
    SendWarning,
    DeleteMessage,
    ApplyTimeout,
}

impl SubOperation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SubOperation::ResolveRole => "resolve_role",
            SubOperation::SendWarning => "send_warning",
            SubOperation::DeleteMessage => "delete_message",
            SubOperation::ApplyTimeout => "apply_timeout",
        }
    }
}

impl fmt::Display for SubOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one sub-operation.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Succeeded,
    /// Not attempted (nothing configured, or no community context).
    Skipped(String),
    Failed(ModerationError),
}

impl StepOutcome {
    pub fn was_attempted(&self) -> bool {
        !matches!(self, StepOutcome::Skipped(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StepOutcome::Succeeded => "ok",
            StepOutcome::Skipped(_) => "skipped",
            StepOutcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub op: SubOperation,
    pub outcome: StepOutcome,
}

/// Ordered account of an enforcement run.
#[derive(Debug, Clone, PartialEq)]
pub struct EnforcementReport {
    pub tier: Tier,
    pub steps: Vec<StepRecord>,
    pub warning_text: Option<String>,
    pub warning: Option<MessageHandle>,
    /// Timeout requested on SANCTION, whether or not the platform applied it.
    pub timeout: Option<Duration>,
}

impl EnforcementReport {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            steps: Vec::new(),
            warning_text: None,
            warning: None,
            timeout: None,
        }
    }

    /// Append a step, logging failures and skips as diagnostics.
    pub fn record(&mut self, op: SubOperation, outcome: StepOutcome) {
        match &outcome {
            StepOutcome::Succeeded => debug!(op = %op, "enforcement step succeeded"),
            StepOutcome::Skipped(reason) => warn!(op = %op, reason = %reason, "enforcement step skipped"),
            StepOutcome::Failed(error) => warn!(
                op = %op,
                error = %error,
                category = ?error.category(),
                "enforcement step failed"
            ),
        }
        self.steps.push(StepRecord { op, outcome });
    }

    pub fn outcome(&self, op: SubOperation) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.op == op).map(|s| &s.outcome)
    }

    pub fn succeeded(&self, op: SubOperation) -> bool {
        self.outcome(op).is_some_and(StepOutcome::is_success)
    }

    pub fn attempted(&self, op: SubOperation) -> bool {
        self.outcome(op).is_some_and(StepOutcome::was_attempted)
    }

    /// Number of timeout attempts; zero below SANCTION.
    pub fn sanction_attempts(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.op == SubOperation::ApplyTimeout && s.outcome.was_attempted())
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Failed(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Order in which steps were recorded.
    pub fn operations(&self) -> Vec<SubOperation> {
        self.steps.iter().map(|s| s.op).collect()
    }
}
