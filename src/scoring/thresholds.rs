//! Threshold policy
//!
//! Three ascending cut points derived from the number of active filters,
//! and the four tiers they carve out of the severity axis.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModerationError, Result};

// Coefficients in tenths; the cut points are divided once so `0.4 * 3` lands
// on the nearest double to 1.2 rather than one ulp above it.
const NOTIFY_TENTHS: u64 = 3;
const ESCALATE_TENTHS: u64 = 4;
const SANCTION_TENTHS: u64 = 5;

fn cut_point(filter_count: u64, tenths: u64) -> f64 {
    (filter_count * tenths) as f64 / 10.0
}

/// Lower bounds of the NOTIFY, ESCALATE and SANCTION tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTriple {
    pub notify: f64,
    pub escalate: f64,
    pub sanction: f64,
}

/// Graduated enforcement level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    BelowNotify,
    Notify,
    Escalate,
    Sanction,
}

impl Tier {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Tier::BelowNotify => "BELOW_NOTIFY",
            Tier::Notify => "NOTIFY",
            Tier::Escalate => "ESCALATE",
            Tier::Sanction => "SANCTION",
        }
    }

    /// Whether this tier pings moderators and keeps the warning visible.
    pub const fn escalates(&self) -> bool {
        matches!(self, Tier::Escalate | Tier::Sanction)
    }

    pub const fn requires_action(&self) -> bool {
        !matches!(self, Tier::BelowNotify)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure threshold computations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdPolicy;

impl ThresholdPolicy {
    /// Thresholds for `filter_count` active categories: `(0.3n, 0.4n, 0.5n)`.
    ///
    /// Zero filters would put every message in SANCTION, so it is rejected.
    pub fn thresholds(filter_count: usize) -> Result<ThresholdTriple> {
        if filter_count == 0 {
            return Err(ModerationError::InvalidConfiguration(
                "active filter set is empty; cannot derive thresholds".into(),
            ));
        }
        let n = filter_count as u64;
        Ok(ThresholdTriple {
            notify: cut_point(n, NOTIFY_TENTHS),
            escalate: cut_point(n, ESCALATE_TENTHS),
            sanction: cut_point(n, SANCTION_TENTHS),
        })
    }

    /// Place a severity on the tier ladder. Each tier includes its lower
    /// bound; negative or NaN severities land in `BelowNotify`.
    pub fn classify(aggregate_severity: f64, thresholds: &ThresholdTriple) -> Tier {
        if aggregate_severity >= thresholds.sanction {
            Tier::Sanction
        } else if aggregate_severity >= thresholds.escalate {
            Tier::Escalate
        } else if aggregate_severity >= thresholds.notify {
            Tier::Notify
        } else {
            Tier::BelowNotify
        }
    }
}
