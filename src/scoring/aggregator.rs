//! Score aggregation
//!
//! Reduces a [`ScoreSet`] to a single severity figure plus the category that
//! contributed most. Severity is the plain sum of all scores, so a message
//! flagged moderately in many categories outranks one flagged strongly in a
//! single category. Thresholds are scaled by filter count to compensate.

use serde::{Deserialize, Serialize};

use crate::error::{ModerationError, Result};
use crate::types::{Category, ScoreSet};

// Scores arrive on a 0.001 grid, so any drift below 1e-9 in the running sum
// is float noise and would otherwise push a sum like 0.3 + 0.3 + 0.3 just
// under its tier boundary.
const SEVERITY_GRID: f64 = 1e9;

fn snap(severity: f64) -> f64 {
    (severity * SEVERITY_GRID).round() / SEVERITY_GRID
}

/// Reduced view of one message's scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityVerdict {
    pub dominant_category: Category,
    pub dominant_score: f64,
    /// Sum over every score in the set; not bounded by 1.
    pub aggregate_severity: f64,
}

/// Stateless reducer from scores to a verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    pub const fn new() -> Self {
        Self
    }

    /// Aggregate a score set.
    ///
    /// Ties on the maximal score go to the category declared first in
    /// [`Category::ALL`].
    pub fn aggregate(&self, scores: &ScoreSet) -> Result<SeverityVerdict> {
        let mut dominant: Option<(Category, f64)> = None;
        let mut aggregate_severity = 0.0;

        // ScoreSet iterates in enumeration order; strict `>` keeps the
        // earliest category on ties.
        for (category, score) in scores.iter() {
            aggregate_severity += score;
            match dominant {
                Some((_, best)) if score <= best => {}
                _ => dominant = Some((category, score)),
            }
        }

        let (dominant_category, dominant_score) = dominant.ok_or(ModerationError::EmptyScoreSet)?;
        Ok(SeverityVerdict {
            dominant_category,
            dominant_score,
            aggregate_severity: snap(aggregate_severity),
        })
    }
}
