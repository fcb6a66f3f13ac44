//! Score reduction and tier classification
//!
//! - aggregator.rs: attribute scores → [`SeverityVerdict`]
//! - thresholds.rs: filter count → [`ThresholdTriple`], severity → [`Tier`]

pub mod aggregator;
pub mod thresholds;

pub use aggregator::{ScoreAggregator, SeverityVerdict};
pub use thresholds::{ThresholdPolicy, ThresholdTriple, Tier};
