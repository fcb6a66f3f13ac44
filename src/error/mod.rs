//! Error Handling Module
//!
//! One error type flows through the whole crate:
//! - `ModerationError` and its coarse `ErrorCategory`
//! - conversions from the transport/serialization errors we touch
//!
//! Pipeline-level errors (`EmptyScoreSet`, `ClassifierError`) abort a single
//! message before any action is taken. Enforcement errors (`PermissionDenied`,
//! `ResourceNotFound`, `RateLimited`) are caught per sub-operation and recorded
//! in the enforcement report instead of being propagated.

mod conversions;
pub mod types;

pub use types::*;
