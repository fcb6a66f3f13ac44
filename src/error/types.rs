//! Core error types

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ModerationError>;

/// Coarse error grouping, used for log fields and retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The message pipeline could not produce a verdict.
    Pipeline,
    /// A platform action was refused or its target is gone.
    Enforcement,
    /// Bad administrator input or invalid configuration.
    Configuration,
    /// The settings/offense store failed.
    Storage,
    /// Network or wire-format failure.
    Transport,
    /// Bug or broken invariant.
    Internal,
}

/// Crate-wide error type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModerationError {
    /// The classifier returned nothing usable for the active filter set.
    #[error("Score set is empty: classifier returned no usable attributes")]
    EmptyScoreSet,

    /// The external classifier call failed.
    #[error("Classifier error{}: {message}", status_suffix(.status))]
    ClassifierError {
        status: Option<u16>,
        message: String,
        /// The classifier could not be reached at all (connect, timeout).
        transient: bool,
    },

    /// The platform refused an action (missing permission).
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The target message, channel, role or member no longer exists.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// The platform or classifier asked us to slow down.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// A destructive administrative action was attempted without the exact
    /// confirmation phrase.
    #[error("Confirmation required: re-run with the exact phrase \"{expected}\"")]
    ConfirmationRequired { expected: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Administrator input could not be parsed into a typed value.
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    /// Any other platform failure.
    #[error("Platform error: {0}")]
    PlatformError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl ModerationError {
    /// Build a classifier error with an optional HTTP status.
    pub fn classifier(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::ClassifierError {
            status,
            message: message.into(),
            transient: false,
        }
    }

    /// Build a classifier error for a request that never got a response.
    pub fn classifier_unreachable(message: impl Into<String>) -> Self {
        Self::ClassifierError {
            status: None,
            message: message.into(),
            transient: true,
        }
    }

    /// Build a confirmation error naming the expected phrase.
    pub fn confirmation_required(expected: impl Into<String>) -> Self {
        Self::ConfirmationRequired {
            expected: expected.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyScoreSet | Self::ClassifierError { .. } => ErrorCategory::Pipeline,
            Self::PermissionDenied(_)
            | Self::ResourceNotFound(_)
            | Self::RateLimited(_)
            | Self::PlatformError(_) => ErrorCategory::Enforcement,
            Self::ConfirmationRequired { .. }
            | Self::InvalidConfiguration(_)
            | Self::ParseError(_) => ErrorCategory::Configuration,
            Self::StorageError(_) => ErrorCategory::Storage,
            Self::HttpError(_) | Self::JsonError(_) => ErrorCategory::Transport,
            Self::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// Whether repeating the same call could succeed.
    ///
    /// Only transient transport conditions qualify: rate limits, 5xx/429
    /// classifier responses and unreachable endpoints.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited(_) | Self::HttpError(_) => true,
            Self::ClassifierError {
                transient: true, ..
            } => true,
            Self::ClassifierError {
                status: Some(code), ..
            } => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }

    /// HTTP status attached to the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ClassifierError { status, .. } => *status,
            _ => None,
        }
    }

    /// Pipeline-level errors abort the current message; everything else is
    /// contained at the sub-operation that raised it.
    pub fn aborts_pipeline(&self) -> bool {
        self.category() == ErrorCategory::Pipeline
    }
}
