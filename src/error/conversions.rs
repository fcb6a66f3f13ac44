//! Type Conversions for ModerationError
//!
//! `From` implementations for the foreign errors the crate touches.

use super::types::ModerationError;

/// reqwest is only used to reach the classifier, so its failures are
/// classifier failures. The URL is stripped since it carries the API key.
impl From<reqwest::Error> for ModerationError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            return Self::classifier(None, format!("Failed to parse response: {err}"));
        }
        match err.status() {
            Some(status) => Self::classifier(Some(status.as_u16()), err.to_string()),
            None => Self::classifier_unreachable(format!("Request failed: {err}")),
        }
    }
}

impl From<serde_json::Error> for ModerationError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for ModerationError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ModerationError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::InvalidConfiguration(err.to_string())
    }
}
