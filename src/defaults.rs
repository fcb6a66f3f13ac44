//! Default Configuration Values
//!
//! Centralizes the default values used throughout the crate.

use std::time::Duration;

/// Community-level defaults
pub mod community {
    /// Default sanction timeout, in minutes.
    pub const TIMEOUT_MINUTES: u32 = 5;
}

/// Enforcement defaults
pub mod enforcement {
    use super::*;

    /// Lifetime of a NOTIFY-tier warning before the platform removes it.
    pub const WARNING_TTL: Duration = Duration::from_secs(10);

    /// Upper bound the platform accepts for a member timeout (28 days).
    pub const MAX_TIMEOUT: Duration = Duration::from_secs(28 * 24 * 60 * 60);

    /// Characters of message content kept in offense history.
    pub const SNIPPET_MAX_CHARS: usize = 100;

    /// Phrase an administrator must type verbatim to wipe a community.
    pub const RESET_CONFIRMATION_PHRASE: &str = "RESET ALL MODERATION DATA";
}

/// Classifier HTTP defaults
pub mod classifier {
    use super::*;

    /// Comment analyzer endpoint root.
    pub const PERSPECTIVE_BASE_URL: &str = "https://commentanalyzer.googleapis.com";

    /// Per-request timeout for classifier calls.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Environment variable holding the classifier API key.
    pub const API_KEY_ENV: &str = "PERSPECTIVE_API_KEY";

    pub const USER_AGENT: &str = concat!("modguard/", env!("CARGO_PKG_VERSION"));
}
