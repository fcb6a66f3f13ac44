//! Engine configuration
//!
//! Process-wide policy parameters for the decision engine. Per-community
//! settings live in [`crate::types::CommunityConfig`]; this struct holds the
//! knobs that are the same for every community.

use std::time::Duration;

use crate::defaults;
use crate::error::{ModerationError, Result};

/// How a SANCTION timeout grows with the offender's history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SanctionScaling {
    /// Always `timeout_minutes`.
    #[default]
    Fixed,
    /// `timeout_minutes * min(offense_count, max_multiplier)`.
    Linear { max_multiplier: u32 },
}

impl SanctionScaling {
    /// Timeout for a sanction, before the platform cap is applied.
    pub fn timeout_for(&self, base_minutes: u32, offense_count: u64) -> Duration {
        let multiplier = match self {
            Self::Fixed => 1,
            Self::Linear { max_multiplier } => {
                offense_count.clamp(1, u64::from((*max_multiplier).max(1)))
            }
        };
        Duration::from_secs(u64::from(base_minutes) * 60 * multiplier)
    }

    fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        if raw == "fixed" {
            return Ok(Self::Fixed);
        }
        if let Some(cap) = raw.strip_prefix("linear:") {
            let max_multiplier = cap.parse::<u32>().map_err(|_| {
                ModerationError::InvalidConfiguration(format!(
                    "invalid linear scaling cap '{cap}'"
                ))
            })?;
            return Ok(Self::Linear { max_multiplier });
        }
        Err(ModerationError::InvalidConfiguration(format!(
            "unknown sanction scaling '{raw}' (expected 'fixed' or 'linear:<cap>')"
        )))
    }
}

/// Engine-wide policy parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub warning_ttl: Duration,
    pub sanction_scaling: SanctionScaling,
    pub snippet_max_chars: usize,
    /// Audit posts below this aggregate severity are not sent to the logging
    /// channel. `None` posts every enforced message.
    pub audit_min_severity: Option<f64>,
    pub max_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            warning_ttl: defaults::enforcement::WARNING_TTL,
            sanction_scaling: SanctionScaling::Fixed,
            snippet_max_chars: defaults::enforcement::SNIPPET_MAX_CHARS,
            audit_min_severity: None,
            max_timeout: defaults::enforcement::MAX_TIMEOUT,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Load from `MODGUARD_*` environment variables, defaulting the rest.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(raw) = lookup("MODGUARD_WARNING_TTL_SECS") {
            let secs = parse_number::<u64>("MODGUARD_WARNING_TTL_SECS", &raw)?;
            builder = builder.warning_ttl(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup("MODGUARD_SNIPPET_MAX_CHARS") {
            builder =
                builder.snippet_max_chars(parse_number("MODGUARD_SNIPPET_MAX_CHARS", &raw)?);
        }
        if let Some(raw) = lookup("MODGUARD_AUDIT_MIN_SEVERITY") {
            let floor = parse_number::<f64>("MODGUARD_AUDIT_MIN_SEVERITY", &raw)?;
            if !floor.is_finite() || floor < 0.0 {
                return Err(ModerationError::InvalidConfiguration(format!(
                    "MODGUARD_AUDIT_MIN_SEVERITY must be a non-negative number, got '{raw}'"
                )));
            }
            builder = builder.audit_min_severity(floor);
        }
        if let Some(raw) = lookup("MODGUARD_SANCTION_SCALING") {
            builder = builder.sanction_scaling(SanctionScaling::parse(&raw)?);
        }

        builder.build()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse::<T>().map_err(|_| {
        ModerationError::InvalidConfiguration(format!("{key}: cannot parse '{raw}'"))
    })
}

/// Builder for [`EngineConfig`]
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    warning_ttl: Option<Duration>,
    sanction_scaling: Option<SanctionScaling>,
    snippet_max_chars: Option<usize>,
    audit_min_severity: Option<f64>,
    max_timeout: Option<Duration>,
}

impl EngineConfigBuilder {
    pub fn warning_ttl(mut self, ttl: Duration) -> Self {
        self.warning_ttl = Some(ttl);
        self
    }

    pub fn sanction_scaling(mut self, scaling: SanctionScaling) -> Self {
        self.sanction_scaling = Some(scaling);
        self
    }

    pub fn snippet_max_chars(mut self, chars: usize) -> Self {
        self.snippet_max_chars = Some(chars);
        self
    }

    pub fn audit_min_severity(mut self, floor: f64) -> Self {
        self.audit_min_severity = Some(floor);
        self
    }

    pub fn max_timeout(mut self, cap: Duration) -> Self {
        self.max_timeout = Some(cap);
        self
    }

    pub fn build(self) -> Result<EngineConfig> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            warning_ttl: self.warning_ttl.unwrap_or(defaults.warning_ttl),
            sanction_scaling: self.sanction_scaling.unwrap_or(defaults.sanction_scaling),
            snippet_max_chars: self.snippet_max_chars.unwrap_or(defaults.snippet_max_chars),
            audit_min_severity: self.audit_min_severity,
            max_timeout: self.max_timeout.unwrap_or(defaults.max_timeout),
        };
        if config.warning_ttl.is_zero() {
            return Err(ModerationError::InvalidConfiguration(
                "warning_ttl must be positive".into(),
            ));
        }
        if config.max_timeout.is_zero() {
            return Err(ModerationError::InvalidConfiguration(
                "max_timeout must be positive".into(),
            ));
        }
        Ok(config)
    }
}
