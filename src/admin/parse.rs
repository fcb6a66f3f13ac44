//! Administrator input parsing
//!
//! Raw command arguments become typed ids here, before any handler sees
//! them. Accepts either a platform mention (`<@&123>`, `<#123>`) or a bare
//! numeric id.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::error::{ModerationError, Result};
use crate::types::{Category, ChannelId, RoleId};

type PatternCell = OnceLock<std::result::Result<Regex, String>>;

fn compiled(cell: &'static PatternCell, pattern: &str) -> Result<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| ModerationError::InternalError(format!("mention pattern: {e}")))
}

fn role_pattern() -> Result<&'static Regex> {
    static PATTERN: PatternCell = OnceLock::new();
    compiled(&PATTERN, r"^(?:<@&(\d+)>|(\d+))$")
}

fn channel_pattern() -> Result<&'static Regex> {
    static PATTERN: PatternCell = OnceLock::new();
    compiled(&PATTERN, r"^(?:<#(\d+)>|(\d+))$")
}

fn capture_id(pattern: &Regex, input: &str, what: &str) -> Result<u64> {
    let trimmed = input.trim();
    let caps = pattern.captures(trimmed).ok_or_else(|| {
        ModerationError::ParseError(format!("'{trimmed}' is not a {what} mention or id"))
    })?;
    let digits = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default();
    digits
        .parse::<u64>()
        .map_err(|_| ModerationError::ParseError(format!("{what} id '{digits}' is out of range")))
}

/// Parse `<@&id>` or a bare id.
pub fn parse_role_mention(input: &str) -> Result<RoleId> {
    capture_id(role_pattern()?, input, "role").map(RoleId)
}

/// Parse `<#id>` or a bare id.
pub fn parse_channel_mention(input: &str) -> Result<ChannelId> {
    capture_id(channel_pattern()?, input, "channel").map(ChannelId)
}

/// Parse a filter list separated by commas and/or whitespace.
///
/// Every entry must name a known category and the result must be non-empty.
pub fn parse_categories(input: &str) -> Result<BTreeSet<Category>> {
    let categories = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse::<Category>)
        .collect::<Result<BTreeSet<_>>>()?;
    if categories.is_empty() {
        return Err(ModerationError::InvalidConfiguration(
            "at least one filter category is required".into(),
        ));
    }
    Ok(categories)
}
