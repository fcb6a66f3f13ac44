//! Classifier attribute categories

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ModerationError;

/// One attribute the external classifier can score.
///
/// Declaration order is significant: `Ord` follows it, and it is the
/// tie-break order when two categories share the maximal score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Toxicity,
    SevereToxicity,
    IdentityAttack,
    Insult,
    Profanity,
    Threat,
    SexuallyExplicit,
    Flirtation,
}

impl Category {
    /// Every category, in enumeration order.
    pub const ALL: [Category; 8] = [
        Category::Toxicity,
        Category::SevereToxicity,
        Category::IdentityAttack,
        Category::Insult,
        Category::Profanity,
        Category::Threat,
        Category::SexuallyExplicit,
        Category::Flirtation,
    ];

    /// Filter set a community gets before any administrator touches it.
    pub const BASELINE: [Category; 5] = [
        Category::Toxicity,
        Category::SevereToxicity,
        Category::IdentityAttack,
        Category::Insult,
        Category::Threat,
    ];

    /// Wire identifier used by the classifier API.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Toxicity => "TOXICITY",
            Category::SevereToxicity => "SEVERE_TOXICITY",
            Category::IdentityAttack => "IDENTITY_ATTACK",
            Category::Insult => "INSULT",
            Category::Profanity => "PROFANITY",
            Category::Threat => "THREAT",
            Category::SexuallyExplicit => "SEXUALLY_EXPLICIT",
            Category::Flirtation => "FLIRTATION",
        }
    }

    pub fn baseline() -> BTreeSet<Category> {
        Self::BASELINE.into_iter().collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ModerationError;

    /// Case-insensitive; accepts `-` or space in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| {
                ModerationError::ParseError(format!(
                    "unknown category '{s}' (expected one of: {})",
                    Category::ALL.map(|c| c.as_str()).join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_declaration() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
        assert!(Category::Toxicity < Category::Flirtation);
    }

    #[test]
    fn parses_loose_spellings() {
        assert_eq!("toxicity".parse::<Category>().unwrap(), Category::Toxicity);
        assert_eq!(
            "sexually-explicit".parse::<Category>().unwrap(),
            Category::SexuallyExplicit
        );
        assert_eq!(
            " Severe Toxicity ".parse::<Category>().unwrap(),
            Category::SevereToxicity
        );
        assert!(matches!(
            "spam".parse::<Category>(),
            Err(ModerationError::ParseError(_))
        ));
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Category::IdentityAttack).unwrap();
        assert_eq!(json, "\"IDENTITY_ATTACK\"");
        let back: Category = serde_json::from_str("\"SEVERE_TOXICITY\"").unwrap();
        assert_eq!(back, Category::SevereToxicity);
    }

    #[test]
    fn baseline_has_five_categories() {
        assert_eq!(Category::baseline().len(), 5);
    }
}
