//! Warning texts

use std::time::Duration;

use crate::scoring::Tier;
use crate::types::Category;

/// Base warning shown for a dominant category.
pub const fn base_warning(category: Category) -> &'static str {
    match category {
        Category::SevereToxicity => "🚫 Severely toxic content detected.",
        Category::Threat => "🚫 Threatening content is not allowed.",
        Category::Toxicity => "⚠️ Toxic content detected.",
        Category::IdentityAttack => "🚫 Identity-based attacks are not allowed.",
        Category::Insult => "⚠️ Insulting content detected.",
        Category::Profanity => "⚠️ Excessive profanity detected.",
        Category::SexuallyExplicit => "🚫 Sexually explicit content is not allowed.",
        Category::Flirtation => "⚠️ Inappropriate flirtation detected.",
    }
}

/// Full warning text for the author.
///
/// `timeout` is only used on the SANCTION tier; `role_mention` is appended
/// when a moderator role resolved.
pub fn compose_warning(
    author_mention: &str,
    category: Category,
    tier: Tier,
    timeout: Option<Duration>,
    role_mention: Option<&str>,
) -> String {
    let mut text = format!("{author_mention} {}", base_warning(category));
    match tier {
        Tier::Escalate => text.push_str(" Moderator review advised."),
        Tier::Sanction => {
            let minutes = timeout.map(|d| d.as_secs() / 60).unwrap_or_default();
            text.push_str(&format!(" User temporarily muted for {minutes} minutes."));
        }
        Tier::Notify | Tier::BelowNotify => {}
    }
    if let Some(mention) = role_mention {
        text.push(' ');
        text.push_str(mention);
    }
    text
}

/// Audit-log reason attached to a timeout.
pub fn timeout_reason(category: Category, score: f64) -> String {
    format!("Content flagged for {category} (Score: {score:.3})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_warning_has_no_suffix() {
        let text = compose_warning("<@1>", Category::Insult, Tier::Notify, None, None);
        assert_eq!(text, "<@1> ⚠️ Insulting content detected.");
    }

    #[test]
    fn escalate_appends_review_and_mention() {
        let text = compose_warning("<@1>", Category::Threat, Tier::Escalate, None, Some("<@&9>"));
        assert_eq!(
            text,
            "<@1> 🚫 Threatening content is not allowed. Moderator review advised. <@&9>"
        );
    }

    #[test]
    fn sanction_names_the_duration() {
        let text = compose_warning(
            "<@1>",
            Category::Toxicity,
            Tier::Sanction,
            Some(Duration::from_secs(600)),
            None,
        );
        assert!(text.ends_with("User temporarily muted for 10 minutes."));
    }

    #[test]
    fn reason_formats_score_to_three_places() {
        assert_eq!(
            timeout_reason(Category::Threat, 0.91234),
            "Content flagged for THREAT (Score: 0.912)"
        );
    }
}
