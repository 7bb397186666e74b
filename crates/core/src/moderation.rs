//! Moderation reason guidance.
//!
//! The provider reports moderation rejections with a list of filter names.
//! This module maps each known reason (matched case-insensitively) to a
//! user-facing explanation and a concrete suggestion, so moderation
//! failures can be rendered as structured guidance instead of a bare error
//! string.

use serde::Serialize;

/// Reason used when the provider moderates a request without saying why.
pub const DEFAULT_MODERATION_REASON: &str = "Content moderated";

/// Structured guidance for a single moderation reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationNotice {
    /// The reason exactly as the provider reported it.
    pub reason: String,
    /// What the filter checks for.
    pub description: &'static str,
    /// How to rephrase the prompt to pass it.
    pub suggestion: &'static str,
}

/// Explain what a moderation filter checks for.
pub fn describe_reason(reason: &str) -> &'static str {
    match reason.to_lowercase().as_str() {
        "derivative works filter" => {
            "This filter prevents generating content that closely copies or is directly based on \
             existing copyrighted material to respect intellectual property rights."
        }
        "nsfw filter" => {
            "This filter blocks content that may be inappropriate or not safe for work."
        }
        "violence filter" => "This filter prevents generation of violent or harmful content.",
        "hate speech filter" => {
            "This filter blocks content that may contain hate speech or discriminatory language."
        }
        _ => {
            "This content was flagged by the moderation system to ensure safe and appropriate \
             image generation."
        }
    }
}

/// Suggest how to rephrase a prompt that tripped a moderation filter.
pub fn suggest_for_reason(reason: &str) -> &'static str {
    match reason.to_lowercase().as_str() {
        "derivative works filter" => {
            "Try creating original content instead of referencing specific characters, brands, or \
             copyrighted works."
        }
        "nsfw filter" => {
            "Please use appropriate language and avoid suggestive or explicit content."
        }
        "violence filter" => "Consider using peaceful or non-violent alternatives in your prompt.",
        "hate speech filter" => {
            "Please use respectful language that doesn't target any groups or individuals."
        }
        _ => "Please modify your prompt to use more appropriate language and content.",
    }
}

/// Build one notice per reported reason, preserving the provider's casing.
pub fn notices(reasons: &[String]) -> Vec<ModerationNotice> {
    reasons
        .iter()
        .map(|reason| ModerationNotice {
            reason: reason.clone(),
            description: describe_reason(reason),
            suggestion: suggest_for_reason(reason),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_reason_matched_case_insensitively() {
        let upper = describe_reason("Derivative Works Filter");
        let lower = describe_reason("derivative works filter");
        let shouty = describe_reason("DERIVATIVE WORKS FILTER");
        assert_eq!(upper, lower);
        assert_eq!(upper, shouty);
        assert!(upper.contains("copyrighted"));
    }

    #[test]
    fn unknown_reason_gets_generic_guidance() {
        let desc = describe_reason("Mystery Filter");
        assert!(desc.contains("moderation system"));
        let hint = suggest_for_reason("Mystery Filter");
        assert!(hint.contains("modify your prompt"));
    }

    #[test]
    fn notices_preserve_reported_casing() {
        let reasons = vec!["Derivative Works Filter".to_string()];
        let out = notices(&reasons);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].reason, "Derivative Works Filter");
        assert!(out[0].suggestion.contains("original content"));
    }

    #[test]
    fn every_known_filter_has_specific_guidance() {
        for reason in [
            "derivative works filter",
            "nsfw filter",
            "violence filter",
            "hate speech filter",
        ] {
            assert_ne!(describe_reason(reason), describe_reason("something else"));
            assert_ne!(
                suggest_for_reason(reason),
                suggest_for_reason("something else")
            );
        }
    }
}
