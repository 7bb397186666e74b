//! Typed request/response bodies for the FLUX Kontext HTTP API.
//!
//! The provider reports job status as free-form strings (`"pending"`,
//! `"Ready"`, `"Request Moderated"`, ...). This module deserializes them
//! into a strongly-typed [`PollStatus`] and classifies each poll body into
//! a [`PollDisposition`] the orchestrator can act on directly.

use serde::{Deserialize, Serialize};

use fluxdeck_core::moderation::DEFAULT_MODERATION_REASON;

/// Response to a successful job submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Provider-assigned job identifier.
    pub id: String,
    /// Opaque URL to poll for the job's status.
    pub polling_url: String,
}

/// Job status strings as the provider sends them.
///
/// Anything unrecognized maps to [`PollStatus::Unknown`] and is treated as
/// non-terminal, so new provider statuses keep the poll loop alive instead
/// of failing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "Ready")]
    Ready,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "Task not found")]
    TaskNotFound,
    #[serde(rename = "Request Moderated")]
    RequestModerated,
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl PollStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "Ready",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::TaskNotFound => "Task not found",
            Self::RequestModerated => "Request Moderated",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PollStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result payload attached to a ready/completed poll response.
///
/// `sample` is either a remote URL or inline base64 image data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

/// One poll response, produced per attempt and consumed immediately by the
/// classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollResponse {
    #[serde(default)]
    pub id: String,
    pub status: PollStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerationResult>,
    /// Completion fraction in [0, 1] when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Free-form detail payload; moderation reasons live at
    /// `details["Moderation Reasons"]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Terminal-vs-pending classification of one poll response.
#[derive(Debug, Clone, PartialEq)]
pub enum PollDisposition {
    /// Terminal success with a sample reference present.
    Ready(GenerationResult),
    /// The provider moderated the request; carries the reason list.
    Moderated(Vec<String>),
    /// Terminal failure; carries the provider's error text or a
    /// synthesized message naming the status.
    Failed(String),
    /// Anything non-terminal: keep polling.
    Pending { progress: Option<f64> },
}

impl PollResponse {
    /// Classify this response per the job-completion protocol.
    ///
    /// A ready/completed status without a `result.sample` is *not*
    /// terminal: the sample reference is what the materializer consumes, so
    /// the loop keeps polling until it appears.
    pub fn disposition(&self) -> PollDisposition {
        match self.status {
            PollStatus::Ready | PollStatus::Completed => match &self.result {
                Some(result) if result.sample.is_some() => {
                    PollDisposition::Ready(result.clone())
                }
                _ => PollDisposition::Pending {
                    progress: self.progress,
                },
            },
            PollStatus::RequestModerated => {
                PollDisposition::Moderated(self.moderation_reasons())
            }
            PollStatus::Failed | PollStatus::TaskNotFound => {
                let message = self.error.clone().unwrap_or_else(|| {
                    format!("Image generation failed with status: {}", self.status)
                });
                PollDisposition::Failed(message)
            }
            PollStatus::Pending | PollStatus::Unknown => PollDisposition::Pending {
                progress: self.progress,
            },
        }
    }

    /// Extract the moderation reason list from `details`, defaulting to a
    /// single generic reason when the provider omits or mangles it.
    pub fn moderation_reasons(&self) -> Vec<String> {
        let reasons: Vec<String> = self
            .details
            .as_ref()
            .and_then(|details| details.get("Moderation Reasons"))
            .and_then(|value| value.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|entry| entry.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        if reasons.is_empty() {
            vec![DEFAULT_MODERATION_REASON.to_string()]
        } else {
            reasons
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PollResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parse_pending_with_progress() {
        let response = parse(r#"{"id":"job-1","status":"pending","progress":0.42}"#);
        assert_eq!(response.status, PollStatus::Pending);
        assert_eq!(
            response.disposition(),
            PollDisposition::Pending {
                progress: Some(0.42)
            }
        );
    }

    #[test]
    fn parse_ready_with_sample() {
        let response = parse(
            r#"{"id":"job-1","status":"Ready","result":{"prompt":"a red ball","seed":7,"sample":"https://x/img.png"}}"#,
        );
        match response.disposition() {
            PollDisposition::Ready(result) => {
                assert_eq!(result.sample.as_deref(), Some("https://x/img.png"));
                assert_eq!(result.seed, Some(7));
            }
            other => panic!("Expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn completed_status_is_also_ready() {
        let response =
            parse(r#"{"id":"job-1","status":"completed","result":{"sample":"data"}}"#);
        assert!(matches!(response.disposition(), PollDisposition::Ready(_)));
    }

    #[test]
    fn ready_without_sample_keeps_polling() {
        let response = parse(r#"{"id":"job-1","status":"Ready","result":{"seed":1}}"#);
        assert!(matches!(
            response.disposition(),
            PollDisposition::Pending { .. }
        ));

        let no_result = parse(r#"{"id":"job-1","status":"Ready"}"#);
        assert!(matches!(
            no_result.disposition(),
            PollDisposition::Pending { .. }
        ));
    }

    #[test]
    fn moderated_carries_reported_reasons() {
        let response = parse(
            r#"{"id":"job-1","status":"Request Moderated","details":{"Moderation Reasons":["Derivative Works Filter"]}}"#,
        );
        assert_eq!(
            response.disposition(),
            PollDisposition::Moderated(vec!["Derivative Works Filter".to_string()])
        );
    }

    #[test]
    fn moderated_without_reasons_gets_default() {
        let response = parse(r#"{"id":"job-1","status":"Request Moderated"}"#);
        assert_eq!(
            response.disposition(),
            PollDisposition::Moderated(vec![DEFAULT_MODERATION_REASON.to_string()])
        );
    }

    #[test]
    fn moderated_with_string_details_gets_default() {
        let response = parse(
            r#"{"id":"job-1","status":"Request Moderated","details":"blocked"}"#,
        );
        assert_eq!(
            response.disposition(),
            PollDisposition::Moderated(vec![DEFAULT_MODERATION_REASON.to_string()])
        );
    }

    #[test]
    fn failed_uses_provider_error_text() {
        let response =
            parse(r#"{"id":"job-1","status":"failed","error":"GPU on fire"}"#);
        assert_eq!(
            response.disposition(),
            PollDisposition::Failed("GPU on fire".to_string())
        );
    }

    #[test]
    fn failed_without_error_synthesizes_message() {
        let response = parse(r#"{"id":"job-1","status":"Task not found"}"#);
        assert_eq!(
            response.disposition(),
            PollDisposition::Failed(
                "Image generation failed with status: Task not found".to_string()
            )
        );
    }

    #[test]
    fn unknown_status_is_non_terminal() {
        let response = parse(r#"{"id":"job-1","status":"Warming Up"}"#);
        assert_eq!(response.status, PollStatus::Unknown);
        assert!(matches!(
            response.disposition(),
            PollDisposition::Pending { .. }
        ));
    }

    #[test]
    fn submit_response_parses() {
        let response: SubmitResponse = serde_json::from_str(
            r#"{"id":"abc-123","polling_url":"https://api.bfl.ai/v1/get_result?id=abc-123"}"#,
        )
        .unwrap();
        assert_eq!(response.id, "abc-123");
        assert!(response.polling_url.contains("abc-123"));
    }
}
