//! Short generative-text summaries for the client memory screen.
//!
//! Callers always get text back: every failure turns into a fixed fallback
//! line and a WARN log entry.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::Config;
use crate::models::{ChecklistItem, Message};

pub const PROJECT_EMPTY_REPLY: &str = "Status updated.";
pub const PROJECT_UNAVAILABLE: &str = "Ready for the next session.";
pub const NO_CONVERSATION: &str = "No conversation history logged yet.";
pub const CONVERSATION_EMPTY_REPLY: &str = "Summary analysis pending.";
pub const CONVERSATION_UNAVAILABLE: &str = "AI insights currently processing.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("AI summaries are switched off")]
    Disabled,

    #[error("GEMINI_API_KEY is not configured")]
    MissingKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub trait Summarizer: Send + Sync + 'static {
    fn summarize_project(
        &self,
        title: &str,
        checklist: &[ChecklistItem],
    ) -> impl Future<Output = String> + Send;

    fn summarize_conversation(&self, messages: &[Message]) -> impl Future<Output = String> + Send;
}

pub fn project_prompt(title: &str, checklist: &[ChecklistItem]) -> String {
    let labels = |done: bool| {
        checklist
            .iter()
            .filter(|i| i.is_completed == done)
            .map(|i| i.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Summarize the status of project \"{title}\".\n\
         Completed tasks: {}.\n\
         Remaining tasks: {}.\n\
         Provide a short, punchy studio-style status update for a creative entrepreneur.",
        labels(true),
        labels(false),
    )
}

/// One `[Platform] sender: text` line per message.
pub fn transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("[{}] {}: {}", m.platform, m.sender, m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn conversation_prompt(messages: &[Message]) -> String {
    format!(
        "Analyze this conversation between a creative producer and a client.\n\
         Create a bulleted summary of:\n\
         1. Key creative decisions made.\n\
         2. Next immediate steps.\n\
         3. Client's general mood/energy.\n\
         \n\
         Conversation:\n{}",
        transcript(messages)
    )
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Text of the first candidate, parts joined. Empty when there is none.
fn reply_text(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    enabled: Arc<AtomicBool>,
}

impl GeminiClient {
    /// `enabled` is shared with the settings screen's AI switch.
    pub fn new(config: &Config, enabled: Arc<AtomicBool>) -> Result<Self, SummarizeError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SummarizeError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone().filter(|k| !k.is_empty()),
            enabled,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send one prompt and return the reply text, possibly empty.
    pub async fn generate(&self, prompt: &str) -> Result<String, SummarizeError> {
        if !self.enabled.load(Ordering::Relaxed) {
            return Err(SummarizeError::Disabled);
        }
        let api_key = self.api_key.as_deref().ok_or(SummarizeError::MissingKey)?;

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        tracing::debug!(model = %self.model, "requesting summary");

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| SummarizeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Api(status.as_u16(), error_text));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Parse(e.to_string()))?;

        Ok(reply_text(&parsed))
    }
}

/// Empty reply and failure each map to their own fallback line.
fn settle(result: Result<String, SummarizeError>, empty: &str, unavailable: &str, what: &str) -> String {
    match result {
        Ok(text) if text.is_empty() => empty.to_string(),
        Ok(text) => text,
        Err(SummarizeError::Disabled) => unavailable.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "{what} summary failed");
            unavailable.to_string()
        }
    }
}

impl Summarizer for GeminiClient {
    async fn summarize_project(&self, title: &str, checklist: &[ChecklistItem]) -> String {
        let result = self.generate(&project_prompt(title, checklist)).await;
        settle(result, PROJECT_EMPTY_REPLY, PROJECT_UNAVAILABLE, "project")
    }

    async fn summarize_conversation(&self, messages: &[Message]) -> String {
        if messages.is_empty() {
            return NO_CONVERSATION.to_string();
        }
        let result = self.generate(&conversation_prompt(messages)).await;
        settle(result, CONVERSATION_EMPTY_REPLY, CONVERSATION_UNAVAILABLE, "conversation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::seed;

    fn config(vars: &[(&str, &str)]) -> Config {
        envy::from_iter(vars.iter().map(|(k, v)| (k.to_string(), v.to_string()))).unwrap()
    }

    fn client(vars: &[(&str, &str)], enabled: bool) -> GeminiClient {
        GeminiClient::new(&config(vars), Arc::new(AtomicBool::new(enabled))).unwrap()
    }

    #[test]
    fn transcript_lines_carry_platform_and_sender() {
        let messages = seed::clients()[0].conversations.clone();
        let text = transcript(&messages[..2]);

        assert_eq!(
            text,
            "[WhatsApp] client: Yo, I saw the ad for Combo 2. I need that for my next EP.\n\
             [WhatsApp] operator: Safe Echo! Yeah, we can definitely make it happen. What genre are we looking at?"
        );
        assert!(conversation_prompt(&messages).ends_with("[Instagram] client: When can we hit the studio?"));
    }

    #[test]
    fn project_prompt_splits_checklist() {
        let project = &seed::projects()[0];
        let prompt = project_prompt(&project.title, &project.checklist);

        assert!(prompt.contains("\"Neon Nights EP\""));
        assert!(prompt.contains("Completed tasks: Lyrics Writing, Instrumental Creation, Practice Period."));
        assert!(prompt.contains("Remaining tasks: Studio Vocal Recording, Mixing & Mastering."));
    }

    #[test]
    fn reply_text_reads_first_candidate() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Vocals next. "},{"text":"Mood: hyped."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(reply_text(&parsed), "Vocals next. Mood: hyped.");

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(reply_text(&empty), "");
    }

    #[test]
    fn empty_reply_and_failure_fall_back_separately() {
        assert_eq!(
            settle(Ok(String::new()), PROJECT_EMPTY_REPLY, PROJECT_UNAVAILABLE, "project"),
            PROJECT_EMPTY_REPLY
        );
        assert_eq!(
            settle(
                Err(SummarizeError::Api(500, "boom".to_string())),
                CONVERSATION_EMPTY_REPLY,
                CONVERSATION_UNAVAILABLE,
                "conversation"
            ),
            CONVERSATION_UNAVAILABLE
        );
        assert_eq!(
            settle(Ok("Locked in.".to_string()), PROJECT_EMPTY_REPLY, PROJECT_UNAVAILABLE, "project"),
            "Locked in."
        );
    }

    #[tokio::test]
    async fn no_messages_needs_no_request() {
        let gemini = client(&[("GEMINI_API_KEY", "test-key")], true);
        assert_eq!(gemini.summarize_conversation(&[]).await, NO_CONVERSATION);
    }

    #[tokio::test]
    async fn missing_key_or_disabled_uses_failure_text() {
        let project = &seed::projects()[0];
        let messages = seed::clients()[0].conversations.clone();

        let keyless = client(&[], true);
        assert_eq!(
            keyless.summarize_project(&project.title, &project.checklist).await,
            PROJECT_UNAVAILABLE
        );

        let disabled = client(&[("GEMINI_API_KEY", "test-key")], false);
        assert_eq!(disabled.summarize_conversation(&messages).await, CONVERSATION_UNAVAILABLE);
        assert!(matches!(disabled.generate("hi").await, Err(SummarizeError::Disabled)));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let gemini = client(
            &[
                ("GEMINI_BASE_URL", "http://localhost:8080/v1beta/"),
                ("GEMINI_MODEL", "gemini-test"),
            ],
            true,
        );
        assert_eq!(
            gemini.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
    }
}
