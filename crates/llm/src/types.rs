use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Chat completion request
///
/// The model is owned by the client; requests only carry sampling parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,

    /// Maximum tokens to generate (provider default when unset)
    pub max_tokens: Option<u32>,

    /// Temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Single user message request
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(prompt)],
            ..Default::default()
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Total prompt length in characters
    pub fn prompt_chars(&self) -> usize {
        self.messages.iter().map(|m| m.content.chars().count()).sum()
    }
}

/// OpenAI chat completion wire request
#[derive(Debug, Serialize)]
pub(crate) struct CompletionBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// OpenAI chat completion wire response
#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Summary formatting mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryType {
    Concise,
    Detailed,
    BulletPoints,
    /// Any unrecognized mode, kept verbatim
    Other(String),
}

impl Default for SummaryType {
    fn default() -> Self {
        Self::Concise
    }
}

impl From<&str> for SummaryType {
    fn from(value: &str) -> Self {
        match value.trim() {
            "concise" => Self::Concise,
            "detailed" => Self::Detailed,
            "bullet_points" => Self::BulletPoints,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SummaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concise => f.write_str("concise"),
            Self::Detailed => f.write_str("detailed"),
            Self::BulletPoints => f.write_str("bullet_points"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Summarization result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Summary text
    pub summary: String,

    /// Character count of the input
    pub original_length: usize,

    /// Character count of the summary
    pub summary_length: usize,

    /// summary_length / original_length, two decimals
    pub compression_ratio: f64,

    /// Words in the summary
    pub word_count: usize,
}

impl SummaryResult {
    /// Compute metrics for a summary of `original`
    pub fn new(original: &str, summary: String) -> Self {
        let original_length = original.chars().count();
        let summary_length = summary.chars().count();
        let compression_ratio = if original_length == 0 {
            0.0
        } else {
            round2(summary_length as f64 / original_length as f64)
        };
        let word_count = summary.split_whitespace().count();

        Self {
            summary,
            original_length,
            summary_length,
            compression_ratio,
            word_count,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One entry of a batch summarization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    Summary(SummaryResult),
    Failed {
        error: String,
        original_text: String,
    },
}

impl BatchItem {
    /// Failed entry with a preview of the offending text
    pub fn failed(error: impl Into<String>, text: &str) -> Self {
        Self::Failed {
            error: error.into(),
            original_text: preview(text, 100),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// First `max_chars` characters followed by `...` when truncated
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_type_parsing() {
        assert_eq!(SummaryType::from("concise"), SummaryType::Concise);
        assert_eq!(SummaryType::from("detailed"), SummaryType::Detailed);
        assert_eq!(SummaryType::from("bullet_points"), SummaryType::BulletPoints);
        assert_eq!(
            SummaryType::from("haiku"),
            SummaryType::Other("haiku".to_string())
        );
        assert_eq!(SummaryType::BulletPoints.to_string(), "bullet_points");
    }

    #[test]
    fn test_summary_result_metrics() {
        let original = "a".repeat(300);
        let result = SummaryResult::new(&original, "one two three".to_string());
        assert_eq!(result.original_length, 300);
        assert_eq!(result.summary_length, 13);
        assert_eq!(result.compression_ratio, 0.04);
        assert_eq!(result.word_count, 3);
    }

    #[test]
    fn test_summary_result_counts_characters_not_bytes() {
        let result = SummaryResult::new("안녕하세요", "안녕".to_string());
        assert_eq!(result.original_length, 5);
        assert_eq!(result.summary_length, 2);
        assert_eq!(result.compression_ratio, 0.4);
    }

    #[test]
    fn test_batch_item_preview() {
        let long = "x".repeat(150);
        match BatchItem::failed("boom", &long) {
            BatchItem::Failed { original_text, .. } => {
                assert_eq!(original_text.len(), 103);
                assert!(original_text.ends_with("..."));
            }
            _ => panic!("expected failure"),
        }

        match BatchItem::failed("boom", "short") {
            BatchItem::Failed { original_text, .. } => assert_eq!(original_text, "short"),
            _ => panic!("expected failure"),
        }
    }

    #[test]
    fn test_batch_item_serialization() {
        let item = BatchItem::failed("Text cannot be empty", "");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["error"], "Text cannot be empty");
        assert_eq!(json["original_text"], "");
    }

    #[test]
    fn test_chat_message_roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("hi")).unwrap();
        assert_eq!(json["role"], "system");
    }
}
