use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use study_companion_common::{AppConfig, Result, StudyCompanionError};
use tracing::{debug, info, warn};

use crate::chunking::TextSplitter;
use crate::client::OpenAiClient;
use crate::llm_trait::ChatClient;
use crate::prompts::{build_prompt, combine_prompt, format_as_bullets, map_prompt, SYSTEM_PROMPT};
use crate::types::{BatchItem, ChatMessage, ChatRequest, SummaryResult, SummaryType};

/// Default summary length in words
pub const DEFAULT_MAX_LENGTH: u32 = 150;

/// Inputs shorter than this (in characters) are summarized with a single call
pub const SHORT_TEXT_THRESHOLD: usize = 1000;

/// Partial summaries above this estimated size are collapsed before the final combine
const COLLAPSE_TOKEN_BUDGET: usize = 3000;

/// Approximate: 1 token ≈ 4 characters
const CHARS_PER_TOKEN: usize = 4;

const MAX_COLLAPSE_ROUNDS: usize = 5;

/// Chunk requests in flight during the map phase
const MAP_CONCURRENCY: usize = 4;

const SHORT_TEMPERATURE: f32 = 0.3;
const CHAIN_TEMPERATURE: f32 = 0.0;

const MISSING_KEY_MESSAGE: &str =
    "OpenAI API key is required. Set OPENAI_API_KEY environment variable.";

/// Text summarizer
///
/// Short inputs go through a single chat completion built from
/// [`build_prompt`]. Long inputs are split into overlapping chunks, each
/// chunk is summarized on its own (map), and the partial summaries are
/// combined into the final summary (reduce).
pub struct TextSummarizer {
    client: Arc<dyn ChatClient>,
    splitter: TextSplitter,
}

impl TextSummarizer {
    /// Create summarizer backed by OpenAI
    ///
    /// The key falls back to `OPENAI_API_KEY` when not given.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = resolve_api_key(api_key, std::env::var("OPENAI_API_KEY").ok())?;
        let config = AppConfig {
            openai_model: model.into(),
            ..AppConfig::default()
        };
        let client = OpenAiClient::from_config(&config, api_key)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create summarizer from application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = resolve_api_key(config.openai_api_key.clone(), None)?;
        let client = OpenAiClient::from_config(config, api_key)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create summarizer over any chat backend
    pub fn with_client(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            splitter: TextSplitter::default(),
        }
    }

    /// Model used for completions
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Summarize the given text
    ///
    /// `max_length` is the target summary length in words.
    pub async fn summarize(
        &self,
        text: &str,
        max_length: u32,
        summary_type: &SummaryType,
    ) -> Result<SummaryResult> {
        if text.trim().is_empty() {
            return Err(StudyCompanionError::invalid_input("Text cannot be empty"));
        }
        if max_length == 0 {
            return Err(StudyCompanionError::invalid_input(
                "max_length must be greater than 0",
            ));
        }

        let char_count = text.chars().count();
        info!(
            "Starting summarization - Text length: {} chars, Type: {}, Max length: {}",
            char_count, summary_type, max_length
        );

        let summary = if char_count < SHORT_TEXT_THRESHOLD {
            debug!("Text is short, using direct summarization");
            self.summarize_short(text, summary_type, max_length).await
        } else {
            self.summarize_long(text, summary_type).await
        }
        .map_err(wrap_error)?;

        Ok(SummaryResult::new(text, summary))
    }

    /// Summarize multiple texts; failures are reported per entry
    pub async fn batch_summarize(
        &self,
        texts: &[String],
        max_length: u32,
        summary_type: &SummaryType,
    ) -> Vec<BatchItem> {
        let mut results = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            match self.summarize(text, max_length, summary_type).await {
                Ok(summary) => results.push(BatchItem::Summary(summary)),
                Err(e) => {
                    warn!("Batch entry {} failed: {}", i, e);
                    results.push(BatchItem::failed(e.to_string(), text));
                }
            }
        }
        results
    }

    /// Single chat completion
    async fn summarize_short(
        &self,
        text: &str,
        summary_type: &SummaryType,
        max_length: u32,
    ) -> Result<String> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(text, summary_type, max_length)),
            ],
            ..Default::default()
        }
        // Approximate tokens
        .with_max_tokens(max_length.saturating_mul(2))
        .with_temperature(SHORT_TEMPERATURE);

        let summary = self.client.chat(request).await?;
        Ok(summary.trim().to_string())
    }

    /// Map-reduce over chunks
    async fn summarize_long(&self, text: &str, summary_type: &SummaryType) -> Result<String> {
        // Step 1: map
        let chunks = self.splitter.split_text(text);
        info!("Split text into {} chunks", chunks.len());

        let prompts = chunks.iter().map(|c| map_prompt(c)).collect();
        let partials = self.run_prompts(prompts).await?;

        // Step 2: collapse until the partials fit the combine budget
        let partials = self.collapse(partials).await?;

        // Step 3: reduce
        let combined = partials.join("\n\n");
        info!("Combining {} partial summaries - Length: {} chars", partials.len(), combined.len());
        let request = ChatRequest::from_prompt(combine_prompt(&combined))
            .with_temperature(CHAIN_TEMPERATURE);
        let summary = self.client.chat(request).await?.trim().to_string();

        Ok(match summary_type {
            SummaryType::BulletPoints => format_as_bullets(&summary),
            _ => summary,
        })
    }

    async fn collapse(&self, mut summaries: Vec<String>) -> Result<Vec<String>> {
        let mut rounds = 0;

        while summaries.len() > 1 && estimate_tokens(&summaries) > COLLAPSE_TOKEN_BUDGET {
            if rounds == MAX_COLLAPSE_ROUNDS {
                warn!(
                    "Partial summaries still exceed {} tokens after {} collapse rounds",
                    COLLAPSE_TOKEN_BUDGET, rounds
                );
                break;
            }
            rounds += 1;

            let groups = group_by_budget(&summaries, COLLAPSE_TOKEN_BUDGET);
            debug!(
                "Collapse round {}: {} summaries into {} groups",
                rounds,
                summaries.len(),
                groups.len()
            );

            let prompts = groups.iter().map(|g| combine_prompt(&g.join("\n\n"))).collect();
            summaries = self.run_prompts(prompts).await?;
        }

        Ok(summaries)
    }

    /// Run prompts with bounded concurrency, preserving order
    async fn run_prompts(&self, prompts: Vec<String>) -> Result<Vec<String>> {
        let total = prompts.len();
        stream::iter(prompts.into_iter().enumerate())
            .map(|(i, prompt)| async move {
                debug!("Summarizing part {}/{}", i + 1, total);
                let request = ChatRequest::from_prompt(prompt).with_temperature(CHAIN_TEMPERATURE);
                self.client.chat(request).await.map(|s| s.trim().to_string())
            })
            .buffered(MAP_CONCURRENCY)
            .try_collect()
            .await
    }
}

/// Explicit key first, then the environment; blank keys count as missing
fn resolve_api_key(explicit: Option<String>, env: Option<String>) -> Result<String> {
    explicit
        .into_iter()
        .chain(env)
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
        .ok_or_else(|| StudyCompanionError::config(MISSING_KEY_MESSAGE))
}

/// Map provider failures to caller-facing errors
fn wrap_error(error: StudyCompanionError) -> StudyCompanionError {
    match error {
        StudyCompanionError::InvalidInput(_) => error,
        StudyCompanionError::Authentication(detail) => {
            warn!("Provider rejected API key: {}", detail);
            StudyCompanionError::authentication("Invalid OpenAI API key")
        }
        StudyCompanionError::RateLimit(detail) => {
            warn!("Provider rate limit: {}", detail);
            StudyCompanionError::rate_limit(
                "OpenAI API rate limit exceeded. Please try again later.",
            )
        }
        other => StudyCompanionError::summarization(format!("Summarization failed: {}", other)),
    }
}

fn estimate_tokens(texts: &[String]) -> usize {
    let chars: usize = texts.iter().map(|t| t.chars().count() + 2).sum();
    chars / CHARS_PER_TOKEN
}

/// Greedy grouping so each group stays within the token budget where possible
fn group_by_budget(texts: &[String], budget: usize) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_tokens = 0;

    for text in texts {
        let tokens = estimate_tokens(std::slice::from_ref(text));
        if !current.is_empty() && current_tokens + tokens > budget {
            groups.push(std::mem::take(&mut current));
            current_tokens = 0;
        }
        current.push(text.clone());
        current_tokens += tokens;
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}
