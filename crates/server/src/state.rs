use std::sync::Arc;
use study_companion_common::{AppConfig, Result, StudyCompanionError};
use study_companion_llm::TextSummarizer;
use tracing::{info, warn};

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Summarizer, absent when no API key is configured
    summarizer: Option<Arc<TextSummarizer>>,
}

impl AppState {
    /// Create state from config
    ///
    /// A missing API key does not stop the server; summarize endpoints
    /// report the problem per request instead.
    pub fn new(config: AppConfig) -> Self {
        let summarizer = match TextSummarizer::from_config(&config) {
            Ok(summarizer) => {
                info!("Summarizer ready (model: {})", summarizer.model());
                Some(Arc::new(summarizer))
            }
            Err(e) => {
                warn!("Summarizer disabled: {}", e);
                None
            }
        };

        Self { config, summarizer }
    }

    /// Create state with an explicit summarizer
    pub fn with_summarizer(config: AppConfig, summarizer: Option<Arc<TextSummarizer>>) -> Self {
        Self { config, summarizer }
    }

    /// Summarizer or a configuration error
    pub fn summarizer(&self) -> Result<&TextSummarizer> {
        self.summarizer.as_deref().ok_or_else(|| {
            StudyCompanionError::config(
                "OpenAI API key is required. Set OPENAI_API_KEY environment variable.",
            )
        })
    }

    pub fn summarizer_ready(&self) -> bool {
        self.summarizer.is_some()
    }
}
