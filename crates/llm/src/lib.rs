//! Study Companion LLM integration
//!
//! OpenAI-compatible chat client, text splitting and summarization

mod chunking;
mod client;
mod llm_trait;
mod prompts;
mod summarize;
mod types;

pub use chunking::{split_text, TextSplitter, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use client::OpenAiClient;
pub use llm_trait::ChatClient;
pub use prompts::{build_prompt, combine_prompt, format_as_bullets, map_prompt, SYSTEM_PROMPT};
pub use summarize::{TextSummarizer, DEFAULT_MAX_LENGTH, SHORT_TEXT_THRESHOLD};
pub use types::{BatchItem, ChatMessage, ChatRequest, Role, SummaryResult, SummaryType};
