//! Prompt templates for summarization

use crate::types::SummaryType;

/// System message for direct summarization
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that creates concise and accurate summaries.";

/// Bullet character used when formatting summaries
pub const BULLET: char = '•';

/// Instruction line for a summary type
pub fn instruction(summary_type: &SummaryType) -> &'static str {
    match summary_type {
        SummaryType::Concise => "Provide a concise summary capturing the main points.",
        SummaryType::Detailed => {
            "Provide a detailed summary including key details and supporting information."
        }
        SummaryType::BulletPoints => {
            "Provide a summary in bullet point format, highlighting key points."
        }
        SummaryType::Other(_) => "Provide a clear summary.",
    }
}

/// Prompt for direct (single call) summarization
pub fn build_prompt(text: &str, summary_type: &SummaryType, max_length: u32) -> String {
    format!(
        "Please summarize the following text in approximately {} words.\n{}\n\nText:\n{}\n\nSummary:",
        max_length,
        instruction(summary_type),
        text
    )
}

/// Prompt for the map phase (one chunk)
pub fn map_prompt(chunk: &str) -> String {
    concise_summary_prompt(chunk)
}

/// Prompt for the combine phase (joined partial summaries)
pub fn combine_prompt(summaries: &str) -> String {
    concise_summary_prompt(summaries)
}

fn concise_summary_prompt(text: &str) -> String {
    format!(
        "Write a concise summary of the following:\n\n\n\"{}\"\n\n\nCONCISE SUMMARY:",
        text
    )
}

/// Format text as bullet points if not already formatted
pub fn format_as_bullets(text: &str) -> String {
    if text.contains(BULLET) || text.contains('-') {
        return text.to_string();
    }

    text.split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.ends_with('.') {
                format!("{} {}", BULLET, s)
            } else {
                format!("{} {}.", BULLET, s)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
