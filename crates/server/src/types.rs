use serde::{Deserialize, Serialize};
use study_companion_llm::{BatchItem, DEFAULT_MAX_LENGTH};

fn default_max_length() -> u32 {
    DEFAULT_MAX_LENGTH
}

fn default_summary_type() -> String {
    "concise".to_string()
}

fn default_level() -> String {
    "beginner".to_string()
}

/// Summarize request
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// Text to summarize
    #[serde(default)]
    pub text: String,

    /// Target summary length in words
    #[serde(default = "default_max_length")]
    pub max_length: u32,

    /// concise, detailed or bullet_points
    #[serde(default = "default_summary_type")]
    pub summary_type: String,
}

/// Batch summarize request
#[derive(Debug, Deserialize)]
pub struct BatchSummarizeRequest {
    pub texts: Vec<String>,

    #[serde(default = "default_max_length")]
    pub max_length: u32,

    #[serde(default = "default_summary_type")]
    pub summary_type: String,
}

/// Batch summarize response
#[derive(Debug, Serialize)]
pub struct BatchSummarizeResponse {
    pub results: Vec<BatchItem>,
}

/// Study recommendation request
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub subject: String,

    #[serde(default = "default_level")]
    pub level: String,
}

/// Study recommendation response
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<String>,
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub summarizer_ready: bool,
    pub timestamp: String,
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
