use actix_web::{post, web, HttpResponse};
use study_companion_common::StudyCompanionError;
use study_companion_llm::SummaryType;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{BatchSummarizeRequest, BatchSummarizeResponse, SummarizeRequest};

/// Maximum texts per batch request
pub const MAX_BATCH_SIZE: usize = 20;

/// Summarize text
#[post("/summarize")]
pub async fn summarize(
    req: web::Json<SummarizeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    // Reject empty input even when no summarizer is configured
    if req.text.trim().is_empty() {
        return Err(StudyCompanionError::invalid_input("Text cannot be empty").into());
    }

    let summarizer = state.summarizer()?;
    let summary_type = SummaryType::from(req.summary_type.as_str());

    let result = summarizer
        .summarize(&req.text, req.max_length, &summary_type)
        .await?;

    info!(
        "Summarized {} chars into {} chars (ratio {})",
        result.original_length, result.summary_length, result.compression_ratio
    );

    Ok(HttpResponse::Ok().json(result))
}

/// Summarize several texts; per-text failures are reported inline
#[post("/summarize/batch")]
pub async fn summarize_batch(
    req: web::Json<BatchSummarizeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    if req.texts.is_empty() {
        return Err(StudyCompanionError::invalid_input("texts cannot be empty").into());
    }
    if req.texts.len() > MAX_BATCH_SIZE {
        return Err(StudyCompanionError::invalid_input(format!(
            "At most {} texts per batch",
            MAX_BATCH_SIZE
        ))
        .into());
    }

    let summarizer = state.summarizer()?;
    let summary_type = SummaryType::from(req.summary_type.as_str());

    let results = summarizer
        .batch_summarize(&req.texts, req.max_length, &summary_type)
        .await;

    Ok(HttpResponse::Ok().json(BatchSummarizeResponse { results }))
}
