use actix_web::{get, web, HttpResponse};
use chrono::Utc;

use crate::state::AppState;
use crate::types::HealthResponse;

/// API health check
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        message: "Smart Study Companion API is running".to_string(),
        summarizer_ready: state.summarizer_ready(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
