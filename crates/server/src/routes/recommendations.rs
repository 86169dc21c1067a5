use actix_web::{post, web, HttpResponse};
use tracing::info;

use crate::types::{RecommendationRequest, RecommendationResponse};

/// Study recommendations (not implemented yet, always empty)
#[post("/recommendations")]
pub async fn get_recommendations(req: web::Json<RecommendationRequest>) -> HttpResponse {
    info!(
        "Recommendations requested - Subject: {:?}, Level: {}",
        req.subject, req.level
    );

    HttpResponse::Ok().json(RecommendationResponse {
        recommendations: Vec::new(),
        message: "Recommendation engine coming soon!".to_string(),
    })
}
