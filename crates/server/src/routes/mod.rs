use actix_web::web;

pub mod health;
pub mod index;
pub mod recommendations;
pub mod summarize;

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index::index).service(
        web::scope("/api").service(health::health_check).service(
            web::scope("/v1")
                .service(summarize::summarize)
                .service(summarize::summarize_batch)
                .service(recommendations::get_recommendations),
        ),
    );
}
