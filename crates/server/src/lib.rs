//! Study Companion HTTP server
//!
//! Actix-web based REST API

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use study_companion_common::{AppConfig, Result, StudyCompanionError};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::ApiError;
pub use state::AppState;

/// Request body limit, long documents included
const JSON_PAYLOAD_LIMIT: usize = 2 * 1024 * 1024;

/// JSON extractor config shared by the server and tests
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_PAYLOAD_LIMIT)
        .error_handler(error::json_error_handler)
}

/// Start the HTTP server and run until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = web::Data::new(AppState::new(config));

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(json_config())
            .configure(routes::configure)
    })
    .bind(&bind_addr)
    .map_err(|e| StudyCompanionError::network(format!("Failed to bind {}: {}", bind_addr, e)))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
