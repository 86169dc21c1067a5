use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use study_companion_common::StudyCompanionError;
use tracing::error;

use crate::types::ErrorResponse;

/// HTTP wrapper around application errors
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] StudyCompanionError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.0.to_string(),
        })
    }
}

/// Render malformed JSON bodies as 400 with an error body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        error: format!("Invalid JSON body: {}", err),
    });
    InternalError::from_response(err, response).into()
}
