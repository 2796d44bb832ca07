use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, HttpResponse, get};
use serde_json::json;

use crate::domain::category::Category;
use crate::models::config::ServerConfig;
use crate::services::ServiceError;

pub mod products;

/// Require the static API key on mutating calls.
///
/// The `Authorization` header must equal the configured key exactly; read
/// endpoints never call this.
pub fn ensure_api_key(req: &HttpRequest, config: &ServerConfig) -> Result<(), ServiceError> {
    match req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(key) if key == config.api_key => Ok(()),
        _ => Err(ServiceError::Unauthorized),
    }
}

/// Render a service error as a JSON envelope with the matching status code.
///
/// In hardened mode internal fault details are replaced with a generic
/// message; the full detail has already been logged server-side.
pub fn error_response(err: &ServiceError, hardened: bool) -> HttpResponse {
    let (mut builder, error) = match err {
        ServiceError::Unauthorized => (HttpResponse::Unauthorized(), "unauthorized"),
        ServiceError::NotFound => (HttpResponse::NotFound(), "not found"),
        ServiceError::Validation(_) => (HttpResponse::BadRequest(), "validation failed"),
        ServiceError::UnsupportedMediaType(_) => {
            (HttpResponse::BadRequest(), "unsupported media type")
        }
        ServiceError::PayloadTooLarge { .. } => (HttpResponse::BadRequest(), "payload too large"),
        ServiceError::Internal => (HttpResponse::InternalServerError(), "internal server error"),
    };

    let message = if hardened && matches!(err, ServiceError::Internal) {
        "internal server error".to_string()
    } else {
        err.to_string()
    };

    builder.json(json!({
        "success": false,
        "error": error,
        "message": message,
    }))
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[get("/api/categories")]
pub async fn list_categories() -> HttpResponse {
    let categories: Vec<_> = Category::ALL
        .iter()
        .map(|category| {
            json!({
                "id": category.as_str(),
                "name": category.label(),
            })
        })
        .collect();

    HttpResponse::Ok().json(json!({
        "success": true,
        "data": categories,
    }))
}
