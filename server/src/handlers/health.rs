use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::{db::Store, error::Result};

/// GET /
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Hello World!")
}

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub database: String,
}

/// GET /health
pub async fn health_check(db: web::Data<Store>) -> Result<HttpResponse> {
    let response = match db.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthCheckResponse {
            status: "healthy".to_string(),
            database: "connected".to_string(),
        }),
        Err(err) => {
            log::error!("Health check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(HealthCheckResponse {
                status: "unhealthy".to_string(),
                database: "disconnected".to_string(),
            })
        }
    };

    Ok(response)
}
