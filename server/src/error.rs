use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;

use crate::auth_token::AuthTokenError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Document encoding error: {0}")]
    BsonSerialize(#[from] mongodb::bson::ser::Error),

    #[error("Document decoding error: {0}")]
    BsonDeserialize(#[from] mongodb::bson::de::Error),

    #[error("Auth token error: {0}")]
    Token(#[from] AuthTokenError),

    #[error("Invalid document id: {0}")]
    InvalidId(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct UnauthorizedResponse {
    message: &'static str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BsonSerialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BsonDeserialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            AppError::Unauthorized => HttpResponse::build(status).json(UnauthorizedResponse {
                message: "unauthorized",
            }),
            AppError::InvalidId(_) | AppError::BadRequest(_) => {
                log::warn!("Rejected request: {}", self);
                HttpResponse::build(status).json(ErrorResponse {
                    error: self.to_string(),
                })
            }
            _ => {
                // Details stay in the server log only.
                log::error!("{}", self);
                HttpResponse::build(status).json(ErrorResponse {
                    error: "Internal Server Error".to_string(),
                })
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
