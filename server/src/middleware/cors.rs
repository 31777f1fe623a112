//! CORS configuration for the marketplace frontend.
//!
//! Only the configured origins may call the API, and they may send the
//! credential cookie along.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use crate::config::CorsConfig;

pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));

    cors.allowed_methods(vec![
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allowed_headers(vec![
        header::ACCEPT,
        header::CONTENT_TYPE,
        header::ORIGIN,
        header::AUTHORIZATION,
    ])
    .supports_credentials()
    .max_age(config.max_age)
}
