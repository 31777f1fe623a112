pub mod auth;
pub mod bids;
pub mod health;
pub mod job_posts;

use actix_web::{error, middleware::from_fn, web};

pub use auth::{issue_token, logout};
pub use bids::{create_bid, list_bids, update_bid_status};
pub use health::{health_check, index};
pub use job_posts::{
    create_job_post, delete_job_post, list_job_posts, single_job_post, update_job_post,
};

use crate::{error::AppError, middleware::auth_middleware};

/// Malformed JSON bodies answer 400 with the standard error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid request body: {}", err);
        error::Error::from(AppError::BadRequest(message))
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid query string: {}", err);
        error::Error::from(AppError::BadRequest(message))
    })
}

/// Registers every route. Protected resources are wrapped with the access
/// guard individually so public and protected routes can share a prefix.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .route("/jwt", web::post().to(issue_token))
                .route("/logout", web::post().to(logout))
                .route("/job-posts", web::get().to(list_job_posts))
                .service(
                    web::resource("/single-job-data")
                        .wrap(from_fn(auth_middleware))
                        .route(web::get().to(single_job_post)),
                )
                .service(
                    web::resource("/update-job-post-data")
                        .wrap(from_fn(auth_middleware))
                        .route(web::put().to(update_job_post)),
                )
                .service(
                    web::resource("/delete-job-post")
                        .wrap(from_fn(auth_middleware))
                        .route(web::delete().to(delete_job_post)),
                )
                .service(
                    web::resource("/job-post")
                        .wrap(from_fn(auth_middleware))
                        .route(web::post().to(create_job_post)),
                )
                .service(
                    web::resource("/job-bid")
                        .wrap(from_fn(auth_middleware))
                        .route(web::post().to(create_bid))
                        .route(web::get().to(list_bids)),
                )
                .service(
                    web::resource("/bid-status-update")
                        .wrap(from_fn(auth_middleware))
                        .route(web::put().to(update_bid_status)),
                ),
        );
}
