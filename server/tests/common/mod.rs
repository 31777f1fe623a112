#![allow(dead_code)]

use actix_web::cookie::Cookie;
use serde_json::{json, Value};
use workwizards::auth_token::{now_secs, AuthTokenService, TOKEN_COOKIE, TOKEN_TTL};

pub const TEST_SECRET: &[u8] = b"01234567890123456789012345678901";

pub fn auth_tokens() -> AuthTokenService {
    AuthTokenService::new(TEST_SECRET.to_vec(), TOKEN_TTL).expect("valid secret")
}

pub fn token_cookie_issued_at(email: &str, issued_at: u64) -> Cookie<'static> {
    let identity = json!({ "email": email })
        .as_object()
        .cloned()
        .expect("object payload");
    let token = auth_tokens()
        .issue(identity, issued_at)
        .expect("issue token");
    Cookie::new(TOKEN_COOKIE, token)
}

pub fn token_cookie(email: &str) -> Cookie<'static> {
    token_cookie_issued_at(email, now_secs())
}

pub fn job_post_json(email: &str, category: &str) -> Value {
    json!({
        "user_email": email,
        "user_name": "Owner",
        "user_photoURL": "https://example.com/owner.png",
        "job_title": format!("{category} work"),
        "category": category,
        "deadline": "2024-12-31",
        "description": "Looking for help",
        "minimum_price": 100,
        "maximum_price": 500
    })
}

pub fn bid_json(owner_email: &str, bidder_email: &str) -> Value {
    json!({
        "job_info": {
            "user_email": owner_email,
            "job_title": "Logo design",
            "category": "design"
        },
        "bidder_email": bidder_email,
        "bid_status": "pending",
        "price": 150,
        "deadline": "2024-12-01"
    })
}

/// Builds the full application around `$store`, the test token service and
/// an optional deployment environment.
macro_rules! init_app {
    ($store:expr) => {
        init_app!($store, workwizards::config::Environment::Development)
    };
    ($store:expr, $environment:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($store))
                .app_data(actix_web::web::Data::new(common::auth_tokens()))
                .app_data(actix_web::web::Data::new($environment))
                .wrap(actix_web::middleware::from_fn(
                    workwizards::middleware::request_logger,
                ))
                .configure(workwizards::handlers::configure),
        )
        .await
    };
}
