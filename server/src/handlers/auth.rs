use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie},
    web, HttpResponse,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    auth_token::{now_secs, AuthTokenService, TOKEN_COOKIE},
    config::Environment,
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

fn token_cookie(value: String, environment: Environment) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, value)
        .path("/")
        .http_only(true)
        .secure(environment.cookie_secure())
        .same_site(environment.cookie_same_site())
        .finish()
}

/// POST /api/v1/jwt
pub async fn issue_token(
    identity: web::Json<Map<String, Value>>,
    auth_tokens: web::Data<AuthTokenService>,
    environment: web::Data<Environment>,
) -> Result<HttpResponse> {
    let identity = identity.into_inner();
    log::info!(
        "Issuing token for {}",
        identity.get("email").and_then(Value::as_str).unwrap_or("<no email>")
    );

    let token = auth_tokens.issue(identity, now_secs())?;

    Ok(HttpResponse::Ok()
        .cookie(token_cookie(token, **environment))
        .json(SuccessResponse { success: true }))
}

/// POST /api/v1/logout
pub async fn logout(
    body: Option<web::Json<Value>>,
    environment: web::Data<Environment>,
) -> Result<HttpResponse> {
    let who = body
        .as_ref()
        .and_then(|user| user.get("email"))
        .and_then(Value::as_str)
        .unwrap_or("<unknown>");
    log::info!("Logging out {}", who);

    let mut cookie = token_cookie(String::new(), **environment);
    cookie.set_max_age(CookieDuration::seconds(0));

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(SuccessResponse { success: true }))
}
