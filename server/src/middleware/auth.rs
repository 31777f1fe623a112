use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, HttpMessage,
};

use crate::auth_token::{now_secs, AuthTokenService, TOKEN_COOKIE};
use crate::error::AppError;

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    // Extract token from cookie
    let token = req
        .cookie(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let auth_tokens = req
        .app_data::<web::Data<AuthTokenService>>()
        .ok_or_else(|| AppError::Internal("auth token service not registered".to_string()))?;

    let claims = auth_tokens.verify(&token, now_secs()).map_err(|err| {
        log::debug!("Rejected token for {} {}: {}", req.method(), req.path(), err);
        AppError::Unauthorized
    })?;

    // Handlers read the caller via ReqData<TokenClaims>
    req.extensions_mut().insert(claims);

    next.call(req).await
}
