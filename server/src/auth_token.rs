use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const MIN_SECRET_LEN: usize = 32;

/// Lifetime of every issued credential.
pub const TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Name of the cookie carrying the credential.
pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum AuthTokenError {
    #[error("auth token secret is too short (min {MIN_SECRET_LEN} bytes)")]
    SecretTooShort,

    #[error("invalid auth token format")]
    InvalidFormat,

    #[error("auth token signature is invalid")]
    InvalidSignature,

    #[error("auth token is expired")]
    Expired,

    #[error("failed to decode auth token payload")]
    PayloadDecode,

    #[error("failed to parse auth token payload")]
    PayloadParse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct TokenHeader {
    alg: String,
    typ: String,
}

impl TokenHeader {
    fn hs256() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Decoded credential: the caller's identity payload plus the standard
/// issued-at and expiry timestamps (seconds since the Unix epoch).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub identity: Map<String, Value>,
    pub iat: u64,
    pub exp: u64,
}

impl TokenClaims {
    pub fn is_expired(&self, reference_secs: u64) -> bool {
        reference_secs >= self.exp
    }

    pub fn email(&self) -> Option<&str> {
        self.identity.get("email").and_then(Value::as_str)
    }
}

#[derive(Clone)]
pub struct AuthTokenService {
    secret: Arc<[u8]>,
    ttl: Duration,
}

impl AuthTokenService {
    pub fn new(secret: Vec<u8>, ttl: Duration) -> Result<Self, AuthTokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthTokenError::SecretTooShort);
        }

        Ok(Self {
            secret: Arc::<[u8]>::from(secret),
            ttl,
        })
    }

    /// Signs `identity` into a compact HS256 token. Any `iat`/`exp` keys in
    /// the payload are replaced by the service's own timestamps.
    pub fn issue(
        &self,
        mut identity: Map<String, Value>,
        issued_at_secs: u64,
    ) -> Result<String, AuthTokenError> {
        identity.remove("iat");
        identity.remove("exp");

        let claims = TokenClaims {
            identity,
            iat: issued_at_secs,
            exp: issued_at_secs.saturating_add(self.ttl.as_secs()),
        };

        let header =
            serde_json::to_vec(&TokenHeader::hs256()).map_err(|_| AuthTokenError::PayloadParse)?;
        let payload = serde_json::to_vec(&claims).map_err(|_| AuthTokenError::PayloadParse)?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(payload)
        );
        let signature = self.sign(signing_input.as_bytes())?;
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

        Ok(format!("{signing_input}.{signature_b64}"))
    }

    pub fn verify(&self, token: &str, reference_secs: u64) -> Result<TokenClaims, AuthTokenError> {
        let (signing_input, signature_b64) = token
            .rsplit_once('.')
            .ok_or(AuthTokenError::InvalidFormat)?;
        let (header_b64, payload_b64) = signing_input
            .split_once('.')
            .ok_or(AuthTokenError::InvalidFormat)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthTokenError::InvalidFormat)?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthTokenError::InvalidSignature)?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthTokenError::InvalidSignature)?;

        let header = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| AuthTokenError::PayloadDecode)?;
        let header: TokenHeader =
            serde_json::from_slice(&header).map_err(|_| AuthTokenError::PayloadParse)?;
        if header.alg != "HS256" {
            return Err(AuthTokenError::InvalidFormat);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthTokenError::PayloadDecode)?;

        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthTokenError::PayloadParse)?;

        if claims.is_expired(reference_secs) {
            return Err(AuthTokenError::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, bytes: &[u8]) -> Result<Vec<u8>, AuthTokenError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthTokenError::InvalidSignature)?;
        mac.update(bytes);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
