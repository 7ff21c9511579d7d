use crate::{AppState, ApiConfig};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Response;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use praxis_api::{ApiError, TokenPairResponse};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const TOKEN_KIND_ACCESS: &str = "access";
pub const TOKEN_KIND_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub kind: String,
    pub iat: u64,
    pub exp: u64,
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!("password hashing failed: {e}");
            ApiError::internal()
        })
}

#[must_use]
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn issue_token(
    cfg: &ApiConfig,
    sub: i64,
    email: &str,
    kind: &str,
    ttl: Duration,
) -> Result<String, ApiError> {
    let iat = now_unix();
    let claims = Claims {
        sub,
        email: email.to_string(),
        kind: kind.to_string(),
        iat,
        exp: iat + ttl.as_secs(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("token encoding failed: {e}");
        ApiError::internal()
    })
}

pub fn issue_pair(cfg: &ApiConfig, sub: i64, email: &str) -> Result<TokenPairResponse, ApiError> {
    Ok(TokenPairResponse {
        access: issue_token(cfg, sub, email, TOKEN_KIND_ACCESS, cfg.access_ttl)?,
        refresh: issue_token(cfg, sub, email, TOKEN_KIND_REFRESH, cfg.refresh_ttl)?,
    })
}

pub fn issue_access(cfg: &ApiConfig, sub: i64, email: &str) -> Result<String, ApiError> {
    issue_token(cfg, sub, email, TOKEN_KIND_ACCESS, cfg.access_ttl)
}

/// Decodes and validates signature + expiry. Token kind is checked by the
/// caller: bearer auth wants `access`, the refresh endpoint wants
/// `refresh`.
pub fn decode_token(cfg: &ApiConfig, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthenticated("invalid or expired token"))
}

/// Extractor for bearer-gated handlers. Rejects refresh tokens: only
/// `access` tokens authenticate requests.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: i64,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                crate::http::unauthenticated_response(
                    state,
                    ApiError::unauthenticated("missing bearer token"),
                )
            })?;
        let claims = decode_token(&state.cfg, token)
            .map_err(|e| crate::http::unauthenticated_response(state, e))?;
        if claims.kind != TOKEN_KIND_ACCESS {
            return Err(crate::http::unauthenticated_response(
                state,
                ApiError::unauthenticated("token is not an access token"),
            ));
        }
        Ok(Self {
            account_id: claims.sub,
            email: claims.email,
        })
    }
}
