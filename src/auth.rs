use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, get_current_timestamp,
};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::AppError};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Session lifetime: one hour from issuance.
pub const TOKEN_TTL_SECS: u64 = 3600;

/// Claims
///
/// The payload signed into the session token. Validity is determined purely
/// by the signature and `exp` at verification time; nothing is persisted
/// server-side and there is no revocation list.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the caller's email, the identity every ownership check
    /// compares against.
    pub sub: String,
    /// Expiration Time (exp): timestamp after which the token must not be
    /// accepted.
    pub exp: usize,
    /// Issued At (iat): timestamp when the token was issued.
    pub iat: usize,
}

/// issue_token
///
/// Signs a session token for the given email with a one-hour expiry.
/// Issuance always succeeds on well-formed input; there is no account lookup.
pub fn issue_token(email: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = get_current_timestamp();
    let claims = Claims {
        sub: email.to_string(),
        iat: now as usize,
        exp: (now + TOKEN_TTL_SECS) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// session_cookie
///
/// Builds the `Set-Cookie` value carrying a freshly issued token. The cookie
/// is HTTP-only, restricted to secure transport, and cross-site-eligible
/// (`SameSite=None`) so the browser client on another origin can send it.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; Secure; SameSite=None",
        SESSION_COOKIE, token, TOKEN_TTL_SECS
    )
}

/// clear_session_cookie
///
/// Builds the `Set-Cookie` value that revokes the session by zeroing the
/// cookie's lifetime. Succeeds whether or not a session existed.
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=None",
        SESSION_COOKIE
    )
}

/// AuthUser
///
/// The resolved identity of an authenticated request. Handlers on guarded
/// routes receive this to perform the ownership comparison.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The email the session token was issued for.
    pub email: String,
}

/// token_from_cookies
///
/// Pulls the session token out of the request's `Cookie` header, if present.
fn token_from_cookies(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .map(str::to_string)
    })
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's `FromRequestParts` trait, making `AuthUser` usable as a
/// function argument in any guarded handler. Verification is stateless:
/// 1. Extract the `token` cookie from the request headers.
/// 2. Decode and validate the token (signature + expiry) against the
///    configured secret.
/// 3. Yield the decoded identity for downstream ownership checks.
///
/// Rejection: `AppError::Unauthenticated` (401) when the cookie is missing,
/// the signature is invalid, or the token has expired.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let token = token_from_cookies(parts).ok_or(AppError::Unauthenticated)?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::default();
        validation.validate_exp = true;

        // Any failure mode (expired, bad signature, malformed) rejects the
        // same way; the client cannot distinguish them.
        let token_data = decode::<Claims>(&token, &decoding_key, &validation)
            .map_err(|_| AppError::Unauthenticated)?;

        Ok(AuthUser {
            email: token_data.claims.sub,
        })
    }
}
