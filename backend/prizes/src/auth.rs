//! Bearer-token authentication.
//!
//! - [`TokenVerifier`] resolves a bearer token to a [`CallerIdentity`]
//! - [`SignedTokenVerifier`] checks tokens signed with a shared secret
//! - [`require_auth`] guards routes and stores the identity in request extensions

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::api::ApiState;
use crate::errors::{AppError, Result};

/// Verified identity of the caller, available to guarded handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: String,
}

pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<CallerIdentity>;
}

type HmacSha256 = Hmac<Sha256>;

/// Tokens of the form `base64url(user_id).hex(hmac_sha256(secret, user_id))`.
pub struct SignedTokenVerifier {
    mac: HmacSha256,
}

impl SignedTokenVerifier {
    pub fn new(secret: &str) -> Result<Self> {
        let mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::Config(format!("Invalid AUTH_SECRET: {e}")))?;
        Ok(Self { mac })
    }

    /// Mint a token for `user_id`.
    pub fn issue(&self, user_id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(user_id.as_bytes());
        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(user_id.as_bytes()),
            hex::encode(mac.finalize().into_bytes())
        )
    }
}

impl TokenVerifier for SignedTokenVerifier {
    fn verify(&self, token: &str) -> Result<CallerIdentity> {
        let invalid = || AppError::Unauthorized("invalid bearer token".to_string());

        let (encoded_user, signature) = token.split_once('.').ok_or_else(invalid)?;
        let user_bytes = URL_SAFE_NO_PAD.decode(encoded_user).map_err(|e| {
            debug!("Failed to decode token subject: {e}");
            invalid()
        })?;
        let signature = hex::decode(signature).map_err(|e| {
            debug!("Failed to decode token signature: {e}");
            invalid()
        })?;

        let mut mac = self.mac.clone();
        mac.update(&user_bytes);
        mac.verify_slice(&signature).map_err(|_| {
            debug!("Token signature mismatch");
            invalid()
        })?;

        let user_id = String::from_utf8(user_bytes).map_err(|_| invalid())?;
        if user_id.is_empty() {
            return Err(invalid());
        }
        Ok(CallerIdentity { user_id })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Route guard: rejects the request with 401 before the handler runs unless
/// it carries a valid bearer token.
pub async fn require_auth(
    State(state): State<Arc<ApiState>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;
    let token = bearer_token(header)
        .ok_or_else(|| AppError::Unauthorized("malformed authorization header".to_string()))?;

    let caller = state.verifier.verify(token)?;
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}
