//! Access token decoding
//!
//! Tokens are JWTs issued by the backend. The client only reads the payload
//! to learn the expiry and user id; signatures are the backend's business.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Claims the client cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Expiry, seconds since epoch
    pub exp: i64,
    pub user_id: Option<i64>,
}

impl TokenClaims {
    /// Expired when `exp * 1000 <= now_millis`
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        self.exp.saturating_mul(1000) <= now_millis
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Turns a bearer token into claims
pub trait TokenDecoder: Send + Sync {
    /// `None` for malformed or empty tokens
    fn decode(&self, token: &str) -> Option<TokenClaims>;
}

/// Decodes the JWT payload segment without verifying the signature
#[derive(Debug, Default, Clone, Copy)]
pub struct JwtDecoder;

impl TokenDecoder for JwtDecoder {
    fn decode(&self, token: &str) -> Option<TokenClaims> {
        decode_access_token(token)
    }
}

#[derive(Deserialize)]
struct JwtPayload {
    exp: i64,
    #[serde(default)]
    user_claims: Option<UserClaims>,
}

#[derive(Deserialize)]
struct UserClaims {
    #[serde(default)]
    user_id: Option<i64>,
}

/// Decode an access token, `None` if it is not a readable JWT
pub fn decode_access_token(token: &str) -> Option<TokenClaims> {
    // JWT format: header.payload.signature
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    // Some issuers keep the padding even though base64url forbids it
    let payload_bytes = URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')).ok()?;
    let payload: JwtPayload = serde_json::from_slice(&payload_bytes).ok()?;

    Some(TokenClaims {
        exp: payload.exp,
        user_id: payload.user_claims.and_then(|c| c.user_id),
    })
}

/// Strip an optional `Bearer ` prefix from an Authorization header value
pub fn bearer_token(header_value: &str) -> &str {
    header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value)
}

/// Build an unsigned token for tests
#[cfg(test)]
pub fn test_token(exp: i64, user_id: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({ "exp": exp, "user_claims": { "user_id": user_id } }).to_string(),
    );
    format!("{}.{}.signature", header, payload)
}
