//! Bearer-token gate consumed by routers.

use axum::http::{header, HeaderMap};

/// Validates bearer tokens and recovers the caller's identity.
///
/// Routers only see this trait, so tests can plug in a stub.
pub trait CredentialVerifier: Send + Sync {
    /// True if the token is well-formed, correctly signed and currently valid.
    /// Every failure mode collapses to `false`.
    fn verify(&self, token: &str) -> bool;

    /// The subject claim of the token, without re-verifying it.
    fn subject_of(&self, token: &str) -> Option<String>;
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme keyword is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
