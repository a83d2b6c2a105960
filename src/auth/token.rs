//! Signed bearer tokens (HS256 JWT).
//!
//! # Design Decisions
//! - Stateless: verification is pure computation over token + shared secret
//! - Expiry is absolute unix time fixed at issuance
//! - Leeway is configurable and defaults to zero

use jsonwebtoken::{
    decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::auth::verifier::CredentialVerifier;
use crate::config::AuthConfig;

/// Claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity id of the caller.
    pub sub: String,
    /// Username at issuance.
    pub name: String,
    pub iss: String,
    pub aud: String,
    pub iat: u64,
    pub nbf: u64,
    pub exp: u64,
}

/// Issues and validates tokens with a shared secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    validity_secs: i64,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
        validation.validate_nbf = true;
        validation.leeway = config.leeway_secs;

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            validity_secs: config.expiration_hours.saturating_mul(3600),
        }
    }

    /// Sign a token for `subject` valid from now for the configured window.
    pub fn issue(&self, subject: &str, name: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = get_current_timestamp();
        // A non-positive window must already be expired at `now`; the
        // library only rejects `exp < now`.
        let window = if self.validity_secs > 0 {
            self.validity_secs
        } else {
            self.validity_secs.saturating_sub(1)
        };
        let exp = i64::try_from(now)
            .unwrap_or(i64::MAX)
            .saturating_add(window)
            .max(0) as u64;

        let claims = Claims {
            sub: subject.to_string(),
            name: name.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            nbf: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Fully validate a token and return its claims.
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }

    /// Read the claims without checking signature or lifetime.
    pub fn peek(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).map(|data| data.claims)
    }
}

impl CredentialVerifier for TokenCodec {
    fn verify(&self, token: &str) -> bool {
        match self.decode(token) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Token rejected");
                false
            }
        }
    }

    fn subject_of(&self, token: &str) -> Option<String> {
        self.peek(token).ok().map(|claims| claims.sub)
    }
}
