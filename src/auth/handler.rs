//! Registration, login and token checks over a [`UserStore`].

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::auth::store::{UserRecord, UserStore};
use crate::auth::token::TokenCodec;
use crate::auth::verifier::CredentialVerifier;
use crate::config::AuthConfig;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Credential verifier backed by a user store and a token codec.
///
/// Passwords are stored only as bcrypt hashes. Hashing is CPU-bound; async
/// callers should run `register`/`authenticate` on a blocking thread.
pub struct AuthHandler {
    store: Arc<dyn UserStore>,
    tokens: TokenCodec,
    bcrypt_cost: u32,
}

impl AuthHandler {
    pub fn new(config: &AuthConfig, store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            tokens: TokenCodec::new(config),
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Create an identity. Returns `Ok(false)` if the username already exists.
    pub fn register(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let username = username.to_lowercase();
        if self.store.find_by_username(&username).is_some() {
            return Ok(false);
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            password_hash: bcrypt::hash(password, self.bcrypt_cost)?,
            username,
        };
        let id = record.id;
        let created = self.store.insert(record);
        if created {
            tracing::info!(user_id = %id, "User registered");
        }
        Ok(created)
    }

    /// Check credentials and issue a token, or `Ok(None)` if they are wrong.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<String>, AuthError> {
        let Some(user) = self.store.find_by_username(&username.to_lowercase()) else {
            return Ok(None);
        };

        let valid = match bcrypt::verify(password, &user.password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Stored password hash unreadable");
                false
            }
        };
        if !valid {
            return Ok(None);
        }

        let token = self.tokens.issue(&user.id.to_string(), &user.username)?;
        Ok(Some(token))
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }
}

impl CredentialVerifier for AuthHandler {
    fn verify(&self, token: &str) -> bool {
        self.tokens.verify(token)
    }

    fn subject_of(&self, token: &str) -> Option<String> {
        self.tokens.subject_of(token)
    }
}
