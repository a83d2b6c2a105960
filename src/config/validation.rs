//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (connection limits, bcrypt cost)
//! - Detect conflicting or malformed mount prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("listener.max_connections must be greater than zero")]
    ZeroConnections,

    #[error("auth.secret must not be empty")]
    EmptySecret,

    #[error("auth.bcrypt_cost {0} is outside 4..=31")]
    BcryptCost(u32),

    #[error("mount prefix '{0}' must start with '/'")]
    MountPrefix(String),

    #[error("mount prefix '{0}' is used more than once")]
    DuplicateMount(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroConnections);
    }

    if config.auth.secret.is_empty() {
        errors.push(ValidationError::EmptySecret);
    }
    if !(4..=31).contains(&config.auth.bcrypt_cost) {
        errors.push(ValidationError::BcryptCost(config.auth.bcrypt_cost));
    }

    let mounts = [&config.mounts.users, &config.mounts.system];
    for prefix in mounts {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::MountPrefix(prefix.clone()));
        }
    }
    if config.mounts.users.eq_ignore_ascii_case(&config.mounts.system) {
        errors.push(ValidationError::DuplicateMount(config.mounts.users.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.max_connections = 0;
        config.auth.secret.clear();
        config.auth.bcrypt_cost = 2;
        config.mounts.users = "users".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroConnections,
                ValidationError::EmptySecret,
                ValidationError::BcryptCost(2),
                ValidationError::MountPrefix("users".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicate_mounts() {
        let mut config = ServerConfig::default();
        config.mounts.system = "/Users".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::DuplicateMount("/users".to_string())]);
    }
}
