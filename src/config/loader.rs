//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Startup configuration: the file at `path` or the defaults, with the
/// bind override applied, validated as a whole.
pub fn resolve_config(
    path: Option<&Path>,
    bind: Option<String>,
) -> Result<ServerConfig, ConfigError> {
    let mut config: ServerConfig = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = bind {
        config.listener.bind_address = bind;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [mounts]
            users = "/accounts"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.mounts.users, "/accounts");
    }

    #[test]
    fn test_validation_error_message_lists_all() {
        let err = parse_config(
            r#"
            [auth]
            secret = ""
            bcrypt_cost = 40
            "#,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("auth.secret must not be empty"));
        assert!(message.contains("auth.bcrypt_cost 40"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_config("listener = 5"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_resolve_defaults_are_validated() {
        let config = resolve_config(None, None).unwrap();
        assert!(config.auth.uses_placeholder_secret());

        let err = resolve_config(None, Some("not-an-address".to_string())).unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::Validation(errors)
                if matches!(errors.as_slice(), [ValidationError::BindAddress(_)])
        ));

        let config = resolve_config(None, Some("127.0.0.1:0".to_string())).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:0");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/routegate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
