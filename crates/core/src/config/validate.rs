use super::{types::Config, AuthMethod, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Password auth carries a non-empty password
/// - Attachment limits are usable
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.auth.method == AuthMethod::Password
        && config.auth.password.as_deref().is_none_or(str::is_empty)
    {
        return Err(ConfigError::ValidationError(
            "auth.password must be set when auth.method = \"password\"".to_string(),
        ));
    }

    if config.storage.max_attachment_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "storage.max_attachment_bytes cannot be 0".to_string(),
        ));
    }

    if config
        .storage
        .allowed_extensions
        .iter()
        .any(|ext| ext.trim().is_empty() || ext.contains('.'))
    {
        return Err(ConfigError::ValidationError(
            "storage.allowed_extensions entries must be bare extensions like \"pdf\"".to_string(),
        ));
    }

    Ok(())
}
