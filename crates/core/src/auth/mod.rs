mod closed;
mod none;
mod password;
mod traits;
mod types;

pub use closed::*;
pub use none::*;
pub use password::*;
pub use traits::*;
pub use types::*;

use crate::config::{AuthConfig, AuthMethod};

/// Factory function to create authenticator from config
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, AuthError> {
    match config.method {
        AuthMethod::Disabled => Ok(Box::new(ClosedAuthenticator::new())),
        AuthMethod::None => Ok(Box::new(NoneAuthenticator::new())),
        AuthMethod::Password => {
            let password = config
                .password
                .clone()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    AuthError::ConfigurationError(
                        "password must be set when using Password auth method".to_string(),
                    )
                })?;
            Ok(Box::new(SharedPasswordAuthenticator::new(password)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_authenticator_disabled() {
        let auth = create_authenticator(&AuthConfig::default()).unwrap();
        assert_eq!(auth.method_name(), "disabled");
    }

    #[test]
    fn test_create_authenticator_none() {
        let config = AuthConfig {
            method: AuthMethod::None,
            password: None,
        };
        let auth = create_authenticator(&config).unwrap();
        assert_eq!(auth.method_name(), "none");
    }

    #[test]
    fn test_create_authenticator_password() {
        let config = AuthConfig {
            method: AuthMethod::Password,
            password: Some("staff-secret".to_string()),
        };
        let auth = create_authenticator(&config).unwrap();
        assert_eq!(auth.method_name(), "password");
    }

    #[test]
    fn test_create_authenticator_password_missing() {
        let config = AuthConfig {
            method: AuthMethod::Password,
            password: None,
        };
        let result = create_authenticator(&config);
        assert!(matches!(result, Err(AuthError::ConfigurationError(_))));
    }
}
