//! Staff portal closed until a password is configured.

use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Message returned while no staff password has been configured.
pub const PORTAL_NOT_CONFIGURED: &str = "Staff portal is not configured";

/// Authenticator used when the staff portal has not been set up.
/// Rejects every request, whatever credentials it carries.
#[derive(Default)]
pub struct ClosedAuthenticator;

impl ClosedAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Authenticator for ClosedAuthenticator {
    async fn authenticate(&self, _request: &AuthRequest) -> Result<Identity, AuthError> {
        Err(AuthError::ServiceUnavailable(
            PORTAL_NOT_CONFIGURED.to_string(),
        ))
    }

    fn method_name(&self) -> &'static str {
        "disabled"
    }
}
