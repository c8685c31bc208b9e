//! Shared staff password authentication.

use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Header carrying the staff password.
pub const STAFF_PASSWORD_HEADER: &str = "x-staff-password";

/// Authenticator that compares requests against one shared staff password.
///
/// Accepts the password in either:
/// - `X-Staff-Password: <password>` header
/// - `Authorization: Bearer <password>` header
///
/// There is no rate limiting and no per-user identity: every holder of the
/// password is the same `staff` operator.
pub struct SharedPasswordAuthenticator {
    expected: String,
}

impl SharedPasswordAuthenticator {
    pub fn new(password: String) -> Self {
        Self { expected: password }
    }

    fn extract_password<'a>(&self, request: &'a AuthRequest) -> Option<&'a str> {
        if let Some(password) = request.headers.get(STAFF_PASSWORD_HEADER) {
            return Some(password.as_str());
        }

        let auth_header = request.headers.get("authorization")?;
        auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
    }
}

#[async_trait]
impl Authenticator for SharedPasswordAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let provided = self
            .extract_password(request)
            .ok_or(AuthError::NotAuthenticated)?;

        if constant_time_eq(provided.as_bytes(), self.expected.as_bytes()) {
            Ok(Identity::staff())
        } else {
            Err(AuthError::InvalidCredentials("Invalid password".to_string()))
        }
    }

    fn method_name(&self) -> &'static str {
        "password"
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
