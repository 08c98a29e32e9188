use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Access tokens are valid for one hour after issuance.
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Signing settings shared by the token issuer and verifier.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Process-wide HS256 secret
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
    pub access_token_ttl: Duration,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_token_ttl: ACCESS_TOKEN_TTL,
        }
    }
}
