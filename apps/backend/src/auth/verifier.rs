use std::time::SystemTime;

use crate::auth::claims::TokenClaims;
use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Validates `Authorization` header values against the shared secret.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    security: SecurityConfig,
}

impl TokenVerifier {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            security: security.clone(),
        }
    }

    /// Verify the header value and return the embedded claims.
    ///
    /// - No header: `MissingHeader`.
    /// - The token is the second whitespace-separated segment; the scheme
    ///   word is not checked. No second segment: `InvalidToken`.
    /// - Bad signature, wrong secret, malformed or expired: `InvalidToken`.
    pub fn verify(
        &self,
        authorization: Option<&str>,
        now: SystemTime,
    ) -> Result<TokenClaims, AppError> {
        let header = authorization.ok_or_else(AppError::missing_header)?;
        let token = bearer_segment(header).ok_or_else(AppError::invalid_token)?;

        verify_access_token(token, now, &self.security)
    }
}

/// Second whitespace-delimited segment of a header value.
pub fn bearer_segment(header: &str) -> Option<&str> {
    header.split_whitespace().nth(1)
}
