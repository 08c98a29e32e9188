use std::time::SystemTime;

use crate::auth::claims::ClaimSet;
use crate::auth::jwt::mint_access_token;
use crate::error::AppError;
use crate::oidc::profile::Profile;
use crate::state::security_config::SecurityConfig;

/// Turns an authenticated profile into a signed access token.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    security: SecurityConfig,
}

impl TokenIssuer {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            security: security.clone(),
        }
    }

    /// Map `profile` to a claim set and sign it, expiring one TTL after `now`.
    ///
    /// The result is URL-safe (base64url segments joined by `.`).
    pub fn issue(&self, profile: &Profile, now: SystemTime) -> Result<String, AppError> {
        mint_access_token(&ClaimSet::from_profile(profile), now, &self.security)
    }
}
