//! Claims carried inside gateway-issued access tokens.

use serde::{Deserialize, Serialize};

use crate::oidc::profile::Profile;

/// Minimal identity embedded in an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    /// Provider subject identifier
    pub id: String,
    pub email: String,
    pub name: String,
}

impl ClaimSet {
    /// Map a provider profile onto the token's claim set.
    ///
    /// `name` is the display name when present and non-empty, else the raw
    /// `name` attribute, else empty.
    pub fn from_profile(profile: &Profile) -> Self {
        let name = profile
            .display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| profile.raw_name())
            .unwrap_or_default()
            .to_string();

        Self {
            id: profile.subject_id.clone(),
            email: profile.preferred_username.clone(),
            name,
        }
    }
}

/// Full token payload: the claim set plus the timestamps added at signing.
///
/// Serializes flat, so `/auth/me` echoes `{id, email, name, iat, exp}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub user: ClaimSet,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}
