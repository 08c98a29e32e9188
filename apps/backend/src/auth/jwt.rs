use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::auth::claims::{ClaimSet, TokenClaims};
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Payloads whose expiry is checked against an injected clock.
pub trait Expiring {
    /// Expiry (seconds since epoch)
    fn exp(&self) -> i64;
}

impl Expiring for TokenClaims {
    fn exp(&self) -> i64 {
        self.exp
    }
}

pub(crate) fn unix_seconds(now: SystemTime) -> Result<i64, AppError> {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AppError::internal("system clock is before the unix epoch"))
}

/// Sign any serializable payload with the configured secret.
pub(crate) fn sign<T: Serialize>(claims: &T, security: &SecurityConfig) -> Result<String, AppError> {
    encode(
        &Header::new(security.algorithm),
        claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify the signature and decode, then reject anything expired at `now`.
///
/// The library's own expiry check is disabled so callers control the clock.
/// `audience` must match the token's `aud`; `None` rejects tokens that carry one.
pub(crate) fn decode_unexpired<T>(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
    audience: Option<&str>,
) -> Result<T, AppError>
where
    T: DeserializeOwned + Expiring,
{
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    match audience {
        Some(aud) => {
            validation.set_audience(&[aud]);
            validation.set_required_spec_claims(&["exp", "aud"]);
        }
        None => validation.set_required_spec_claims(&["exp"]),
    }

    let claims = decode::<T>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        let reason = match e.kind() {
            ErrorKind::InvalidSignature => "invalid_signature",
            ErrorKind::InvalidAudience => "invalid_audience",
            ErrorKind::MissingRequiredClaim(_) => "missing_claim",
            _ => "invalid_token",
        };
        debug!(reason, "token rejected");
        AppError::invalid_token()
    })?;

    // Expired once the clock reaches `exp`; no leeway.
    if unix_seconds(now)? >= claims.exp() {
        debug!(reason = "token_expired", "token rejected");
        return Err(AppError::invalid_token());
    }

    Ok(claims)
}

/// Mint an HS256 access token for `user`, valid for the configured TTL.
pub fn mint_access_token(
    user: &ClaimSet,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = unix_seconds(now)?;
    let exp = iat + security.access_token_ttl.as_secs() as i64;

    let claims = TokenClaims {
        user: user.clone(),
        iat,
        exp,
    };

    sign(&claims, security)
}

/// Verify an access token and return its full payload.
///
/// Any failure (bad signature, wrong secret, malformed, expired, or a
/// token minted for a different audience) is `AppError::InvalidToken`.
pub fn verify_access_token(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<TokenClaims, AppError> {
    decode_unexpired(token, now, security, None)
}
