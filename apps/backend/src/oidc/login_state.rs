//! Pending-login state carried between the redirect and the callback.
//!
//! The CSRF state, nonce and PKCE verifier are signed into a short-lived
//! token and stored in an HttpOnly cookie, so no server-side session exists.

use std::time::{Duration, SystemTime};

use actix_web::cookie::{time, Cookie, SameSite};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{decode_unexpired, sign, unix_seconds, Expiring};
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

pub const LOGIN_STATE_COOKIE: &str = "login_state";
pub const LOGIN_STATE_TTL: Duration = Duration::from_secs(10 * 60);
const LOGIN_STATE_AUDIENCE: &str = "login-state";
const LOGIN_STATE_COOKIE_PATH: &str = "/auth/microsoft";

/// Values generated when the login starts and checked on the callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLogin {
    /// CSRF state echoed back by the provider
    pub state: String,
    pub nonce: String,
    pub pkce_verifier: String,
}

#[derive(Serialize, Deserialize)]
struct LoginStateClaims {
    #[serde(flatten)]
    pending: PendingLogin,
    aud: String,
    exp: i64,
}

impl Expiring for LoginStateClaims {
    fn exp(&self) -> i64 {
        self.exp
    }
}

/// Sign `pending` into a cookie value.
pub fn seal(
    pending: &PendingLogin,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let claims = LoginStateClaims {
        pending: pending.clone(),
        aud: LOGIN_STATE_AUDIENCE.to_string(),
        exp: unix_seconds(now)? + LOGIN_STATE_TTL.as_secs() as i64,
    };
    sign(&claims, security)
}

/// Recover the pending login from a cookie value.
pub fn open(
    sealed: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<PendingLogin, AppError> {
    decode_unexpired::<LoginStateClaims>(sealed, now, security, Some(LOGIN_STATE_AUDIENCE))
        .map(|claims| claims.pending)
        .map_err(|_| AppError::provider_denied("login state missing, invalid or expired"))
}

/// Cookie holding the sealed state.
///
/// `SameSite=None` is required because `form_post` delivers the callback as
/// a cross-site POST; browsers only accept that together with `Secure`.
pub fn login_state_cookie(sealed: String) -> Cookie<'static> {
    Cookie::build(LOGIN_STATE_COOKIE, sealed)
        .path(LOGIN_STATE_COOKIE_PATH)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(time::Duration::seconds(LOGIN_STATE_TTL.as_secs() as i64))
        .finish()
}

/// Expired cookie that removes the state once the callback has run.
pub fn clear_login_state_cookie() -> Cookie<'static> {
    Cookie::build(LOGIN_STATE_COOKIE, "")
        .path(LOGIN_STATE_COOKIE_PATH)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(time::Duration::ZERO)
        .finish()
}
