use async_trait::async_trait;

use crate::error::AppError;
use crate::oidc::login_state::PendingLogin;
use crate::oidc::profile::Profile;
use crate::oidc::provider::{CallbackParams, IdentityProvider, LoginRedirect};

pub const FAKE_AUTHORIZE_URL: &str = "https://login.example.test/authorize";
pub const FAKE_STATE: &str = "fake-csrf-state";

/// Identity provider stand-in with deterministic state.
///
/// The callback still goes through the same state/error/code checks as a
/// real provider, then yields the configured profile or a denial.
#[derive(Debug, Clone)]
pub struct FakeIdentityProvider {
    outcome: Option<Profile>,
}

impl FakeIdentityProvider {
    pub fn returning(profile: Profile) -> Self {
        Self {
            outcome: Some(profile),
        }
    }

    /// Authenticates nobody; every callback is denied.
    pub fn denying() -> Self {
        Self { outcome: None }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    fn begin_login(&self) -> Result<LoginRedirect, AppError> {
        Ok(LoginRedirect {
            authorize_url: format!("{FAKE_AUTHORIZE_URL}?prompt=login&state={FAKE_STATE}"),
            pending: PendingLogin {
                state: FAKE_STATE.to_string(),
                nonce: "fake-nonce".to_string(),
                pkce_verifier: "fake-pkce-verifier".to_string(),
            },
        })
    }

    async fn complete_login(
        &self,
        callback: &CallbackParams,
        pending: &PendingLogin,
    ) -> Result<Profile, AppError> {
        callback.authorization_code(pending)?;
        self.outcome
            .clone()
            .ok_or_else(|| AppError::provider_denied("fake provider denies every login"))
    }
}
