use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::oidc::login_state::PendingLogin;
use crate::oidc::profile::Profile;

/// Where to send the browser, plus what the callback will need to verify it.
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub authorize_url: String,
    pub pending: PendingLogin,
}

/// Parameters the provider sends back, as query string or `form_post` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Reject provider errors and state mismatches, returning the code to exchange.
    pub fn authorization_code(&self, pending: &PendingLogin) -> Result<&str, AppError> {
        if let Some(error) = &self.error {
            return Err(AppError::provider_denied(format!(
                "{error}: {}",
                self.error_description.as_deref().unwrap_or("")
            )));
        }
        if self.state.as_deref() != Some(pending.state.as_str()) {
            return Err(AppError::provider_denied("state mismatch"));
        }
        self.code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::provider_denied("missing authorization code"))
    }
}

/// External OpenID Connect provider driving the two legs of a login.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the authorization URL. The provider is asked to force a fresh
    /// sign-in rather than reuse an existing session.
    fn begin_login(&self) -> Result<LoginRedirect, AppError>;

    /// Exchange the callback for a verified profile.
    ///
    /// Denial, cancellation, state mismatch and exchange failures all come
    /// back as `AppError::ProviderDenied`.
    async fn complete_login(
        &self,
        callback: &CallbackParams,
        pending: &PendingLogin,
    ) -> Result<Profile, AppError>;
}
