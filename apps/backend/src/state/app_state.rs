use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::auth::{TokenIssuer, TokenVerifier};
use crate::config::app::Config;
use crate::config::email_allowlist::EmailAllowlist;
use crate::oidc::provider::IdentityProvider;

/// Settings the auth routes need beyond signing.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Base URL the success redirect points at (no trailing slash)
    pub frontend_url: String,
    pub email_allowlist: Option<EmailAllowlist>,
    /// Environment name reported by the health endpoint
    pub app_env: String,
}

impl AuthSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            frontend_url: config.frontend_url.clone(),
            email_allowlist: config.email_allowlist.clone(),
            app_env: config.app_env.clone(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            email_allowlist: None,
            app_env: "development".to_string(),
        }
    }
}

/// Application state shared by every worker. Holds nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Signing settings, also used to seal the pending-login cookie
    pub security: SecurityConfig,
    pub issuer: TokenIssuer,
    pub verifier: TokenVerifier,
    pub settings: AuthSettings,
    pub provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        security: SecurityConfig,
        settings: AuthSettings,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            issuer: TokenIssuer::new(&security),
            verifier: TokenVerifier::new(&security),
            security,
            settings,
            provider,
        }
    }
}
