use std::sync::Arc;

use crate::config::app::Config;
use crate::error::AppError;
use crate::oidc::provider::IdentityProvider;
use crate::state::app_state::{AppState, AuthSettings};
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: Option<SecurityConfig>,
    settings: AuthSettings,
    provider: Option<Arc<dyn IdentityProvider>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: None,
            settings: AuthSettings::default(),
            provider: None,
        }
    }

    /// Take the signing secret and auth settings from loaded configuration.
    pub fn with_config(self, config: &Config) -> Self {
        self.with_security(SecurityConfig::new(config.jwt_secret.as_bytes()))
            .with_settings(AuthSettings::from_config(config))
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = Some(security_config);
        self
    }

    pub fn with_settings(mut self, settings: AuthSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Missing secret or provider is a misconfiguration, never defaulted.
    pub fn build(self) -> Result<AppState, AppError> {
        let security = self
            .security_config
            .filter(|s| !s.jwt_secret.is_empty())
            .ok_or_else(|| AppError::config("JWT signing secret is not configured"))?;
        let provider = self
            .provider
            .ok_or_else(|| AppError::config("identity provider is not configured"))?;

        Ok(AppState::new(security, self.settings, provider))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
