//! Helpers for exercising the gateway without a real identity provider.

pub mod app_builder;
pub mod fake_provider;

pub use app_builder::{create_test_app, TestAppBuilder};
pub use fake_provider::{FakeIdentityProvider, FAKE_AUTHORIZE_URL, FAKE_STATE};

use std::sync::Arc;

use crate::oidc::provider::IdentityProvider;
use crate::state::app_state::{AppState, AuthSettings};
use crate::state::security_config::SecurityConfig;

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_purposes_only";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(TEST_JWT_SECRET.as_bytes())
}

/// State with the test secret, default settings and the given provider.
pub fn test_state(provider: impl IdentityProvider + 'static) -> AppState {
    AppState::new(test_security(), AuthSettings::default(), Arc::new(provider))
}
