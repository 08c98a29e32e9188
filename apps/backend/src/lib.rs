#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod oidc;
pub mod routes;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::jwt::{mint_access_token, verify_access_token};
pub use auth::{ClaimSet, TokenClaims, TokenIssuer, TokenVerifier};
pub use config::Config;
pub use error::{AppError, FailEnvelope};
pub use extractors::current_user::CurrentUser;
pub use oidc::{CallbackParams, IdentityProvider, Profile};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    gateway_test_support::logging::init();
}
