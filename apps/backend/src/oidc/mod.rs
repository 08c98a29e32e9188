//! Identity strategy adapter: the redirect/callback pair against the
//! external OpenID Connect provider.

pub mod azure;
pub mod login_state;
pub mod profile;
pub mod provider;

pub use azure::AzureAdProvider;
pub use login_state::PendingLogin;
pub use profile::Profile;
pub use provider::{CallbackParams, IdentityProvider, LoginRedirect};
