pub mod app;
pub mod email_allowlist;

pub use app::{AzureAdConfig, Config};
pub use email_allowlist::EmailAllowlist;
