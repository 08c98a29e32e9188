//! Application configuration loaded once from environment variables.
//!
//! `main` builds a [`Config`] at startup and hands it to the state builder;
//! request handlers only ever see the values derived from it.

use std::env;

use crate::config::email_allowlist::EmailAllowlist;
use crate::error::AppError;

const DEFAULT_REDIRECT_URI: &str = "http://localhost:3001/auth/microsoft/callback";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Azure AD application registration.
#[derive(Debug, Clone)]
pub struct AzureAdConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl AzureAdConfig {
    /// Tenant authority; discovery appends `/.well-known/openid-configuration`.
    pub fn issuer_url(&self) -> String {
        format!("https://login.microsoftonline.com/{}/v2.0", self.tenant_id)
    }

    pub fn discovery_url(&self) -> String {
        format!("{}/.well-known/openid-configuration", self.issuer_url())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub app_env: String,

    // Identity provider
    pub azure_ad: AzureAdConfig,

    // Token signing
    pub jwt_secret: String,

    // Front-end integration
    pub frontend_url: String,
    pub cors_allowed_origins: Vec<String>,

    // Optional; `None` accepts every authenticated profile
    pub email_allowlist: Option<EmailAllowlist>,
}

impl Config {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String, AppError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::config(format!("{name} must be set")))
        };
        let optional = |name: &str, default: &str| -> String {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let host = optional("BACKEND_HOST", "0.0.0.0");
        let port_str = optional("BACKEND_PORT", "3001");
        let port = port_str.parse::<u16>().map_err(|_| {
            AppError::config(format!(
                "BACKEND_PORT must be a valid port number, got '{port_str}'"
            ))
        })?;
        let app_env = optional("APP_ENV", "development");

        let azure_ad = AzureAdConfig {
            tenant_id: required("AZURE_AD_TENANT_ID")?,
            client_id: required("AZURE_AD_CLIENT_ID")?,
            client_secret: required("AZURE_AD_CLIENT_SECRET")?,
            redirect_uri: optional("AZURE_AD_REDIRECT_URI", DEFAULT_REDIRECT_URI),
        };

        let jwt_secret = required("JWT_SECRET")?;

        let frontend_url = optional("FRONTEND_URL", DEFAULT_FRONTEND_URL)
            .trim_end_matches('/')
            .to_string();

        let cors_allowed_origins =
            parse_origins(&lookup("CORS_ALLOWED_ORIGINS").unwrap_or_default());
        let cors_allowed_origins = if cors_allowed_origins.is_empty() {
            vec![frontend_url.clone()]
        } else {
            cors_allowed_origins
        };

        let email_allowlist = lookup("ALLOWED_EMAILS").and_then(|v| EmailAllowlist::parse(&v));

        Ok(Config {
            host,
            port,
            app_env,
            azure_ad,
            jwt_secret,
            frontend_url,
            cors_allowed_origins,
            email_allowlist,
        })
    }
}

/// Comma-separated origins; empty, `null` and non-http(s) entries are dropped.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.to_string())
        .collect()
}
