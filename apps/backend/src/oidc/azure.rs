//! Azure AD identity provider backed by the `openidconnect` crate.
//!
//! Authorization code flow with PKCE, `prompt=login` and
//! `response_mode=form_post`. The ID token's signature, issuer, audience,
//! expiry and nonce are verified before a profile is produced.

use async_trait::async_trait;
use base64::Engine;
use openidconnect::core::{
    CoreAuthPrompt, CoreAuthenticationFlow, CoreClient, CoreIdToken, CoreJsonWebKeySet,
    CoreProviderMetadata,
};
use openidconnect::{
    AuthType, AuthorizationCode, ClientId, ClientSecret, CsrfToken, Nonce, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse,
};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::config::app::AzureAdConfig;
use crate::error::AppError;
use crate::oidc::login_state::PendingLogin;
use crate::oidc::profile::Profile;
use crate::oidc::provider::{CallbackParams, IdentityProvider, LoginRedirect};

const SCOPES: [&str; 2] = ["profile", "email"];
const AUTHORITY: &str = "https://login.microsoftonline.com/";

pub struct AzureAdProvider {
    /// Discovered metadata, including the signing keys
    metadata: CoreProviderMetadata,
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_url: RedirectUrl,
    http_client: reqwest::Client,
}

impl AzureAdProvider {
    /// Fetch the tenant's discovery document and signing keys.
    ///
    /// `AZURE_AD_TENANT_ID` may be the tenant GUID or a verified domain; the
    /// document's own issuer is what ID tokens are checked against. Any
    /// failure here is a startup misconfiguration.
    pub async fn discover(config: &AzureAdConfig) -> Result<Self, AppError> {
        let http_client = reqwest::ClientBuilder::new()
            // Following redirects would expose the exchange to SSRF
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        let discovery_url = config.discovery_url();
        let document = fetch_discovery_document(&discovery_url, &http_client)
            .await
            .map_err(|e| {
                AppError::config(format!("OIDC discovery failed for {discovery_url}: {e}"))
            })?;
        let metadata = parse_tenant_metadata(&document)?;

        let jwks = CoreJsonWebKeySet::fetch_async(metadata.jwks_uri(), &http_client)
            .await
            .map_err(|e| {
                AppError::config(format!(
                    "Failed to fetch signing keys from {}: {e}",
                    metadata.jwks_uri().url()
                ))
            })?;
        let metadata = metadata.set_jwks(jwks);

        info!(issuer = %metadata.issuer().as_str(), "identity provider discovered");

        Self::with_metadata(metadata, config, http_client)
    }

    fn with_metadata(
        metadata: CoreProviderMetadata,
        config: &AzureAdConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, AppError> {
        let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| AppError::config(format!("Invalid AZURE_AD_REDIRECT_URI: {e}")))?;

        Ok(Self {
            metadata,
            client_id: ClientId::new(config.client_id.clone()),
            client_secret: ClientSecret::new(config.client_secret.clone()),
            redirect_url,
            http_client,
        })
    }
}

async fn fetch_discovery_document(
    url: &str,
    http_client: &reqwest::Client,
) -> Result<String, reqwest::Error> {
    http_client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Parse a discovery document, accepting only a single-tenant issuer.
///
/// The multi-tenant endpoints (`common`, `organizations`) publish an issuer
/// containing a `{tenantid}` placeholder that no token would ever match.
fn parse_tenant_metadata(document: &str) -> Result<CoreProviderMetadata, AppError> {
    let metadata: CoreProviderMetadata = serde_json::from_str(document)
        .map_err(|e| AppError::config(format!("Invalid OIDC discovery document: {e}")))?;

    let issuer = metadata.issuer().as_str();
    if !is_tenant_issuer(issuer) {
        return Err(AppError::config(format!(
            "Unsupported issuer {issuer}: AZURE_AD_TENANT_ID must name a single tenant \
             (multi-tenant endpoints such as common or organizations are not supported)"
        )));
    }
    Ok(metadata)
}

/// `https://login.microsoftonline.com/<tenant guid>/v2.0`
fn is_tenant_issuer(issuer: &str) -> bool {
    issuer
        .strip_prefix(AUTHORITY)
        .and_then(|rest| rest.strip_suffix("/v2.0"))
        .is_some_and(|tenant| Uuid::parse_str(tenant).is_ok())
}

#[async_trait]
impl IdentityProvider for AzureAdProvider {
    fn begin_login(&self) -> Result<LoginRedirect, AppError> {
        let client = CoreClient::from_provider_metadata(
            self.metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(self.redirect_url.clone());

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        // `openid` is always requested by the flow itself
        let mut request = client.authorize_url(
            CoreAuthenticationFlow::AuthorizationCode,
            CsrfToken::new_random,
            Nonce::new_random,
        );
        for scope in SCOPES {
            request = request.add_scope(Scope::new(scope.to_string()));
        }
        let (authorize_url, csrf_state, nonce) = request
            .add_prompt(CoreAuthPrompt::Login)
            .add_extra_param("response_mode", "form_post")
            .set_pkce_challenge(pkce_challenge)
            .url();

        Ok(LoginRedirect {
            authorize_url: authorize_url.to_string(),
            pending: PendingLogin {
                state: csrf_state.secret().clone(),
                nonce: nonce.secret().clone(),
                pkce_verifier: pkce_verifier.secret().clone(),
            },
        })
    }

    async fn complete_login(
        &self,
        callback: &CallbackParams,
        pending: &PendingLogin,
    ) -> Result<Profile, AppError> {
        let code = callback.authorization_code(pending)?;

        let client = CoreClient::from_provider_metadata(
            self.metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(self.redirect_url.clone())
        .set_auth_type(AuthType::RequestBody);

        let token_response = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| AppError::config(format!("token endpoint not configured: {e}")))?
            .set_pkce_verifier(PkceCodeVerifier::new(pending.pkce_verifier.clone()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| AppError::provider_denied(format!("token exchange failed: {e}")))?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| AppError::provider_denied("no id_token in token response"))?;

        let verifier = client.id_token_verifier();
        id_token
            .claims(&verifier, &Nonce::new(pending.nonce.clone()))
            .map_err(|e| AppError::provider_denied(format!("ID token verification failed: {e}")))?;

        Ok(Profile::from_id_token_claims(raw_payload(id_token)?))
    }
}

/// Payload of an already verified ID token, for claims the core type lacks (`oid`).
fn raw_payload(id_token: &CoreIdToken) -> Result<Map<String, Value>, AppError> {
    let jwt = serde_json::to_value(id_token)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| AppError::internal("ID token did not serialize as a string"))?;

    decode_jwt_payload(&jwt)
        .ok_or_else(|| AppError::provider_denied("ID token payload is not a JSON object"))
}

/// Decode the middle segment of a compact JWT without verifying it.
fn decode_jwt_payload(jwt: &str) -> Option<Map<String, Value>> {
    let payload = jwt.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .ok()?;
    match serde_json::from_slice(&bytes).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
