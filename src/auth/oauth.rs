//! Microsoft Entra ID authorization-code bridge
//!
//! Drives the OAuth2 exchange against the tenant endpoints and derives the
//! canonical [`User`] from the Graph profile. Only this module mints new
//! upstream tokens; session tokens are issued by the codec from its output.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::error::AuthError;
use super::models::User;
use crate::common::config::MicrosoftConfig;

/// OIDC + Graph scopes requested on every login.
const SCOPES: &[&str] = &[
    "openid",
    "profile",
    "email",
    "offline_access",
    "User.Read",
    "Mail.Read",
    "Calendars.Read",
];

const GRAPH_ME_URL: &str = "https://graph.microsoft.com/v1.0/me";

/// Tokens returned by the provider token endpoint. Session lifetime comes
/// from our own token TTL, so the provider's expiry is not kept.
#[derive(Debug, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Result of a completed authorization-code exchange.
#[derive(Debug)]
pub struct ExchangeOutcome {
    pub user: User,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphProfile {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    user_principal_name: Option<String>,
    #[serde(default)]
    mail: Option<String>,
}

pub struct MicrosoftOAuth {
    config: MicrosoftConfig,
    http: Client,
}

impl MicrosoftOAuth {
    pub fn new(config: MicrosoftConfig, http: Client) -> Self {
        Self { config, http }
    }

    fn authority(&self) -> String {
        format!(
            "https://login.microsoftonline.com/{}",
            self.config.tenant_id
        )
    }

    /// Deterministic authorize URL. The `state` value is echoed back by the
    /// provider unmodified; checking it on callback is the caller's job.
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}/oauth2/v2.0/authorize?client_id={}&response_type=code&redirect_uri={}&response_mode=query&scope={}&state={}",
            self.authority(),
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&SCOPES.join(" ")),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for upstream tokens, then resolve the
    /// Graph profile into a canonical identity.
    pub async fn exchange_code(&self, code: &str) -> Result<ExchangeOutcome, AuthError> {
        let scope = SCOPES.join(" ");
        let grant = self
            .request_token(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", scope.as_str()),
            ])
            .await?;

        let user = self.fetch_profile(&grant.access_token).await?;
        debug!(user_id = %user.id, "authorization code exchange completed");

        Ok(ExchangeOutcome {
            user,
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
        })
    }

    /// Redeem an upstream refresh token for a fresh access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AuthError> {
        let scope = SCOPES.join(" ");
        self.request_token(&[
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("scope", scope.as_str()),
        ])
        .await
    }

    /// Best-effort sign-out against the provider. Never blocks local logout;
    /// an unreachable provider is logged and ignored.
    pub async fn revoke(&self) {
        let url = format!("{}/oauth2/v2.0/logout", self.authority());
        if let Err(e) = self.http.get(&url).send().await {
            warn!(error = %e, "identity provider logout failed, continuing local logout");
        }
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenGrant, AuthError> {
        let url = format!("{}/oauth2/v2.0/token", self.authority());
        let response = self
            .http
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::ExchangeFailed(format!("token endpoint unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "identity provider rejected token request");
            return Err(AuthError::ExchangeFailed(format!(
                "provider returned {status}"
            )));
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| AuthError::ExchangeFailed(format!("malformed token response: {e}")))
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<User, AuthError> {
        let response = self
            .http
            .get(GRAPH_ME_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::ExchangeFailed(format!("profile lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::ExchangeFailed(
                "no account information received".to_string(),
            ));
        }

        let profile = response
            .json::<GraphProfile>()
            .await
            .map_err(|e| AuthError::ExchangeFailed(format!("malformed profile response: {e}")))?;

        let principal = profile
            .user_principal_name
            .or(profile.mail)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                AuthError::ExchangeFailed("account has no principal name".to_string())
            })?;

        Ok(User::from_account_claims(
            &profile.id,
            &principal,
            profile.display_name.as_deref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_bridge() -> MicrosoftOAuth {
        MicrosoftOAuth::new(
            MicrosoftConfig {
                client_id: "client-123".to_string(),
                client_secret: "secret".to_string(),
                tenant_id: "tenant-abc".to_string(),
                redirect_uri: "https://app.example.edu/callback".to_string(),
            },
            Client::new(),
        )
    }

    #[test]
    fn authorization_url_is_deterministic() {
        let bridge = test_bridge();
        assert_eq!(
            bridge.authorization_url("xyz"),
            bridge.authorization_url("xyz")
        );
    }

    #[test]
    fn authorization_url_carries_config_and_state() {
        let url = test_bridge().authorization_url("anti-csrf-42");
        assert!(url.starts_with("https://login.microsoftonline.com/tenant-abc/oauth2/v2.0/authorize?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.example.edu%2Fcallback"));
        assert!(url.contains("state=anti-csrf-42"));
        assert!(url.contains("scope=openid%20profile%20email"));
    }
}
