use crate::config::Settings;
use crate::oauth::{IdentityProvider, OAuthIdentity};
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

const AUTH_URL: &str = "https://www.facebook.com/v18.0/dialog/oauth";
const TOKEN_URL: &str = "https://graph.facebook.com/v18.0/oauth/access_token";
const USER_INFO_URL: &str = "https://graph.facebook.com/me";
const SCOPE: &str = "email,public_profile";
const USER_FIELDS: &str = "id,name,email,first_name,last_name";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct FacebookProvider {
    http: reqwest::Client,
    app_id: String,
    app_secret: String,
}

impl FacebookProvider {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let app_id = settings
            .facebook_app_id
            .as_deref()
            .context("FACEBOOK_APP_ID is required")?
            .to_string();
        let app_secret = settings
            .facebook_app_secret
            .as_deref()
            .context("FACEBOOK_APP_SECRET is required")?
            .to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build Facebook OAuth http client")?;

        Ok(Self {
            http,
            app_id,
            app_secret,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FacebookUserInfo {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

#[async_trait::async_trait]
impl IdentityProvider for FacebookProvider {
    fn provider_name(&self) -> &'static str {
        "facebook"
    }

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> anyhow::Result<String> {
        let mut url = reqwest::Url::parse(AUTH_URL).context("invalid Facebook auth URL")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.app_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("scope", SCOPE)
            .append_pair("response_type", "code")
            .append_pair("state", state);
        Ok(url.into())
    }

    async fn fetch_identity(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> anyhow::Result<OAuthIdentity> {
        // Facebook exchanges the code via GET with query parameters.
        let token: TokenResponse = self
            .http
            .get(TOKEN_URL)
            .query(&[
                ("client_id", self.app_id.as_str()),
                ("client_secret", self.app_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .context("Facebook token request failed")?
            .json()
            .await
            .context("failed to decode Facebook token response")?;

        let access_token = token
            .access_token
            .context("Failed to get access token")?;

        let info: FacebookUserInfo = self
            .http
            .get(USER_INFO_URL)
            .query(&[
                ("access_token", access_token.as_str()),
                ("fields", USER_FIELDS),
            ])
            .send()
            .await
            .context("Facebook userinfo request failed")?
            .json()
            .await
            .context("failed to decode Facebook userinfo response")?;

        Ok(OAuthIdentity {
            provider: self.provider_name(),
            subject_id: info.id,
            email: info.email,
            first_name: info.first_name,
            last_name: info.last_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_carries_app_id_and_scope() {
        let provider = FacebookProvider {
            http: reqwest::Client::new(),
            app_id: "app-9".to_string(),
            app_secret: "secret".to_string(),
        };
        let url = provider
            .authorize_url("https://example.com/api/oauth/facebook/callback", "s1")
            .unwrap();
        assert!(url.starts_with(AUTH_URL));
        assert!(url.contains("client_id=app-9"));
        assert!(url.contains("scope=email%2Cpublic_profile"));
        assert!(url.contains("state=s1"));
        assert!(!url.contains("app_secret") && !url.contains("secret"));
    }
}
