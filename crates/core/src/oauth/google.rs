use crate::config::Settings;
use crate::oauth::{IdentityProvider, OAuthIdentity};
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USER_INFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const SCOPE: &str = "openid email profile";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct GoogleProvider {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
}

impl GoogleProvider {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client_id = settings
            .google_client_id
            .as_deref()
            .context("GOOGLE_CLIENT_ID is required")?
            .to_string();
        let client_secret = settings
            .google_client_secret
            .as_deref()
            .context("GOOGLE_CLIENT_SECRET is required")?
            .to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build Google OAuth http client")?;

        Ok(Self {
            http,
            client_id,
            client_secret,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
}

#[async_trait::async_trait]
impl IdentityProvider for GoogleProvider {
    fn provider_name(&self) -> &'static str {
        "google"
    }

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> anyhow::Result<String> {
        let mut url = reqwest::Url::parse(AUTH_URL).context("invalid Google auth URL")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
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
        let token: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .context("Google token request failed")?
            .json()
            .await
            .context("failed to decode Google token response")?;

        let access_token = token
            .access_token
            .context("Failed to get access token")?;

        let info: GoogleUserInfo = self
            .http
            .get(USER_INFO_URL)
            .bearer_auth(&access_token)
            .send()
            .await
            .context("Google userinfo request failed")?
            .json()
            .await
            .context("failed to decode Google userinfo response")?;

        Ok(OAuthIdentity {
            provider: self.provider_name(),
            subject_id: info.id,
            email: info.email,
            first_name: info.given_name,
            last_name: info.family_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GoogleProvider {
        GoogleProvider {
            http: reqwest::Client::new(),
            client_id: "cid-123".to_string(),
            client_secret: "secret".to_string(),
        }
    }

    #[test]
    fn authorize_url_carries_state_and_encoded_redirect() {
        let url = provider()
            .authorize_url("http://localhost:10000/api/oauth/google/callback", "st4te")
            .unwrap();
        assert!(url.starts_with(AUTH_URL));
        assert!(url.contains("client_id=cid-123"));
        assert!(url.contains("state=st4te"));
        assert!(url.contains("response_type=code"));
        // redirect_uri must be percent-encoded.
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost"));
        assert!(!url.contains("client_secret"));
    }
}
