pub mod facebook;
pub mod google;

/// What an identity provider tells us about the authenticated person.
#[derive(Debug, Clone)]
pub struct OAuthIdentity {
    pub provider: &'static str,
    pub subject_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl OAuthIdentity {
    /// Username seed for new accounts: the email local part when present,
    /// otherwise `<provider>_user_<subject_id>`.
    pub fn username_seed(&self) -> String {
        match self.email.as_deref().and_then(|e| e.split('@').next()) {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => format!("{}_user_{}", self.provider, self.subject_id),
        }
    }
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// The URL the browser is sent to for consent.
    fn authorize_url(&self, redirect_uri: &str, state: &str) -> anyhow::Result<String>;

    /// Exchange the callback code for an access token and fetch the identity.
    async fn fetch_identity(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> anyhow::Result<OAuthIdentity>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: Option<&str>) -> OAuthIdentity {
        OAuthIdentity {
            provider: "google",
            subject_id: "12345".to_string(),
            email: email.map(|e| e.to_string()),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn username_seed_prefers_email_local_part() {
        assert_eq!(identity(Some("jane.doe@example.com")).username_seed(), "jane.doe");
    }

    #[test]
    fn username_seed_falls_back_to_subject_id() {
        assert_eq!(identity(None).username_seed(), "google_user_12345");
        assert_eq!(identity(Some("@example.com")).username_seed(), "google_user_12345");
    }
}
