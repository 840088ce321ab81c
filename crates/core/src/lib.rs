pub mod auth;
pub mod domain;
pub mod oauth;
pub mod storage;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub sentry_dsn: Option<String>,
        pub google_client_id: Option<String>,
        pub google_client_secret: Option<String>,
        pub facebook_app_id: Option<String>,
        pub facebook_app_secret: Option<String>,
        pub public_base_url: Option<String>,
        pub frontend_url: Option<String>,
        pub cors_origins: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                database_url: std::env::var("DATABASE_URL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                google_client_id: std::env::var("GOOGLE_CLIENT_ID").ok(),
                google_client_secret: std::env::var("GOOGLE_CLIENT_SECRET").ok(),
                facebook_app_id: std::env::var("FACEBOOK_APP_ID").ok(),
                facebook_app_secret: std::env::var("FACEBOOK_APP_SECRET").ok(),
                public_base_url: std::env::var("PUBLIC_BASE_URL").ok(),
                frontend_url: std::env::var("FRONTEND_URL").ok(),
                cors_origins: std::env::var("CORS_ORIGINS").ok(),
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }

        pub fn require_public_base_url(&self) -> anyhow::Result<&str> {
            self.public_base_url
                .as_deref()
                .context("PUBLIC_BASE_URL is required")
        }

        /// Where OAuth callbacks send the browser after a successful login.
        pub fn frontend_url(&self) -> &str {
            self.frontend_url
                .as_deref()
                .unwrap_or("http://localhost:5173")
        }

        /// Comma-separated list of origins allowed to call the API with credentials.
        pub fn cors_origins(&self) -> Vec<String> {
            self.cors_origins
                .as_deref()
                .unwrap_or("http://localhost:5173")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }
    }
}
