use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use lifesheet_core::auth::OAUTH_PASSWORD_SENTINEL;
use lifesheet_core::config::Settings;
use lifesheet_core::domain::user::{NewUser, User};
use lifesheet_core::oauth::{
    facebook::FacebookProvider, google::GoogleProvider, IdentityProvider, OAuthIdentity,
};
use lifesheet_core::storage;

use crate::error::ApiError;
use crate::session;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:provider/login", get(start_login))
        .route("/:provider/callback", get(callback))
}

fn provider_client(
    settings: &Settings,
    name: &str,
) -> Result<Box<dyn IdentityProvider>, ApiError> {
    match name {
        "google" => Ok(Box::new(GoogleProvider::from_settings(settings)?)),
        "facebook" => Ok(Box::new(FacebookProvider::from_settings(settings)?)),
        _ => Err(ApiError::NotFound("OAuth provider")),
    }
}

fn redirect_uri(settings: &Settings, provider: &str) -> Result<String, ApiError> {
    let base = settings.require_public_base_url()?;
    Ok(format!(
        "{}/api/oauth/{provider}/callback",
        base.trim_end_matches('/')
    ))
}

/// Hands the consent URL back as JSON rather than redirecting: the frontend
/// calls this with fetch, and a 3xx to the provider would be blocked by the
/// browser's cross-origin rules before the client ever saw the URL.
async fn start_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    let client = provider_client(&state.settings, &provider)?;

    let redirect = redirect_uri(&state.settings, client.provider_name())?;
    let csrf_state = storage::oauth_states::create(pool).await?;

    Ok(Json(login_payload(client.as_ref(), &redirect, csrf_state)?))
}

fn login_payload(
    client: &dyn IdentityProvider,
    redirect_uri: &str,
    state: Uuid,
) -> Result<serde_json::Value, ApiError> {
    let url = client.authorize_url(redirect_uri, &state.to_string())?;
    let display = match client.provider_name() {
        "facebook" => "Facebook",
        _ => "Google",
    };
    Ok(json!({
        "auth_url": url,
        "message": format!("Redirect to this URL for {display} authentication"),
    }))
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    let client = provider_client(&state.settings, &provider)?;

    let csrf_state = query
        .state
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ApiError::BadRequest("Invalid state parameter".to_string()))?;
    if !storage::oauth_states::consume(pool, csrf_state).await? {
        return Err(ApiError::BadRequest("Invalid state parameter".to_string()));
    }

    let code = query
        .code
        .ok_or_else(|| ApiError::BadRequest("No authorization code received".to_string()))?;

    let redirect = redirect_uri(&state.settings, client.provider_name())?;
    let identity = client.fetch_identity(&code, &redirect).await?;

    let user = upsert_oauth_user(pool, &identity).await?;
    storage::users::touch_last_login(pool, user.id).await?;
    let token = storage::sessions::create(pool, user.id).await?;
    tracing::info!(user_id = user.id, provider = identity.provider, "oauth login");

    let destination = format!(
        "{}?oauth_success=true&provider={}",
        state.settings.frontend_url(),
        identity.provider
    );

    Ok((
        [(header::SET_COOKIE, session::session_cookie(token))],
        Redirect::to(&destination),
    ))
}

/// Finds or creates the local account for an external identity. Accounts are
/// matched by email, so a user who registered with a password can later sign
/// in through a provider that vouches for the same address.
async fn upsert_oauth_user(pool: &PgPool, identity: &OAuthIdentity) -> Result<User, ApiError> {
    let email = identity.email.as_deref().ok_or_else(|| {
        ApiError::BadRequest(format!(
            "{} account did not provide an email address",
            identity.provider
        ))
    })?;

    if let Some(user) = storage::users::find_by_email(pool, email).await? {
        return Ok(user);
    }

    let seed = identity.username_seed();
    let mut username = seed.clone();
    let mut suffix = 0u32;
    while storage::users::find_by_username(pool, &username).await?.is_some() {
        suffix += 1;
        username = format!("{seed}_{suffix}");
    }

    let user = storage::users::insert(
        pool,
        &NewUser {
            username,
            email: email.to_string(),
            password_hash: OAUTH_PASSWORD_SENTINEL.to_string(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            oauth_provider: Some(identity.provider.to_string()),
            oauth_id: Some(identity.subject_id.clone()),
        },
    )
    .await?;
    tracing::info!(user_id = user.id, provider = identity.provider, "oauth account created");

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            database_url: None,
            sentry_dsn: None,
            google_client_id: Some("cid-123".to_string()),
            google_client_secret: Some("secret".to_string()),
            facebook_app_id: None,
            facebook_app_secret: None,
            public_base_url: Some("http://localhost:10000/".to_string()),
            frontend_url: None,
            cors_origins: None,
        }
    }

    #[test]
    fn login_answers_with_auth_url_envelope() {
        let settings = settings();
        let client = provider_client(&settings, "google").unwrap();
        let redirect = redirect_uri(&settings, client.provider_name()).unwrap();
        let state = Uuid::new_v4();

        let payload = login_payload(client.as_ref(), &redirect, state).unwrap();

        let url = payload["auth_url"].as_str().unwrap();
        assert!(url.starts_with("https://accounts.google.com/"));
        assert!(url.contains(&state.to_string()));
        assert_eq!(
            payload["message"],
            "Redirect to this URL for Google authentication"
        );
    }

    #[test]
    fn callback_path_is_derived_from_public_base_url() {
        let redirect = redirect_uri(&settings(), "google").unwrap();
        assert_eq!(redirect, "http://localhost:10000/api/oauth/google/callback");
    }

    #[test]
    fn unknown_provider_is_not_found() {
        assert!(matches!(
            provider_client(&settings(), "github"),
            Err(ApiError::NotFound(_))
        ));
    }
}
