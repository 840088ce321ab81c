use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use lifesheet_core::domain::user::User;
use lifesheet_core::storage;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "lifesheet_session";

/// `Set-Cookie` value opening a session. SameSite=Lax so the OAuth redirect
/// flow still carries the cookie back.
pub fn session_cookie(token: Uuid) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pulls the session token out of the `Cookie` header, if present and well
/// formed.
pub fn token_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        if name != SESSION_COOKIE {
            return None;
        }
        Uuid::parse_str(value.trim()).ok()
    })
}

/// Extractor for endpoints that require an authenticated caller. Rejects with
/// 401 when there is no cookie or the session does not resolve to a user.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers)
            .ok_or(ApiError::Unauthorized("Not authenticated"))?;
        let pool = state.db()?;
        let user = storage::sessions::find_user(pool, token)
            .await?
            .ok_or(ApiError::Unauthorized("Not authenticated"))?;
        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn extracts_token_among_other_cookies() {
        let token = Uuid::new_v4();
        let headers = headers(&format!("theme=dark; {SESSION_COOKIE}={token}; lang=en"));
        assert_eq!(token_from_headers(&headers), Some(token));
    }

    #[test]
    fn missing_or_malformed_cookie_yields_none() {
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
        assert_eq!(token_from_headers(&headers("theme=dark")), None);
        assert_eq!(
            token_from_headers(&headers(&format!("{SESSION_COOKIE}=not-a-uuid"))),
            None
        );
    }

    #[test]
    fn cookie_roundtrip() {
        let token = Uuid::new_v4();
        let set = session_cookie(token);
        let (pair, _) = set.split_once(';').unwrap();
        assert_eq!(token_from_headers(&headers(pair)), Some(token));
    }

    #[test]
    fn expired_cookie_clears_value() {
        let set = expired_session_cookie();
        assert!(set.contains("Max-Age=0"));
        assert!(set.starts_with(&format!("{SESSION_COOKIE}=;")));
    }
}
