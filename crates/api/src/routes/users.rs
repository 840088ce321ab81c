use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use lifesheet_core::auth;
use lifesheet_core::domain::user::NewUser;
use lifesheet_core::storage;

use super::double_option;
use crate::error::{required, ApiError};
use crate::session::{self, CurrentUser};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/profile", get(get_account).put(update_account))
        .route("/api/change-password", post(change_password))
        .route("/api/users", get(list_users))
        .route("/api/users/:user_id", get(get_user).delete(delete_user))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let username = required(req.username.filter(|s| !s.is_empty()), "username")?;
    let email = required(req.email.filter(|s| !s.is_empty()), "email")?;
    let password = required(req.password.filter(|s| !s.is_empty()), "password")?;

    if !auth::validate_email(&email) {
        return Err(ApiError::BadRequest("Invalid email format".to_string()));
    }
    auth::validate_password(&password).map_err(|msg| ApiError::BadRequest(msg.to_string()))?;

    if storage::users::find_by_username(pool, &username).await?.is_some() {
        return Err(ApiError::Conflict("Username already exists"));
    }
    if storage::users::find_by_email(pool, &email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists"));
    }

    let user = storage::users::insert(
        pool,
        &NewUser {
            username,
            email,
            password_hash: auth::hash_password(&password),
            first_name: req.first_name,
            last_name: req.last_name,
            oauth_provider: None,
            oauth_id: None,
        },
    )
    .await?;

    let token = storage::sessions::create(pool, user.id).await?;
    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session::session_cookie(token))],
        Json(json!({ "message": "User registered successfully", "user": user })),
    ))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let (Some(identifier), Some(password)) = (req.username, req.password) else {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    };

    let user = storage::users::find_by_identifier(pool, &identifier)
        .await?
        .filter(|u| auth::verify_password(&u.password_hash, &password))
        .ok_or(ApiError::Unauthorized("Invalid username or password"))?;

    if !user.is_active {
        return Err(ApiError::Unauthorized("Account is deactivated"));
    }

    storage::users::touch_last_login(pool, user.id).await?;
    let token = storage::sessions::create(pool, user.id).await?;

    Ok((
        [(header::SET_COOKIE, session::session_cookie(token))],
        Json(json!({ "message": "Login successful", "user": user })),
    ))
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = session::token_from_headers(&headers) {
        let pool = state.db()?;
        storage::sessions::delete(pool, token).await?;
    }

    Ok((
        [(header::SET_COOKIE, session::expired_session_cookie())],
        Json(json!({ "message": "Logout successful" })),
    ))
}

async fn get_account(CurrentUser(user): CurrentUser) -> Json<serde_json::Value> {
    Json(json!({ "user": user }))
}

#[derive(Debug, Deserialize)]
struct UpdateAccountRequest {
    #[serde(default, deserialize_with = "double_option")]
    first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    last_name: Option<Option<String>>,
    email: Option<String>,
}

async fn update_account(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    if let Some(first_name) = req.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = req.last_name {
        user.last_name = last_name;
    }
    if let Some(email) = req.email {
        if !auth::validate_email(&email) {
            return Err(ApiError::BadRequest("Invalid email format".to_string()));
        }
        if let Some(existing) = storage::users::find_by_email(pool, &email).await? {
            if existing.id != user.id {
                return Err(ApiError::Conflict("Email already exists"));
            }
        }
        user.email = email;
    }

    let user = storage::users::update_account(pool, &user).await?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": user,
    })))
}

#[derive(Debug, Deserialize)]
struct ChangePasswordRequest {
    current_password: Option<String>,
    new_password: Option<String>,
}

async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let current = required(req.current_password, "current_password")?;
    let new = required(req.new_password, "new_password")?;

    if !auth::verify_password(&user.password_hash, &current) {
        return Err(ApiError::Unauthorized("Current password is incorrect"));
    }
    auth::validate_password(&new).map_err(|msg| ApiError::BadRequest(msg.to_string()))?;

    storage::users::set_password(pool, user.id, &auth::hash_password(&new)).await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    let users = storage::users::list(pool).await?;
    Ok(Json(users))
}

async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    let user = storage::users::find_by_id(pool, user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    if !storage::users::delete(pool, user_id).await? {
        return Err(ApiError::NotFound("User"));
    }
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_update_distinguishes_null_from_absent() {
        let req: UpdateAccountRequest =
            serde_json::from_str(r#"{"first_name": null, "email": "a@b.co"}"#).unwrap();
        // Explicit null clears the name; an omitted field leaves it untouched.
        assert_eq!(req.first_name, Some(None));
        assert_eq!(req.last_name, None);
        assert_eq!(req.email.as_deref(), Some("a@b.co"));
    }

    #[test]
    fn account_update_sets_provided_name() {
        let req: UpdateAccountRequest =
            serde_json::from_str(r#"{"first_name": "Jane"}"#).unwrap();
        assert_eq!(req.first_name, Some(Some("Jane".to_string())));
        assert_eq!(req.last_name, None);
    }
}
