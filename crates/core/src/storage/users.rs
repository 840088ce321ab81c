use crate::domain::user::{NewUser, User};
use anyhow::Context;
use sqlx::PgPool;

pub async fn insert(pool: &PgPool, new: &NewUser) -> anyhow::Result<User> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password_hash, first_name, last_name, oauth_provider, oauth_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING *",
    )
    .bind(&new.username)
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.oauth_provider)
    .bind(&new.oauth_id)
    .fetch_one(pool)
    .await
    .context("insert users failed")
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("select user by id failed")
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("select user by username failed")
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("select user by email failed")
}

/// Login lookup: the identifier may be a username or an email address.
pub async fn find_by_identifier(pool: &PgPool, identifier: &str) -> anyhow::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1 OR email = $1")
        .bind(identifier)
        .fetch_optional(pool)
        .await
        .context("select user by identifier failed")
}

pub async fn list(pool: &PgPool) -> anyhow::Result<Vec<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id ASC")
        .fetch_all(pool)
        .await
        .context("list users failed")
}

/// Persists the account fields a user may edit about themselves.
pub async fn update_account(pool: &PgPool, user: &User) -> anyhow::Result<User> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET first_name = $2, last_name = $3, email = $4 \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(user.id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .fetch_one(pool)
    .await
    .context("update users failed")
}

pub async fn set_password(pool: &PgPool, id: i64, password_hash: &str) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await
        .context("update password failed")?;
    Ok(())
}

pub async fn touch_last_login(pool: &PgPool, id: i64) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("update last_login failed")?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("delete user failed")?;
    Ok(res.rows_affected() > 0)
}
