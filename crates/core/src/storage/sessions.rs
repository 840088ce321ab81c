use crate::domain::user::User;
use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

/// Opens a session for the user and returns the cookie token.
pub async fn create(pool: &PgPool, user_id: i64) -> anyhow::Result<Uuid> {
    let token = Uuid::new_v4();
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
        .bind(token)
        .bind(user_id)
        .execute(pool)
        .await
        .context("insert session failed")?;
    Ok(token)
}

/// Resolves a session token to its (active) user, if any.
pub async fn find_user(pool: &PgPool, token: Uuid) -> anyhow::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "SELECT u.* FROM users u \
         JOIN sessions s ON s.user_id = u.id \
         WHERE s.token = $1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
    .context("select session user failed")
}

pub async fn delete(pool: &PgPool, token: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await
        .context("delete session failed")?;
    Ok(())
}
