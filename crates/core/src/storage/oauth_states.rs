use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

/// Allocates a fresh anti-forgery state for an OAuth redirect.
pub async fn create(pool: &PgPool) -> anyhow::Result<Uuid> {
    let state = Uuid::new_v4();
    sqlx::query("INSERT INTO oauth_states (state) VALUES ($1)")
        .bind(state)
        .execute(pool)
        .await
        .context("insert oauth state failed")?;
    Ok(state)
}

/// One-shot verification: deletes the state row and reports whether it existed.
pub async fn consume(pool: &PgPool, state: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM oauth_states WHERE state = $1")
        .bind(state)
        .execute(pool)
        .await
        .context("consume oauth state failed")?;
    Ok(res.rows_affected() > 0)
}
