use anyhow::Context;

pub mod expenses;
pub mod goals;
pub mod loans;
pub mod oauth_states;
pub mod profiles;
pub mod scenarios;
pub mod sessions;
pub mod users;

pub async fn migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("sqlx migrations failed")?;
    Ok(())
}
