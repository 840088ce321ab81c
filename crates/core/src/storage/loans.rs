use crate::domain::profile::FinancialLoan;
use anyhow::Context;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct NewLoan {
    pub user_id: i64,
    pub profile_id: i64,
    pub name: String,
    pub amount: f64,
}

pub async fn insert(pool: &PgPool, new: &NewLoan) -> anyhow::Result<FinancialLoan> {
    let mut tx = pool.begin().await.context("begin transaction failed")?;

    let next_index: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(order_index), 0) + 1 FROM financial_loans WHERE profile_id = $1",
    )
    .bind(new.profile_id)
    .fetch_one(&mut *tx)
    .await
    .context("select next loan order_index failed")?;

    let loan = sqlx::query_as::<_, FinancialLoan>(
        "INSERT INTO financial_loans (user_id, profile_id, name, amount, order_index) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(new.user_id)
    .bind(new.profile_id)
    .bind(&new.name)
    .bind(new.amount)
    .bind(next_index)
    .fetch_one(&mut *tx)
    .await
    .context("insert financial_loans failed")?;

    tx.commit().await.context("commit transaction failed")?;
    Ok(loan)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> anyhow::Result<Option<FinancialLoan>> {
    sqlx::query_as::<_, FinancialLoan>("SELECT * FROM financial_loans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("select loan by id failed")
}

pub async fn list_for_user(pool: &PgPool, user_id: i64) -> anyhow::Result<Vec<FinancialLoan>> {
    sqlx::query_as::<_, FinancialLoan>(
        "SELECT * FROM financial_loans WHERE user_id = $1 ORDER BY order_index ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("list loans for user failed")
}

pub async fn list_for_profile(pool: &PgPool, profile_id: i64) -> anyhow::Result<Vec<FinancialLoan>> {
    sqlx::query_as::<_, FinancialLoan>(
        "SELECT * FROM financial_loans WHERE profile_id = $1 ORDER BY order_index ASC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
    .context("list loans for profile failed")
}

pub async fn update(pool: &PgPool, loan: &FinancialLoan) -> anyhow::Result<FinancialLoan> {
    sqlx::query_as::<_, FinancialLoan>(
        "UPDATE financial_loans SET name = $2, amount = $3, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(loan.id)
    .bind(&loan.name)
    .bind(loan.amount)
    .fetch_one(pool)
    .await
    .context("update financial_loans failed")
}

pub async fn delete(pool: &PgPool, id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM financial_loans WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("delete loan failed")?;
    Ok(res.rows_affected() > 0)
}
