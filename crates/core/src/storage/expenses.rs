use crate::domain::profile::FinancialExpense;
use anyhow::Context;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub user_id: i64,
    pub profile_id: i64,
    pub description: String,
    pub amount: f64,
    pub expense_type: String,
    pub frequency: String,
    pub is_essential: bool,
}

/// Same append-only ordering scheme as goals: index allocated transactionally,
/// gaps after deletion are fine.
pub async fn insert(pool: &PgPool, new: &NewExpense) -> anyhow::Result<FinancialExpense> {
    let mut tx = pool.begin().await.context("begin transaction failed")?;

    let next_index: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(order_index), 0) + 1 FROM financial_expenses WHERE profile_id = $1",
    )
    .bind(new.profile_id)
    .fetch_one(&mut *tx)
    .await
    .context("select next expense order_index failed")?;

    let expense = sqlx::query_as::<_, FinancialExpense>(
        "INSERT INTO financial_expenses \
         (user_id, profile_id, description, amount, order_index, expense_type, frequency, is_essential) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING *",
    )
    .bind(new.user_id)
    .bind(new.profile_id)
    .bind(&new.description)
    .bind(new.amount)
    .bind(next_index)
    .bind(&new.expense_type)
    .bind(&new.frequency)
    .bind(new.is_essential)
    .fetch_one(&mut *tx)
    .await
    .context("insert financial_expenses failed")?;

    tx.commit().await.context("commit transaction failed")?;
    Ok(expense)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> anyhow::Result<Option<FinancialExpense>> {
    sqlx::query_as::<_, FinancialExpense>("SELECT * FROM financial_expenses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("select expense by id failed")
}

pub async fn list_for_user(pool: &PgPool, user_id: i64) -> anyhow::Result<Vec<FinancialExpense>> {
    sqlx::query_as::<_, FinancialExpense>(
        "SELECT * FROM financial_expenses WHERE user_id = $1 ORDER BY order_index ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("list expenses for user failed")
}

pub async fn list_for_profile(
    pool: &PgPool,
    profile_id: i64,
) -> anyhow::Result<Vec<FinancialExpense>> {
    sqlx::query_as::<_, FinancialExpense>(
        "SELECT * FROM financial_expenses WHERE profile_id = $1 ORDER BY order_index ASC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
    .context("list expenses for profile failed")
}

pub async fn update(pool: &PgPool, expense: &FinancialExpense) -> anyhow::Result<FinancialExpense> {
    sqlx::query_as::<_, FinancialExpense>(
        "UPDATE financial_expenses SET \
           description = $2, amount = $3, expense_type = $4, frequency = $5, is_essential = $6, \
           updated_at = NOW() \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(expense.id)
    .bind(&expense.description)
    .bind(expense.amount)
    .bind(&expense.expense_type)
    .bind(&expense.frequency)
    .bind(expense.is_essential)
    .fetch_one(pool)
    .await
    .context("update financial_expenses failed")
}

pub async fn delete(pool: &PgPool, id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM financial_expenses WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("delete expense failed")?;
    Ok(res.rows_affected() > 0)
}
