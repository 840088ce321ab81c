use crate::domain::profile::FinancialGoal;
use anyhow::Context;
use chrono::NaiveDate;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub user_id: i64,
    pub profile_id: i64,
    pub description: String,
    pub amount: f64,
    pub target_date: Option<NaiveDate>,
    pub priority: String,
    pub status: String,
}

/// Appends a goal to the profile. The order index is allocated inside the
/// transaction so concurrent inserts cannot collide; deletes leave gaps.
pub async fn insert(pool: &PgPool, new: &NewGoal) -> anyhow::Result<FinancialGoal> {
    let mut tx = pool.begin().await.context("begin transaction failed")?;

    let next_index: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(order_index), 0) + 1 FROM financial_goals WHERE profile_id = $1",
    )
    .bind(new.profile_id)
    .fetch_one(&mut *tx)
    .await
    .context("select next goal order_index failed")?;

    let goal = sqlx::query_as::<_, FinancialGoal>(
        "INSERT INTO financial_goals \
         (user_id, profile_id, description, amount, order_index, target_date, priority, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING *",
    )
    .bind(new.user_id)
    .bind(new.profile_id)
    .bind(&new.description)
    .bind(new.amount)
    .bind(next_index)
    .bind(new.target_date)
    .bind(&new.priority)
    .bind(&new.status)
    .fetch_one(&mut *tx)
    .await
    .context("insert financial_goals failed")?;

    tx.commit().await.context("commit transaction failed")?;
    Ok(goal)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> anyhow::Result<Option<FinancialGoal>> {
    sqlx::query_as::<_, FinancialGoal>("SELECT * FROM financial_goals WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("select goal by id failed")
}

pub async fn list_for_user(pool: &PgPool, user_id: i64) -> anyhow::Result<Vec<FinancialGoal>> {
    sqlx::query_as::<_, FinancialGoal>(
        "SELECT * FROM financial_goals WHERE user_id = $1 ORDER BY order_index ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("list goals for user failed")
}

pub async fn list_for_profile(pool: &PgPool, profile_id: i64) -> anyhow::Result<Vec<FinancialGoal>> {
    sqlx::query_as::<_, FinancialGoal>(
        "SELECT * FROM financial_goals WHERE profile_id = $1 ORDER BY order_index ASC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
    .context("list goals for profile failed")
}

pub async fn update(pool: &PgPool, goal: &FinancialGoal) -> anyhow::Result<FinancialGoal> {
    sqlx::query_as::<_, FinancialGoal>(
        "UPDATE financial_goals SET \
           description = $2, amount = $3, target_date = $4, priority = $5, status = $6, \
           updated_at = NOW() \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(goal.id)
    .bind(&goal.description)
    .bind(goal.amount)
    .bind(goal.target_date)
    .bind(&goal.priority)
    .bind(&goal.status)
    .fetch_one(pool)
    .await
    .context("update financial_goals failed")
}

pub async fn delete(pool: &PgPool, id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM financial_goals WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("delete goal failed")?;
    Ok(res.rows_affected() > 0)
}
