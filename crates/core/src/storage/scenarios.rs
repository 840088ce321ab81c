use crate::domain::profile::FinancialScenario;
use anyhow::Context;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct NewScenario {
    pub user_id: i64,
    pub profile_id: i64,
    pub scenario_name: String,
    pub description: Option<String>,
    pub surplus: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub human_capital: f64,
    pub future_expenses: f64,
    pub net_worth: f64,
    pub asset_growth_rate: f64,
    pub income_growth_rate: f64,
    pub expense_growth_rate: f64,
}

/// Scenarios are immutable snapshots: inserted once, never recomputed when the
/// underlying profile changes.
pub async fn insert(pool: &PgPool, new: &NewScenario) -> anyhow::Result<FinancialScenario> {
    sqlx::query_as::<_, FinancialScenario>(
        "INSERT INTO financial_scenarios \
         (user_id, profile_id, scenario_name, description, surplus, total_assets, \
          total_liabilities, human_capital, future_expenses, net_worth, \
          asset_growth_rate, income_growth_rate, expense_growth_rate) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING *",
    )
    .bind(new.user_id)
    .bind(new.profile_id)
    .bind(&new.scenario_name)
    .bind(&new.description)
    .bind(new.surplus)
    .bind(new.total_assets)
    .bind(new.total_liabilities)
    .bind(new.human_capital)
    .bind(new.future_expenses)
    .bind(new.net_worth)
    .bind(new.asset_growth_rate)
    .bind(new.income_growth_rate)
    .bind(new.expense_growth_rate)
    .fetch_one(pool)
    .await
    .context("insert financial_scenarios failed")
}

pub async fn list_for_user(pool: &PgPool, user_id: i64) -> anyhow::Result<Vec<FinancialScenario>> {
    sqlx::query_as::<_, FinancialScenario>(
        "SELECT * FROM financial_scenarios WHERE user_id = $1 ORDER BY id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("list scenarios for user failed")
}
