use crate::domain::profile::{FinancialProfile, ProfileView};
use crate::domain::projection;
use crate::storage::{expenses, goals, loans};
use anyhow::Context;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: i64,
    pub age: i32,
    pub current_annual_gross_income: Option<f64>,
    pub work_tenure_years: Option<i32>,
    pub total_asset_gross_market_value: f64,
    pub total_loan_outstanding_value: f64,
    pub loan_tenure_years: Option<i32>,
    pub lifespan_years: i32,
    pub income_growth_rate: f64,
    pub asset_growth_rate: f64,
}

pub async fn insert(pool: &PgPool, new: &NewProfile) -> anyhow::Result<FinancialProfile> {
    sqlx::query_as::<_, FinancialProfile>(
        "INSERT INTO financial_profiles \
         (user_id, age, current_annual_gross_income, work_tenure_years, \
          total_asset_gross_market_value, total_loan_outstanding_value, loan_tenure_years, \
          lifespan_years, income_growth_rate, asset_growth_rate) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING *",
    )
    .bind(new.user_id)
    .bind(new.age)
    .bind(new.current_annual_gross_income)
    .bind(new.work_tenure_years)
    .bind(new.total_asset_gross_market_value)
    .bind(new.total_loan_outstanding_value)
    .bind(new.loan_tenure_years)
    .bind(new.lifespan_years)
    .bind(new.income_growth_rate)
    .bind(new.asset_growth_rate)
    .fetch_one(pool)
    .await
    .context("insert financial_profiles failed")
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> anyhow::Result<Option<FinancialProfile>> {
    sqlx::query_as::<_, FinancialProfile>("SELECT * FROM financial_profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("select profile by id failed")
}

/// A user's profile. The model is one profile per user; if older rows exist
/// the earliest one wins.
pub async fn find_by_user(pool: &PgPool, user_id: i64) -> anyhow::Result<Option<FinancialProfile>> {
    sqlx::query_as::<_, FinancialProfile>(
        "SELECT * FROM financial_profiles WHERE user_id = $1 ORDER BY id ASC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("select profile by user failed")
}

pub async fn update(pool: &PgPool, profile: &FinancialProfile) -> anyhow::Result<FinancialProfile> {
    sqlx::query_as::<_, FinancialProfile>(
        "UPDATE financial_profiles SET \
           age = $2, \
           current_annual_gross_income = $3, \
           work_tenure_years = $4, \
           total_asset_gross_market_value = $5, \
           total_loan_outstanding_value = $6, \
           loan_tenure_years = $7, \
           lifespan_years = $8, \
           income_growth_rate = $9, \
           asset_growth_rate = $10, \
           updated_at = NOW() \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(profile.id)
    .bind(profile.age)
    .bind(profile.current_annual_gross_income)
    .bind(profile.work_tenure_years)
    .bind(profile.total_asset_gross_market_value)
    .bind(profile.total_loan_outstanding_value)
    .bind(profile.loan_tenure_years)
    .bind(profile.lifespan_years)
    .bind(profile.income_growth_rate)
    .bind(profile.asset_growth_rate)
    .fetch_one(pool)
    .await
    .context("update financial_profiles failed")
}

/// Assembles the full profile payload: ordered children plus computed totals.
pub async fn fetch_view(pool: &PgPool, profile: FinancialProfile) -> anyhow::Result<ProfileView> {
    let goals = goals::list_for_profile(pool, profile.id).await?;
    let expenses = expenses::list_for_profile(pool, profile.id).await?;
    let loans = loans::list_for_profile(pool, profile.id).await?;

    let totals = projection::aggregates(&profile.calculation_input(&goals, &expenses));

    Ok(ProfileView {
        profile,
        goals,
        expenses,
        loans,
        totals,
    })
}
