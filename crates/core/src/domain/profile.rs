use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::projection::{Aggregates, CalculationInput};

/// A user's financial profile: core inputs plus the growth assumptions the
/// calculator runs under. Owns the goal/expense/loan/scenario collections.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FinancialProfile {
    pub id: i64,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinancialProfile {
    /// Calculator inputs for this profile and its current children.
    pub fn calculation_input(
        &self,
        goals: &[FinancialGoal],
        expenses: &[FinancialExpense],
    ) -> CalculationInput {
        CalculationInput {
            age: self.age,
            current_annual_gross_income: self.current_annual_gross_income.unwrap_or(0.0),
            work_tenure_years: self.work_tenure_years.unwrap_or(0),
            total_asset_gross_market_value: self.total_asset_gross_market_value,
            total_loan_outstanding_value: self.total_loan_outstanding_value,
            income_growth_rate: self.income_growth_rate,
            asset_growth_rate: self.asset_growth_rate,
            lifespan_years: self.lifespan_years,
            goal_amounts: goals.iter().map(|g| g.amount).collect(),
            expense_amounts: expenses.iter().map(|e| e.amount).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FinancialGoal {
    pub id: i64,
    pub user_id: i64,
    pub profile_id: i64,
    pub description: String,
    pub amount: f64,
    pub order_index: i32,
    pub target_date: Option<NaiveDate>,
    pub priority: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FinancialExpense {
    pub id: i64,
    pub user_id: i64,
    pub profile_id: i64,
    pub description: String,
    pub amount: f64,
    pub order_index: i32,
    pub expense_type: String,
    pub frequency: String,
    pub is_essential: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FinancialLoan {
    pub id: i64,
    pub user_id: i64,
    pub profile_id: i64,
    pub name: String,
    pub amount: f64,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored what-if snapshot. Immutable once created; the aggregates are the
/// caller-submitted values at creation time and are never recomputed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FinancialScenario {
    pub id: i64,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full profile payload: the stored fields, the ordered child collections and
/// the computed aggregate totals, flattened into one JSON object.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: FinancialProfile,
    pub goals: Vec<FinancialGoal>,
    pub expenses: Vec<FinancialExpense>,
    pub loans: Vec<FinancialLoan>,
    #[serde(flatten)]
    pub totals: Aggregates,
}
