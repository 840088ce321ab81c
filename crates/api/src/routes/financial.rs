use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use lifesheet_core::domain::projection::{
    self, CalculationInput, DEFAULT_GROWTH_RATE, DEFAULT_LIFESPAN_YEARS,
};
use lifesheet_core::storage::{
    self,
    expenses::NewExpense,
    goals::NewGoal,
    loans::NewLoan,
    profiles::NewProfile,
    scenarios::NewScenario,
};

use super::double_option;
use crate::error::{required, ApiError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", post(create_profile))
        .route("/profile/:id", get(get_profile).put(update_profile))
        .route("/goals", post(create_goal))
        .route("/goals/:id", get(list_goals).put(update_goal).delete(delete_goal))
        .route("/expenses", post(create_expense))
        .route(
            "/expenses/:id",
            get(list_expenses).put(update_expense).delete(delete_expense),
        )
        .route("/loans", post(create_loan))
        .route("/loans/:id", get(list_loans).put(update_loan).delete(delete_loan))
        .route("/scenarios", post(create_scenario))
        .route("/scenarios/:id", get(list_scenarios))
        .route("/calculate", post(calculate))
}

// --- Profile ---

#[derive(Debug, Deserialize)]
struct CreateProfileRequest {
    user_id: Option<i64>,
    age: Option<i32>,
    current_annual_gross_income: Option<f64>,
    work_tenure_years: Option<i32>,
    total_asset_gross_market_value: Option<f64>,
    total_loan_outstanding_value: Option<f64>,
    loan_tenure_years: Option<i32>,
    lifespan_years: Option<i32>,
    income_growth_rate: Option<f64>,
    asset_growth_rate: Option<f64>,
}

async fn create_profile(
    State(state): State<AppState>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let user_id = required(req.user_id, "user_id")?;
    let age = required(req.age, "age")?;

    if storage::users::find_by_id(pool, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User"));
    }

    let profile = storage::profiles::insert(
        pool,
        &NewProfile {
            user_id,
            age,
            current_annual_gross_income: req.current_annual_gross_income,
            work_tenure_years: req.work_tenure_years,
            total_asset_gross_market_value: req.total_asset_gross_market_value.unwrap_or(0.0),
            total_loan_outstanding_value: req.total_loan_outstanding_value.unwrap_or(0.0),
            loan_tenure_years: req.loan_tenure_years,
            lifespan_years: req.lifespan_years.unwrap_or(DEFAULT_LIFESPAN_YEARS),
            income_growth_rate: req.income_growth_rate.unwrap_or(DEFAULT_GROWTH_RATE),
            asset_growth_rate: req.asset_growth_rate.unwrap_or(DEFAULT_GROWTH_RATE),
        },
    )
    .await?;

    let view = storage::profiles::fetch_view(pool, profile).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Financial profile created successfully",
            "profile": view,
        })),
    ))
}

/// The path id is the owning user's id here, matching the client contract.
async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    let profile = storage::profiles::find_by_user(pool, user_id)
        .await?
        .ok_or(ApiError::NotFound("Financial profile"))?;
    let view = storage::profiles::fetch_view(pool, profile).await?;
    Ok(Json(json!({ "profile": view })))
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    age: Option<i32>,
    current_annual_gross_income: Option<f64>,
    work_tenure_years: Option<i32>,
    total_asset_gross_market_value: Option<f64>,
    total_loan_outstanding_value: Option<f64>,
    loan_tenure_years: Option<i32>,
    lifespan_years: Option<i32>,
    income_growth_rate: Option<f64>,
    asset_growth_rate: Option<f64>,
}

/// The path id is the profile id (not the user id, unlike GET).
async fn update_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let mut profile = storage::profiles::find_by_id(pool, profile_id)
        .await?
        .ok_or(ApiError::NotFound("Financial profile"))?;

    if let Some(age) = req.age {
        profile.age = age;
    }
    if let Some(income) = req.current_annual_gross_income {
        profile.current_annual_gross_income = Some(income);
    }
    if let Some(tenure) = req.work_tenure_years {
        profile.work_tenure_years = Some(tenure);
    }
    if let Some(assets) = req.total_asset_gross_market_value {
        profile.total_asset_gross_market_value = assets;
    }
    if let Some(loans) = req.total_loan_outstanding_value {
        profile.total_loan_outstanding_value = loans;
    }
    if let Some(loan_tenure) = req.loan_tenure_years {
        profile.loan_tenure_years = Some(loan_tenure);
    }
    if let Some(lifespan) = req.lifespan_years {
        profile.lifespan_years = lifespan;
    }
    if let Some(rate) = req.income_growth_rate {
        profile.income_growth_rate = rate;
    }
    if let Some(rate) = req.asset_growth_rate {
        profile.asset_growth_rate = rate;
    }

    let profile = storage::profiles::update(pool, &profile).await?;
    let view = storage::profiles::fetch_view(pool, profile).await?;

    Ok(Json(json!({
        "message": "Financial profile updated successfully",
        "profile": view,
    })))
}

// --- Goals ---

#[derive(Debug, Deserialize)]
struct CreateGoalRequest {
    user_id: Option<i64>,
    profile_id: Option<i64>,
    description: Option<String>,
    amount: Option<f64>,
    target_date: Option<NaiveDate>,
    priority: Option<String>,
    status: Option<String>,
}

async fn create_goal(
    State(state): State<AppState>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let goal = storage::goals::insert(
        pool,
        &NewGoal {
            user_id: required(req.user_id, "user_id")?,
            profile_id: required(req.profile_id, "profile_id")?,
            description: required(req.description, "description")?,
            amount: required(req.amount, "amount")?,
            target_date: req.target_date,
            priority: req.priority.unwrap_or_else(|| "medium".to_string()),
            status: req.status.unwrap_or_else(|| "active".to_string()),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Financial goal created successfully",
            "goal": goal,
        })),
    ))
}

async fn list_goals(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    let goals = storage::goals::list_for_user(pool, user_id).await?;
    Ok(Json(json!({ "goals": goals })))
}

#[derive(Debug, Deserialize)]
struct UpdateGoalRequest {
    description: Option<String>,
    amount: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    target_date: Option<Option<NaiveDate>>,
    priority: Option<String>,
    status: Option<String>,
}

async fn update_goal(
    State(state): State<AppState>,
    Path(goal_id): Path<i64>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let mut goal = storage::goals::find_by_id(pool, goal_id)
        .await?
        .ok_or(ApiError::NotFound("Financial goal"))?;

    if let Some(description) = req.description {
        goal.description = description;
    }
    if let Some(amount) = req.amount {
        goal.amount = amount;
    }
    if let Some(target_date) = req.target_date {
        goal.target_date = target_date;
    }
    if let Some(priority) = req.priority {
        goal.priority = priority;
    }
    if let Some(status) = req.status {
        goal.status = status;
    }

    let goal = storage::goals::update(pool, &goal).await?;

    Ok(Json(json!({
        "message": "Financial goal updated successfully",
        "goal": goal,
    })))
}

async fn delete_goal(
    State(state): State<AppState>,
    Path(goal_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    if !storage::goals::delete(pool, goal_id).await? {
        return Err(ApiError::NotFound("Financial goal"));
    }
    Ok(Json(json!({ "message": "Financial goal deleted successfully" })))
}

// --- Expenses ---

#[derive(Debug, Deserialize)]
struct CreateExpenseRequest {
    user_id: Option<i64>,
    profile_id: Option<i64>,
    description: Option<String>,
    amount: Option<f64>,
    expense_type: Option<String>,
    frequency: Option<String>,
    is_essential: Option<bool>,
}

async fn create_expense(
    State(state): State<AppState>,
    Json(req): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let expense = storage::expenses::insert(
        pool,
        &NewExpense {
            user_id: required(req.user_id, "user_id")?,
            profile_id: required(req.profile_id, "profile_id")?,
            description: required(req.description, "description")?,
            amount: required(req.amount, "amount")?,
            expense_type: req.expense_type.unwrap_or_else(|| "general".to_string()),
            frequency: req.frequency.unwrap_or_else(|| "annual".to_string()),
            is_essential: req.is_essential.unwrap_or(true),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Financial expense created successfully",
            "expense": expense,
        })),
    ))
}

async fn list_expenses(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    let expenses = storage::expenses::list_for_user(pool, user_id).await?;
    Ok(Json(json!({ "expenses": expenses })))
}

#[derive(Debug, Deserialize)]
struct UpdateExpenseRequest {
    description: Option<String>,
    amount: Option<f64>,
    expense_type: Option<String>,
    frequency: Option<String>,
    is_essential: Option<bool>,
}

async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<i64>,
    Json(req): Json<UpdateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let mut expense = storage::expenses::find_by_id(pool, expense_id)
        .await?
        .ok_or(ApiError::NotFound("Financial expense"))?;

    if let Some(description) = req.description {
        expense.description = description;
    }
    if let Some(amount) = req.amount {
        expense.amount = amount;
    }
    if let Some(expense_type) = req.expense_type {
        expense.expense_type = expense_type;
    }
    if let Some(frequency) = req.frequency {
        expense.frequency = frequency;
    }
    if let Some(is_essential) = req.is_essential {
        expense.is_essential = is_essential;
    }

    let expense = storage::expenses::update(pool, &expense).await?;

    Ok(Json(json!({
        "message": "Financial expense updated successfully",
        "expense": expense,
    })))
}

async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    if !storage::expenses::delete(pool, expense_id).await? {
        return Err(ApiError::NotFound("Financial expense"));
    }
    Ok(Json(json!({ "message": "Financial expense deleted successfully" })))
}

// --- Loans ---

#[derive(Debug, Deserialize)]
struct CreateLoanRequest {
    user_id: Option<i64>,
    profile_id: Option<i64>,
    name: Option<String>,
    amount: Option<f64>,
}

async fn create_loan(
    State(state): State<AppState>,
    Json(req): Json<CreateLoanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let loan = storage::loans::insert(
        pool,
        &NewLoan {
            user_id: required(req.user_id, "user_id")?,
            profile_id: required(req.profile_id, "profile_id")?,
            name: required(req.name, "name")?,
            amount: required(req.amount, "amount")?,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Financial loan created successfully",
            "loan": loan,
        })),
    ))
}

async fn list_loans(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    let loans = storage::loans::list_for_user(pool, user_id).await?;
    Ok(Json(json!({ "loans": loans })))
}

#[derive(Debug, Deserialize)]
struct UpdateLoanRequest {
    name: Option<String>,
    amount: Option<f64>,
}

async fn update_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<i64>,
    Json(req): Json<UpdateLoanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let mut loan = storage::loans::find_by_id(pool, loan_id)
        .await?
        .ok_or(ApiError::NotFound("Financial loan"))?;

    if let Some(name) = req.name {
        loan.name = name;
    }
    if let Some(amount) = req.amount {
        loan.amount = amount;
    }

    let loan = storage::loans::update(pool, &loan).await?;

    Ok(Json(json!({
        "message": "Financial loan updated successfully",
        "loan": loan,
    })))
}

async fn delete_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    if !storage::loans::delete(pool, loan_id).await? {
        return Err(ApiError::NotFound("Financial loan"));
    }
    Ok(Json(json!({ "message": "Financial loan deleted successfully" })))
}

// --- Scenarios ---

#[derive(Debug, Deserialize)]
struct CreateScenarioRequest {
    user_id: Option<i64>,
    profile_id: Option<i64>,
    scenario_name: Option<String>,
    description: Option<String>,
    surplus: Option<f64>,
    total_assets: Option<f64>,
    total_liabilities: Option<f64>,
    human_capital: Option<f64>,
    future_expenses: Option<f64>,
    net_worth: Option<f64>,
    asset_growth_rate: Option<f64>,
    income_growth_rate: Option<f64>,
    expense_growth_rate: Option<f64>,
}

async fn create_scenario(
    State(state): State<AppState>,
    Json(req): Json<CreateScenarioRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;

    let scenario = storage::scenarios::insert(
        pool,
        &NewScenario {
            user_id: required(req.user_id, "user_id")?,
            profile_id: required(req.profile_id, "profile_id")?,
            scenario_name: required(req.scenario_name, "scenario_name")?,
            description: req.description,
            surplus: req.surplus.unwrap_or(0.0),
            total_assets: req.total_assets.unwrap_or(0.0),
            total_liabilities: req.total_liabilities.unwrap_or(0.0),
            human_capital: req.human_capital.unwrap_or(0.0),
            future_expenses: req.future_expenses.unwrap_or(0.0),
            net_worth: req.net_worth.unwrap_or(0.0),
            asset_growth_rate: req.asset_growth_rate.unwrap_or(DEFAULT_GROWTH_RATE),
            income_growth_rate: req.income_growth_rate.unwrap_or(DEFAULT_GROWTH_RATE),
            expense_growth_rate: req.expense_growth_rate.unwrap_or(DEFAULT_GROWTH_RATE),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Financial scenario created successfully",
            "scenario": scenario,
        })),
    ))
}

async fn list_scenarios(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = state.db()?;
    let scenarios = storage::scenarios::list_for_user(pool, user_id).await?;
    Ok(Json(json!({ "scenarios": scenarios })))
}

// --- Calculation ---

#[derive(Debug, Deserialize)]
struct AmountEntry {
    #[serde(default)]
    amount: f64,
}

#[derive(Debug, Default, Deserialize)]
struct CalculateRequest {
    age: Option<i32>,
    current_annual_gross_income: Option<f64>,
    work_tenure_years: Option<i32>,
    total_asset_gross_market_value: Option<f64>,
    total_loan_outstanding_value: Option<f64>,
    income_growth_rate: Option<f64>,
    asset_growth_rate: Option<f64>,
    lifespan_years: Option<i32>,
    #[serde(default)]
    goals: Vec<AmountEntry>,
    #[serde(default)]
    expenses: Vec<AmountEntry>,
}

/// Ad-hoc projection over the submitted inputs; nothing is persisted.
async fn calculate(Json(req): Json<CalculateRequest>) -> Json<serde_json::Value> {
    let input = CalculationInput {
        age: req.age.unwrap_or(30),
        current_annual_gross_income: req.current_annual_gross_income.unwrap_or(0.0),
        work_tenure_years: req.work_tenure_years.unwrap_or(0),
        total_asset_gross_market_value: req.total_asset_gross_market_value.unwrap_or(0.0),
        total_loan_outstanding_value: req.total_loan_outstanding_value.unwrap_or(0.0),
        income_growth_rate: req.income_growth_rate.unwrap_or(DEFAULT_GROWTH_RATE),
        asset_growth_rate: req.asset_growth_rate.unwrap_or(DEFAULT_GROWTH_RATE),
        lifespan_years: req.lifespan_years.unwrap_or(DEFAULT_LIFESPAN_YEARS),
        goal_amounts: req.goals.iter().map(|g| g.amount).collect(),
        expense_amounts: req.expenses.iter().map(|e| e.amount).collect(),
    };

    let calculations = projection::aggregates(&input).rounded();
    let projections = projection::project(&input, Utc::now().year());

    Json(json!({
        "calculations": calculations,
        "projections": projections,
    }))
}
