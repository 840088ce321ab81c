use serde::Serialize;

pub const RETIREMENT_AGE: i32 = 65;
pub const MAX_PROJECTION_YEARS: usize = 26;
pub const DEFAULT_LIFESPAN_YEARS: i32 = 85;
pub const DEFAULT_GROWTH_RATE: f64 = 0.06;

/// Inputs to the projection calculator. Amounts are annual currency units;
/// callers apply the API-level defaults (zero amounts, 0.06 growth, lifespan 85)
/// before building this.
#[derive(Debug, Clone, Default)]
pub struct CalculationInput {
    pub age: i32,
    pub current_annual_gross_income: f64,
    pub work_tenure_years: i32,
    pub total_asset_gross_market_value: f64,
    pub total_loan_outstanding_value: f64,
    pub income_growth_rate: f64,
    pub asset_growth_rate: f64,
    pub lifespan_years: i32,
    pub goal_amounts: Vec<f64>,
    pub expense_amounts: Vec<f64>,
}

/// Aggregate totals over the planning horizon, unrounded.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Aggregates {
    pub total_existing_assets: f64,
    pub total_human_capital: f64,
    pub total_existing_liabilities: f64,
    pub total_future_expenses: f64,
    pub total_financial_goals: f64,
    pub current_networth: f64,
    pub surplus_deficit: f64,
}

/// The same totals rounded to integer currency units, as returned by the
/// calculation endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoundedAggregates {
    pub total_existing_assets: i64,
    pub total_human_capital: i64,
    pub total_existing_liabilities: i64,
    pub total_future_expenses: i64,
    pub total_financial_goals: i64,
    pub current_networth: i64,
    pub surplus_deficit: i64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ProjectionRow {
    pub year: i32,
    pub age: i32,
    pub income: i64,
    pub assets: i64,
    pub human_capital: i64,
}

/// Years of income left before retirement, bounded by the stated tenure.
/// Never negative.
pub fn remaining_working_years(age: i32, work_tenure_years: i32) -> i32 {
    (RETIREMENT_AGE - age).min(work_tenure_years).max(0)
}

/// Years of life left under the lifespan assumption. Never negative.
pub fn remaining_life_years(age: i32, lifespan_years: i32) -> i32 {
    (lifespan_years - age).max(0)
}

pub fn aggregates(input: &CalculationInput) -> Aggregates {
    let total_existing_assets = input.total_asset_gross_market_value;
    let total_existing_liabilities = input.total_loan_outstanding_value;

    // Human capital is undiscounted: income times full stated tenure.
    let total_human_capital =
        input.current_annual_gross_income * f64::from(input.work_tenure_years);

    let life_years = f64::from(remaining_life_years(input.age, input.lifespan_years));
    let total_future_expenses: f64 = input
        .expense_amounts
        .iter()
        .map(|amount| amount * life_years)
        .sum();

    let total_financial_goals: f64 = input.goal_amounts.iter().sum();

    let current_networth = total_existing_assets - total_existing_liabilities;
    let surplus_deficit = (total_existing_assets + total_human_capital)
        - (total_existing_liabilities + total_future_expenses + total_financial_goals);

    Aggregates {
        total_existing_assets,
        total_human_capital,
        total_existing_liabilities,
        total_future_expenses,
        total_financial_goals,
        current_networth,
        surplus_deficit,
    }
}

/// Year-by-year extrapolation, at most [`MAX_PROJECTION_YEARS`] rows.
///
/// Income compounds geometrically while working years remain and drops to
/// zero afterwards; assets compound for the whole horizon. `base_year` is the
/// calendar year for offset zero, passed in so the function stays pure.
pub fn project(input: &CalculationInput, base_year: i32) -> Vec<ProjectionRow> {
    let working_years = remaining_working_years(input.age, input.work_tenure_years);
    let horizon = ((working_years + 1).max(0) as usize).min(MAX_PROJECTION_YEARS);

    let mut rows = Vec::with_capacity(horizon);
    for offset in 0..horizon as i32 {
        let still_working = offset < working_years;

        let income = if still_working {
            input.current_annual_gross_income
                * (1.0 + input.income_growth_rate).powi(offset)
        } else {
            0.0
        };
        let assets = input.total_asset_gross_market_value
            * (1.0 + input.asset_growth_rate).powi(offset);
        let human_capital = if still_working {
            income * f64::from((working_years - offset).max(0))
        } else {
            0.0
        };

        rows.push(ProjectionRow {
            year: base_year + offset,
            age: input.age + offset,
            income: income.round() as i64,
            assets: assets.round() as i64,
            human_capital: human_capital.round() as i64,
        });
    }
    rows
}

impl Aggregates {
    pub fn rounded(&self) -> RoundedAggregates {
        RoundedAggregates {
            total_existing_assets: self.total_existing_assets.round() as i64,
            total_human_capital: self.total_human_capital.round() as i64,
            total_existing_liabilities: self.total_existing_liabilities.round() as i64,
            total_future_expenses: self.total_future_expenses.round() as i64,
            total_financial_goals: self.total_financial_goals.round() as i64,
            current_networth: self.current_networth.round() as i64,
            surplus_deficit: self.surplus_deficit.round() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worked_example() -> CalculationInput {
        CalculationInput {
            age: 30,
            current_annual_gross_income: 100_000.0,
            work_tenure_years: 35,
            total_asset_gross_market_value: 50_000.0,
            total_loan_outstanding_value: 20_000.0,
            income_growth_rate: DEFAULT_GROWTH_RATE,
            asset_growth_rate: DEFAULT_GROWTH_RATE,
            lifespan_years: DEFAULT_LIFESPAN_YEARS,
            goal_amounts: vec![],
            expense_amounts: vec![5_000.0],
        }
    }

    #[test]
    fn worked_example_aggregates() {
        let agg = aggregates(&worked_example());
        assert_eq!(agg.total_human_capital, 3_500_000.0);
        // 5000 per year over 55 remaining life years.
        assert_eq!(agg.total_future_expenses, 275_000.0);
        assert_eq!(agg.current_networth, 30_000.0);
    }

    #[test]
    fn human_capital_is_income_times_tenure() {
        for (income, tenure) in [(0.0, 0), (50_000.0, 10), (123_456.0, 42)] {
            let input = CalculationInput {
                current_annual_gross_income: income,
                work_tenure_years: tenure,
                ..Default::default()
            };
            assert_eq!(
                aggregates(&input).total_human_capital,
                income * f64::from(tenure)
            );
        }
    }

    #[test]
    fn surplus_deficit_identity_holds_exactly() {
        let agg = aggregates(&worked_example());
        let expected = (agg.total_existing_assets + agg.total_human_capital)
            - (agg.total_existing_liabilities
                + agg.total_future_expenses
                + agg.total_financial_goals);
        assert_eq!(agg.surplus_deficit, expected);
    }

    #[test]
    fn remaining_years_clamp_to_zero() {
        // Older than the lifespan assumption.
        assert_eq!(remaining_life_years(90, 85), 0);
        // Past retirement age.
        assert_eq!(remaining_working_years(70, 20), 0);
        // Tenure shorter than the span to retirement.
        assert_eq!(remaining_working_years(30, 10), 10);
        // Retirement age binds before tenure runs out.
        assert_eq!(remaining_working_years(60, 35), 5);
    }

    #[test]
    fn projection_is_bounded_and_strictly_increasing() {
        let mut input = worked_example();
        input.age = 25;
        input.work_tenure_years = 40;
        let rows = project(&input, 2025);
        assert!(rows.len() <= MAX_PROJECTION_YEARS);
        assert_eq!(rows.len(), MAX_PROJECTION_YEARS);
        for pair in rows.windows(2) {
            assert_eq!(pair[1].year, pair[0].year + 1);
            assert_eq!(pair[1].age, pair[0].age + 1);
        }
    }

    #[test]
    fn income_drops_to_zero_after_tenure_ends() {
        let input = CalculationInput {
            age: 55,
            current_annual_gross_income: 80_000.0,
            work_tenure_years: 5,
            total_asset_gross_market_value: 10_000.0,
            income_growth_rate: 0.05,
            asset_growth_rate: 0.05,
            lifespan_years: 85,
            ..Default::default()
        };
        let rows = project(&input, 2025);
        // 5 working years plus the first retired year.
        assert_eq!(rows.len(), 6);
        assert!(rows[..5].iter().all(|r| r.income > 0));
        assert_eq!(rows[5].income, 0);
        assert_eq!(rows[5].human_capital, 0);
        // Assets keep compounding regardless.
        assert!(rows[5].assets > rows[4].assets);
    }

    #[test]
    fn first_row_is_uncompounded() {
        let rows = project(&worked_example(), 2025);
        assert_eq!(rows[0].year, 2025);
        assert_eq!(rows[0].age, 30);
        assert_eq!(rows[0].income, 100_000);
        assert_eq!(rows[0].assets, 50_000);
    }

    #[test]
    fn retired_input_yields_single_zero_income_row() {
        let input = CalculationInput {
            age: 70,
            current_annual_gross_income: 40_000.0,
            work_tenure_years: 30,
            total_asset_gross_market_value: 200_000.0,
            asset_growth_rate: 0.06,
            lifespan_years: 85,
            ..Default::default()
        };
        let rows = project(&input, 2025);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].income, 0);
        assert_eq!(rows[0].assets, 200_000);
    }

    #[test]
    fn rounding_to_integer_currency_units() {
        let agg = Aggregates {
            total_existing_assets: 100.4,
            total_human_capital: 100.5,
            total_existing_liabilities: 0.0,
            total_future_expenses: 99.99,
            total_financial_goals: 0.0,
            current_networth: 100.4,
            surplus_deficit: 100.91,
        };
        let rounded = agg.rounded();
        assert_eq!(rounded.total_existing_assets, 100);
        assert_eq!(rounded.total_human_capital, 101);
        assert_eq!(rounded.total_future_expenses, 100);
        assert_eq!(rounded.surplus_deficit, 101);
    }
}
