//! Core projection engine for month-by-month account projections

use super::results::{MonthResult, ProjectionResult};
use super::state::ProjectionState;
use crate::error::{ProjectionError, Result};
use crate::funds::FundState;
use crate::money::Money;
use crate::period::PeriodConfig;
use crate::settings::GlobalSettings;
use chrono::{Months, NaiveDate};

/// Main projection engine
///
/// Holds no state between runs: every call to [`ProjectionEngine::project`]
/// starts from the given funds and returns a fresh result.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    settings: GlobalSettings,
    /// Date of month 1; month N is dated N-1 calendar months later
    start_date: NaiveDate,
}

impl ProjectionEngine {
    /// Create a new projection engine with given settings and start date
    pub fn new(settings: GlobalSettings, start_date: NaiveDate) -> Self {
        Self { settings, start_date }
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Run every period in order, starting from `initial`
    ///
    /// All inputs are validated before the first month is simulated, so an
    /// error never comes with partial output.
    pub fn project(&self, configs: &[PeriodConfig], initial: &FundState) -> Result<ProjectionResult> {
        self.settings.validate()?;
        initial.validate()?;
        for config in configs {
            config.validate()?;
        }

        let mut result = ProjectionResult::new();
        let mut state = ProjectionState::from_funds(initial);

        for config in configs {
            log::debug!(
                "period {} ({}) starts at month {} for {} months",
                config.position,
                config.id,
                state.month + 1,
                config.duration_months
            );

            for i in 0..config.duration_months {
                let row = self.calculate_month(config, i, &mut state)?;
                result.add_row(row);
            }
        }

        if let Some(last) = result.last() {
            log::info!(
                "projected {} months over {} periods: {} units, cash {}, savings {}, value {}",
                result.len(),
                configs.len(),
                last.ending_units,
                last.ending_cash,
                last.ending_savings,
                last.total_value()
            );
        }

        Ok(result)
    }

    /// Calculate a single month; `i` is the month's index within its period
    fn calculate_month(
        &self,
        config: &PeriodConfig,
        i: u32,
        state: &mut ProjectionState,
    ) -> Result<MonthResult> {
        let month = state.advance_month();
        let unit_cost = self.settings.unit_cost;
        let overflow = || ProjectionError::Overflow { month };

        // Interest on the units held entering the month
        let income_amount = self.settings.interest_on(state.units).ok_or_else(overflow)?;
        let contribution = config.contribution_for(i);

        // Debt service comes out of income first, capped at the outstanding debt
        let debt_paid = if config.debt_percent > 0.0 {
            income_amount
                .checked_percent_of(config.debt_percent)
                .ok_or_else(overflow)?
                .min(state.debt)
        } else {
            Money::ZERO
        };
        let income_after_debt = income_amount.checked_sub(debt_paid).ok_or_else(overflow)?;

        // Savings only ever take a share of income, never of contributions
        let savings_added = if config.savings_percent > 0.0 {
            income_after_debt
                .checked_percent_of(config.savings_percent)
                .ok_or_else(overflow)?
        } else {
            Money::ZERO
        };

        let starting = state.balances();

        let cash = state
            .cash
            .checked_add(income_after_debt)
            .and_then(|c| c.checked_add(contribution))
            .and_then(|c| c.checked_sub(savings_added))
            .ok_or_else(overflow)?;

        // Buy as many whole units as cash allows; the remainder carries forward
        let units_purchased = cash.whole_multiples_of(unit_cost);
        let units_cost = unit_cost.checked_scale(units_purchased).ok_or_else(overflow)?;

        state.cash = cash.checked_sub(units_cost).ok_or_else(overflow)?;
        state.units = state.units.checked_add(units_purchased).ok_or_else(overflow)?;
        state.debt = state.debt.checked_sub(debt_paid).ok_or_else(overflow)?;
        state.savings = state.savings.checked_add(savings_added).ok_or_else(overflow)?;

        // Every row must report a total value that fits
        unit_cost
            .checked_scale(state.units)
            .and_then(|v| v.checked_add(state.cash))
            .and_then(|v| v.checked_add(state.savings))
            .ok_or_else(overflow)?;

        if state.cash.is_negative() {
            log::warn!("month {} ends with negative cash {}", month, state.cash);
        }

        Ok(MonthResult {
            config_id: config.id,
            month,
            date: self.month_date(month)?,
            unit_cost,
            starting_cash: starting.cash,
            starting_units: starting.units,
            starting_savings: starting.savings,
            starting_debt: starting.debt,
            income_amount,
            contribution,
            debt_paid,
            savings_added,
            units_purchased,
            units_cost,
            ending_cash: state.cash,
            ending_units: state.units,
            ending_savings: state.savings,
            ending_debt: state.debt,
        })
    }

    /// Calendar date of a 1-indexed month
    fn month_date(&self, month: u32) -> Result<NaiveDate> {
        self.start_date
            .checked_add_months(Months::new(month - 1))
            .ok_or_else(|| {
                ProjectionError::InvalidSettings(format!(
                    "month {} from {} is outside the supported date range",
                    month, self.start_date
                ))
            })
    }
}

/// Run a projection and return its month rows
pub fn run_projection(
    configs: &[PeriodConfig],
    initial: &FundState,
    settings: &GlobalSettings,
    start_date: NaiveDate,
) -> Result<Vec<MonthResult>> {
    let engine = ProjectionEngine::new(*settings, start_date);
    Ok(engine.project(configs, initial)?.into_results())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{months_before, PeriodDraft};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn dollars(amount: f64) -> Money {
        Money::from_major(amount)
    }

    fn period(position: u32, draft: PeriodDraft) -> PeriodConfig {
        PeriodConfig::new(position, draft)
    }

    fn simple_settings() -> GlobalSettings {
        GlobalSettings::new(dollars(100.0), 10.0)
    }

    fn one_unit() -> FundState {
        FundState::new(Money::ZERO, 1, Money::ZERO, Money::ZERO)
    }

    fn mixed_periods() -> Vec<PeriodConfig> {
        vec![
            period(1, PeriodDraft {
                savings_percent: 20.0,
                debt_percent: 50.0,
                monthly_contribution: dollars(250.0),
                initial_contribution: dollars(2_000.0),
                duration_months: 24,
            }),
            period(2, PeriodDraft {
                savings_percent: 0.0,
                debt_percent: 0.0,
                monthly_contribution: Money::ZERO,
                initial_contribution: Money::ZERO,
                duration_months: 18,
            }),
            period(3, PeriodDraft {
                savings_percent: 65.0,
                debt_percent: 100.0,
                monthly_contribution: dollars(33.33),
                initial_contribution: Money::ZERO,
                duration_months: 60,
            }),
        ]
    }

    fn mixed_funds() -> FundState {
        FundState::new(dollars(77.77), 2, dollars(10.0), dollars(1_500.0))
    }

    #[test]
    fn test_single_month_scenario() {
        let configs = vec![period(1, PeriodDraft {
            monthly_contribution: dollars(100.0),
            duration_months: 1,
            ..Default::default()
        })];

        let rows = run_projection(&configs, &one_unit(), &simple_settings(), start()).unwrap();
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.month, 1);
        assert_eq!(row.date, start());
        assert_eq!(row.income_amount, dollars(10.0));
        assert_eq!(row.contribution, dollars(100.0));
        assert_eq!(row.units_purchased, 1);
        assert_eq!(row.units_cost, dollars(100.0));
        assert_eq!(row.ending_cash, dollars(10.0));
        assert_eq!(row.ending_units, 2);
        assert_eq!(row.ending_savings, Money::ZERO);
        assert_eq!(row.ending_debt, Money::ZERO);
    }

    #[test]
    fn test_single_month_with_savings() {
        let configs = vec![period(1, PeriodDraft {
            savings_percent: 50.0,
            monthly_contribution: dollars(100.0),
            duration_months: 1,
            ..Default::default()
        })];

        let rows = run_projection(&configs, &one_unit(), &simple_settings(), start()).unwrap();
        let row = &rows[0];
        assert_eq!(row.income_amount, dollars(10.0));
        assert_eq!(row.savings_added, dollars(5.0));
        assert_eq!(row.units_purchased, 1);
        assert_eq!(row.ending_cash, dollars(5.0));
        assert_eq!(row.ending_units, 2);
        assert_eq!(row.ending_savings, dollars(5.0));
    }

    #[test]
    fn test_debt_paid_before_savings() {
        let configs = vec![period(1, PeriodDraft {
            savings_percent: 50.0,
            debt_percent: 40.0,
            duration_months: 1,
            ..Default::default()
        })];
        let funds = FundState::new(Money::ZERO, 1, Money::ZERO, dollars(100.0));

        let rows = run_projection(&configs, &funds, &simple_settings(), start()).unwrap();
        let row = &rows[0];
        // income 10, debt 40% = 4, savings 50% of remaining 6 = 3, cash gets 3
        assert_eq!(row.debt_paid, dollars(4.0));
        assert_eq!(row.savings_added, dollars(3.0));
        assert_eq!(row.ending_cash, dollars(3.0));
        assert_eq!(row.ending_debt, dollars(96.0));
        assert_eq!(row.net_income(), dollars(3.0));
    }

    #[test]
    fn test_debt_payment_capped_at_balance() {
        let configs = vec![period(1, PeriodDraft {
            debt_percent: 100.0,
            duration_months: 3,
            ..Default::default()
        })];
        let funds = FundState::new(Money::ZERO, 1, Money::ZERO, dollars(15.0));

        let rows = run_projection(&configs, &funds, &simple_settings(), start()).unwrap();
        assert_eq!(rows[0].debt_paid, dollars(10.0));
        assert_eq!(rows[1].debt_paid, dollars(5.0));
        assert_eq!(rows[1].ending_debt, Money::ZERO);
        // Income beyond the remaining debt stays in cash
        assert_eq!(rows[1].ending_cash, dollars(5.0));
        assert_eq!(rows[2].debt_paid, Money::ZERO);
        assert_eq!(rows[2].ending_cash, dollars(15.0));
    }

    #[test]
    fn test_initial_contribution_replaces_first_monthly() {
        let configs = vec![period(1, PeriodDraft {
            monthly_contribution: dollars(10.0),
            initial_contribution: dollars(500.0),
            duration_months: 3,
            ..Default::default()
        })];
        let funds = FundState::new(Money::ZERO, 0, Money::ZERO, Money::ZERO);

        let rows = run_projection(&configs, &funds, &simple_settings(), start()).unwrap();
        let contributions: Vec<Money> = rows.iter().map(|r| r.contribution).collect();
        assert_eq!(contributions, vec![dollars(500.0), dollars(10.0), dollars(10.0)]);
    }

    #[test]
    fn test_empty_configs_produce_no_rows() {
        let rows = run_projection(&[], &one_unit(), &simple_settings(), start()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_zero_unit_cost_rejected() {
        let configs = mixed_periods();
        let settings = GlobalSettings::new(Money::ZERO, 10.0);
        let result = run_projection(&configs, &one_unit(), &settings, start());
        assert!(matches!(result, Err(ProjectionError::InvalidSettings(_))));
    }

    #[test]
    fn test_invalid_period_rejected_before_simulation() {
        let mut configs = mixed_periods();
        configs[2].duration_months = 0;
        let result = run_projection(&configs, &one_unit(), &simple_settings(), start());
        assert!(matches!(result, Err(ProjectionError::InvalidPeriod { position: 3, .. })));
    }

    #[test]
    fn test_month_numbering_and_dates_are_continuous() {
        let configs = mixed_periods();
        let rows = run_projection(&configs, &mixed_funds(), &simple_settings(), start()).unwrap();

        assert_eq!(rows.len(), 24 + 18 + 60);
        for (index, row) in rows.iter().enumerate() {
            assert_eq!(row.month, index as u32 + 1);
        }
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(rows[12].date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(rows[101].date, NaiveDate::from_ymd_opt(2032, 6, 1).unwrap());
    }

    #[test]
    fn test_balances_chain_between_months() {
        let rows = run_projection(&mixed_periods(), &mixed_funds(), &simple_settings(), start()).unwrap();

        let first = &rows[0];
        assert_eq!(first.starting_cash, dollars(77.77));
        assert_eq!(first.starting_units, 2);
        assert_eq!(first.starting_savings, dollars(10.0));
        assert_eq!(first.starting_debt, dollars(1_500.0));

        for pair in rows.windows(2) {
            assert_eq!(pair[1].starting_cash, pair[0].ending_cash);
            assert_eq!(pair[1].starting_units, pair[0].ending_units);
            assert_eq!(pair[1].starting_savings, pair[0].ending_savings);
            assert_eq!(pair[1].starting_debt, pair[0].ending_debt);
        }
    }

    #[test]
    fn test_conservation_every_month() {
        let settings = GlobalSettings::new(dollars(550.0), 20.5);
        let rows = run_projection(&mixed_periods(), &mixed_funds(), &settings, start()).unwrap();

        for row in &rows {
            let before = row.starting_cash + settings.units_value(row.starting_units);
            let after = row.ending_cash + settings.units_value(row.ending_units);
            assert_eq!(
                after,
                before + row.income_amount + row.contribution - row.debt_paid - row.savings_added,
                "cash + units value not conserved in month {}",
                row.month
            );
            assert_eq!(row.ending_savings, row.starting_savings + row.savings_added);
            assert_eq!(row.ending_debt, row.starting_debt - row.debt_paid);
        }
    }

    #[test]
    fn test_whole_unit_purchases() {
        let settings = GlobalSettings::new(dollars(550.0), 20.5);
        let rows = run_projection(&mixed_periods(), &mixed_funds(), &settings, start()).unwrap();

        for row in &rows {
            let cash_before_purchase = row.ending_cash + row.units_cost;
            assert_eq!(
                row.units_purchased as i64,
                cash_before_purchase.cents() / settings.unit_cost.cents()
            );
            assert_eq!(row.units_cost, settings.units_value(row.units_purchased));
            assert!(!row.ending_cash.is_negative());
            assert!(row.ending_cash < settings.unit_cost);
            assert_eq!(row.ending_units, row.starting_units + row.units_purchased);
        }
    }

    #[test]
    fn test_debt_never_negative() {
        let rows = run_projection(&mixed_periods(), &mixed_funds(), &simple_settings(), start()).unwrap();

        for row in &rows {
            assert!(row.debt_paid <= row.starting_debt);
            assert!(!row.ending_debt.is_negative());
        }
        assert_eq!(rows.last().unwrap().ending_debt, Money::ZERO);
    }

    #[test]
    fn test_sequencer_matches_engine_months() {
        let configs = mixed_periods();
        let rows = run_projection(&configs, &mixed_funds(), &simple_settings(), start()).unwrap();

        for config in &configs {
            let first = rows.iter().find(|r| r.config_id == config.id).unwrap();
            assert_eq!(months_before(&configs, config.id), first.month - 1);
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let configs = mixed_periods();
        let funds = mixed_funds();
        let settings = GlobalSettings::default();

        let first = run_projection(&configs, &funds, &settings, start()).unwrap();
        let second = run_projection(&configs, &funds, &settings, start()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_negative_cash_is_not_clamped() {
        let configs = vec![period(1, PeriodDraft {
            duration_months: 2,
            ..Default::default()
        })];
        let funds = FundState::new(dollars(-50.0), 0, Money::ZERO, Money::ZERO);

        let rows = run_projection(&configs, &funds, &simple_settings(), start()).unwrap();
        assert_eq!(rows[1].ending_cash, dollars(-50.0));
        assert_eq!(rows[1].units_purchased, 0);
    }

    #[test]
    fn test_summary_matches_last_row() {
        let engine = ProjectionEngine::new(GlobalSettings::default(), start());
        let result = engine.project(&mixed_periods(), &mixed_funds()).unwrap();
        let summary = result.summary();
        let last = result.last().unwrap();

        assert_eq!(summary.total_months, 102);
        assert_eq!(summary.final_units, last.ending_units);
        assert_eq!(summary.final_value, last.total_value());
        assert_eq!(
            summary.total_contributions,
            dollars(2_000.0)
                + dollars(250.0).checked_scale(23).unwrap()
                + dollars(33.33).checked_scale(60).unwrap()
        );
    }

    fn monthly_hundred(months: u32) -> Vec<PeriodConfig> {
        vec![period(1, PeriodDraft {
            monthly_contribution: dollars(100.0),
            duration_months: months,
            ..Default::default()
        })]
    }

    #[test]
    fn test_long_run_at_default_settings_stays_in_range() {
        let settings = GlobalSettings::default();
        let results =
            run_projection(&monthly_hundred(150), &FundState::default(), &settings, start()).unwrap();

        assert_eq!(results.len(), 150);
        let last = results.last().unwrap();
        assert!(last.total_value() > dollars(1_000_000_000.0));
        let before = last.starting_cash + settings.units_value(last.starting_units);
        let after = last.ending_cash + settings.units_value(last.ending_units);
        assert_eq!(after - before, last.net_income() + last.contribution);
    }

    #[test]
    fn test_thirty_years_at_default_settings_reports_overflow() {
        let result = run_projection(
            &monthly_hundred(360),
            &FundState::default(),
            &GlobalSettings::default(),
            start(),
        );

        match result {
            Err(ProjectionError::Overflow { month }) => {
                assert!(month > 150 && month < 360, "overflow reported in month {}", month)
            }
            other => panic!("expected an overflow error, got {:?}", other.map(|rows| rows.len())),
        }
    }
}
