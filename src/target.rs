//! Months-to-target calculator
//!
//! A simpler model than the period projection: interest on the value of held
//! units accrues into a cash pool, part of it optionally goes to savings, and
//! units are bought only from pool cash above a reserve. Runs until the units'
//! value reaches a target.

use crate::error::{ProjectionError, Result};
use crate::money::Money;
use crate::period::is_percentage;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Upper bound on simulated months when none is given
pub const DEFAULT_MAX_MONTHS: u32 = 1200;

/// Inputs of the target calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPlan {
    /// Cash kept in the pool; only the excess buys units
    pub cash_pool: Money,
    pub unit_cost: Money,
    pub monthly_interest_percent: f64,
    pub savings_percent: f64,
    /// Stop once the units held are worth at least this much
    pub target_value: Money,
    pub initial_units: u64,
    pub max_months: u32,
}

impl Default for TargetPlan {
    fn default() -> Self {
        Self {
            cash_pool: Money::ZERO,
            unit_cost: Money::from_major(550.0),
            monthly_interest_percent: 20.5,
            savings_percent: 0.0,
            target_value: Money::from_major(100_000.0),
            initial_units: 1,
            max_months: DEFAULT_MAX_MONTHS,
        }
    }
}

/// One month of the target calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRow {
    /// 0 for the starting snapshot
    pub month: u32,
    pub date: NaiveDate,
    /// Interest earned this month
    pub payment: Money,
    pub pool: Money,
    pub savings: Money,
    pub units: u64,
    /// Value of the units held
    pub units_value: Money,
}

impl TargetPlan {
    pub fn validate(&self) -> Result<()> {
        if !self.unit_cost.is_positive() {
            return Err(ProjectionError::InvalidSettings(format!(
                "unit cost must be positive, got {}",
                self.unit_cost
            )));
        }
        if !is_percentage(self.monthly_interest_percent) {
            return Err(ProjectionError::InvalidSettings(
                "monthly interest must be between 0 and 100".into(),
            ));
        }
        if !is_percentage(self.savings_percent) {
            return Err(ProjectionError::InvalidSettings(
                "savings percent must be between 0 and 100".into(),
            ));
        }
        if self.cash_pool.is_negative() {
            return Err(ProjectionError::InvalidSettings("cash pool cannot be negative".into()));
        }
        Ok(())
    }

    /// Simulate until the target is reached
    ///
    /// The first row is the starting snapshot dated `start_date`; each later
    /// row is one month on.
    pub fn run(&self, start_date: NaiveDate) -> Result<Vec<TargetRow>> {
        self.validate()?;

        let mut units = self.initial_units;
        let mut value = self
            .unit_cost
            .checked_scale(units)
            .ok_or(ProjectionError::Overflow { month: 0 })?;

        if value < self.target_value && (units == 0 || self.monthly_interest_percent <= 0.0) {
            return Err(ProjectionError::TargetUnreachable(
                "no interest can accrue without units and a positive interest rate".into(),
            ));
        }

        let mut pool = Money::ZERO;
        let mut savings = Money::ZERO;
        let mut rows = vec![TargetRow {
            month: 0,
            date: start_date,
            payment: Money::ZERO,
            pool,
            savings,
            units,
            units_value: value,
        }];

        let mut month = 0u32;
        while value < self.target_value {
            if month >= self.max_months {
                return Err(ProjectionError::TargetUnreachable(format!(
                    "target {} not reached within {} months",
                    self.target_value, self.max_months
                )));
            }
            month += 1;
            let overflow = || ProjectionError::Overflow { month };

            let payment = value
                .checked_percent_of(self.monthly_interest_percent)
                .ok_or_else(overflow)?;
            let mut to_pool = payment;

            // Savings only start once the pool would overflow its reserve
            let pool_with_savings = pool
                .checked_percent_of(self.savings_percent)
                .and_then(|s| s.checked_add(pool))
                .ok_or_else(overflow)?;
            if self.savings_percent > 0.0 && pool_with_savings > self.cash_pool {
                let to_save = payment
                    .checked_percent_of(self.savings_percent)
                    .ok_or_else(overflow)?;
                savings = savings.checked_add(to_save).ok_or_else(overflow)?;
                to_pool -= to_save;
            }

            pool = pool.checked_add(to_pool).ok_or_else(overflow)?;

            let reserve = self.cash_pool.checked_add(self.unit_cost).ok_or_else(overflow)?;
            if pool >= reserve {
                let bought = (pool - self.cash_pool).whole_multiples_of(self.unit_cost);
                pool -= self.unit_cost.checked_scale(bought).ok_or_else(overflow)?;
                units = units.checked_add(bought).ok_or_else(overflow)?;
                value = self.unit_cost.checked_scale(units).ok_or_else(overflow)?;
            }

            let date = start_date
                .checked_add_months(Months::new(month))
                .ok_or_else(|| ProjectionError::TargetUnreachable("date out of range".into()))?;

            rows.push(TargetRow {
                month,
                date,
                payment,
                pool,
                savings,
                units,
                units_value: value,
            });
        }

        log::info!(
            "target {} reached after {} months with {} units",
            self.target_value,
            month,
            units
        );
        Ok(rows)
    }
}
