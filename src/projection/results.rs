//! Month-by-month output of a projection

use crate::money::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single month of projection output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthResult {
    // Timing
    pub config_id: Uuid,
    pub month: u32,
    pub date: NaiveDate,
    pub unit_cost: Money,

    // Balances entering the month
    pub starting_cash: Money,
    pub starting_units: u64,
    pub starting_savings: Money,
    pub starting_debt: Money,

    // Inflows (income before debt and savings deductions)
    pub income_amount: Money,
    pub contribution: Money,

    // Allocations
    pub debt_paid: Money,
    pub savings_added: Money,
    pub units_purchased: u64,
    pub units_cost: Money,

    // Balances leaving the month
    pub ending_cash: Money,
    pub ending_units: u64,
    pub ending_savings: Money,
    pub ending_debt: Money,
}

impl MonthResult {
    /// Interest income left for cash after debt service and savings
    pub fn net_income(&self) -> Money {
        self.income_amount - self.debt_paid - self.savings_added
    }

    /// Value of the units held at the end of the month
    pub fn units_value(&self) -> Money {
        self.unit_cost.saturating_scale(self.ending_units)
    }

    /// Savings + cash + units value at the end of the month
    pub fn total_value(&self) -> Money {
        self.ending_savings + self.ending_cash + self.units_value()
    }
}

/// Complete projection output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Monthly rows, in simulation order
    pub results: Vec<MonthResult>,
}

impl ProjectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, row: MonthResult) {
        self.results.push(row);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn last(&self) -> Option<&MonthResult> {
        self.results.last()
    }

    /// Rows produced by one period
    pub fn rows_for(&self, config_id: Uuid) -> impl Iterator<Item = &MonthResult> + '_ {
        self.results.iter().filter(move |r| r.config_id == config_id)
    }

    pub fn into_results(self) -> Vec<MonthResult> {
        self.results
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_income: Money = self.results.iter().map(|r| r.income_amount).sum();
        let total_contributions: Money = self.results.iter().map(|r| r.contribution).sum();
        let total_debt_paid: Money = self.results.iter().map(|r| r.debt_paid).sum();
        let total_savings_added: Money = self.results.iter().map(|r| r.savings_added).sum();
        let total_units_purchased: u64 = self.results.iter().map(|r| r.units_purchased).sum();

        let last = self.results.last();

        ProjectionSummary {
            total_months: self.results.len() as u32,
            total_income,
            total_contributions,
            total_debt_paid,
            total_savings_added,
            total_units_purchased,
            final_cash: last.map(|r| r.ending_cash).unwrap_or(Money::ZERO),
            final_units: last.map(|r| r.ending_units).unwrap_or(0),
            final_savings: last.map(|r| r.ending_savings).unwrap_or(Money::ZERO),
            final_debt: last.map(|r| r.ending_debt).unwrap_or(Money::ZERO),
            final_value: last.map(|r| r.total_value()).unwrap_or(Money::ZERO),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub total_income: Money,
    pub total_contributions: Money,
    pub total_debt_paid: Money,
    pub total_savings_added: Money,
    pub total_units_purchased: u64,
    pub final_cash: Money,
    pub final_units: u64,
    pub final_savings: Money,
    pub final_debt: Money,
    pub final_value: Money,
}
