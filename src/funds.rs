//! Account balances a projection starts from

use crate::error::{ProjectionError, Result};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The four running balances of the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundState {
    /// Uninvested cash
    pub cash: Money,

    /// Whole units of the asset held
    pub units: u64,

    /// Savings set aside from interest income
    pub savings: Money,

    /// Outstanding debt
    pub debt: Money,
}

impl Default for FundState {
    fn default() -> Self {
        Self {
            cash: Money::ZERO,
            units: 1,
            savings: Money::ZERO,
            debt: Money::ZERO,
        }
    }
}

impl FundState {
    pub fn new(cash: Money, units: u64, savings: Money, debt: Money) -> Self {
        Self { cash, units, savings, debt }
    }

    /// Savings and debt cannot start negative. Cash may (an overdrawn account).
    pub fn validate(&self) -> Result<()> {
        if self.savings.is_negative() {
            return Err(ProjectionError::InvalidFunds("savings cannot be negative".into()));
        }
        if self.debt.is_negative() {
            return Err(ProjectionError::InvalidFunds("debt cannot be negative".into()));
        }
        Ok(())
    }
}
