//! Running balances threaded through a projection

use crate::funds::FundState;
use crate::money::Money;

/// Account state between months of a projection
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Months simulated so far, continuous across periods (0 before the first month)
    pub month: u32,

    pub cash: Money,
    pub units: u64,
    pub savings: Money,
    pub debt: Money,
}

impl ProjectionState {
    /// Initialize state from the account's starting funds
    pub fn from_funds(funds: &FundState) -> Self {
        Self {
            month: 0,
            cash: funds.cash,
            units: funds.units,
            savings: funds.savings,
            debt: funds.debt,
        }
    }

    /// Advance to the next month, returning its 1-indexed number
    pub fn advance_month(&mut self) -> u32 {
        self.month += 1;
        self.month
    }

    /// Snapshot of the current balances
    pub fn balances(&self) -> FundState {
        FundState::new(self.cash, self.units, self.savings, self.debt)
    }
}
