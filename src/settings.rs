//! Global settings shared by every month of a run

use crate::error::{ProjectionError, Result};
use crate::money::Money;
use crate::period::is_percentage;
use serde::{Deserialize, Serialize};

/// Default price of one unit
pub const DEFAULT_UNIT_COST: Money = Money::from_cents(55_000);

/// Default monthly interest earned on held units, in percent
pub const DEFAULT_MONTHLY_INTEREST_PERCENT: f64 = 20.5;

/// Unit price and interest rate, read-only across one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Price of one unit (must be positive)
    pub unit_cost: Money,

    /// Monthly interest on the value of held units, 0-100
    pub monthly_interest_percent: f64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            unit_cost: DEFAULT_UNIT_COST,
            monthly_interest_percent: DEFAULT_MONTHLY_INTEREST_PERCENT,
        }
    }
}

impl GlobalSettings {
    pub fn new(unit_cost: Money, monthly_interest_percent: f64) -> Self {
        Self { unit_cost, monthly_interest_percent }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.unit_cost.is_positive() {
            return Err(ProjectionError::InvalidSettings(format!(
                "unit cost must be positive, got {}",
                self.unit_cost
            )));
        }
        if !is_percentage(self.monthly_interest_percent) {
            return Err(ProjectionError::InvalidSettings(format!(
                "monthly interest must be between 0 and 100, got {}",
                self.monthly_interest_percent
            )));
        }
        Ok(())
    }

    /// Value of `units` at the unit cost, clamped to the representable range
    pub fn units_value(&self, units: u64) -> Money {
        self.unit_cost.saturating_scale(units)
    }

    /// Interest income earned by holding `units` for one month
    ///
    /// `None` when the units' value or the interest leaves the currency range.
    pub fn interest_on(&self, units: u64) -> Option<Money> {
        self.unit_cost
            .checked_scale(units)?
            .checked_percent_of(self.monthly_interest_percent)
    }
}
