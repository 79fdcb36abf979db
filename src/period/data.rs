//! Investment period data structures

use crate::error::{ProjectionError, Result};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One contiguous span of months governed by fixed contribution and allocation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodConfig {
    /// Unique period identifier
    pub id: Uuid,

    /// 1-based display order (informational only)
    pub position: u32,

    /// Share of interest income (after debt service) moved to savings, 0-100
    pub savings_percent: f64,

    /// Share of interest income used to pay down debt, 0-100
    pub debt_percent: f64,

    /// Contribution added every month after the first
    pub monthly_contribution: Money,

    /// One-time contribution in the first month of the period
    pub initial_contribution: Money,

    /// Number of months in the period (at least 1)
    pub duration_months: u32,
}

/// Rule fields of a period, without identity or position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodDraft {
    pub savings_percent: f64,
    pub debt_percent: f64,
    pub monthly_contribution: Money,
    pub initial_contribution: Money,
    pub duration_months: u32,
}

impl Default for PeriodDraft {
    fn default() -> Self {
        Self {
            savings_percent: 0.0,
            debt_percent: 0.0,
            monthly_contribution: Money::ZERO,
            initial_contribution: Money::ZERO,
            duration_months: 1,
        }
    }
}

impl PeriodConfig {
    /// Create a period with a fresh id
    pub fn new(position: u32, draft: PeriodDraft) -> Self {
        Self::with_id(Uuid::new_v4(), position, draft)
    }

    pub fn with_id(id: Uuid, position: u32, draft: PeriodDraft) -> Self {
        Self {
            id,
            position,
            savings_percent: draft.savings_percent,
            debt_percent: draft.debt_percent,
            monthly_contribution: draft.monthly_contribution,
            initial_contribution: draft.initial_contribution,
            duration_months: draft.duration_months,
        }
    }

    /// Replace the rule fields, keeping id and position
    pub fn apply(&mut self, draft: PeriodDraft) {
        self.savings_percent = draft.savings_percent;
        self.debt_percent = draft.debt_percent;
        self.monthly_contribution = draft.monthly_contribution;
        self.initial_contribution = draft.initial_contribution;
        self.duration_months = draft.duration_months;
    }

    pub fn draft(&self) -> PeriodDraft {
        PeriodDraft {
            savings_percent: self.savings_percent,
            debt_percent: self.debt_percent,
            monthly_contribution: self.monthly_contribution,
            initial_contribution: self.initial_contribution,
            duration_months: self.duration_months,
        }
    }

    /// Contribution for local month `i` of this period (0-indexed)
    ///
    /// The initial contribution replaces the monthly one in month 0 only.
    pub fn contribution_for(&self, i: u32) -> Money {
        if i == 0 && self.initial_contribution.is_positive() {
            self.initial_contribution
        } else if self.monthly_contribution.is_positive() {
            self.monthly_contribution
        } else {
            Money::ZERO
        }
    }

    /// Check the period's rules are in range
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| ProjectionError::InvalidPeriod {
            position: self.position,
            reason: reason.to_string(),
        };

        if self.duration_months == 0 {
            return Err(invalid("duration must be at least one month"));
        }
        if !is_percentage(self.savings_percent) {
            return Err(invalid("savings percent must be between 0 and 100"));
        }
        if !is_percentage(self.debt_percent) {
            return Err(invalid("debt percent must be between 0 and 100"));
        }
        if self.monthly_contribution.is_negative() {
            return Err(invalid("monthly contribution cannot be negative"));
        }
        if self.initial_contribution.is_negative() {
            return Err(invalid("initial contribution cannot be negative"));
        }
        Ok(())
    }
}

pub(crate) fn is_percentage(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}
