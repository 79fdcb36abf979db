//! Archived projection runs

use crate::error::{ProjectionError, Result};
use crate::funds::FundState;
use crate::money::Money;
use crate::period::PeriodConfig;
use crate::projection::{run_projection, MonthResult};
use crate::settings::GlobalSettings;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inputs of a completed run plus a summary of its final month
///
/// Holds everything needed to replay the run through the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRun {
    pub id: Uuid,
    pub configs: Vec<PeriodConfig>,
    pub initial_funds: FundState,
    pub settings: GlobalSettings,

    /// Date of month 1 of the run
    pub start_date: NaiveDate,

    // Summary of the last month at save time
    pub row_count: u32,
    pub total_units: u64,
    pub total_savings: Money,
    pub total_cash: Money,
    pub total_value: Money,
}

impl SavedRun {
    /// Re-run the archived inputs through the projection engine
    pub fn replay(&self) -> Result<Vec<MonthResult>> {
        run_projection(&self.configs, &self.initial_funds, &self.settings, self.start_date)
    }

    /// Whether `results` end in the state this run recorded
    pub fn matches(&self, results: &[MonthResult]) -> bool {
        match results.last() {
            Some(last) => {
                self.row_count as usize == results.len()
                    && self.total_units == last.ending_units
                    && self.total_savings == last.ending_savings
                    && self.total_cash == last.ending_cash
                    && self.total_value == summary_value(last, &self.settings)
            }
            None => false,
        }
    }
}

fn summary_value(last: &MonthResult, settings: &GlobalSettings) -> Money {
    last.ending_savings + last.ending_cash + settings.units_value(last.ending_units)
}

/// Build an archive record for a completed run, with a fresh id
///
/// Fails with [`ProjectionError::EmptyArchiveTarget`] if the run has no months.
pub fn build_archive_summary(
    configs: &[PeriodConfig],
    results: &[MonthResult],
    initial_funds: &FundState,
    settings: &GlobalSettings,
    start_date: NaiveDate,
) -> Result<SavedRun> {
    let last = results.last().ok_or(ProjectionError::EmptyArchiveTarget)?;

    Ok(SavedRun {
        id: Uuid::new_v4(),
        configs: configs.to_vec(),
        initial_funds: *initial_funds,
        settings: *settings,
        start_date,
        row_count: results.len() as u32,
        total_units: last.ending_units,
        total_savings: last.ending_savings,
        total_cash: last.ending_cash,
        total_value: summary_value(last, settings),
    })
}
