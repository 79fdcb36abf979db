//! Scenario runner for comparing projections under different settings
//!
//! Holds one set of periods and starting funds, then projects them under many
//! unit-cost/interest settings. Each projection is an independent pure call, so
//! batches run in parallel.

use crate::error::Result;
use crate::funds::FundState;
use crate::period::PeriodConfig;
use crate::projection::{ProjectionEngine, ProjectionResult};
use crate::settings::GlobalSettings;
use chrono::NaiveDate;
use rayon::prelude::*;

/// Pre-loaded scenario runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(periods, funds, start_date);
///
/// let settings: Vec<_> = [10.0, 15.0, 20.5]
///     .iter()
///     .map(|&rate| GlobalSettings::new(unit_cost, rate))
///     .collect();
/// let results = runner.run_scenarios(&settings);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    configs: Vec<PeriodConfig>,
    initial_funds: FundState,
    start_date: NaiveDate,
}

impl ScenarioRunner {
    pub fn new(configs: Vec<PeriodConfig>, initial_funds: FundState, start_date: NaiveDate) -> Self {
        Self {
            configs,
            initial_funds,
            start_date,
        }
    }

    /// Run a single projection with the given settings
    pub fn run(&self, settings: GlobalSettings) -> Result<ProjectionResult> {
        let engine = ProjectionEngine::new(settings, self.start_date);
        engine.project(&self.configs, &self.initial_funds)
    }

    /// Run one projection per settings entry, in input order
    pub fn run_scenarios(&self, settings: &[GlobalSettings]) -> Vec<Result<ProjectionResult>> {
        settings.par_iter().map(|s| self.run(*s)).collect()
    }

    pub fn configs(&self) -> &[PeriodConfig] {
        &self.configs
    }

    pub fn initial_funds(&self) -> &FundState {
        &self.initial_funds
    }
}
