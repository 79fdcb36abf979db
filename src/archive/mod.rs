//! Run archive: save, update, recall and delete completed projection runs

mod saved;
pub mod store;

pub use saved::{build_archive_summary, SavedRun};
pub use store::{JsonFileRunStore, MemoryRunStore, RunStore, DEFAULT_ARCHIVE_PATH};

use crate::error::{ProjectionError, Result};
use crate::funds::FundState;
use crate::period::PeriodConfig;
use crate::projection::MonthResult;
use crate::settings::GlobalSettings;
use chrono::NaiveDate;
use rayon::prelude::*;
use uuid::Uuid;

/// Outcome of replaying one saved run
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub id: Uuid,
    /// Replayed months reproduce the stored summary
    pub consistent: bool,
    /// Replay error, if the stored inputs no longer validate
    pub error: Option<String>,
}

/// Saved runs on top of a [`RunStore`]
#[derive(Debug)]
pub struct RunArchive<S: RunStore> {
    store: S,
}

impl<S: RunStore> RunArchive<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list(&self) -> Result<Vec<SavedRun>> {
        self.store.list()
    }

    pub fn get(&self, id: Uuid) -> Result<SavedRun> {
        self.store.get(id)?.ok_or(ProjectionError::NotFound(id))
    }

    /// Archive a completed run under a fresh id
    pub fn save(
        &mut self,
        configs: &[PeriodConfig],
        results: &[MonthResult],
        initial_funds: &FundState,
        settings: &GlobalSettings,
        start_date: NaiveDate,
    ) -> Result<SavedRun> {
        let run = build_archive_summary(configs, results, initial_funds, settings, start_date)?;
        self.store.insert(run.clone())?;
        log::info!("saved run {} ({} months)", run.id, run.row_count);
        Ok(run)
    }

    /// Replace every field of an existing run except its id
    pub fn update(
        &mut self,
        id: Uuid,
        configs: &[PeriodConfig],
        results: &[MonthResult],
        initial_funds: &FundState,
        settings: &GlobalSettings,
        start_date: NaiveDate,
    ) -> Result<SavedRun> {
        let mut run = build_archive_summary(configs, results, initial_funds, settings, start_date)?;
        run.id = id;
        if !self.store.replace(run.clone())? {
            return Err(ProjectionError::NotFound(id));
        }
        log::info!("updated run {} ({} months)", run.id, run.row_count);
        Ok(run)
    }

    /// Delete a run. Unknown ids are ignored.
    pub fn remove(&mut self, id: Uuid) -> Result<()> {
        if self.store.delete(id)? {
            log::info!("removed run {}", id);
        } else {
            log::debug!("remove of unknown run {} ignored", id);
        }
        Ok(())
    }

    /// Replay a saved run's inputs through the projection engine
    pub fn recall(&self, id: Uuid) -> Result<Vec<MonthResult>> {
        self.get(id)?.replay()
    }

    /// Replay a saved run and check it still ends where it was saved
    pub fn verify(&self, id: Uuid) -> Result<bool> {
        let run = self.get(id)?;
        let results = run.replay()?;
        Ok(run.matches(&results))
    }

    /// Replay every saved run in parallel
    pub fn verify_all(&self) -> Result<Vec<Verification>> {
        let runs = self.store.list()?;
        Ok(runs
            .par_iter()
            .map(|run| match run.replay() {
                Ok(results) => Verification {
                    id: run.id,
                    consistent: run.matches(&results),
                    error: None,
                },
                Err(e) => Verification {
                    id: run.id,
                    consistent: false,
                    error: Some(e.to_string()),
                },
            })
            .collect())
    }
}
