//! Key-value storage for saved runs

use super::SavedRun;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Default location of the JSON run archive
pub const DEFAULT_ARCHIVE_PATH: &str = "data/saved_runs.json";

/// Storage for saved runs, keyed by id
///
/// Implementations must read back exactly what was written.
pub trait RunStore {
    /// All runs, in insertion order
    fn list(&self) -> Result<Vec<SavedRun>>;

    fn get(&self, id: Uuid) -> Result<Option<SavedRun>>;

    fn insert(&mut self, run: SavedRun) -> Result<()>;

    /// Replace the run with the same id. Returns false if none exists.
    fn replace(&mut self, run: SavedRun) -> Result<bool>;

    /// Delete by id. Returns false if none existed.
    fn delete(&mut self, id: Uuid) -> Result<bool>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryRunStore {
    runs: Vec<SavedRun>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunStore for MemoryRunStore {
    fn list(&self) -> Result<Vec<SavedRun>> {
        Ok(self.runs.clone())
    }

    fn get(&self, id: Uuid) -> Result<Option<SavedRun>> {
        Ok(self.runs.iter().find(|r| r.id == id).cloned())
    }

    fn insert(&mut self, run: SavedRun) -> Result<()> {
        self.runs.push(run);
        Ok(())
    }

    fn replace(&mut self, run: SavedRun) -> Result<bool> {
        Ok(replace_in(&mut self.runs, run))
    }

    fn delete(&mut self, id: Uuid) -> Result<bool> {
        Ok(delete_in(&mut self.runs, id))
    }
}

fn replace_in(runs: &mut [SavedRun], run: SavedRun) -> bool {
    match runs.iter_mut().find(|r| r.id == run.id) {
        Some(slot) => {
            *slot = run;
            true
        }
        None => false,
    }
}

fn delete_in(runs: &mut Vec<SavedRun>, id: Uuid) -> bool {
    let before = runs.len();
    runs.retain(|r| r.id != id);
    runs.len() != before
}

/// On-disk layout of the JSON archive
#[derive(Debug, Default, Serialize, Deserialize)]
struct ArchiveFile {
    runs: Vec<SavedRun>,
}

/// Store backed by a single JSON document
///
/// Each write replaces the whole document through a temporary file and a
/// rename, so readers never observe a partially written archive.
#[derive(Debug, Clone)]
pub struct JsonFileRunStore {
    path: PathBuf,
}

impl JsonFileRunStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<SavedRun>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: ArchiveFile = serde_json::from_str(&text)?;
        Ok(file.runs)
    }

    fn store(&self, runs: Vec<SavedRun>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(fs::File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, &ArchiveFile { runs })?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        log::debug!("wrote run archive to {}", self.path.display());
        Ok(())
    }
}

impl RunStore for JsonFileRunStore {
    fn list(&self) -> Result<Vec<SavedRun>> {
        self.load()
    }

    fn get(&self, id: Uuid) -> Result<Option<SavedRun>> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    fn insert(&mut self, run: SavedRun) -> Result<()> {
        let mut runs = self.load()?;
        runs.push(run);
        self.store(runs)
    }

    fn replace(&mut self, run: SavedRun) -> Result<bool> {
        let mut runs = self.load()?;
        if !replace_in(&mut runs, run) {
            return Ok(false);
        }
        self.store(runs)?;
        Ok(true)
    }

    fn delete(&mut self, id: Uuid) -> Result<bool> {
        let mut runs = self.load()?;
        if !delete_in(&mut runs, id) {
            return Ok(false);
        }
        self.store(runs)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::build_archive_summary;
    use crate::funds::FundState;
    use crate::money::Money;
    use crate::period::{PeriodConfig, PeriodDraft};
    use crate::projection::run_projection;
    use crate::settings::GlobalSettings;
    use chrono::NaiveDate;

    fn saved_run(months: u32) -> SavedRun {
        let configs = vec![PeriodConfig::new(1, PeriodDraft {
            savings_percent: 12.5,
            debt_percent: 30.0,
            monthly_contribution: Money::from_major(210.35),
            initial_contribution: Money::from_major(1_000.0),
            duration_months: months,
        })];
        let funds = FundState::new(Money::from_major(3.21), 1, Money::ZERO, Money::from_major(400.0));
        let settings = GlobalSettings::default();
        let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let results = run_projection(&configs, &funds, &settings, start).unwrap();
        build_archive_summary(&configs, &results, &funds, &settings, start).unwrap()
    }

    fn exercise(store: &mut dyn RunStore) {
        let first = saved_run(6);
        let second = saved_run(12);

        store.insert(first.clone()).unwrap();
        store.insert(second.clone()).unwrap();
        assert_eq!(store.list().unwrap(), vec![first.clone(), second.clone()]);
        assert_eq!(store.get(second.id).unwrap(), Some(second.clone()));
        assert_eq!(store.get(Uuid::new_v4()).unwrap(), None);

        let mut changed = saved_run(3);
        changed.id = first.id;
        assert!(store.replace(changed.clone()).unwrap());
        assert_eq!(store.get(first.id).unwrap(), Some(changed));
        assert!(!store.replace(saved_run(1)).unwrap());

        assert!(store.delete(first.id).unwrap());
        assert!(!store.delete(first.id).unwrap());
        assert_eq!(store.list().unwrap(), vec![second]);
    }

    #[test]
    fn test_memory_store() {
        exercise(&mut MemoryRunStore::new());
    }

    #[test]
    fn test_json_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileRunStore::new(dir.path().join("nested").join("runs.json"));
        assert!(store.list().unwrap().is_empty());
        exercise(&mut store);
        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_json_file_store_reads_back_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.json");
        let run = saved_run(24);

        JsonFileRunStore::new(&path).insert(run.clone()).unwrap();

        let reopened = JsonFileRunStore::new(&path);
        let loaded = reopened.get(run.id).unwrap().unwrap();
        assert_eq!(loaded, run);
        assert_eq!(loaded.replay().unwrap(), run.replay().unwrap());
    }

    #[test]
    fn test_json_file_store_keeps_every_cent_of_large_runs() {
        let configs = vec![PeriodConfig::new(1, PeriodDraft {
            monthly_contribution: Money::from_major(100.0),
            duration_months: 150,
            ..Default::default()
        })];
        let funds = FundState::default();
        let settings = GlobalSettings::default();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let results = run_projection(&configs, &funds, &settings, start).unwrap();
        let run = build_archive_summary(&configs, &results, &funds, &settings, start).unwrap();
        assert!(run.total_value.cents() > 1 << 53);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.json");
        JsonFileRunStore::new(&path).insert(run.clone()).unwrap();

        let loaded = JsonFileRunStore::new(&path).get(run.id).unwrap().unwrap();
        assert_eq!(loaded.total_value, run.total_value);
        assert_eq!(loaded, run);
        assert!(loaded.matches(&loaded.replay().unwrap()));
    }
}
