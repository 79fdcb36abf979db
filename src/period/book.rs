//! Ordered, editable collection of investment periods

use super::sequencer::{self, PeriodSpan};
use super::{PeriodConfig, PeriodDraft};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The ordered list of periods a projection runs over
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodBook {
    configs: Vec<PeriodConfig>,
}

impl PeriodBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configs(configs: Vec<PeriodConfig>) -> Self {
        Self { configs }
    }

    /// Append a period with a fresh id, positioned after the existing ones
    pub fn add(&mut self, draft: PeriodDraft) -> &PeriodConfig {
        let position = self.configs.len() as u32 + 1;
        self.configs.push(PeriodConfig::new(position, draft));
        &self.configs[self.configs.len() - 1]
    }

    /// Replace a period's rules. Returns false if the id is unknown.
    pub fn update(&mut self, id: Uuid, draft: PeriodDraft) -> bool {
        match self.configs.iter_mut().find(|c| c.id == id) {
            Some(config) => {
                config.apply(draft);
                true
            }
            None => false,
        }
    }

    /// Remove a period. Unknown ids are ignored.
    pub fn remove(&mut self, id: Uuid) -> Option<PeriodConfig> {
        let index = self.configs.iter().position(|c| c.id == id)?;
        Some(self.configs.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&PeriodConfig> {
        self.configs.iter().find(|c| c.id == id)
    }

    pub fn configs(&self) -> &[PeriodConfig] {
        &self.configs
    }

    pub fn into_configs(self) -> Vec<PeriodConfig> {
        self.configs
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn total_months(&self) -> u32 {
        self.configs
            .iter()
            .fold(0u32, |total, c| total.saturating_add(c.duration_months))
    }

    pub fn months_before(&self, id: Uuid) -> u32 {
        sequencer::months_before(&self.configs, id)
    }

    pub fn schedule(&self) -> Vec<PeriodSpan> {
        sequencer::schedule(&self.configs)
    }
}
