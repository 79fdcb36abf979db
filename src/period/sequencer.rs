//! Absolute month offsets for an ordered list of periods

use super::PeriodConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Months simulated before the period with `id`
///
/// Sums the durations of every period strictly before it in `configs`,
/// saturating at `u32::MAX`. Returns 0 when the id is not present.
pub fn months_before(configs: &[PeriodConfig], id: Uuid) -> u32 {
    match configs.iter().position(|c| c.id == id) {
        Some(index) => configs[..index]
            .iter()
            .fold(0u32, |total, c| total.saturating_add(c.duration_months)),
        None => 0,
    }
}

/// Absolute month span of one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSpan {
    pub id: Uuid,
    pub position: u32,
    /// First month of the period (1-indexed, continuous across periods)
    pub start_month: u32,
    /// Last month of the period (inclusive)
    pub end_month: u32,
}

impl PeriodSpan {
    pub fn label(&self) -> String {
        format!(
            "Investment Period {} (Month {} - {})",
            self.position, self.start_month, self.end_month
        )
    }

    pub fn contains(&self, month: u32) -> bool {
        (self.start_month..=self.end_month).contains(&month)
    }
}

/// Label every period with its absolute start and end month
pub fn schedule(configs: &[PeriodConfig]) -> Vec<PeriodSpan> {
    let mut elapsed = 0u32;
    configs
        .iter()
        .map(|config| {
            let start_month = elapsed.saturating_add(1);
            elapsed = elapsed.saturating_add(config.duration_months);
            PeriodSpan {
                id: config.id,
                position: config.position,
                start_month,
                end_month: start_month.saturating_add(config.duration_months.saturating_sub(1)),
            }
        })
        .collect()
}
