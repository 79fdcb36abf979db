//! Fund Projection - month-by-month projection of an investment account
//!
//! This library provides:
//! - Investment periods with their own contribution, savings and debt rules
//! - A projection engine applying interest, debt service, savings and whole-unit purchases
//! - An archive of completed runs that can be recalled and replayed exactly
//! - A months-to-target calculator and parallel scenario comparison

pub mod archive;
pub mod error;
pub mod funds;
pub mod money;
pub mod period;
pub mod projection;
pub mod report;
pub mod scenario;
pub mod settings;
pub mod target;

// Re-export commonly used types
pub use archive::{build_archive_summary, RunArchive, SavedRun};
pub use error::{ProjectionError, Result};
pub use funds::FundState;
pub use money::Money;
pub use period::{months_before, PeriodBook, PeriodConfig, PeriodDraft};
pub use projection::{run_projection, MonthResult, ProjectionEngine, ProjectionResult};
pub use scenario::ScenarioRunner;
pub use settings::GlobalSettings;
pub use target::TargetPlan;

/// Absolute months before the period with `id` in `configs`
pub fn compute_offset_months(configs: &[PeriodConfig], id: uuid::Uuid) -> u32 {
    months_before(configs, id)
}
