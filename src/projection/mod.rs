//! Projection engine for month-by-month account projections

mod engine;
mod results;
mod state;

pub use engine::{run_projection, ProjectionEngine};
pub use results::{MonthResult, ProjectionResult, ProjectionSummary};
pub use state::ProjectionState;
