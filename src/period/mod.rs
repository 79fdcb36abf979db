//! Investment periods, their ordering and CSV loading

mod book;
mod data;
pub mod loader;
pub mod sequencer;

pub use book::PeriodBook;
pub use data::{PeriodConfig, PeriodDraft};
pub(crate) use data::is_percentage;
pub use loader::{load_periods, load_periods_from_reader};
pub use sequencer::{months_before, schedule, PeriodSpan};
