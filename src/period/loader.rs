//! Load investment periods from CSV

use super::{PeriodConfig, PeriodDraft};
use crate::error::{ProjectionError, Result};
use crate::money::Money;
use csv::Reader;
use std::path::Path;
use uuid::Uuid;

/// Raw CSV row matching the periods file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Id", default)]
    id: Option<String>,
    #[serde(rename = "Position")]
    position: u32,
    #[serde(rename = "SavingsPercent")]
    savings_percent: f64,
    #[serde(rename = "DebtPercent")]
    debt_percent: f64,
    #[serde(rename = "MonthlyContribution")]
    monthly_contribution: String,
    #[serde(rename = "InitialContribution")]
    initial_contribution: String,
    #[serde(rename = "DurationMonths")]
    duration_months: u32,
}

impl CsvRow {
    fn to_period(self) -> Result<PeriodConfig> {
        let position = self.position;
        let invalid = |reason: String| ProjectionError::InvalidPeriod { position, reason };

        let monthly_contribution: Money = self
            .monthly_contribution
            .parse()
            .map_err(|e| invalid(format!("MonthlyContribution: {}", e)))?;
        let initial_contribution: Money = self
            .initial_contribution
            .parse()
            .map_err(|e| invalid(format!("InitialContribution: {}", e)))?;

        let draft = PeriodDraft {
            savings_percent: self.savings_percent,
            debt_percent: self.debt_percent,
            monthly_contribution,
            initial_contribution,
            duration_months: self.duration_months,
        };

        let period = match self.id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                let id = Uuid::parse_str(raw).map_err(|e| invalid(format!("Id: {}", e)))?;
                PeriodConfig::with_id(id, position, draft)
            }
            _ => PeriodConfig::new(position, draft),
        };

        period.validate()?;
        Ok(period)
    }
}

/// Load all periods from a CSV file, in file order
pub fn load_periods<P: AsRef<Path>>(path: P) -> Result<Vec<PeriodConfig>> {
    let reader = Reader::from_path(path)?;
    read_periods(reader)
}

/// Load periods from any reader (e.g., string buffer, stdin)
pub fn load_periods_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<PeriodConfig>> {
    read_periods(Reader::from_reader(reader))
}

fn read_periods<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<PeriodConfig>> {
    let mut periods = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        periods.push(row.to_period()?);
    }

    log::debug!("loaded {} investment periods", periods.len());
    Ok(periods)
}
