//! Error types shared by the projection, archive and target calculators

use thiserror::Error;
use uuid::Uuid;

/// Errors raised before or instead of producing projection output
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Global settings cannot drive a projection (e.g. unit cost of zero)
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A period's rules are out of range
    #[error("invalid period {position}: {reason}")]
    InvalidPeriod { position: u32, reason: String },

    /// Initial funds are out of range
    #[error("invalid funds: {0}")]
    InvalidFunds(String),

    /// Attempted to archive a run that produced no months
    #[error("cannot archive a run with no month results")]
    EmptyArchiveTarget,

    /// No saved run exists with this id
    #[error("saved run {0} not found")]
    NotFound(Uuid),

    /// A balance left the representable currency range
    #[error("balances exceed the representable range in month {month}")]
    Overflow { month: u32 },

    /// Target calculator can never reach its goal
    #[error("target unreachable: {0}")]
    TargetUnreachable(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for projection operations
pub type Result<T> = std::result::Result<T, ProjectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ProjectionError::InvalidSettings("unit cost must be positive".into());
        assert_eq!(err.to_string(), "invalid settings: unit cost must be positive");

        let err = ProjectionError::InvalidPeriod {
            position: 3,
            reason: "duration must be at least one month".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid period 3: duration must be at least one month"
        );

        let id = Uuid::nil();
        let err = ProjectionError::NotFound(id);
        assert_eq!(
            err.to_string(),
            "saved run 00000000-0000-0000-0000-000000000000 not found"
        );

        let err = ProjectionError::Overflow { month: 176 };
        assert_eq!(
            err.to_string(),
            "balances exceed the representable range in month 176"
        );
    }
}
