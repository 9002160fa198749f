//! Error types for the projection engine
//!
//! The engine separates "not enough data yet" from "computation failed" so a
//! caller can keep waiting on the former and report the latter.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, FinanceError>;

#[derive(Debug, Error)]
pub enum FinanceError {
    /// One or more required inputs have not been supplied
    #[error("incomplete project data, missing: {}", .missing.join(", "))]
    IncompleteData { missing: Vec<&'static str> },

    /// An input was supplied but cannot be used
    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("unknown material preset: {0}")]
    UnknownPreset(String),

    #[error("market data error: {0}")]
    MarketData(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FinanceError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        FinanceError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// True when the caller should wait for more input rather than report a failure
    pub fn is_incomplete(&self) -> bool {
        matches!(self, FinanceError::IncompleteData { .. })
    }
}

/// Reject negative or non-finite amounts
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FinanceError::invalid(
            field,
            format!("expected a finite non-negative number, got {}", value),
        ));
    }
    Ok(())
}

/// Reject percentages outside [0, 100]
pub(crate) fn ensure_percentage(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(FinanceError::invalid(
            field,
            format!("expected a percentage between 0 and 100, got {}", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_is_distinguishable() {
        let err = FinanceError::IncompleteData {
            missing: vec!["area_m2", "land_cost"],
        };
        assert!(err.is_incomplete());
        assert_eq!(
            err.to_string(),
            "incomplete project data, missing: area_m2, land_cost"
        );

        let err = FinanceError::invalid("area_m2", "must be positive");
        assert!(!err.is_incomplete());
    }

    #[test]
    fn test_range_guards() {
        assert!(ensure_non_negative("amount", 0.0).is_ok());
        assert!(ensure_non_negative("amount", -1.0).is_err());
        assert!(ensure_non_negative("amount", f64::NAN).is_err());
        assert!(ensure_percentage("rate", 100.0).is_ok());
        assert!(ensure_percentage("rate", 100.5).is_err());
    }
}
