//! Transaction taxes and closing fees by region
//!
//! Each region has a fixed percentage table. Regions without their own table
//! use the default one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Percentage rates applied to a transaction amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTable {
    /// Fee name -> percent of the transaction amount
    pub rates: BTreeMap<String, f64>,
}

impl FeeTable {
    fn from_rates(rates: &[(&str, f64)]) -> Self {
        Self {
            rates: rates.iter().map(|(name, pct)| (name.to_string(), *pct)).collect(),
        }
    }

    /// Table used for any region without its own
    pub fn default_table() -> Self {
        Self::from_rates(&[
            ("acquisition_tax", 3.0),
            ("notary_fees", 1.5),
            ("public_registry", 0.5),
            ("appraisal", 0.25),
        ])
    }

    /// Table for a region code, if one is defined
    pub fn for_region(region: &str) -> Option<Self> {
        let table = match region.trim().to_ascii_uppercase().as_str() {
            "CDMX" => Self::from_rates(&[
                ("acquisition_tax", 4.5),
                ("notary_fees", 1.8),
                ("public_registry", 0.6),
                ("appraisal", 0.3),
            ]),
            "JAL" => Self::from_rates(&[
                ("acquisition_tax", 3.0),
                ("notary_fees", 1.5),
                ("public_registry", 0.4),
                ("appraisal", 0.25),
            ]),
            "NL" => Self::from_rates(&[
                ("acquisition_tax", 3.0),
                ("notary_fees", 1.6),
                ("public_registry", 0.5),
                ("appraisal", 0.3),
            ]),
            "QRO" => Self::from_rates(&[
                ("acquisition_tax", 2.5),
                ("notary_fees", 1.4),
                ("public_registry", 0.45),
                ("appraisal", 0.25),
            ]),
            "QROO" => Self::from_rates(&[
                ("acquisition_tax", 2.0),
                ("notary_fees", 1.5),
                ("public_registry", 0.5),
                ("appraisal", 0.3),
            ]),
            _ => return None,
        };
        Some(table)
    }
}

/// Fees computed for one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub region: String,
    /// True when the region had no table of its own
    pub used_default: bool,
    pub fees: BTreeMap<String, f64>,
}

impl FeeSchedule {
    pub fn total(&self) -> f64 {
        self.fees.values().sum()
    }
}

/// Apply the region's fee table to a transaction amount
pub fn calculate_taxes_and_fees(amount: f64, region: &str) -> FeeSchedule {
    let (table, used_default) = match FeeTable::for_region(region) {
        Some(table) => (table, false),
        None => {
            log::debug!("no fee table for region '{}', using default", region);
            (FeeTable::default_table(), true)
        }
    };

    let fees = table
        .rates
        .iter()
        .map(|(name, pct)| (name.clone(), amount * pct / 100.0))
        .collect();

    FeeSchedule {
        region: region.to_string(),
        used_default,
        fees,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_region() {
        let schedule = calculate_taxes_and_fees(1_000_000.0, "cdmx");
        assert!(!schedule.used_default);
        assert!((schedule.fees["acquisition_tax"] - 45_000.0).abs() < 1e-9);
        assert!((schedule.fees["notary_fees"] - 18_000.0).abs() < 1e-9);
        assert!((schedule.total() - 72_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_region_uses_default() {
        let schedule = calculate_taxes_and_fees(1_000_000.0, "Atlantis");
        assert!(schedule.used_default);
        assert_eq!(schedule.fees.len(), 4);
        assert!((schedule.total() - 52_500.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_amount() {
        let schedule = calculate_taxes_and_fees(0.0, "JAL");
        assert_eq!(schedule.total(), 0.0);
    }
}
