//! Spreading a cost total over a construction schedule

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ensure_non_negative, FinanceError, Result};

/// Shape of the monthly spend curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostPattern {
    /// Equal spend every month
    Linear,
    /// Spend highest at the start, decreasing linearly
    FrontLoaded,
    /// Spend lowest at the start, increasing linearly
    BackLoaded,
    /// Gaussian curve peaking mid-schedule
    #[default]
    Bell,
}

impl FromStr for CostPattern {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "linear" => Ok(CostPattern::Linear),
            "front-loaded" | "frontloaded" => Ok(CostPattern::FrontLoaded),
            "back-loaded" | "backloaded" => Ok(CostPattern::BackLoaded),
            "bell" => Ok(CostPattern::Bell),
            other => Err(FinanceError::invalid("cost_pattern", format!("unknown pattern '{}'", other))),
        }
    }
}

/// Normalised weights (summing to 1) for `months` samples
pub fn pattern_weights(pattern: CostPattern, months: u32) -> Vec<f64> {
    let n = months as usize;
    let raw: Vec<f64> = match pattern {
        CostPattern::Linear => vec![1.0; n],
        CostPattern::FrontLoaded => (0..n).map(|i| (n - i) as f64).collect(),
        CostPattern::BackLoaded => (0..n).map(|i| (i + 1) as f64).collect(),
        CostPattern::Bell => {
            let centre = (n as f64 - 1.0) / 2.0;
            let sigma = (n as f64 / 4.0).max(0.5);
            (0..n)
                .map(|i| {
                    let z = (i as f64 - centre) / sigma;
                    (-0.5 * z * z).exp()
                })
                .collect()
        }
    };

    let sum: f64 = raw.iter().sum();
    if sum <= 0.0 {
        return raw;
    }
    raw.into_iter().map(|w| w / sum).collect()
}

/// Distribute `total_cost` over `duration_months` following `pattern`
///
/// The returned monthly amounts always add back up to `total_cost`.
pub fn distribute_construction_costs(
    total_cost: f64,
    duration_months: u32,
    pattern: CostPattern,
) -> Result<Vec<f64>> {
    ensure_non_negative("total_cost", total_cost)?;
    if duration_months == 0 {
        return Err(FinanceError::invalid(
            "duration_months",
            "costs need at least one month to be spread over",
        ));
    }

    Ok(pattern_weights(pattern, duration_months)
        .into_iter()
        .map(|w| w * total_cost)
        .collect())
}
