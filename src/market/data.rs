//! Regional market parameters

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::jitter::JitterSource;
use crate::error::{ensure_percentage, FinanceError, Result};

/// Key of the row used for regions without their own data
pub const DEFAULT_REGION: &str = "default";

/// Market conditions for one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub region: String,
    /// Typical sale price per m²
    pub price_per_m2: f64,
    /// Percent of a project's inventory the market absorbs per month
    pub absorption_rate: f64,
    /// Percent per year
    pub annual_appreciation: f64,
    /// Percent per year
    pub discount_rate: f64,
    /// Percent per year
    pub inflation_rate: f64,
    /// Regional construction cost factor
    pub location_factor: f64,
}

impl MarketData {
    fn new(
        region: &str,
        price_per_m2: f64,
        absorption_rate: f64,
        annual_appreciation: f64,
        discount_rate: f64,
        inflation_rate: f64,
        location_factor: f64,
    ) -> Self {
        Self {
            region: region.to_string(),
            price_per_m2,
            absorption_rate,
            annual_appreciation,
            discount_rate,
            inflation_rate,
            location_factor,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.price_per_m2.is_finite() || self.price_per_m2 <= 0.0 {
            return Err(FinanceError::MarketData(format!(
                "{}: price_per_m2 must be positive, got {}",
                self.region, self.price_per_m2
            )));
        }
        if !self.location_factor.is_finite() || self.location_factor <= 0.0 {
            return Err(FinanceError::MarketData(format!(
                "{}: location_factor must be positive, got {}",
                self.region, self.location_factor
            )));
        }
        ensure_percentage("absorption_rate", self.absorption_rate)?;
        ensure_percentage("discount_rate", self.discount_rate)?;
        Ok(())
    }

    /// Inflation expressed as a multiplier on today's costs
    pub fn inflation_factor(&self) -> f64 {
        1.0 + self.inflation_rate / 100.0
    }
}

/// Market data keyed by upper-cased region code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketTable {
    regions: BTreeMap<String, MarketData>,
}

impl MarketTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in table covering the regions the fee tables know about
    pub fn default_regions() -> Self {
        let mut table = Self::new();
        for row in [
            MarketData::new(DEFAULT_REGION, 25_000.0, 5.0, 5.0, 12.0, 4.5, 1.0),
            MarketData::new("CDMX", 45_000.0, 4.0, 7.0, 12.0, 4.5, 1.25),
            MarketData::new("JAL", 32_000.0, 5.0, 6.0, 12.0, 4.5, 1.05),
            MarketData::new("NL", 35_000.0, 5.0, 6.5, 12.0, 4.5, 1.10),
            MarketData::new("QRO", 28_000.0, 6.0, 8.0, 11.0, 4.5, 1.0),
            MarketData::new("QROO", 38_000.0, 4.5, 9.0, 13.0, 4.5, 1.15),
        ] {
            table.insert(row);
        }
        table
    }

    pub fn insert(&mut self, row: MarketData) {
        let key = normalize_region(&row.region);
        self.regions.insert(key, row);
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Row for `region`, falling back to the default row
    pub fn get(&self, region: &str) -> Result<&MarketData> {
        if let Some(row) = self.regions.get(&normalize_region(region)) {
            return Ok(row);
        }
        log::debug!("no market data for region '{}', using default", region);
        self.regions
            .get(&normalize_region(DEFAULT_REGION))
            .ok_or_else(|| FinanceError::MarketData(format!("no data for '{}' and no default row", region)))
    }

    /// Market data for `region` with price and absorption perturbed by `jitter`
    pub fn load(&self, region: &str, spread: f64, jitter: &mut impl JitterSource) -> Result<MarketData> {
        let mut data = self.get(region)?.clone();
        data.price_per_m2 *= jitter.factor(spread);
        data.absorption_rate = (data.absorption_rate * jitter.factor(spread)).clamp(0.0, 100.0);
        Ok(data)
    }
}

fn normalize_region(region: &str) -> String {
    region.trim().to_ascii_uppercase()
}
