//! CSV-based market data loader
//!
//! Loads regional market data from data/market/market_data.csv

use std::fs::File;
use std::path::Path;

use super::data::{MarketData, MarketTable};
use crate::error::{FinanceError, Result};

/// Default path to the market data directory
pub const DEFAULT_MARKET_DATA_PATH: &str = "data/market";

/// File read from the market data directory
pub const MARKET_DATA_FILE: &str = "market_data.csv";

impl MarketTable {
    /// Load from the default directory
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(DEFAULT_MARKET_DATA_PATH))
    }

    /// Load `market_data.csv` from `path`
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path.join(MARKET_DATA_FILE))?;
        Self::from_reader(file)
    }

    /// Parse rows with the header
    /// `region,price_per_m2,absorption_rate,annual_appreciation,discount_rate,inflation_rate,location_factor`
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut table = MarketTable::new();

        for result in reader.deserialize() {
            let row: MarketData = result?;
            row.validate()?;
            table.insert(row);
        }

        if table.is_empty() {
            return Err(FinanceError::MarketData("market data file has no rows".to_string()));
        }
        log::debug!("loaded market data for {} regions", table.len());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
region,price_per_m2,absorption_rate,annual_appreciation,discount_rate,inflation_rate,location_factor
default,25000,5,5,12,4.5,1.0
MTY,36000,5.5,6,12,4.5,1.1
";

    #[test]
    fn test_from_reader() {
        let table = MarketTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        let mty = table.get("mty").unwrap();
        assert_eq!(mty.price_per_m2, 36_000.0);
        assert_eq!(mty.location_factor, 1.1);
    }

    #[test]
    fn test_bad_rows_are_rejected() {
        let bad = "region,price_per_m2,absorption_rate,annual_appreciation,discount_rate,inflation_rate,location_factor\nX,-1,5,5,12,4.5,1.0\n";
        assert!(matches!(MarketTable::from_reader(bad.as_bytes()), Err(FinanceError::MarketData(_))));

        let malformed = "region,price_per_m2\nX,abc\n";
        assert!(matches!(MarketTable::from_reader(malformed.as_bytes()), Err(FinanceError::Csv(_))));

        let header_only = "region,price_per_m2,absorption_rate,annual_appreciation,discount_rate,inflation_rate,location_factor\n";
        assert!(MarketTable::from_reader(header_only.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_directory() {
        let err = MarketTable::from_csv_path(Path::new("does/not/exist")).unwrap_err();
        assert!(matches!(err, FinanceError::Io(_)));
    }

    #[test]
    fn test_bundled_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_MARKET_DATA_PATH);
        let table = MarketTable::from_csv_path(&path).unwrap();
        assert!(table.get("CDMX").is_ok());
    }
}
