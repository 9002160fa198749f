//! Regional market data with optional seeded jitter

mod data;
mod loader;
mod jitter;

pub use data::{MarketData, MarketTable, DEFAULT_REGION};
pub use loader::{DEFAULT_MARKET_DATA_PATH, MARKET_DATA_FILE};
pub use jitter::{JitterSource, NoJitter, SeededJitter};
