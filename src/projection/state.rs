//! Inventory state tracking during a sales projection

use super::sales::SalesProjectionConfig;

/// Guards `floor(velocity * months)` against values like 28.999999999999996
const UNIT_EPSILON: f64 = 1e-9;

/// State of the unit inventory at a point in the projection
#[derive(Debug, Clone)]
pub struct SalesState {
    /// Current projection month (0-indexed from sales start)
    pub month: u32,

    /// Units sold up to and including the current month
    pub cumulative_units_sold: u32,

    /// Units still available
    pub remaining_units: u32,

    /// List price in force for the current month
    pub unit_price: f64,

    /// First month in which the inventory ran out
    pub sold_out_month: Option<u32>,
}

impl SalesState {
    /// Initialize state at sales start
    pub fn from_config(config: &SalesProjectionConfig) -> Self {
        Self {
            month: 0,
            cumulative_units_sold: 0,
            remaining_units: config.total_units,
            unit_price: config.unit_price,
            sold_out_month: None,
        }
    }

    /// Advance to `month` and return the units sold in it
    ///
    /// The cumulative target is `floor(velocity * (month + 1))`, capped at the
    /// inventory, so fractional velocities still produce whole units and the
    /// running total never decreases.
    pub fn advance_month(&mut self, config: &SalesProjectionConfig, month: u32) -> u32 {
        self.month = month;
        self.unit_price = config.price_at_month(month);

        let target = (config.sales_velocity * (month + 1) as f64 + UNIT_EPSILON).floor();
        let target = if target >= config.total_units as f64 {
            config.total_units
        } else {
            target.max(0.0) as u32
        };

        let units = target.saturating_sub(self.cumulative_units_sold).min(self.remaining_units);
        self.cumulative_units_sold += units;
        self.remaining_units -= units;

        if self.remaining_units == 0 && self.sold_out_month.is_none() {
            self.sold_out_month = Some(month);
        }

        units
    }

    pub fn is_sold_out(&self) -> bool {
        self.remaining_units == 0
    }
}
