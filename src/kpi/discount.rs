//! Discount rate handling for present value calculations

use serde::{Deserialize, Serialize};

use super::irr::npv_at_rate;

/// Annual discount rate (percent) applied when none is supplied
pub const DEFAULT_DISCOUNT_RATE: f64 = 12.0;

/// Annual discount rate used to value monthly cash flows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountRate {
    /// Annual rate in percent (12.0 = 12%)
    pub annual_rate: f64,
}

impl DiscountRate {
    pub fn annual(annual_rate_pct: f64) -> Self {
        Self {
            annual_rate: annual_rate_pct,
        }
    }

    /// Effective monthly rate equivalent to the annual rate
    pub fn monthly_rate(&self) -> f64 {
        (1.0 + self.annual_rate / 100.0).powf(1.0 / 12.0) - 1.0
    }

    /// Discount factor to the end of `months`
    pub fn discount_to_month(&self, months: u32) -> f64 {
        (1.0 + self.monthly_rate()).powi(-(months as i32))
    }

    /// NPV of a monthly series, month 0 undiscounted
    pub fn npv_monthly(&self, cashflows: &[f64]) -> f64 {
        net_present_value(cashflows, self.monthly_rate())
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        Self::annual(DEFAULT_DISCOUNT_RATE)
    }
}

/// Present value of `cashflows` at a periodic rate (decimal), first flow undiscounted
pub fn net_present_value(cashflows: &[f64], periodic_rate: f64) -> f64 {
    if periodic_rate <= -1.0 {
        return 0.0;
    }
    npv_at_rate(cashflows, periodic_rate)
}
