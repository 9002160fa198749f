//! Sales and cash-flow output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Units sold in one month of the projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySale {
    /// Projection month (0-indexed from sales start)
    pub month: u32,
    pub date: NaiveDate,
    pub units_sold: u32,
    pub cumulative_units_sold: u32,
    /// List price in force this month
    pub unit_price: f64,
    /// Contract value of the units sold this month
    pub revenue: f64,
}

/// A single month of the cash-flow series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    pub month: u32,
    pub date: NaiveDate,

    // Inflows
    pub sales_inflow: f64,

    // Outflows
    pub construction_outflow: f64,
    pub indirect_outflow: f64,

    // Summary
    pub total_inflow: f64,
    pub total_outflow: f64,
    pub net_cash_flow: f64,
    pub cumulative_cash_flow: f64,
}

/// Headline figures of a sales projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesMetrics {
    /// Sum of unit prices at time of sale
    pub total_revenue: f64,
    /// Cash actually collected within the horizon
    pub total_collected: f64,
    pub total_costs: f64,
    pub net_profit: f64,
    pub units_sold: u32,
    /// Mean monthly sales as a percent of total units over the selling window
    pub average_absorption_rate: f64,
    /// First month with non-negative cumulative cash flow
    pub break_even_month: Option<u32>,
    /// Month in which the last unit sold
    pub sales_duration: Option<u32>,
}

/// Complete sales projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesProjection {
    pub monthly_sales: Vec<MonthlySale>,
    pub cash_flow: Vec<CashFlowEntry>,
    pub metrics: SalesMetrics,
}

impl SalesProjection {
    /// Net cash flow per month, ready for IRR/NPV
    pub fn net_cash_flows(&self) -> Vec<f64> {
        self.cash_flow.iter().map(|e| e.net_cash_flow).collect()
    }

    pub fn horizon_months(&self) -> u32 {
        self.cash_flow.len() as u32
    }

    /// Lowest point of the cumulative cash flow (peak funding need)
    pub fn max_exposure(&self) -> f64 {
        self.cash_flow
            .iter()
            .map(|e| e.cumulative_cash_flow)
            .fold(0.0, f64::min)
            .abs()
    }
}
