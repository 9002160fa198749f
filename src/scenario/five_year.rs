//! Five-year roll-up of a scenario's monthly series

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::simulator::Scenario;
use crate::kpi::safe_ratio;

pub const PROJECTION_YEARS: u32 = 5;
const MONTHS_PER_YEAR: usize = 12;

/// Totals over one 12-month window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    /// Cash collected from sales
    pub revenue: f64,
    pub costs: f64,
    pub profit: f64,
    /// Cumulative cash position at year end
    pub cash_flow: f64,
    /// Year profit over year costs, percent
    pub roi: f64,
    pub units_sold: u32,
}

/// Running totals across the projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativeValues {
    pub revenue: f64,
    pub costs: f64,
    pub profit: f64,
    pub units_sold: u32,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveYearProjection {
    /// Keyed by year, 1 through 5
    pub years: BTreeMap<u32, YearSummary>,
    pub cumulative: CumulativeValues,
}

/// Bucket the scenario's monthly cash flow into five 12-month windows
///
/// Months past year five are left out; years with no activity carry the
/// previous cash position.
pub fn generate_five_year_projection(scenario: &Scenario) -> FiveYearProjection {
    let cash_flow = &scenario.sales_projection.cash_flow;
    let sales = &scenario.sales_projection.monthly_sales;

    let mut years = BTreeMap::new();
    let mut cumulative = CumulativeValues::default();
    let mut cash_position = 0.0;

    for year in 1..=PROJECTION_YEARS {
        let start = (year as usize - 1) * MONTHS_PER_YEAR;
        let end = start + MONTHS_PER_YEAR;
        let window = cash_flow.get(start..end.min(cash_flow.len())).unwrap_or(&[]);

        let revenue: f64 = window.iter().map(|e| e.total_inflow).sum();
        let costs: f64 = window.iter().map(|e| e.total_outflow).sum();
        if let Some(last) = window.last() {
            cash_position = last.cumulative_cash_flow;
        }
        let units_sold: u32 = sales
            .get(start..end.min(sales.len()))
            .unwrap_or(&[])
            .iter()
            .map(|s| s.units_sold)
            .sum();

        let profit = revenue - costs;
        cumulative.revenue += revenue;
        cumulative.costs += costs;
        cumulative.profit += profit;
        cumulative.units_sold += units_sold;

        years.insert(
            year,
            YearSummary {
                revenue,
                costs,
                profit,
                cash_flow: cash_position,
                roi: safe_ratio(profit, costs) * 100.0,
                units_sold,
            },
        );
    }
    cumulative.roi = safe_ratio(cumulative.profit, cumulative.costs) * 100.0;

    FiveYearProjection { years, cumulative }
}
