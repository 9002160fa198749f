//! Sales velocity and monthly cash-flow projection

mod distribution;
mod state;
mod sales;
mod cashflows;

pub use distribution::{distribute_construction_costs, pattern_weights, CostPattern};
pub use state::SalesState;
pub use sales::{
    calculate_optimal_sales_velocity, generate_sales_projection, SalesProjectionConfig,
    MAX_PROJECTION_MONTHS, SELL_THROUGH_WINDOW,
};
pub use cashflows::{CashFlowEntry, MonthlySale, SalesMetrics, SalesProjection};
