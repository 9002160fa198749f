//! Financial KPIs: IRR, NPV, ROI, payback and per-area metrics

mod irr;
mod discount;
mod metrics;

pub use irr::{annualize_rate, calculate_irr, npv_at_rate, IrrEstimate, IrrStatus, MAX_ITERATIONS, TOLERANCE};
pub use discount::{net_present_value, DiscountRate, DEFAULT_DISCOUNT_RATE};
pub use metrics::{
    calculate_kpis, payback_period, profitability_index, roi, safe_ratio, total_invested,
    FinancialKPIs, KpiInputs,
};
