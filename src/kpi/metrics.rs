//! Financial KPI snapshot derived from a completed cash-flow series

use serde::{Deserialize, Serialize};

use super::discount::DiscountRate;
use super::irr::{calculate_irr, IrrStatus};
use crate::error::{FinanceError, Result};

const MONTHS_PER_YEAR: u32 = 12;

/// Division returning 0.0 whenever the result would be infinite or NaN
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Capital put in: absolute sum of the negative flows
pub fn total_invested(cashflows: &[f64]) -> f64 {
    cashflows.iter().filter(|&&cf| cf < 0.0).map(|cf| -cf).sum()
}

/// Return on investment in percent over a net cash-flow series
///
/// A series with no negative flow has nothing invested and yields 0.0.
pub fn roi(cashflows: &[f64]) -> f64 {
    let invested = total_invested(cashflows);
    let returns: f64 = cashflows.iter().filter(|&&cf| cf > 0.0).sum();
    safe_ratio(returns - invested, invested) * 100.0
}

/// Periods until the cumulative cash flow is recovered for good
///
/// Interpolates linearly inside the recovery period. `Some(0.0)` when the
/// cumulative never goes negative, `None` when it is still negative at the end.
pub fn payback_period(cashflows: &[f64]) -> Option<f64> {
    let mut cumulative = 0.0;
    let mut last_negative: Option<(usize, f64)> = None;
    for (t, &cf) in cashflows.iter().enumerate() {
        cumulative += cf;
        if cumulative < 0.0 {
            last_negative = Some((t, cumulative));
        }
    }

    let Some((t, deficit)) = last_negative else {
        return Some(0.0);
    };
    let recovery = cashflows.get(t + 1)?;
    let fraction = safe_ratio(-deficit, *recovery).clamp(0.0, 1.0);
    Some(t as f64 + fraction)
}

/// NPV per unit invested, plus one
pub fn profitability_index(npv: f64, invested: f64) -> f64 {
    if invested == 0.0 {
        return 0.0;
    }
    safe_ratio(npv, invested) + 1.0
}

/// Everything the KPI snapshot is computed from
#[derive(Debug, Clone, Copy)]
pub struct KpiInputs<'a> {
    /// Monthly net cash flows, month 0 first
    pub net_cash_flows: &'a [f64],
    pub total_revenue: f64,
    pub total_cost: f64,
    pub area_m2: f64,
    /// Yearly loan payments, when the project is financed
    pub annual_debt_service: Option<f64>,
    pub discount_rate: DiscountRate,
}

/// Read-only KPI snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialKPIs {
    /// Percent
    pub roi: f64,
    /// Annualized, percent
    pub irr: f64,
    pub irr_status: IrrStatus,
    pub npv: f64,
    /// Months
    pub payback_period: Option<f64>,
    pub profitability_index: f64,
    /// Percent of revenue
    pub profit_margin: f64,
    pub cost_per_m2: f64,
    pub revenue_per_m2: f64,
    pub profit_per_m2: f64,
    pub debt_service_coverage_ratio: f64,
    /// Percent of revenue needed to cover cost
    pub break_even_occupancy: f64,
    /// Percent
    pub cap_rate: f64,
}

pub fn calculate_kpis(inputs: &KpiInputs) -> Result<FinancialKPIs> {
    let flows = inputs.net_cash_flows;
    if flows.is_empty() {
        return Err(FinanceError::IncompleteData {
            missing: vec!["net_cash_flows"],
        });
    }
    if flows.iter().any(|cf| !cf.is_finite()) {
        return Err(FinanceError::invalid("net_cash_flows", "series contains non-finite values"));
    }

    let (irr, irr_status) = match calculate_irr(flows) {
        Some(estimate) => {
            let annual = estimate.annualized(MONTHS_PER_YEAR) * 100.0;
            if annual.is_finite() {
                (annual, estimate.status)
            } else {
                (0.0, IrrStatus::Undefined)
            }
        }
        None => (0.0, IrrStatus::Undefined),
    };

    let npv = inputs.discount_rate.npv_monthly(flows);
    let invested = total_invested(flows);
    let profit = inputs.total_revenue - inputs.total_cost;

    let horizon_years = flows.len() as f64 / MONTHS_PER_YEAR as f64;
    let annual_noi = safe_ratio(profit, horizon_years);
    let debt_service_coverage_ratio = inputs
        .annual_debt_service
        .map(|service| safe_ratio(annual_noi, service))
        .unwrap_or(0.0);

    let kpis = FinancialKPIs {
        roi: roi(flows),
        irr,
        irr_status,
        npv,
        payback_period: payback_period(flows),
        profitability_index: profitability_index(npv, invested),
        profit_margin: safe_ratio(profit, inputs.total_revenue) * 100.0,
        cost_per_m2: safe_ratio(inputs.total_cost, inputs.area_m2),
        revenue_per_m2: safe_ratio(inputs.total_revenue, inputs.area_m2),
        profit_per_m2: safe_ratio(profit, inputs.area_m2),
        debt_service_coverage_ratio,
        break_even_occupancy: safe_ratio(inputs.total_cost, inputs.total_revenue) * 100.0,
        cap_rate: safe_ratio(annual_noi, inputs.total_cost) * 100.0,
    };

    log::debug!(
        "kpis: roi {:.2}%, irr {:.2}% ({:?}), npv {:.2}",
        kpis.roi,
        kpis.irr,
        kpis.irr_status,
        kpis.npv
    );
    Ok(kpis)
}
