//! Monthly sales and cash-flow projection

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::cashflows::{CashFlowEntry, MonthlySale, SalesMetrics, SalesProjection};
use super::state::SalesState;
use crate::error::{ensure_percentage, FinanceError, Result};

/// Fraction of the project duration in which the optimal velocity aims to sell out
pub const SELL_THROUGH_WINDOW: f64 = 0.8;
/// Upper bound for `project_duration` and `installment_months`
pub const MAX_PROJECTION_MONTHS: u32 = 600;

/// Assumptions driving the sales projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesProjectionConfig {
    pub total_units: u32,
    /// Initial list price per unit
    pub unit_price: f64,
    pub sales_start_date: NaiveDate,
    /// Units sold per month
    pub sales_velocity: f64,
    /// Annual list price increase in percent, compounded once per year of sales
    pub price_increase_rate: f64,
    /// Percent of the price paid on reservation
    pub reservation_fee_percentage: f64,
    /// Percent of the price due at contract signing, reservation included
    pub down_payment_percentage: f64,
    /// Months over which the balance is paid; 0 means paid in full at sale
    pub installment_months: u32,
    /// Months in which units can be sold
    pub project_duration: u32,
}

impl SalesProjectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.total_units == 0 {
            return Err(FinanceError::invalid("total_units", "project must have at least one unit"));
        }
        if !self.unit_price.is_finite() || self.unit_price <= 0.0 {
            return Err(FinanceError::invalid(
                "unit_price",
                format!("price must be positive, got {}", self.unit_price),
            ));
        }
        if !self.sales_velocity.is_finite() || self.sales_velocity <= 0.0 {
            return Err(FinanceError::invalid(
                "sales_velocity",
                format!("velocity must be positive, got {}", self.sales_velocity),
            ));
        }
        if !self.price_increase_rate.is_finite() || self.price_increase_rate <= -100.0 {
            return Err(FinanceError::invalid(
                "price_increase_rate",
                format!("rate must be above -100%, got {}", self.price_increase_rate),
            ));
        }
        ensure_percentage("reservation_fee_percentage", self.reservation_fee_percentage)?;
        ensure_percentage("down_payment_percentage", self.down_payment_percentage)?;
        if self.project_duration == 0 {
            return Err(FinanceError::invalid("project_duration", "duration must be at least one month"));
        }
        for (field, months) in [
            ("project_duration", self.project_duration),
            ("installment_months", self.installment_months),
        ] {
            if months > MAX_PROJECTION_MONTHS {
                return Err(FinanceError::invalid(
                    field,
                    format!("at most {} months allowed, got {}", MAX_PROJECTION_MONTHS, months),
                ));
            }
        }
        Ok(())
    }

    /// List price in force `month` months after sales start
    pub fn price_at_month(&self, month: u32) -> f64 {
        let years_elapsed = (month / 12) as i32;
        self.unit_price * (1.0 + self.price_increase_rate / 100.0).powi(years_elapsed)
    }

    pub fn date_at_month(&self, month: u32) -> NaiveDate {
        self.sales_start_date
            .checked_add_months(Months::new(month))
            .unwrap_or(self.sales_start_date)
    }
}

/// Cash collected for a sale, by month offset from the sale
fn collection_plan(config: &SalesProjectionConfig, contract_value: f64) -> (f64, f64) {
    let reservation = contract_value * config.reservation_fee_percentage / 100.0;
    let down_payment = (contract_value * config.down_payment_percentage / 100.0 - reservation).max(0.0);
    let upfront = reservation + down_payment;
    let balance = (contract_value - upfront).max(0.0);
    (upfront, balance)
}

/// Book the collections for a month's sales into the inflow schedule
fn schedule_collections(
    config: &SalesProjectionConfig,
    inflows: &mut Vec<f64>,
    month: usize,
    contract_value: f64,
) {
    let (upfront, balance) = collection_plan(config, contract_value);
    let installments = config.installment_months as usize;
    let last = month + installments;
    if inflows.len() <= last {
        inflows.resize(last + 1, 0.0);
    }

    if installments == 0 {
        inflows[month] += upfront + balance;
        return;
    }

    inflows[month] += upfront;
    let each = balance / installments as f64;
    for slot in &mut inflows[month + 1..=last] {
        *slot += each;
    }
}

/// Project unit sales and the resulting monthly cash flow
///
/// `construction_schedule` and `indirect_schedule` are monthly outflows
/// aligned with the sales start. The horizon runs until the later of the
/// selling period, the cost schedules and the last installment.
pub fn generate_sales_projection(
    config: &SalesProjectionConfig,
    construction_schedule: &[f64],
    indirect_schedule: &[f64],
) -> Result<SalesProjection> {
    config.validate()?;
    for (field, schedule) in [
        ("construction_schedule", construction_schedule),
        ("indirect_schedule", indirect_schedule),
    ] {
        if schedule.iter().any(|v| !v.is_finite()) {
            return Err(FinanceError::invalid(field, "schedule contains non-finite amounts"));
        }
    }

    let mut state = SalesState::from_config(config);
    let mut monthly_sales = Vec::with_capacity(config.project_duration as usize);
    let mut inflows = vec![0.0; config.project_duration as usize];

    for month in 0..config.project_duration {
        let units_sold = state.advance_month(config, month);
        let revenue = units_sold as f64 * state.unit_price;
        if units_sold > 0 {
            schedule_collections(config, &mut inflows, month as usize, revenue);
        }

        monthly_sales.push(MonthlySale {
            month,
            date: config.date_at_month(month),
            units_sold,
            cumulative_units_sold: state.cumulative_units_sold,
            unit_price: state.unit_price,
            revenue,
        });
    }

    let horizon = inflows
        .len()
        .max(construction_schedule.len())
        .max(indirect_schedule.len());
    inflows.resize(horizon, 0.0);

    let mut cash_flow = Vec::with_capacity(horizon);
    let mut cumulative = 0.0;
    for (month, &sales_inflow) in inflows.iter().enumerate() {
        let construction_outflow = construction_schedule.get(month).copied().unwrap_or(0.0);
        let indirect_outflow = indirect_schedule.get(month).copied().unwrap_or(0.0);
        let total_outflow = construction_outflow + indirect_outflow;
        let net_cash_flow = sales_inflow - total_outflow;
        cumulative += net_cash_flow;

        cash_flow.push(CashFlowEntry {
            month: month as u32,
            date: config.date_at_month(month as u32),
            sales_inflow,
            construction_outflow,
            indirect_outflow,
            total_inflow: sales_inflow,
            total_outflow,
            net_cash_flow,
            cumulative_cash_flow: cumulative,
        });
    }

    let metrics = calculate_sales_metrics(config, &monthly_sales, &cash_flow, state.sold_out_month);
    log::debug!(
        "sales projection: {} months, {} of {} units sold, revenue {:.2}",
        cash_flow.len(),
        metrics.units_sold,
        config.total_units,
        metrics.total_revenue
    );

    Ok(SalesProjection {
        monthly_sales,
        cash_flow,
        metrics,
    })
}

fn calculate_sales_metrics(
    config: &SalesProjectionConfig,
    monthly_sales: &[MonthlySale],
    cash_flow: &[CashFlowEntry],
    sales_duration: Option<u32>,
) -> SalesMetrics {
    let total_revenue: f64 = monthly_sales.iter().map(|s| s.revenue).sum();
    let total_collected: f64 = cash_flow.iter().map(|e| e.total_inflow).sum();
    let total_costs: f64 = cash_flow.iter().map(|e| e.total_outflow).sum();
    let units_sold = monthly_sales.last().map(|s| s.cumulative_units_sold).unwrap_or(0);

    let selling_window = sales_duration
        .map(|m| m as usize + 1)
        .unwrap_or(monthly_sales.len());
    let average_absorption_rate = if selling_window == 0 {
        0.0
    } else {
        let sum: f64 = monthly_sales[..selling_window]
            .iter()
            .map(|s| s.units_sold as f64 / config.total_units as f64 * 100.0)
            .sum();
        sum / selling_window as f64
    };

    let break_even_month = cash_flow
        .iter()
        .find(|e| e.cumulative_cash_flow >= 0.0)
        .map(|e| e.month);

    SalesMetrics {
        total_revenue,
        total_collected,
        total_costs,
        net_profit: total_collected - total_costs,
        units_sold,
        average_absorption_rate,
        break_even_month,
        sales_duration,
    }
}

/// Suggested sales velocity (units per month)
///
/// Aims to sell out within `SELL_THROUGH_WINDOW` of the project duration but
/// never exceeds what the market absorbs per month
/// (`total_units × absorption / 100`).
pub fn calculate_optimal_sales_velocity(
    total_units: u32,
    project_duration_months: u32,
    market_absorption_pct: f64,
) -> Result<f64> {
    if project_duration_months == 0 {
        return Err(FinanceError::invalid("project_duration", "duration must be at least one month"));
    }
    ensure_percentage("market_absorption_pct", market_absorption_pct)?;
    if total_units == 0 {
        return Ok(0.0);
    }

    let units = total_units as f64;
    let target = units / (project_duration_months as f64 * SELL_THROUGH_WINDOW);
    let ceiling = units * market_absorption_pct / 100.0;
    Ok(target.min(ceiling))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::distribution::{distribute_construction_costs, CostPattern};
    use approx::assert_relative_eq;

    fn config() -> SalesProjectionConfig {
        SalesProjectionConfig {
            total_units: 24,
            unit_price: 2_500_000.0,
            sales_start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            sales_velocity: 1.5,
            price_increase_rate: 6.0,
            reservation_fee_percentage: 2.0,
            down_payment_percentage: 20.0,
            installment_months: 12,
            project_duration: 36,
        }
    }

    #[test]
    fn test_cumulative_units_monotonic_and_capped() {
        for velocity in [0.3, 1.0, 1.5, 2.7, 10.0, 40.0] {
            let cfg = SalesProjectionConfig { sales_velocity: velocity, ..config() };
            let projection = generate_sales_projection(&cfg, &[], &[]).unwrap();

            let mut previous = 0;
            for sale in &projection.monthly_sales {
                assert!(sale.cumulative_units_sold >= previous);
                assert!(sale.cumulative_units_sold <= cfg.total_units);
                assert!(sale.units_sold <= cfg.total_units - previous);
                previous = sale.cumulative_units_sold;
            }

            if velocity * cfg.project_duration as f64 >= cfg.total_units as f64 {
                assert!(projection.metrics.sales_duration.is_some(), "velocity {}", velocity);
            } else {
                assert!(projection.metrics.sales_duration.is_none(), "velocity {}", velocity);
            }
        }
    }

    #[test]
    fn test_fractional_velocity() {
        let cfg = SalesProjectionConfig { sales_velocity: 1.5, ..config() };
        let projection = generate_sales_projection(&cfg, &[], &[]).unwrap();
        let units: Vec<u32> = projection.monthly_sales.iter().take(4).map(|s| s.units_sold).collect();
        assert_eq!(units, vec![1, 2, 1, 2]);
        // 24 units at 1.5/month: sold out in month 16 (index 15)
        assert_eq!(projection.metrics.sales_duration, Some(15));
    }

    #[test]
    fn test_price_escalates_per_year() {
        let cfg = config();
        assert_eq!(cfg.price_at_month(0), 2_500_000.0);
        assert_eq!(cfg.price_at_month(11), 2_500_000.0);
        assert_relative_eq!(cfg.price_at_month(12), 2_650_000.0, max_relative = 1e-12);
        assert_relative_eq!(cfg.price_at_month(24), 2_500_000.0 * 1.06 * 1.06, max_relative = 1e-12);
    }

    #[test]
    fn test_collections_match_revenue() {
        let cfg = config();
        let projection = generate_sales_projection(&cfg, &[], &[]).unwrap();
        assert_relative_eq!(
            projection.metrics.total_collected,
            projection.metrics.total_revenue,
            max_relative = 1e-9
        );

        // First month: one unit, reservation + down payment (20% in total)
        let first = &projection.cash_flow[0];
        assert_relative_eq!(first.sales_inflow, 2_500_000.0 * 0.20, max_relative = 1e-12);

        // Following month collects the first installment of the month-0 sale
        // plus 20% of the two units sold in month 1
        let second = &projection.cash_flow[1];
        let expected = 2_500_000.0 * 0.80 / 12.0 + 2.0 * 2_500_000.0 * 0.20;
        assert_relative_eq!(second.sales_inflow, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_no_installments_collects_in_full() {
        let cfg = SalesProjectionConfig { installment_months: 0, ..config() };
        let projection = generate_sales_projection(&cfg, &[], &[]).unwrap();
        assert_eq!(projection.cash_flow.len(), cfg.project_duration as usize);
        assert_relative_eq!(projection.cash_flow[0].sales_inflow, 2_500_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_horizon_extends_for_installments_and_costs() {
        let cfg = config();
        let construction = vec![100_000.0; 48];
        let projection = generate_sales_projection(&cfg, &construction, &[]).unwrap();
        assert_eq!(projection.cash_flow.len(), 48);

        let short = SalesProjectionConfig { project_duration: 6, ..config() };
        let projection = generate_sales_projection(&short, &[], &[]).unwrap();
        // Sales end at month 5 and the last installment lands 12 months later
        assert_eq!(projection.cash_flow.len(), 18);
    }

    #[test]
    fn test_cumulative_cash_flow_recurrence() {
        let cfg = config();
        let construction = distribute_construction_costs(30_000_000.0, 18, CostPattern::Bell).unwrap();
        let indirect = distribute_construction_costs(6_000_000.0, 18, CostPattern::Linear).unwrap();
        let projection = generate_sales_projection(&cfg, &construction, &indirect).unwrap();

        let mut previous = 0.0;
        for entry in &projection.cash_flow {
            assert_relative_eq!(
                entry.cumulative_cash_flow,
                previous + entry.net_cash_flow,
                max_relative = 1e-12,
                epsilon = 1e-6
            );
            assert_relative_eq!(entry.total_outflow, entry.construction_outflow + entry.indirect_outflow);
            previous = entry.cumulative_cash_flow;
        }
        assert_relative_eq!(projection.metrics.total_costs, 36_000_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_break_even_month() {
        let cfg = config();
        let construction = distribute_construction_costs(30_000_000.0, 18, CostPattern::FrontLoaded).unwrap();
        let projection = generate_sales_projection(&cfg, &construction, &[]).unwrap();

        let month = projection.metrics.break_even_month.expect("project should break even");
        let entry = &projection.cash_flow[month as usize];
        assert!(entry.cumulative_cash_flow >= 0.0);
        for earlier in &projection.cash_flow[..month as usize] {
            assert!(earlier.cumulative_cash_flow < 0.0);
        }

        // Costs far above revenue never break even
        let construction = vec![50_000_000.0; 12];
        let projection = generate_sales_projection(&cfg, &construction, &[]).unwrap();
        assert_eq!(projection.metrics.break_even_month, None);
    }

    #[test]
    fn test_absorption_rate() {
        let cfg = SalesProjectionConfig { sales_velocity: 2.0, ..config() };
        let projection = generate_sales_projection(&cfg, &[], &[]).unwrap();
        // Two of 24 units every month until sold out
        assert_relative_eq!(projection.metrics.average_absorption_rate, 2.0 / 24.0 * 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_dates_follow_months() {
        let projection = generate_sales_projection(&config(), &[], &[]).unwrap();
        assert_eq!(projection.cash_flow[0].date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(projection.cash_flow[13].date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }

    #[test]
    fn test_invalid_config() {
        assert!(generate_sales_projection(&SalesProjectionConfig { total_units: 0, ..config() }, &[], &[]).is_err());
        assert!(generate_sales_projection(&SalesProjectionConfig { sales_velocity: 0.0, ..config() }, &[], &[]).is_err());
        assert!(generate_sales_projection(&SalesProjectionConfig { project_duration: 0, ..config() }, &[], &[]).is_err());
        assert!(generate_sales_projection(&config(), &[f64::NAN], &[]).is_err());
    }

    #[test]
    fn test_month_counts_bounded() {
        let longest = SalesProjectionConfig {
            project_duration: MAX_PROJECTION_MONTHS,
            installment_months: MAX_PROJECTION_MONTHS,
            ..config()
        };
        let projection = generate_sales_projection(&longest, &[], &[]).unwrap();
        assert!(projection.cash_flow.len() <= 2 * MAX_PROJECTION_MONTHS as usize);

        let too_long = SalesProjectionConfig { project_duration: u32::MAX, ..config() };
        assert!(generate_sales_projection(&too_long, &[], &[]).is_err());
        let too_many = SalesProjectionConfig { installment_months: u32::MAX, ..config() };
        assert!(generate_sales_projection(&too_many, &[], &[]).is_err());
    }

    #[test]
    fn test_optimal_velocity() {
        // 48 units over 24 months: sell-out target in 19.2 months
        let v = calculate_optimal_sales_velocity(48, 24, 20.0).unwrap();
        assert_relative_eq!(v, 2.5, max_relative = 1e-12);

        // Thin market caps the velocity
        let v = calculate_optimal_sales_velocity(48, 24, 2.0).unwrap();
        assert_relative_eq!(v, 0.96, max_relative = 1e-12);

        assert_eq!(calculate_optimal_sales_velocity(0, 24, 5.0).unwrap(), 0.0);
        assert!(calculate_optimal_sales_velocity(48, 0, 5.0).is_err());
        assert!(calculate_optimal_sales_velocity(48, 24, 120.0).is_err());
    }
}
