//! Internal Rate of Return (IRR) calculation
//!
//! Solves for the periodic rate at which the net present value of a cash-flow
//! series is zero.

use serde::{Deserialize, Serialize};

/// Starting guess for the periodic rate
pub const INITIAL_GUESS: f64 = 0.10;
/// Convergence tolerance on the rate step
pub const TOLERANCE: f64 = 1e-5;
pub const MAX_ITERATIONS: u32 = 100;

const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;
/// Residual NPV accepted at a root, relative to the gross cash volume
const ROOT_TOLERANCE: f64 = 1e-6;

/// Whether the solver met its tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IrrStatus {
    Converged,
    /// Iterations ran out (or the derivative vanished); `rate` is the last estimate
    BestEffort,
    /// The series has no sign change so no rate exists
    Undefined,
}

/// Periodic IRR together with how it was obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrEstimate {
    /// Rate per period of the input series, as a decimal
    pub rate: f64,
    pub iterations: u32,
    pub status: IrrStatus,
}

impl IrrEstimate {
    pub fn is_converged(&self) -> bool {
        self.status == IrrStatus::Converged
    }

    /// Annualized rate for a series with `periods_per_year` periods
    pub fn annualized(&self, periods_per_year: u32) -> f64 {
        annualize_rate(self.rate, periods_per_year)
    }
}

/// Calculate the IRR of `cashflows` using the Newton-Raphson method.
///
/// # Arguments
/// * `cashflows` - Cash flows per period (positive = inflow, negative = outflow)
///
/// # Returns
/// * `None` when the series is empty or never changes sign
/// * `Some(estimate)` otherwise; check `estimate.status` before trusting a
///   `BestEffort` rate
pub fn calculate_irr(cashflows: &[f64]) -> Option<IrrEstimate> {
    if cashflows.is_empty() {
        return None;
    }

    // At least one sign change is required for an IRR to exist
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = INITIAL_GUESS;

    for iteration in 1..=MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if !dnpv.is_finite() || dnpv.abs() < 1e-20 {
            return Some(best_effort(cashflows, rate, iteration));
        }

        let new_rate = (rate - npv / dnpv).clamp(MIN_RATE, MAX_RATE);
        if !new_rate.is_finite() {
            return Some(best_effort(cashflows, rate, iteration));
        }

        if (new_rate - rate).abs() < TOLERANCE {
            // A step that stalls against a clamp bound is not a root
            if !is_root(cashflows, new_rate) {
                return Some(best_effort(cashflows, new_rate, iteration));
            }
            return Some(IrrEstimate {
                rate: new_rate,
                iterations: iteration,
                status: IrrStatus::Converged,
            });
        }

        rate = new_rate;
    }

    Some(best_effort(cashflows, rate, MAX_ITERATIONS))
}

/// Newton stalled: try a bracketing search before settling for the last estimate
fn best_effort(cashflows: &[f64], rate: f64, iterations: u32) -> IrrEstimate {
    if let Some(root) = calculate_irr_bisection(cashflows) {
        log::debug!("newton-raphson stalled after {} iterations, bisection found {:.6}", iterations, root);
        return IrrEstimate {
            rate: root,
            iterations,
            status: IrrStatus::Converged,
        };
    }

    log::warn!(
        "IRR did not converge after {} iterations, returning best-effort rate {:.6}",
        iterations,
        rate
    );
    IrrEstimate {
        rate,
        iterations,
        status: IrrStatus::BestEffort,
    }
}

fn is_root(cashflows: &[f64], rate: f64) -> bool {
    let scale: f64 = cashflows.iter().map(|cf| cf.abs()).sum();
    let npv = npv_at_rate(cashflows, rate);
    npv.is_finite() && npv.abs() <= ROOT_TOLERANCE * scale
}

/// NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / ((1.0 + rate).powi(t as i32 + 1));
        }
    }

    (npv, dnpv)
}

/// Bisection over the clamped rate range; None if the range does not bracket a root
fn calculate_irr_bisection(cashflows: &[f64]) -> Option<f64> {
    let mut low = MIN_RATE;
    let mut high = MAX_RATE;

    let mut npv_low = npv_at_rate(cashflows, low);
    let npv_high = npv_at_rate(cashflows, high);
    if !npv_low.is_finite() || !npv_high.is_finite() || npv_low * npv_high > 0.0 {
        return None;
    }

    for _ in 0..200 {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        if npv_mid.abs() < 1e-10 || (high - low) / 2.0 < TOLERANCE * 1e-3 {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// NPV at a given periodic rate, first flow undiscounted
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Compound a periodic rate up to an annual one
pub fn annualize_rate(periodic_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powi(periods_per_year as i32) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_irr() {
        // 1000 grows to 1331 over three periods at 10%
        let cashflows = [-1000.0, 0.0, 0.0, 1331.0];
        let irr = calculate_irr(&cashflows).unwrap();
        assert!(irr.is_converged());
        assert!((irr.rate - 0.10).abs() < 1e-4, "Expected ~10% IRR, got {}", irr.rate);
    }

    #[test]
    fn test_npv_at_irr_is_zero() {
        let cashflows = [-5000.0, 1200.0, 1500.0, 1800.0, 2100.0];
        let irr = calculate_irr(&cashflows).unwrap();
        let npv = npv_at_rate(&cashflows, irr.rate);
        assert!(npv.abs() < 1e-2, "NPV at IRR should vanish, got {}", npv);
    }

    #[test]
    fn test_monthly_series_annualizes() {
        // Investment of 1000, returns 1100 after 12 months
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![0.0; 11]);
        cashflows.push(1100.0);

        let irr = calculate_irr(&cashflows).unwrap();
        assert!((irr.annualized(12) - 0.10).abs() < 1e-3, "got {}", irr.annualized(12));
    }

    #[test]
    fn test_no_sign_change() {
        assert!(calculate_irr(&[]).is_none());
        assert!(calculate_irr(&[100.0, 200.0]).is_none());
        assert!(calculate_irr(&[-100.0, -200.0]).is_none());
        assert!(calculate_irr(&[0.0, 0.0]).is_none());
    }

    #[test]
    fn test_rate_stays_in_bounds() {
        // Extreme return forces the clamp; the true root lies far above MAX_RATE
        let cashflows = [-1.0, 1_000_000.0];
        let irr = calculate_irr(&cashflows).unwrap();
        assert!(irr.rate.is_finite());
        assert!(irr.rate <= MAX_RATE);
        assert_eq!(irr.status, IrrStatus::BestEffort);
        assert!(!irr.is_converged());
        assert!(npv_at_rate(&cashflows, irr.rate).abs() > 1.0);

        // Near-total loss, root at -90% is inside the range
        let cashflows = [-1000.0, 0.0, 0.0, 1.0];
        let irr = calculate_irr(&cashflows).unwrap();
        assert!(irr.rate.is_finite());
        assert!(irr.rate >= MIN_RATE);
        assert!(irr.is_converged());
        assert!((irr.rate + 0.9).abs() < 1e-4, "got {}", irr.rate);
    }

    #[test]
    fn test_root_below_range_is_best_effort() {
        // Root at -99.9999%, below MIN_RATE, so nothing brackets it
        let cashflows = [-1.0, 0.000_001];
        let irr = calculate_irr(&cashflows).unwrap();
        assert_eq!(irr.status, IrrStatus::BestEffort);
        assert!(irr.rate.is_finite());
        assert!(irr.rate >= MIN_RATE && irr.rate <= MAX_RATE);
    }

    #[test]
    fn test_converged_rate_is_a_root() {
        for cashflows in [
            vec![-1000.0, 0.0, 0.0, 1331.0],
            vec![-5000.0, 1200.0, 1500.0, 1800.0, 2100.0],
            vec![-100.0, 250.0],
        ] {
            let irr = calculate_irr(&cashflows).unwrap();
            assert!(irr.is_converged());
            assert!(is_root(&cashflows, irr.rate), "rate {} for {:?}", irr.rate, cashflows);
        }
    }

    #[test]
    fn test_annualize_rate() {
        assert!((annualize_rate(0.01, 12) - 0.126825).abs() < 1e-6);
        assert_eq!(annualize_rate(0.0, 12), 0.0);
    }
}
