//! Fixed-payment amortization schedules

use serde::{Deserialize, Serialize};

use super::scheme::FinancingScheme;

/// One payment period of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// Payment number (1-indexed)
    pub period: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    /// Outstanding balance after this payment
    pub balance: f64,
}

/// Level payment for a loan
///
/// Falls back to straight-line repayment when the rate is zero.
pub fn level_payment(loan_amount: f64, periodic_rate: f64, periods: u32) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    if periodic_rate == 0.0 {
        return loan_amount / periods as f64;
    }
    loan_amount * periodic_rate / (1.0 - (1.0 + periodic_rate).powf(-(periods as f64)))
}

/// Build the full payment schedule for a scheme
///
/// The last period takes whatever balance is left as principal so the schedule
/// always closes at exactly zero.
pub fn calculate_amortization_table(scheme: &FinancingScheme) -> Vec<AmortizationEntry> {
    let periods = scheme.number_of_periods();
    if scheme.loan_amount <= 0.0 || periods == 0 {
        return Vec::new();
    }

    let rate = scheme.periodic_rate();
    let payment = level_payment(scheme.loan_amount, rate, periods);

    let mut table = Vec::with_capacity(periods as usize);
    let mut balance = scheme.loan_amount;

    for period in 1..=periods {
        let interest = balance * rate;
        let (principal, payment) = if period == periods {
            (balance, balance + interest)
        } else {
            (payment - interest, payment)
        };
        balance = if period == periods { 0.0 } else { balance - principal };

        table.push(AmortizationEntry {
            period,
            payment,
            principal,
            interest,
            balance,
        });
    }

    table
}

/// Aggregate cost of a financing scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub number_of_payments: u32,
    pub periodic_payment: f64,
    pub total_paid: f64,
    pub total_principal: f64,
    pub total_interest: f64,
    pub origination_fee: f64,
    /// Interest plus origination fee
    pub total_cost_of_credit: f64,
    /// Scheduled payments falling in one year
    pub annual_debt_service: f64,
}

pub fn summarize_amortization(scheme: &FinancingScheme, table: &[AmortizationEntry]) -> AmortizationSummary {
    let total_paid: f64 = table.iter().map(|e| e.payment).sum();
    let total_principal: f64 = table.iter().map(|e| e.principal).sum();
    let total_interest: f64 = table.iter().map(|e| e.interest).sum();
    let periodic_payment = table.first().map(|e| e.payment).unwrap_or(0.0);

    AmortizationSummary {
        number_of_payments: table.len() as u32,
        periodic_payment,
        total_paid,
        total_principal,
        total_interest,
        origination_fee: scheme.origination_fee_amount,
        total_cost_of_credit: total_interest + scheme.origination_fee_amount,
        annual_debt_service: periodic_payment * scheme.payment_frequency.periods_per_year() as f64,
    }
}
