//! Financing scheme definition

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ensure_non_negative, ensure_percentage, FinanceError, Result};

/// Longest loan term accepted, in years
pub const MAX_TERM_YEARS: u32 = 50;

/// Source of the credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinancingType {
    /// Conventional bank construction loan
    BankLoan,
    /// Credit extended directly by the developer
    DeveloperCredit,
    /// Short-term bridge loan
    BridgeLoan,
}

/// How often payments fall due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentFrequency {
    Monthly,
    Quarterly,
    Annually,
}

impl PaymentFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Annually => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::Annually => "annually",
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(PaymentFrequency::Monthly),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "annually" | "annual" | "yearly" => Ok(PaymentFrequency::Annually),
            other => Err(FinanceError::invalid("payment_frequency", format!("unknown frequency '{}'", other))),
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinancingType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "bank-loan" | "bank" => Ok(FinancingType::BankLoan),
            "developer-credit" | "developer" => Ok(FinancingType::DeveloperCredit),
            "bridge-loan" | "bridge" => Ok(FinancingType::BridgeLoan),
            other => Err(FinanceError::invalid("financing_type", format!("unknown financing type '{}'", other))),
        }
    }
}

/// Loan terms derived from the amount being financed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingScheme {
    pub financing_type: FinancingType,
    pub total_amount: f64,
    /// Percent of `total_amount` paid up front
    pub down_payment_percentage: f64,
    pub down_payment: f64,
    /// Amortization principal
    pub loan_amount: f64,
    /// Annual nominal rate in percent
    pub interest_rate: f64,
    pub term_years: u32,
    pub payment_frequency: PaymentFrequency,
    pub origination_fee_percentage: f64,
    pub origination_fee_amount: f64,
}

impl FinancingScheme {
    /// Interest rate per payment period as a decimal
    pub fn periodic_rate(&self) -> f64 {
        self.interest_rate / 100.0 / self.payment_frequency.periods_per_year() as f64
    }

    /// Total number of payments
    pub fn number_of_periods(&self) -> u32 {
        self.term_years.saturating_mul(self.payment_frequency.periods_per_year())
    }
}

/// Build a financing scheme, deriving down payment, loan amount and fees
pub fn create_financing_scheme(
    financing_type: FinancingType,
    total_amount: f64,
    down_payment_percentage: f64,
    interest_rate: f64,
    term_years: u32,
    payment_frequency: PaymentFrequency,
    origination_fee_percentage: f64,
) -> Result<FinancingScheme> {
    ensure_non_negative("total_amount", total_amount)?;
    ensure_percentage("down_payment_percentage", down_payment_percentage)?;
    ensure_percentage("interest_rate", interest_rate)?;
    ensure_percentage("origination_fee_percentage", origination_fee_percentage)?;
    if term_years == 0 {
        return Err(FinanceError::invalid("term_years", "term must be at least one year"));
    }
    if term_years > MAX_TERM_YEARS {
        return Err(FinanceError::invalid(
            "term_years",
            format!("term must be at most {} years, got {}", MAX_TERM_YEARS, term_years),
        ));
    }

    let down_payment = total_amount * down_payment_percentage / 100.0;
    let loan_amount = total_amount - down_payment;
    let origination_fee_amount = loan_amount * origination_fee_percentage / 100.0;

    Ok(FinancingScheme {
        financing_type,
        total_amount,
        down_payment_percentage,
        down_payment,
        loan_amount,
        interest_rate,
        term_years,
        payment_frequency,
        origination_fee_percentage,
        origination_fee_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_amounts() {
        let scheme = create_financing_scheme(
            FinancingType::BankLoan,
            5_000_000.0,
            20.0,
            10.5,
            15,
            PaymentFrequency::Monthly,
            1.5,
        )
        .unwrap();

        assert_eq!(scheme.down_payment, 1_000_000.0);
        assert_eq!(scheme.loan_amount, 4_000_000.0);
        assert!((scheme.down_payment + scheme.loan_amount - scheme.total_amount).abs() < 1e-6);
        assert!((scheme.origination_fee_amount - 60_000.0).abs() < 1e-6);
        assert_eq!(scheme.number_of_periods(), 180);
        assert!((scheme.periodic_rate() - 0.105 / 12.0).abs() < 1e-15);
    }

    #[test]
    fn test_frequency_periods() {
        assert_eq!(PaymentFrequency::Monthly.periods_per_year(), 12);
        assert_eq!(PaymentFrequency::Quarterly.periods_per_year(), 4);
        assert_eq!(PaymentFrequency::Annually.periods_per_year(), 1);
        assert_eq!("Quarterly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Quarterly);
        assert_eq!("bridge".parse::<FinancingType>().unwrap(), FinancingType::BridgeLoan);
    }

    #[test]
    fn test_invalid_terms() {
        let make = |down: f64, rate: f64, term: u32| {
            create_financing_scheme(
                FinancingType::BankLoan,
                1_000_000.0,
                down,
                rate,
                term,
                PaymentFrequency::Monthly,
                0.0,
            )
        };
        assert!(make(120.0, 8.0, 10).is_err());
        assert!(make(20.0, -1.0, 10).is_err());
        assert!(make(20.0, 8.0, 0).is_err());
        assert!(make(20.0, 0.0, 10).is_ok());
        assert!(make(20.0, 8.0, MAX_TERM_YEARS).is_ok());
        assert!(make(20.0, 8.0, MAX_TERM_YEARS + 1).is_err());
        assert!(make(20.0, 8.0, 400_000_000).is_err());
    }

    #[test]
    fn test_period_count_saturates() {
        let mut scheme = create_financing_scheme(
            FinancingType::BankLoan,
            1_000_000.0,
            20.0,
            8.0,
            MAX_TERM_YEARS,
            PaymentFrequency::Monthly,
            0.0,
        )
        .unwrap();
        assert_eq!(scheme.number_of_periods(), 600);

        // Hand-built schemes skip validation
        scheme.term_years = u32::MAX;
        assert_eq!(scheme.number_of_periods(), u32::MAX);
    }
}
