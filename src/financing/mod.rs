//! Financing: loan schemes, amortization schedules and closing fees

mod scheme;
mod amortization;
mod fees;

pub use scheme::{
    create_financing_scheme, FinancingScheme, FinancingType, PaymentFrequency, MAX_TERM_YEARS,
};
pub use amortization::{
    calculate_amortization_table, level_payment, summarize_amortization, AmortizationEntry,
    AmortizationSummary,
};
pub use fees::{calculate_taxes_and_fees, FeeSchedule, FeeTable};
