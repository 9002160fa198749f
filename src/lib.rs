//! Real Estate Finance - projection engine for residential development projects
//!
//! This library provides:
//! - Construction cost and duration modeling from system and material choices
//! - Project budgets with direct and indirect cost breakdowns
//! - Loan amortization schedules and closing fees
//! - Monthly sales absorption and cash-flow projection
//! - KPI derivation (ROI, IRR, NPV, payback, cap rate, per-m² metrics)
//! - Scenario simulation, comparison and five-year roll-ups

pub mod error;
pub mod construction;
pub mod financing;
pub mod projection;
pub mod kpi;
pub mod scenario;
pub mod market;

// Re-export commonly used types
pub use error::{FinanceError, Result};
pub use construction::{
    calculate_base_construction_cost, calculate_budget, calculate_construction_time, Budget,
    ConstructionSystem, MaterialCatalog, ProjectDraft, ProjectParameters,
};
pub use financing::{calculate_amortization_table, create_financing_scheme, FinancingScheme};
pub use projection::{generate_sales_projection, SalesProjection, SalesProjectionConfig};
pub use kpi::{calculate_irr, calculate_kpis, FinancialKPIs};
pub use scenario::{compare_scenarios, generate_five_year_projection, Scenario, ScenarioSimulator};
pub use market::{MarketData, MarketTable};
