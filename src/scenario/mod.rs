//! Scenario composition, simulation and comparison

mod presets;
mod simulator;
mod comparison;
mod five_year;

pub use presets::{
    create_custom_scenario, create_predefined_scenario, FinancingRequest, ScenarioBase, ScenarioConfig,
    ScenarioMultipliers, ScenarioPresets, ScenarioType,
};
pub use simulator::{Scenario, ScenarioFinancing, ScenarioSimulator};
pub use comparison::{compare_scenarios, BestScenarios, ScenarioComparison, ScenarioSummary};
pub use five_year::{generate_five_year_projection, CumulativeValues, FiveYearProjection, YearSummary, PROJECTION_YEARS};
