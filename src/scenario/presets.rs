//! Scenario definitions and multiplier presets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::construction::ProjectParameters;
use crate::error::{FinanceError, Result};
use crate::financing::{FinancingType, PaymentFrequency};
use crate::projection::{CostPattern, SalesProjectionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioType {
    Optimistic,
    Realistic,
    Pessimistic,
    Custom,
}

impl ScenarioType {
    /// The three preset-driven scenarios, in display order
    pub const PREDEFINED: [ScenarioType; 3] = [
        ScenarioType::Optimistic,
        ScenarioType::Realistic,
        ScenarioType::Pessimistic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::Optimistic => "optimistic",
            ScenarioType::Realistic => "realistic",
            ScenarioType::Pessimistic => "pessimistic",
            ScenarioType::Custom => "custom",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ScenarioType::Optimistic => "Higher prices, lower costs and a faster schedule",
            ScenarioType::Realistic => "Base assumptions without adjustment",
            ScenarioType::Pessimistic => "Lower prices, higher costs and a slower schedule",
            ScenarioType::Custom => "User-defined adjustments",
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(ScenarioType::Optimistic),
            "realistic" => Ok(ScenarioType::Realistic),
            "pessimistic" => Ok(ScenarioType::Pessimistic),
            "custom" => Ok(ScenarioType::Custom),
            other => Err(FinanceError::invalid("scenario_type", format!("unknown scenario '{}'", other))),
        }
    }
}

/// Adjustments applied to the base assumptions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMultipliers {
    /// Unit price
    pub price: f64,
    /// Construction cost
    pub cost: f64,
    /// Construction and selling durations
    pub timeline: f64,
    /// Sales velocity
    pub velocity: f64,
}

impl ScenarioMultipliers {
    pub const UNITY: ScenarioMultipliers = ScenarioMultipliers {
        price: 1.0,
        cost: 1.0,
        timeline: 1.0,
        velocity: 1.0,
    };

    pub fn new(price: f64, cost: f64, timeline: f64, velocity: f64) -> Self {
        Self {
            price,
            cost,
            timeline,
            velocity,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("price_multiplier", self.price),
            ("cost_multiplier", self.cost),
            ("timeline_multiplier", self.timeline),
            ("velocity_multiplier", self.velocity),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FinanceError::invalid(field, format!("multiplier must be positive, got {}", value)));
            }
        }
        Ok(())
    }
}

impl Default for ScenarioMultipliers {
    fn default() -> Self {
        Self::UNITY
    }
}

/// Multipliers behind the predefined scenarios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioPresets {
    pub optimistic: ScenarioMultipliers,
    pub realistic: ScenarioMultipliers,
    pub pessimistic: ScenarioMultipliers,
}

impl Default for ScenarioPresets {
    fn default() -> Self {
        Self {
            optimistic: ScenarioMultipliers::new(1.10, 0.95, 0.90, 1.20),
            realistic: ScenarioMultipliers::UNITY,
            pessimistic: ScenarioMultipliers::new(0.90, 1.10, 1.20, 0.75),
        }
    }
}

impl ScenarioPresets {
    pub fn multipliers(&self, scenario_type: ScenarioType) -> ScenarioMultipliers {
        match scenario_type {
            ScenarioType::Optimistic => self.optimistic,
            ScenarioType::Realistic => self.realistic,
            ScenarioType::Pessimistic => self.pessimistic,
            ScenarioType::Custom => ScenarioMultipliers::UNITY,
        }
    }

    /// Scenario of `scenario_type` over `base` using these presets
    pub fn scenario(&self, scenario_type: ScenarioType, base: &ScenarioBase) -> ScenarioConfig {
        let label = scenario_type.as_str();
        let mut name = label.to_string();
        if let Some(first) = name.get_mut(0..1) {
            first.make_ascii_uppercase();
        }

        ScenarioConfig {
            id: format!("{}-{}", base.project.project_id, label),
            scenario_type,
            name,
            description: scenario_type.description().to_string(),
            base: base.clone(),
            multipliers: self.multipliers(scenario_type),
        }
    }
}

/// Loan terms requested for a scenario; the amount financed is the budget total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingRequest {
    pub financing_type: FinancingType,
    pub down_payment_percentage: f64,
    /// Annual percent
    pub interest_rate: f64,
    pub term_years: u32,
    pub payment_frequency: PaymentFrequency,
    #[serde(default)]
    pub origination_fee_percentage: f64,
}

/// Unadjusted project, sales and financing assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioBase {
    pub project: ProjectParameters,
    pub sales: SalesProjectionConfig,
    #[serde(default)]
    pub cost_pattern: CostPattern,
    #[serde(default)]
    pub financing: Option<FinancingRequest>,
}

/// A base plus the adjustments that define one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub id: String,
    pub scenario_type: ScenarioType,
    pub name: String,
    pub description: String,
    pub base: ScenarioBase,
    pub multipliers: ScenarioMultipliers,
}

impl ScenarioConfig {
    /// Project inputs with the cost multiplier folded in
    pub fn adjusted_project(&self) -> ProjectParameters {
        let mut project = self.base.project.clone();
        project.cost_adjustment *= self.multipliers.cost;
        project
    }

    /// Sales inputs with price, velocity and timeline multipliers applied
    pub fn adjusted_sales(&self) -> SalesProjectionConfig {
        let mut sales = self.base.sales.clone();
        sales.unit_price *= self.multipliers.price;
        sales.sales_velocity *= self.multipliers.velocity;
        sales.project_duration = scale_months(sales.project_duration, self.multipliers.timeline);
        sales
    }
}

/// Scale a month count, rounding up and keeping at least one month
pub(crate) fn scale_months(months: u32, factor: f64) -> u32 {
    let scaled = (months as f64 * factor - 1e-9).ceil();
    if scaled.is_finite() && scaled >= 1.0 {
        scaled as u32
    } else {
        1
    }
}

/// Predefined scenario using the default presets
pub fn create_predefined_scenario(scenario_type: ScenarioType, base: &ScenarioBase) -> ScenarioConfig {
    ScenarioPresets::default().scenario(scenario_type, base)
}

/// Scenario with caller-chosen multipliers
pub fn create_custom_scenario(
    name: impl Into<String>,
    base: &ScenarioBase,
    multipliers: ScenarioMultipliers,
) -> Result<ScenarioConfig> {
    multipliers.validate()?;
    let name = name.into();
    let slug: String = name
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();

    Ok(ScenarioConfig {
        id: format!("{}-custom-{}", base.project.project_id, slug),
        scenario_type: ScenarioType::Custom,
        description: ScenarioType::Custom.description().to_string(),
        name,
        base: base.clone(),
        multipliers,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::construction::{ConstructionSystem, StructureType};
    use chrono::NaiveDate;

    pub(crate) fn base() -> ScenarioBase {
        let system = ConstructionSystem::default().with_structure(StructureType::ConcreteFrame);
        ScenarioBase {
            project: ProjectParameters::new("tower", 500.0, 1_500_000.0, system, "standard"),
            sales: SalesProjectionConfig {
                total_units: 8,
                unit_price: 3_200_000.0,
                sales_start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                sales_velocity: 1.0,
                price_increase_rate: 5.0,
                reservation_fee_percentage: 2.0,
                down_payment_percentage: 30.0,
                installment_months: 6,
                project_duration: 24,
            },
            cost_pattern: CostPattern::Bell,
            financing: None,
        }
    }

    #[test]
    fn test_realistic_is_unity() {
        let config = create_predefined_scenario(ScenarioType::Realistic, &base());
        assert_eq!(config.multipliers, ScenarioMultipliers::UNITY);
        assert_eq!(config.adjusted_sales(), base().sales);
        assert_eq!(config.adjusted_project(), base().project);
        assert_eq!(config.id, "tower-realistic");
        assert_eq!(config.name, "Realistic");
    }

    #[test]
    fn test_optimistic_and_pessimistic_move_opposite_ways() {
        let base = base();
        let up = create_predefined_scenario(ScenarioType::Optimistic, &base);
        let down = create_predefined_scenario(ScenarioType::Pessimistic, &base);

        assert!(up.adjusted_sales().unit_price > base.sales.unit_price);
        assert!(down.adjusted_sales().unit_price < base.sales.unit_price);
        assert!(up.adjusted_project().cost_adjustment < 1.0);
        assert!(down.adjusted_project().cost_adjustment > 1.0);
        assert!(up.adjusted_sales().project_duration < base.sales.project_duration);
        assert!(down.adjusted_sales().project_duration > base.sales.project_duration);
        assert_eq!(up.adjusted_sales().project_duration, 22);
        assert_eq!(down.adjusted_sales().project_duration, 29);
    }

    #[test]
    fn test_presets_from_json() {
        let presets: ScenarioPresets =
            serde_json::from_str(r#"{"optimistic": {"price": 1.2, "cost": 0.9, "timeline": 0.8, "velocity": 1.5}}"#)
                .unwrap();
        assert_eq!(presets.optimistic.price, 1.2);
        assert_eq!(presets.pessimistic, ScenarioPresets::default().pessimistic);
    }

    #[test]
    fn test_custom_scenario() {
        let config =
            create_custom_scenario("High Price", &base(), ScenarioMultipliers::new(1.3, 1.0, 1.0, 0.8)).unwrap();
        assert_eq!(config.scenario_type, ScenarioType::Custom);
        assert_eq!(config.id, "tower-custom-high-price");
        assert!(create_custom_scenario("bad", &base(), ScenarioMultipliers::new(0.0, 1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn test_scale_months() {
        assert_eq!(scale_months(24, 1.0), 24);
        assert_eq!(scale_months(10, 0.9), 9);
        assert_eq!(scale_months(1, 0.1), 1);
    }
}
