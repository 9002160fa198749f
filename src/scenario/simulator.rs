//! Scenario simulator
//!
//! Holds the material catalog and rate tables once, then runs the full
//! budget → schedule → sales → financing → KPI pipeline per scenario.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::presets::{ScenarioBase, ScenarioConfig, ScenarioPresets, ScenarioType};
use crate::construction::{
    calculate_budget, calculate_construction_time, weeks_to_months, Budget, ConstructionSystem,
    DirectCostType, IndirectCostRates, MaterialCatalog,
};
use crate::error::Result;
use crate::financing::{
    calculate_amortization_table, create_financing_scheme, summarize_amortization, AmortizationEntry,
    AmortizationSummary, FinancingScheme,
};
use crate::kpi::{calculate_kpis, DiscountRate, FinancialKPIs, KpiInputs};
use crate::projection::{
    distribute_construction_costs, generate_sales_projection, CostPattern, SalesProjection,
    SalesProjectionConfig,
};

/// Loan attached to a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFinancing {
    pub scheme: FinancingScheme,
    pub summary: AmortizationSummary,
    pub schedule: Vec<AmortizationEntry>,
}

/// Fully computed scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub scenario_type: ScenarioType,
    pub name: String,
    pub description: String,
    pub construction_system: ConstructionSystem,
    pub material_preset: String,
    pub budget: Budget,
    /// Sales assumptions after scenario adjustments
    pub sales_config: SalesProjectionConfig,
    pub sales_projection: SalesProjection,
    pub financing: Option<ScenarioFinancing>,
    pub kpis: FinancialKPIs,
    pub construction_weeks: f64,
    pub construction_months: u32,
}

/// Pre-loaded simulator for running many scenarios
#[derive(Debug, Clone)]
pub struct ScenarioSimulator {
    catalog: MaterialCatalog,
    indirect_rates: IndirectCostRates,
    presets: ScenarioPresets,
    discount_rate: DiscountRate,
    /// Timestamp stamped on every budget
    as_of: DateTime<Utc>,
}

impl ScenarioSimulator {
    /// Simulator with the built-in catalog, rates and presets
    pub fn new(as_of: DateTime<Utc>) -> Self {
        Self {
            catalog: MaterialCatalog::default(),
            indirect_rates: IndirectCostRates::default(),
            presets: ScenarioPresets::default(),
            discount_rate: DiscountRate::default(),
            as_of,
        }
    }

    pub fn with_catalog(mut self, catalog: MaterialCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_indirect_rates(mut self, rates: IndirectCostRates) -> Self {
        self.indirect_rates = rates;
        self
    }

    pub fn with_presets(mut self, presets: ScenarioPresets) -> Self {
        self.presets = presets;
        self
    }

    pub fn with_discount_rate(mut self, discount_rate: DiscountRate) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    pub fn presets(&self) -> &ScenarioPresets {
        &self.presets
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    /// Run the full pipeline for one scenario
    pub fn simulate_scenario(&self, config: &ScenarioConfig) -> Result<Scenario> {
        config.multipliers.validate()?;
        let project = config.adjusted_project();
        let preset = self.catalog.preset(&project.material_preset)?;
        let budget = calculate_budget(&project, preset, &self.indirect_rates, self.as_of)?;

        let construction_weeks =
            calculate_construction_time(&project.construction_system, project.area_m2)? * config.multipliers.timeline;
        let construction_months = weeks_to_months(construction_weeks);

        let (construction_schedule, indirect_schedule) =
            build_cost_schedules(&budget, construction_months, config.base.cost_pattern)?;

        let sales_config = config.adjusted_sales();
        let sales_projection = generate_sales_projection(&sales_config, &construction_schedule, &indirect_schedule)?;

        let financing = match &config.base.financing {
            Some(request) => {
                let scheme = create_financing_scheme(
                    request.financing_type,
                    budget.total_cost,
                    request.down_payment_percentage,
                    request.interest_rate,
                    request.term_years,
                    request.payment_frequency,
                    request.origination_fee_percentage,
                )?;
                let schedule = calculate_amortization_table(&scheme);
                let summary = summarize_amortization(&scheme, &schedule);
                Some(ScenarioFinancing {
                    scheme,
                    summary,
                    schedule,
                })
            }
            None => None,
        };

        let net_cash_flows = sales_projection.net_cash_flows();
        let kpis = calculate_kpis(&KpiInputs {
            net_cash_flows: &net_cash_flows,
            total_revenue: sales_projection.metrics.total_revenue,
            total_cost: budget.total_cost,
            area_m2: project.area_m2,
            annual_debt_service: financing.as_ref().map(|f| f.summary.annual_debt_service),
            discount_rate: self.discount_rate,
        })?;

        log::debug!(
            "scenario {}: cost {:.2}, revenue {:.2}, roi {:.2}%",
            config.id,
            budget.total_cost,
            sales_projection.metrics.total_revenue,
            kpis.roi
        );

        Ok(Scenario {
            id: config.id.clone(),
            scenario_type: config.scenario_type,
            name: config.name.clone(),
            description: config.description.clone(),
            construction_system: project.construction_system,
            material_preset: project.material_preset.clone(),
            budget,
            sales_config,
            sales_projection,
            financing,
            kpis,
            construction_weeks,
            construction_months,
        })
    }

    /// Run independent scenarios in parallel; results keep the input order
    pub fn simulate_batch(&self, configs: &[ScenarioConfig]) -> Vec<Result<Scenario>> {
        configs
            .par_iter()
            .map(|config| self.simulate_scenario(config))
            .collect()
    }

    /// Optimistic, realistic and pessimistic runs over one base
    pub fn simulate_predefined(&self, base: &ScenarioBase) -> Result<Vec<Scenario>> {
        let configs: Vec<ScenarioConfig> = ScenarioType::PREDEFINED
            .iter()
            .map(|&scenario_type| self.presets.scenario(scenario_type, base))
            .collect();
        self.simulate_batch(&configs).into_iter().collect()
    }
}

/// Monthly direct and indirect outflows over the build
///
/// Land is paid at month 0; building cost follows `pattern`; indirect cost is
/// spread evenly.
fn build_cost_schedules(budget: &Budget, months: u32, pattern: CostPattern) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut construction = distribute_construction_costs(budget.building_cost(), months, pattern)?;
    if let Some(first) = construction.first_mut() {
        *first += budget.direct(DirectCostType::Land);
    }
    let indirect = distribute_construction_costs(budget.total_indirect_cost, months, CostPattern::Linear)?;
    Ok((construction, indirect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financing::{FinancingType, PaymentFrequency};
    use crate::kpi::IrrStatus;
    use crate::scenario::presets::tests::base;
    use crate::scenario::presets::{create_predefined_scenario, FinancingRequest};
    use approx::assert_relative_eq;

    fn simulator() -> ScenarioSimulator {
        ScenarioSimulator::new(Utc::now())
    }

    #[test]
    fn test_end_to_end_realistic() {
        let config = create_predefined_scenario(ScenarioType::Realistic, &base());
        let scenario = simulator().simulate_scenario(&config).unwrap();

        assert!(scenario.budget.total_cost > 0.0);
        assert!(scenario.sales_projection.metrics.total_revenue > 0.0);
        assert!(scenario.kpis.npv.is_finite());
        assert!(scenario.kpis.irr.is_finite());
        assert!(scenario.kpis.roi.is_finite());
        assert_ne!(scenario.kpis.irr_status, IrrStatus::Undefined);
        assert!(scenario.financing.is_none());
        assert!(scenario.construction_months >= 1);

        // Every cost in the budget appears once in the cash flow
        assert_relative_eq!(
            scenario.sales_projection.metrics.total_costs,
            scenario.budget.total_cost,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_land_is_paid_up_front() {
        let config = create_predefined_scenario(ScenarioType::Realistic, &base());
        let scenario = simulator().simulate_scenario(&config).unwrap();
        let first = &scenario.sales_projection.cash_flow[0];
        assert!(first.construction_outflow > scenario.budget.direct(DirectCostType::Land));
    }

    #[test]
    fn test_presets_order_outcomes() {
        let scenarios = simulator().simulate_predefined(&base()).unwrap();
        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[0].scenario_type, ScenarioType::Optimistic);
        assert_eq!(scenarios[2].scenario_type, ScenarioType::Pessimistic);

        assert!(scenarios[0].budget.total_cost < scenarios[1].budget.total_cost);
        assert!(scenarios[1].budget.total_cost < scenarios[2].budget.total_cost);
        assert!(scenarios[0].kpis.profit_margin > scenarios[2].kpis.profit_margin);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let sim = simulator();
        let configs: Vec<_> = ScenarioType::PREDEFINED
            .iter()
            .map(|&t| create_predefined_scenario(t, &base()))
            .collect();

        let batch = sim.simulate_batch(&configs);
        for (config, result) in configs.iter().zip(batch) {
            let single = sim.simulate_scenario(config).unwrap();
            assert_eq!(result.unwrap(), single);
        }
    }

    #[test]
    fn test_financing_feeds_dscr() {
        let mut base = base();
        base.financing = Some(FinancingRequest {
            financing_type: FinancingType::BankLoan,
            down_payment_percentage: 30.0,
            interest_rate: 11.0,
            term_years: 5,
            payment_frequency: PaymentFrequency::Monthly,
            origination_fee_percentage: 1.0,
        });
        let config = create_predefined_scenario(ScenarioType::Realistic, &base);
        let scenario = simulator().simulate_scenario(&config).unwrap();

        let financing = scenario.financing.as_ref().unwrap();
        assert_relative_eq!(financing.scheme.total_amount, scenario.budget.total_cost);
        assert_eq!(financing.schedule.len(), 60);
        assert!(scenario.kpis.debt_service_coverage_ratio != 0.0);
        assert!(scenario.kpis.debt_service_coverage_ratio.is_finite());
    }

    #[test]
    fn test_unknown_preset_fails() {
        let mut base = base();
        base.project.material_preset = "marble-palace".to_string();
        let config = create_predefined_scenario(ScenarioType::Realistic, &base);
        assert!(matches!(
            simulator().simulate_scenario(&config),
            Err(crate::error::FinanceError::UnknownPreset(_))
        ));
    }
}
