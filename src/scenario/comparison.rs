//! Side-by-side comparison of computed scenarios

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::presets::ScenarioType;
use super::simulator::Scenario;
use crate::kpi::FinancialKPIs;

/// Headline figures of one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub scenario_type: ScenarioType,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub kpis: FinancialKPIs,
}

/// Ids of the winning scenario per criterion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestScenarios {
    pub highest_roi: Option<String>,
    pub highest_irr: Option<String>,
    pub highest_margin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// Keyed by scenario id
    pub scenarios: BTreeMap<String, ScenarioSummary>,
    pub best: BestScenarios,
}

/// Scenario id with the strictly greatest `metric`; ties keep the earlier one
fn best_by(scenarios: &[Scenario], metric: impl Fn(&FinancialKPIs) -> f64) -> Option<String> {
    let mut best: Option<(&Scenario, f64)> = None;
    for scenario in scenarios {
        let value = metric(&scenario.kpis);
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((scenario, value)),
        }
    }
    best.map(|(scenario, _)| scenario.id.clone())
}

/// Tabulate scenarios and pick the best by ROI, IRR and margin
pub fn compare_scenarios(scenarios: &[Scenario]) -> ScenarioComparison {
    let summaries = scenarios
        .iter()
        .map(|s| {
            (
                s.id.clone(),
                ScenarioSummary {
                    name: s.name.clone(),
                    scenario_type: s.scenario_type,
                    total_cost: s.budget.total_cost,
                    total_revenue: s.sales_projection.metrics.total_revenue,
                    kpis: s.kpis.clone(),
                },
            )
        })
        .collect();

    ScenarioComparison {
        scenarios: summaries,
        best: BestScenarios {
            highest_roi: best_by(scenarios, |k| k.roi),
            highest_irr: best_by(scenarios, |k| k.irr),
            highest_margin: best_by(scenarios, |k| k.profit_margin),
        },
    }
}
