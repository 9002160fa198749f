//! Project budget: direct and indirect cost breakdown
//!
//! The budget is recomputed from its inputs every time; nothing is patched in
//! place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::materials::MaterialPreset;
use super::project::ProjectParameters;
use super::system::calculate_base_construction_cost;
use crate::error::{ensure_percentage, FinanceError, Result};

/// Kinds of direct cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectCostType {
    Land,
    Construction,
    Finishes,
}

/// Kinds of indirect cost, each a percentage of the building cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndirectCostType {
    DesignEngineering,
    PermitsLicenses,
    ProjectManagement,
    SalesMarketing,
    Contingency,
}

impl IndirectCostType {
    pub fn label(&self) -> &'static str {
        match self {
            IndirectCostType::DesignEngineering => "Design and engineering",
            IndirectCostType::PermitsLicenses => "Permits and licenses",
            IndirectCostType::ProjectManagement => "Project management",
            IndirectCostType::SalesMarketing => "Sales and marketing",
            IndirectCostType::Contingency => "Contingency",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectCost {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectCost {
    pub name: String,
    /// Percent of `base_amount`
    pub percentage: f64,
    pub base_amount: f64,
    pub amount: f64,
}

/// Indirect cost percentages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndirectCostRates {
    pub design_engineering: f64,
    pub permits_licenses: f64,
    pub project_management: f64,
    pub sales_marketing: f64,
    pub contingency: f64,
}

impl Default for IndirectCostRates {
    fn default() -> Self {
        Self {
            design_engineering: 6.0,
            permits_licenses: 3.0,
            project_management: 5.0,
            sales_marketing: 4.0,
            contingency: 5.0,
        }
    }
}

impl IndirectCostRates {
    fn entries(&self) -> [(IndirectCostType, f64); 5] {
        [
            (IndirectCostType::DesignEngineering, self.design_engineering),
            (IndirectCostType::PermitsLicenses, self.permits_licenses),
            (IndirectCostType::ProjectManagement, self.project_management),
            (IndirectCostType::SalesMarketing, self.sales_marketing),
            (IndirectCostType::Contingency, self.contingency),
        ]
    }
}

/// Full cost breakdown for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub project_id: String,
    pub direct_costs: BTreeMap<DirectCostType, DirectCost>,
    pub indirect_costs: BTreeMap<IndirectCostType, IndirectCost>,
    pub total_direct_cost: f64,
    pub total_indirect_cost: f64,
    pub total_cost: f64,
    pub cost_per_m2: f64,
    pub location_factor: f64,
    pub inflation_factor: f64,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn direct(&self, kind: DirectCostType) -> f64 {
        self.direct_costs.get(&kind).map(|c| c.amount).unwrap_or(0.0)
    }

    /// Direct cost excluding land, i.e. what is spent on site over the build
    pub fn building_cost(&self) -> f64 {
        self.direct(DirectCostType::Construction) + self.direct(DirectCostType::Finishes)
    }
}

/// Build the budget for a validated project and its material preset
pub fn calculate_budget(
    project: &ProjectParameters,
    preset: &MaterialPreset,
    rates: &IndirectCostRates,
    updated_at: DateTime<Utc>,
) -> Result<Budget> {
    project.validate()?;
    if !preset.cost_multiplier.is_finite() || preset.cost_multiplier <= 0.0 {
        return Err(FinanceError::invalid(
            "cost_multiplier",
            format!("preset '{}' has a non-positive multiplier", preset.id),
        ));
    }
    for (kind, pct) in rates.entries() {
        ensure_percentage("indirect_cost_rate", pct).map_err(|_| {
            FinanceError::invalid("indirect_cost_rate", format!("{} rate {} is out of range", kind.label(), pct))
        })?;
    }

    let area = project.area_m2;
    let regional = project.location_factor * project.inflation_factor * project.cost_adjustment;

    let construction = calculate_base_construction_cost(&project.construction_system)
        * preset.cost_multiplier
        * area
        * regional;
    let finishes = preset.materials_cost_per_m2() * area * regional;

    let mut direct_costs = BTreeMap::new();
    direct_costs.insert(
        DirectCostType::Land,
        DirectCost {
            name: "Land".to_string(),
            amount: project.land_cost,
            unit: "lump sum".to_string(),
        },
    );
    direct_costs.insert(
        DirectCostType::Construction,
        DirectCost {
            name: "Construction".to_string(),
            amount: construction,
            unit: "m2".to_string(),
        },
    );
    direct_costs.insert(
        DirectCostType::Finishes,
        DirectCost {
            name: format!("Finishes ({})", preset.name),
            amount: finishes,
            unit: "m2".to_string(),
        },
    );
    let total_direct_cost: f64 = direct_costs.values().map(|c| c.amount).sum();

    let base_amount = construction + finishes;
    let indirect_costs: BTreeMap<_, _> = rates
        .entries()
        .into_iter()
        .map(|(kind, percentage)| {
            (
                kind,
                IndirectCost {
                    name: kind.label().to_string(),
                    percentage,
                    base_amount,
                    amount: base_amount * percentage / 100.0,
                },
            )
        })
        .collect();
    let total_indirect_cost: f64 = indirect_costs.values().map(|c| c.amount).sum();

    let total_cost = total_direct_cost + total_indirect_cost;
    log::debug!(
        "budget for {}: direct={:.2} indirect={:.2} total={:.2}",
        project.project_id,
        total_direct_cost,
        total_indirect_cost,
        total_cost
    );

    Ok(Budget {
        project_id: project.project_id.clone(),
        direct_costs,
        indirect_costs,
        total_direct_cost,
        total_indirect_cost,
        total_cost,
        cost_per_m2: total_cost / area,
        location_factor: project.location_factor,
        inflation_factor: project.inflation_factor,
        updated_at,
    })
}
