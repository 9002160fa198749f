//! Construction cost model: system cost tables, material presets and budgets

mod system;
mod materials;
mod project;
mod budget;

pub use system::{
    calculate_base_construction_cost, calculate_construction_time, weeks_to_months,
    ConstructionSystem, EnclosureType, MepSystem, RoofingType, StructureType,
    AREA_WEEKS_COEFFICIENT, BASE_WEEKS, WEEKS_PER_MONTH,
};
pub use materials::{Material, MaterialCatalog, MaterialCategory, MaterialPreset, QualityLevel};
pub use project::{ProjectDraft, ProjectParameters};
pub use budget::{
    calculate_budget, Budget, DirectCost, DirectCostType, IndirectCost, IndirectCostRates,
    IndirectCostType,
};
