//! Construction system cost tables and build-duration estimate
//!
//! A construction system is four independent choices. Each choice maps to a
//! fixed cost per m² and the structure and MEP choices also carry a duration
//! factor. There is no interpolation and no partial system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FinanceError, Result};

/// Fixed mobilisation time in weeks, independent of area
pub const BASE_WEEKS: f64 = 8.0;

/// Weeks added per sqrt(m²) of built area
pub const AREA_WEEKS_COEFFICIENT: f64 = 1.2;

/// Average number of weeks in a calendar month
pub const WEEKS_PER_MONTH: f64 = 52.0 / 12.0;

/// Structural system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureType {
    ConcreteFrame,
    SteelFrame,
    LoadBearingMasonry,
    WoodFrame,
    Prefabricated,
}

impl StructureType {
    pub const ALL: [StructureType; 5] = [
        StructureType::ConcreteFrame,
        StructureType::SteelFrame,
        StructureType::LoadBearingMasonry,
        StructureType::WoodFrame,
        StructureType::Prefabricated,
    ];

    /// Cost per m² of built area
    pub fn cost_per_m2(&self) -> f64 {
        match self {
            StructureType::ConcreteFrame => 4_500.0,
            StructureType::SteelFrame => 5_200.0,
            StructureType::LoadBearingMasonry => 3_800.0,
            StructureType::WoodFrame => 3_500.0,
            StructureType::Prefabricated => 3_200.0,
        }
    }

    /// Multiplier on build time relative to a concrete frame
    pub fn duration_factor(&self) -> f64 {
        match self {
            StructureType::ConcreteFrame => 1.0,
            StructureType::SteelFrame => 0.8,
            StructureType::LoadBearingMasonry => 1.1,
            StructureType::WoodFrame => 0.75,
            StructureType::Prefabricated => 0.6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StructureType::ConcreteFrame => "concrete-frame",
            StructureType::SteelFrame => "steel-frame",
            StructureType::LoadBearingMasonry => "load-bearing-masonry",
            StructureType::WoodFrame => "wood-frame",
            StructureType::Prefabricated => "prefabricated",
        }
    }
}

/// Building envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnclosureType {
    BrickBlock,
    ConcreteBlock,
    Drywall,
    PrecastPanel,
    GlassCurtainWall,
}

impl EnclosureType {
    pub const ALL: [EnclosureType; 5] = [
        EnclosureType::BrickBlock,
        EnclosureType::ConcreteBlock,
        EnclosureType::Drywall,
        EnclosureType::PrecastPanel,
        EnclosureType::GlassCurtainWall,
    ];

    pub fn cost_per_m2(&self) -> f64 {
        match self {
            EnclosureType::BrickBlock => 1_200.0,
            EnclosureType::ConcreteBlock => 1_000.0,
            EnclosureType::Drywall => 800.0,
            EnclosureType::PrecastPanel => 1_500.0,
            EnclosureType::GlassCurtainWall => 2_500.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnclosureType::BrickBlock => "brick-block",
            EnclosureType::ConcreteBlock => "concrete-block",
            EnclosureType::Drywall => "drywall",
            EnclosureType::PrecastPanel => "precast-panel",
            EnclosureType::GlassCurtainWall => "glass-curtain-wall",
        }
    }
}

/// Roof system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoofingType {
    ConcreteSlab,
    JoistAndBlock,
    MetalDeck,
    ClayTile,
    GreenRoof,
}

impl RoofingType {
    pub const ALL: [RoofingType; 5] = [
        RoofingType::ConcreteSlab,
        RoofingType::JoistAndBlock,
        RoofingType::MetalDeck,
        RoofingType::ClayTile,
        RoofingType::GreenRoof,
    ];

    pub fn cost_per_m2(&self) -> f64 {
        match self {
            RoofingType::ConcreteSlab => 1_100.0,
            RoofingType::JoistAndBlock => 850.0,
            RoofingType::MetalDeck => 900.0,
            RoofingType::ClayTile => 1_300.0,
            RoofingType::GreenRoof => 1_800.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoofingType::ConcreteSlab => "concrete-slab",
            RoofingType::JoistAndBlock => "joist-and-block",
            RoofingType::MetalDeck => "metal-deck",
            RoofingType::ClayTile => "clay-tile",
            RoofingType::GreenRoof => "green-roof",
        }
    }
}

/// Mechanical, electrical and plumbing package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MepSystem {
    Basic,
    Standard,
    Efficient,
    Smart,
}

impl MepSystem {
    pub const ALL: [MepSystem; 4] = [
        MepSystem::Basic,
        MepSystem::Standard,
        MepSystem::Efficient,
        MepSystem::Smart,
    ];

    pub fn cost_per_m2(&self) -> f64 {
        match self {
            MepSystem::Basic => 1_500.0,
            MepSystem::Standard => 2_200.0,
            MepSystem::Efficient => 2_900.0,
            MepSystem::Smart => 3_800.0,
        }
    }

    /// More complex installations extend the schedule
    pub fn duration_factor(&self) -> f64 {
        match self {
            MepSystem::Basic => 1.0,
            MepSystem::Standard => 1.05,
            MepSystem::Efficient => 1.1,
            MepSystem::Smart => 1.2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MepSystem::Basic => "basic",
            MepSystem::Standard => "standard",
            MepSystem::Efficient => "efficient",
            MepSystem::Smart => "smart",
        }
    }
}

impl FromStr for StructureType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "concrete-frame" => Ok(StructureType::ConcreteFrame),
            "steel-frame" => Ok(StructureType::SteelFrame),
            "load-bearing-masonry" => Ok(StructureType::LoadBearingMasonry),
            "wood-frame" => Ok(StructureType::WoodFrame),
            "prefabricated" => Ok(StructureType::Prefabricated),
            other => Err(FinanceError::invalid("structure", format!("unknown structure '{}'", other))),
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnclosureType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "brick-block" => Ok(EnclosureType::BrickBlock),
            "concrete-block" => Ok(EnclosureType::ConcreteBlock),
            "drywall" => Ok(EnclosureType::Drywall),
            "precast-panel" => Ok(EnclosureType::PrecastPanel),
            "glass-curtain-wall" => Ok(EnclosureType::GlassCurtainWall),
            other => Err(FinanceError::invalid("enclosure", format!("unknown enclosure '{}'", other))),
        }
    }
}

impl fmt::Display for EnclosureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoofingType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "concrete-slab" => Ok(RoofingType::ConcreteSlab),
            "joist-and-block" => Ok(RoofingType::JoistAndBlock),
            "metal-deck" => Ok(RoofingType::MetalDeck),
            "clay-tile" => Ok(RoofingType::ClayTile),
            "green-roof" => Ok(RoofingType::GreenRoof),
            other => Err(FinanceError::invalid("roofing", format!("unknown roofing '{}'", other))),
        }
    }
}

impl fmt::Display for RoofingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MepSystem {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(MepSystem::Basic),
            "standard" => Ok(MepSystem::Standard),
            "efficient" => Ok(MepSystem::Efficient),
            "smart" => Ok(MepSystem::Smart),
            other => Err(FinanceError::invalid("mep_system", format!("unknown MEP system '{}'", other))),
        }
    }
}

impl fmt::Display for MepSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete construction system selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionSystem {
    pub structure: StructureType,
    pub enclosure: EnclosureType,
    pub roofing: RoofingType,
    pub mep_system: MepSystem,
}

impl ConstructionSystem {
    pub fn new(
        structure: StructureType,
        enclosure: EnclosureType,
        roofing: RoofingType,
        mep_system: MepSystem,
    ) -> Self {
        Self {
            structure,
            enclosure,
            roofing,
            mep_system,
        }
    }

    /// Same system with a different structure; the original is left untouched
    pub fn with_structure(self, structure: StructureType) -> Self {
        Self { structure, ..self }
    }
}

impl Default for ConstructionSystem {
    fn default() -> Self {
        Self {
            structure: StructureType::ConcreteFrame,
            enclosure: EnclosureType::BrickBlock,
            roofing: RoofingType::ConcreteSlab,
            mep_system: MepSystem::Standard,
        }
    }
}

/// Base construction cost per m²: sum of the four component prices
pub fn calculate_base_construction_cost(system: &ConstructionSystem) -> f64 {
    system.structure.cost_per_m2()
        + system.enclosure.cost_per_m2()
        + system.roofing.cost_per_m2()
        + system.mep_system.cost_per_m2()
}

/// Estimated build duration in weeks
///
/// Area enters through its square root, so doubling the area stretches the
/// schedule by less than double.
pub fn calculate_construction_time(system: &ConstructionSystem, area_m2: f64) -> Result<f64> {
    if !area_m2.is_finite() || area_m2 < 0.0 {
        return Err(FinanceError::invalid(
            "area_m2",
            format!("expected a finite non-negative area, got {}", area_m2),
        ));
    }

    let weeks = BASE_WEEKS + AREA_WEEKS_COEFFICIENT * area_m2.sqrt();
    Ok(weeks * system.structure.duration_factor() * system.mep_system.duration_factor())
}

/// Convert a duration in weeks to whole months (at least one)
pub fn weeks_to_months(weeks: f64) -> u32 {
    if !weeks.is_finite() || weeks <= 0.0 {
        return 1;
    }
    ((weeks / WEEKS_PER_MONTH - 1e-9).ceil() as u32).max(1)
}
