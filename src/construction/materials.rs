//! Material quality presets
//!
//! A preset bundles one material choice per finish category and a multiplier
//! that scales the base construction cost.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{FinanceError, Result};

/// Quality tier of a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityLevel {
    Economic,
    Standard,
    Premium,
    Luxury,
}

/// Finish category a material is chosen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialCategory {
    Flooring,
    WallFinish,
    Kitchen,
    Bathrooms,
    Windows,
    Doors,
}

/// A single material choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Cost per m² of built area
    pub cost_per_m2: f64,
    pub unit: String,
}

impl Material {
    fn new(name: &str, cost_per_m2: f64) -> Self {
        Self {
            name: name.to_string(),
            cost_per_m2,
            unit: "m2".to_string(),
        }
    }
}

/// Named bundle of per-category material choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPreset {
    pub id: String,
    pub name: String,
    pub quality_level: QualityLevel,
    /// Scales the base construction cost
    pub cost_multiplier: f64,
    pub materials: BTreeMap<MaterialCategory, Material>,
}

impl MaterialPreset {
    /// Sum of the finish costs per m²
    pub fn materials_cost_per_m2(&self) -> f64 {
        self.materials.values().map(|m| m.cost_per_m2).sum()
    }

    fn build(
        id: &str,
        name: &str,
        quality_level: QualityLevel,
        cost_multiplier: f64,
        materials: [(MaterialCategory, Material); 6],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            quality_level,
            cost_multiplier,
            materials: materials.into_iter().collect(),
        }
    }

    pub fn economic() -> Self {
        use MaterialCategory::*;
        Self::build(
            "economic",
            "Economic",
            QualityLevel::Economic,
            0.85,
            [
                (Flooring, Material::new("Ceramic tile", 180.0)),
                (WallFinish, Material::new("Vinyl paint", 90.0)),
                (Kitchen, Material::new("Laminate cabinets", 120.0)),
                (Bathrooms, Material::new("Basic ceramic fixtures", 110.0)),
                (Windows, Material::new("Aluminium frame", 100.0)),
                (Doors, Material::new("Hollow-core doors", 60.0)),
            ],
        )
    }

    pub fn standard() -> Self {
        use MaterialCategory::*;
        Self::build(
            "standard",
            "Standard",
            QualityLevel::Standard,
            1.0,
            [
                (Flooring, Material::new("Porcelain tile", 320.0)),
                (WallFinish, Material::new("Acrylic paint and texture", 150.0)),
                (Kitchen, Material::new("MDF cabinets with quartz top", 260.0)),
                (Bathrooms, Material::new("Mid-range fixtures", 210.0)),
                (Windows, Material::new("Thermal aluminium frame", 190.0)),
                (Doors, Material::new("Solid MDF doors", 110.0)),
            ],
        )
    }

    pub fn premium() -> Self {
        use MaterialCategory::*;
        Self::build(
            "premium",
            "Premium",
            QualityLevel::Premium,
            1.35,
            [
                (Flooring, Material::new("Engineered wood", 650.0)),
                (WallFinish, Material::new("Venetian plaster", 280.0)),
                (Kitchen, Material::new("Lacquered cabinets with granite top", 520.0)),
                (Bathrooms, Material::new("Designer fixtures", 430.0)),
                (Windows, Material::new("Double-glazed PVC", 360.0)),
                (Doors, Material::new("Solid wood doors", 240.0)),
            ],
        )
    }

    pub fn luxury() -> Self {
        use MaterialCategory::*;
        Self::build(
            "luxury",
            "Luxury",
            QualityLevel::Luxury,
            1.8,
            [
                (Flooring, Material::new("Natural marble", 1_200.0)),
                (WallFinish, Material::new("Stone and wood panelling", 520.0)),
                (Kitchen, Material::new("Custom joinery with integrated appliances", 980.0)),
                (Bathrooms, Material::new("Imported sanitary ware", 820.0)),
                (Windows, Material::new("Thermally broken aluminium, low-e glass", 640.0)),
                (Doors, Material::new("Custom hardwood doors", 450.0)),
            ],
        )
    }
}

/// Lookup of presets by id
#[derive(Debug, Clone)]
pub struct MaterialCatalog {
    presets: BTreeMap<String, MaterialPreset>,
}

impl MaterialCatalog {
    /// Catalog with caller-provided presets
    pub fn new(presets: impl IntoIterator<Item = MaterialPreset>) -> Self {
        Self {
            presets: presets.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    /// Find a preset by id (case-insensitive)
    pub fn preset(&self, id: &str) -> Result<&MaterialPreset> {
        self.presets
            .get(&id.trim().to_ascii_lowercase())
            .ok_or_else(|| FinanceError::UnknownPreset(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::new([
            MaterialPreset::economic(),
            MaterialPreset::standard(),
            MaterialPreset::premium(),
            MaterialPreset::luxury(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = MaterialCatalog::default();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["economic", "luxury", "premium", "standard"]);

        let standard = catalog.preset("STANDARD").unwrap();
        assert_eq!(standard.quality_level, QualityLevel::Standard);
        assert_eq!(standard.cost_multiplier, 1.0);
        assert_eq!(standard.materials.len(), 6);
    }

    #[test]
    fn test_unknown_preset() {
        let catalog = MaterialCatalog::default();
        match catalog.preset("gold-plated") {
            Err(FinanceError::UnknownPreset(id)) => assert_eq!(id, "gold-plated"),
            other => panic!("expected UnknownPreset, got {:?}", other),
        }
    }

    #[test]
    fn test_presets_increase_with_quality() {
        let presets = [
            MaterialPreset::economic(),
            MaterialPreset::standard(),
            MaterialPreset::premium(),
            MaterialPreset::luxury(),
        ];

        for pair in presets.windows(2) {
            assert!(pair[1].materials_cost_per_m2() > pair[0].materials_cost_per_m2());
            assert!(pair[1].cost_multiplier > pair[0].cost_multiplier);
        }

        let standard = MaterialPreset::standard();
        assert!((standard.materials_cost_per_m2() - 1_240.0).abs() < 1e-9);
    }
}
