//! Project inputs
//!
//! Inputs arrive piecemeal from the surrounding application, so they are first
//! collected in a `ProjectDraft` where every field is optional. Only a
//! completed draft can be priced.

use serde::{Deserialize, Serialize};

use super::system::ConstructionSystem;
use crate::error::{ensure_non_negative, FinanceError, Result};

/// Partially filled project inputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDraft {
    pub project_id: Option<String>,
    /// Built area in m²
    pub area_m2: Option<f64>,
    pub land_cost: Option<f64>,
    pub construction_system: Option<ConstructionSystem>,
    /// Material preset id, e.g. "standard"
    pub material_preset: Option<String>,
    /// Regional cost factor (1.0 = national average)
    pub location_factor: Option<f64>,
    /// Cost escalation factor since the price tables were compiled
    pub inflation_factor: Option<f64>,
}

/// Validated project inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectParameters {
    pub project_id: String,
    pub area_m2: f64,
    pub land_cost: f64,
    pub construction_system: ConstructionSystem,
    pub material_preset: String,
    pub location_factor: f64,
    pub inflation_factor: f64,
    /// Scenario cost multiplier applied on top of the regional factors
    pub cost_adjustment: f64,
}

impl ProjectDraft {
    /// Check that every required field is present and usable
    ///
    /// Missing fields are reported together as `IncompleteData`; a field that is
    /// present but unusable is reported as `InvalidInput`.
    pub fn complete(&self) -> Result<ProjectParameters> {
        let material_preset = self
            .material_preset
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let (Some(area_m2), Some(land_cost), Some(construction_system), Some(material_preset)) =
            (self.area_m2, self.land_cost, self.construction_system, material_preset)
        else {
            let mut missing = Vec::new();
            if self.area_m2.is_none() {
                missing.push("area_m2");
            }
            if self.land_cost.is_none() {
                missing.push("land_cost");
            }
            if self.construction_system.is_none() {
                missing.push("construction_system");
            }
            if material_preset.is_none() {
                missing.push("material_preset");
            }
            return Err(FinanceError::IncompleteData { missing });
        };

        let params = ProjectParameters {
            project_id: self.project_id.clone().unwrap_or_else(|| "project".to_string()),
            area_m2,
            land_cost,
            construction_system,
            material_preset: material_preset.to_string(),
            location_factor: self.location_factor.unwrap_or(1.0),
            inflation_factor: self.inflation_factor.unwrap_or(1.0),
            cost_adjustment: 1.0,
        };
        params.validate()?;
        Ok(params)
    }
}

impl ProjectParameters {
    pub fn new(
        project_id: impl Into<String>,
        area_m2: f64,
        land_cost: f64,
        construction_system: ConstructionSystem,
        material_preset: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            area_m2,
            land_cost,
            construction_system,
            material_preset: material_preset.into(),
            location_factor: 1.0,
            inflation_factor: 1.0,
            cost_adjustment: 1.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.area_m2.is_finite() || self.area_m2 <= 0.0 {
            return Err(FinanceError::invalid(
                "area_m2",
                format!("built area must be positive, got {}", self.area_m2),
            ));
        }
        ensure_non_negative("land_cost", self.land_cost)?;
        for (field, value) in [
            ("location_factor", self.location_factor),
            ("inflation_factor", self.inflation_factor),
            ("cost_adjustment", self.cost_adjustment),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FinanceError::invalid(field, format!("factor must be positive, got {}", value)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_draft_lists_all_missing_fields() {
        let err = ProjectDraft::default().complete().unwrap_err();
        match err {
            FinanceError::IncompleteData { missing } => {
                assert_eq!(
                    missing,
                    vec!["area_m2", "land_cost", "construction_system", "material_preset"]
                );
            }
            other => panic!("expected IncompleteData, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_draft() {
        let draft = ProjectDraft {
            area_m2: Some(500.0),
            construction_system: Some(ConstructionSystem::default()),
            material_preset: Some("  ".to_string()),
            ..Default::default()
        };
        let err = draft.complete().unwrap_err();
        assert!(err.is_incomplete());
        assert!(err.to_string().contains("land_cost"));
        assert!(err.to_string().contains("material_preset"));
    }

    #[test]
    fn test_blank_preset_is_missing() {
        let mut draft = ProjectDraft {
            area_m2: Some(500.0),
            land_cost: Some(1_500_000.0),
            construction_system: Some(ConstructionSystem::default()),
            material_preset: Some("\t ".to_string()),
            ..Default::default()
        };
        match draft.complete() {
            Err(FinanceError::IncompleteData { missing }) => assert_eq!(missing, vec!["material_preset"]),
            other => panic!("expected IncompleteData, got {:?}", other),
        }

        draft.material_preset = Some(" premium ".to_string());
        assert_eq!(draft.complete().unwrap().material_preset, "premium");
    }

    #[test]
    fn test_complete_draft_applies_defaults() {
        let draft = ProjectDraft {
            area_m2: Some(500.0),
            land_cost: Some(1_500_000.0),
            construction_system: Some(ConstructionSystem::default()),
            material_preset: Some("standard".to_string()),
            location_factor: Some(1.15),
            ..Default::default()
        };
        let params = draft.complete().unwrap();
        assert_eq!(params.project_id, "project");
        assert_eq!(params.location_factor, 1.15);
        assert_eq!(params.inflation_factor, 1.0);
        assert_eq!(params.cost_adjustment, 1.0);
    }

    #[test]
    fn test_zero_area_is_invalid_not_incomplete() {
        let draft = ProjectDraft {
            area_m2: Some(0.0),
            land_cost: Some(0.0),
            construction_system: Some(ConstructionSystem::default()),
            material_preset: Some("standard".to_string()),
            ..Default::default()
        };
        let err = draft.complete().unwrap_err();
        assert!(!err.is_incomplete());
    }

    #[test]
    fn test_draft_from_json() {
        let json = r#"{
            "area_m2": 320.0,
            "land_cost": 900000.0,
            "construction_system": {
                "structure": "steel-frame",
                "enclosure": "drywall",
                "roofing": "metal-deck",
                "mep_system": "efficient"
            },
            "material_preset": "premium"
        }"#;
        let draft: ProjectDraft = serde_json::from_str(json).unwrap();
        let params = draft.complete().unwrap();
        assert_eq!(params.area_m2, 320.0);
        assert_eq!(params.material_preset, "premium");
    }
}
