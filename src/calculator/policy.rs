//! Scoring policy
//!
//! The category preference weights and the protein-proximity threshold have no
//! derivation behind them; they are configuration, not invariants.

use crate::error::MixError;
use crate::knowledge::Category;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable constants for the allocation heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub grain_weight: f64,
    pub legume_weight: f64,
    pub seed_weight: f64,
    /// Protein distance (percentage points) beyond which proximity earns nothing
    pub protein_distance_threshold: f64,
    /// Clamp allocations to available stock and redistribute the excess
    pub cap_to_stock: bool,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            grain_weight: 1.2,
            legume_weight: 1.1,
            seed_weight: 1.0,
            protein_distance_threshold: 20.0,
            cap_to_stock: false,
        }
    }
}

impl ScoringPolicy {
    /// Load a policy from a JSON file; omitted fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scoring policy: {:?}", path))?;
        let policy: ScoringPolicy = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse scoring policy: {:?}", path))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), MixError> {
        for (name, weight) in [
            ("grain_weight", self.grain_weight),
            ("legume_weight", self.legume_weight),
            ("seed_weight", self.seed_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(MixError::InvalidPolicy(format!(
                    "{} must be finite and >= 0, got {}",
                    name, weight
                )));
            }
        }

        let threshold = self.protein_distance_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(MixError::InvalidPolicy(format!(
                "protein_distance_threshold must be finite and > 0, got {}",
                threshold
            )));
        }
        Ok(())
    }

    pub fn category_weight(&self, category: Category) -> f64 {
        match category {
            Category::Grain => self.grain_weight,
            Category::Legume => self.legume_weight,
            Category::Seed => self.seed_weight,
        }
    }

    /// `1 + max(0, 1 - |protein - target| / threshold)`, in [1, 2]
    pub fn protein_factor(&self, protein: f64, target: f64) -> f64 {
        let closeness = 1.0 - (protein - target).abs() / self.protein_distance_threshold;
        1.0 + closeness.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.category_weight(Category::Grain), 1.2);
        assert_eq!(policy.category_weight(Category::Legume), 1.1);
        assert_eq!(policy.category_weight(Category::Seed), 1.0);
        assert!(!policy.cap_to_stock);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_protein_factor_saturates() {
        let policy = ScoringPolicy::default();
        assert_relative_eq!(policy.protein_factor(14.25, 14.25), 2.0);
        assert_relative_eq!(policy.protein_factor(24.25, 14.25), 1.5);
        assert_relative_eq!(policy.protein_factor(4.25, 14.25), 1.5);
        assert_relative_eq!(policy.protein_factor(40.0, 14.25), 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let policy: ScoringPolicy = serde_json::from_str(r#"{"cap_to_stock": true}"#).unwrap();
        assert!(policy.cap_to_stock);
        assert_eq!(policy.grain_weight, 1.2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let policy = ScoringPolicy {
            protein_distance_threshold: 0.0,
            ..Default::default()
        };
        assert!(matches!(policy.validate(), Err(MixError::InvalidPolicy(_))));

        let policy = ScoringPolicy {
            seed_weight: f64::NAN,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ScoringPolicy::load(Path::new("/nonexistent/policy.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("policy.json"));
    }
}
