//! Mix Result Types
//!
//! Output of [`MixCalculator::calculate`](super::MixCalculator::calculate).
//! Serialized with camelCase keys for presentation-layer consumers.

use super::analysis::{CategoryTotals, NutritionTotals};
use crate::knowledge::{Category, PreparationNote, Severity, Species};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A warning or advisory attached to a result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixWarning {
    pub level: Severity,
    pub message: String,
}

impl MixWarning {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            level: Severity::Critical,
            message: message.into(),
        }
    }
}

/// A whole category absent from the caller's inventory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingCategory {
    pub category: Category,
    /// "Grains", "Legumes", "Seeds"
    pub label: String,
    pub reason: String,
    /// Ingredient keys to consider adding
    pub recommendations: Vec<String>,
}

/// Herb or supplement suggested for the situation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HerbRecommendation {
    pub key: String,
    pub name: String,
    pub benefits: Vec<String>,
    /// Dosage per kg of feed, as written in the herb table
    pub dosage: String,
    pub frequency: String,
    pub notes: String,
    /// Dosage scaled to the batch weight, when the dosage is a plain g/ml amount
    pub batch_amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixResult {
    pub species: Species,
    /// Situation of the resolved profile
    pub situation: String,
    pub profile_name: String,
    /// Ingredient key → grams
    pub mix: BTreeMap<String, f64>,
    pub nutrition: NutritionTotals,
    pub categories: CategoryTotals,
    pub warnings: Vec<MixWarning>,
    pub suggestions: Vec<String>,
    pub herb_recommendations: Vec<HerbRecommendation>,
    pub herb_purpose: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_ingredients: Option<Vec<MissingCategory>>,
    pub feeding_notes: String,
    pub preparation: Vec<PreparationNote>,
}

impl MixResult {
    /// Mix entries by descending weight, ties broken by key
    pub fn sorted_mix(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.mix.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        entries
    }

    pub fn total_weight(&self) -> f64 {
        self.mix.values().sum()
    }

    pub fn has_critical(&self) -> bool {
        self.warnings.iter().any(|w| w.level == Severity::Critical)
    }
}
