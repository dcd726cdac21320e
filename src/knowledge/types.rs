//! Knowledge Base Record Types
//!
//! Typed rows for every table in `data/`. All records are immutable once the
//! knowledge base is loaded.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Bird species supported by the calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Pigeon,
    Parrot,
    AfricanGrey,
    Budgie,
    Canary,
    Chicken,
}

impl Species {
    pub const ALL: [Species; 6] = [
        Species::Pigeon,
        Species::Parrot,
        Species::AfricanGrey,
        Species::Budgie,
        Species::Canary,
        Species::Chicken,
    ];

    /// Species used when the caller names one we don't know
    pub const DEFAULT: Species = Species::Pigeon;

    pub fn id(&self) -> &'static str {
        match self {
            Species::Pigeon => "pigeon",
            Species::Parrot => "parrot",
            Species::AfricanGrey => "african_grey",
            Species::Budgie => "budgie",
            Species::Canary => "canary",
            Species::Chicken => "chicken",
        }
    }

    /// Parse a species identifier
    ///
    /// Case-insensitive; spaces and hyphens are treated as underscores so
    /// "African Grey" and "african-grey" both resolve.
    pub fn parse(raw: &str) -> Option<Species> {
        let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
        Species::ALL.into_iter().find(|s| s.id() == normalized)
    }

    /// Parse a species identifier, falling back to [`Species::DEFAULT`]
    pub fn resolve(raw: &str) -> Species {
        match Species::parse(raw) {
            Some(species) => species,
            None => {
                tracing::warn!("Unknown species '{}', falling back to '{}'", raw, Species::DEFAULT);
                Species::DEFAULT
            }
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Coarse ingredient classification used for ratio targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Grain,
    Legume,
    Seed,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Grain, Category::Legume, Category::Seed];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Grain => "grain",
            Category::Legume => "legume",
            Category::Seed => "seed",
        }
    }

    /// Plural display label ("Grains", "Legumes", "Seeds")
    pub fn label(&self) -> &'static str {
        match self {
            Category::Grain => "Grains",
            Category::Legume => "Legumes",
            Category::Seed => "Seeds",
        }
    }
}

/// Severity attached to toxicity records and emitted warnings
///
/// Data files spell it lower-case, results upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "WARNING", alias = "warning")]
    Warning,
    #[serde(rename = "CRITICAL", alias = "critical")]
    Critical,
}

impl Severity {
    /// Label used on printed recipe cards
    pub fn display_text(&self) -> &'static str {
        match self {
            Severity::Warning => "Warning",
            Severity::Critical => "CRITICAL",
        }
    }
}

// ============================================================================
// RANGES
// ============================================================================

/// Inclusive [min, max] target range in percentage units
///
/// Serialized as a two-element array, matching the data files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct NutrientRange {
    pub min: f64,
    pub max: f64,
}

impl NutrientRange {
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl From<[f64; 2]> for NutrientRange {
    fn from(pair: [f64; 2]) -> Self {
        Self { min: pair[0], max: pair[1] }
    }
}

impl From<NutrientRange> for [f64; 2] {
    fn from(range: NutrientRange) -> Self {
        [range.min, range.max]
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// Display metadata for a species
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub id: Species,
    pub name: String,
    pub description: String,
}

/// Nutritional reference data for one ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique key, filled from the table key at load time
    #[serde(default)]
    pub key: String,
    pub category: Category,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    #[serde(default)]
    pub notes: String,
}

impl Ingredient {
    /// Human-readable name derived from the key ("peas_green" -> "peas green")
    pub fn display_name(&self) -> String {
        self.key.replace('_', " ")
    }
}

/// Target ranges for the three ingredient categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRatios {
    pub grain: NutrientRange,
    pub legume: NutrientRange,
    pub seed: NutrientRange,
}

impl CategoryRatios {
    pub fn for_category(&self, category: Category) -> &NutrientRange {
        match category {
            Category::Grain => &self.grain,
            Category::Legume => &self.legume,
            Category::Seed => &self.seed,
        }
    }
}

/// Nutrition targets for one (species, situation) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesProfile {
    /// Situation identifier ("maintenance", "egg-laying", ...)
    pub situation: String,
    /// Display name ("Maintenance/Rest")
    pub name: String,
    pub protein: NutrientRange,
    pub carbs: NutrientRange,
    pub fat: NutrientRange,
    pub fiber: NutrientRange,
    pub category_ratios: CategoryRatios,
    pub feeding_notes: String,
}

impl SpeciesProfile {
    /// Nutrient ranges paired with their names, in display order
    pub fn nutrient_ranges(&self) -> [(&'static str, &NutrientRange); 4] {
        [
            ("protein", &self.protein),
            ("carbs", &self.carbs),
            ("fat", &self.fat),
            ("fiber", &self.fiber),
        ]
    }
}

/// Species-specific toxicity warning for an ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxicityRecord {
    pub name: String,
    pub toxin: String,
    pub severity: Severity,
    pub message: String,
}

/// Which species an ingredient suits
///
/// Ingredients without a record are compatible with every species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityRecord {
    #[serde(default)]
    pub compatible_with: Vec<Species>,
    #[serde(default)]
    pub incompatible_with: Vec<Species>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Ingredient that is toxic unless cooked, regardless of species
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawToxicity {
    pub name: String,
    pub toxin: String,
    pub severity: Severity,
    pub message: String,
    pub preparation: String,
}

/// Preparation instructions for an ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparationNote {
    pub name: String,
    pub preparation: String,
    pub notes: String,
}

/// Advisory emitted when an inventory lacks a whole category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAdvisory {
    pub category: Category,
    pub label: String,
    pub reason: String,
    pub recommendations: Vec<String>,
}

/// Herb or supplement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Herb {
    pub benefits: Vec<String>,
    pub dosage_per_kg: String,
    pub frequency: String,
    pub notes: String,
}

/// Herbs recommended for one situation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HerbPlan {
    pub recommended: Vec<String>,
    pub notes: String,
}

// ============================================================================
// COMPOSITION LIMITS
// ============================================================================

/// Aggregate a situation rule compares against its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixMetric {
    Protein,
    Carbs,
    Fat,
    Fiber,
    GrainShare,
    LegumeShare,
    SeedShare,
}

/// Suggestion emitted for one situation when a metric falls below `below`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SituationRule {
    pub situation: String,
    pub metric: MixMetric,
    pub below: f64,
    pub suggestion: String,
}

/// Whole-mix limits for one species, checked after allocation
///
/// Shares and nutrients are percentages. Ingredient counts only include
/// entries allocated a positive weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionLimits {
    pub min_legume_share: f64,
    pub min_grain_share: f64,
    pub min_protein: f64,
    pub max_protein: f64,
    pub max_fiber: f64,
    pub min_ingredients: usize,
    pub recommended_ingredients: usize,
    #[serde(default)]
    pub situation_rules: Vec<SituationRule>,
}
