//! Knowledge Base
//!
//! Static reference tables consulted by the calculator: ingredient nutrition,
//! per-species situation profiles, toxicity, compatibility, raw-toxicity and
//! preparation advice, whole-mix composition limits, and herb/supplement
//! recommendations.
//!
//! The tables live as JSON under `data/` so aviculturists can audit them
//! without reading calculation code. They are embedded at compile time
//! ([`KnowledgeBase::builtin`]) and can be reloaded from a directory
//! ([`KnowledgeBase::from_dir`]). Either way the knowledge base is validated
//! once and read-only afterwards.

pub mod types;
pub mod validation;

pub use types::{
    Category, CategoryAdvisory, CategoryRatios, CompatibilityRecord, CompositionLimits, Herb, HerbPlan,
    Ingredient, MixMetric, NutrientRange, PreparationNote, RawToxicity, Severity, SituationRule, Species,
    SpeciesInfo, SpeciesProfile, ToxicityRecord,
};

use anyhow::{Context, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

// ============================================================================
// EMBEDDED DATA
// Source: data/*.json
// ============================================================================

const SPECIES_JSON: &str = include_str!("../../data/species.json");
const INGREDIENTS_JSON: &str = include_str!("../../data/ingredients.json");
const PROFILES_JSON: &str = include_str!("../../data/profiles.json");
const TOXICITY_JSON: &str = include_str!("../../data/toxicity.json");
const COMPATIBILITY_JSON: &str = include_str!("../../data/compatibility.json");
const SAFETY_JSON: &str = include_str!("../../data/safety.json");
const HERBS_JSON: &str = include_str!("../../data/herbs.json");
const COMPOSITION_JSON: &str = include_str!("../../data/composition.json");

/// File names read by [`KnowledgeBase::from_dir`], in [`KnowledgeSources`] field order
pub const DATA_FILES: [&str; 8] = [
    "species.json",
    "ingredients.json",
    "profiles.json",
    "toxicity.json",
    "compatibility.json",
    "safety.json",
    "herbs.json",
    "composition.json",
];

static SHARED: OnceLock<std::result::Result<KnowledgeBase, String>> = OnceLock::new();

/// Contents of `safety.json`
#[derive(Debug, Deserialize)]
pub(crate) struct SafetyTables {
    pub(crate) raw_toxic: FxHashMap<String, RawToxicity>,
    pub(crate) safe_raw_legumes: FxHashSet<String>,
    pub(crate) grains_needing_pairing: FxHashSet<String>,
    pub(crate) grain_pairings: FxHashMap<String, Vec<String>>,
    pub(crate) preparation: FxHashMap<String, PreparationNote>,
    pub(crate) category_advisories: Vec<CategoryAdvisory>,
}

/// Contents of `herbs.json`
#[derive(Debug, Deserialize)]
pub(crate) struct HerbTables {
    pub(crate) herbs: FxHashMap<String, Herb>,
    pub(crate) recommendations: FxHashMap<String, HerbPlan>,
}

/// Raw JSON text for each table
pub struct KnowledgeSources<'a> {
    pub species: &'a str,
    pub ingredients: &'a str,
    pub profiles: &'a str,
    pub toxicity: &'a str,
    pub compatibility: &'a str,
    pub safety: &'a str,
    pub herbs: &'a str,
    pub composition: &'a str,
}

impl KnowledgeSources<'static> {
    /// Tables compiled into the crate
    pub fn embedded() -> Self {
        Self {
            species: SPECIES_JSON,
            ingredients: INGREDIENTS_JSON,
            profiles: PROFILES_JSON,
            toxicity: TOXICITY_JSON,
            compatibility: COMPATIBILITY_JSON,
            safety: SAFETY_JSON,
            herbs: HERBS_JSON,
            composition: COMPOSITION_JSON,
        }
    }
}

/// Loaded, validated reference tables
#[derive(Debug)]
pub struct KnowledgeBase {
    species: Vec<SpeciesInfo>,
    ingredients: FxHashMap<String, Ingredient>,
    profiles: FxHashMap<Species, Vec<SpeciesProfile>>,
    toxicity: FxHashMap<Species, FxHashMap<String, ToxicityRecord>>,
    compatibility: FxHashMap<String, CompatibilityRecord>,
    safety: SafetyTables,
    herbs: HerbTables,
    composition: FxHashMap<Species, CompositionLimits>,
    /// First profile of the default species; last-resort profile resolution
    fallback_profile: SpeciesProfile,
}

impl KnowledgeBase {
    /// Load the tables embedded at compile time
    pub fn builtin() -> Result<Self> {
        Self::from_sources(&KnowledgeSources::embedded())
    }

    /// Process-wide copy of the embedded tables, loaded on first use
    pub fn shared() -> Result<&'static KnowledgeBase> {
        SHARED
            .get_or_init(|| Self::builtin().map_err(|e| format!("{:#}", e)))
            .as_ref()
            .map_err(|e| anyhow::anyhow!("Failed to load built-in knowledge base: {}", e))
    }

    /// Load tables from a directory containing the files in [`DATA_FILES`]
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let contents = DATA_FILES
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read knowledge base file: {:?}", path))
            })
            .collect::<Result<Vec<String>>>()?;

        let [species, ingredients, profiles, toxicity, compatibility, safety, herbs, composition] =
            contents.as_slice()
        else {
            anyhow::bail!("Expected {} knowledge base files in {:?}", DATA_FILES.len(), dir);
        };

        Self::from_sources(&KnowledgeSources {
            species,
            ingredients,
            profiles,
            toxicity,
            compatibility,
            safety,
            herbs,
            composition,
        })
        .with_context(|| format!("Invalid knowledge base in {:?}", dir))
    }

    /// Parse and validate raw JSON tables
    pub fn from_sources(sources: &KnowledgeSources<'_>) -> Result<Self> {
        let species: Vec<SpeciesInfo> = parse_table("species.json", sources.species)?;
        let mut ingredients: FxHashMap<String, Ingredient> =
            parse_table("ingredients.json", sources.ingredients)?;
        let profiles: FxHashMap<Species, Vec<SpeciesProfile>> =
            parse_table("profiles.json", sources.profiles)?;
        let toxicity: FxHashMap<Species, FxHashMap<String, ToxicityRecord>> =
            parse_table("toxicity.json", sources.toxicity)?;
        let compatibility: FxHashMap<String, CompatibilityRecord> =
            parse_table("compatibility.json", sources.compatibility)?;
        let safety: SafetyTables = parse_table("safety.json", sources.safety)?;
        let herbs: HerbTables = parse_table("herbs.json", sources.herbs)?;
        let composition: FxHashMap<Species, CompositionLimits> =
            parse_table("composition.json", sources.composition)?;

        for (key, ingredient) in ingredients.iter_mut() {
            ingredient.key = key.clone();
        }

        let fallback_profile = profiles
            .get(&Species::DEFAULT)
            .and_then(|list| list.first())
            .cloned()
            .with_context(|| format!("No profiles defined for default species '{}'", Species::DEFAULT))?;

        let kb = Self {
            species,
            ingredients,
            profiles,
            toxicity,
            compatibility,
            safety,
            herbs,
            composition,
            fallback_profile,
        };

        validation::validate(&kb)?;

        tracing::info!(
            "Knowledge base loaded: {} species, {} ingredients, {} profiles, {} herbs",
            kb.species.len(),
            kb.ingredients.len(),
            kb.profiles.values().map(Vec::len).sum::<usize>(),
            kb.herbs.herbs.len()
        );

        Ok(kb)
    }

    // ========================================================================
    // SPECIES & PROFILES
    // ========================================================================

    pub fn species(&self) -> &[SpeciesInfo] {
        &self.species
    }

    pub fn species_info(&self, species: Species) -> Option<&SpeciesInfo> {
        self.species.iter().find(|info| info.id == species)
    }

    /// Profiles for a species in table order (first = fallback)
    pub fn profiles_for(&self, species: Species) -> &[SpeciesProfile] {
        self.profiles.get(&species).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Exact (species, situation) lookup
    pub fn profile(&self, species: Species, situation: &str) -> Option<&SpeciesProfile> {
        self.profiles_for(species)
            .iter()
            .find(|p| p.situation.eq_ignore_ascii_case(situation.trim()))
    }

    /// Resolve a profile, never failing
    ///
    /// Unknown situation → first profile for the species.
    pub fn resolve_profile(&self, species: Species, situation: &str) -> &SpeciesProfile {
        self.profile(species, situation)
            .or_else(|| self.profiles_for(species).first())
            .unwrap_or(&self.fallback_profile)
    }

    // ========================================================================
    // INGREDIENTS
    // ========================================================================

    pub fn ingredient(&self, key: &str) -> Option<&Ingredient> {
        self.ingredients.get(key)
    }

    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }

    /// Ingredient keys, sorted
    pub fn ingredient_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.ingredients.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn category_of(&self, key: &str) -> Option<Category> {
        self.ingredient(key).map(|i| i.category)
    }

    // ========================================================================
    // SAFETY TABLES
    // ========================================================================

    /// Direct toxicity lookup (no name normalization)
    pub fn toxicity(&self, species: Species, key: &str) -> Option<&ToxicityRecord> {
        self.toxicity.get(&species).and_then(|table| table.get(key))
    }

    pub fn compatibility(&self, key: &str) -> Option<&CompatibilityRecord> {
        self.compatibility.get(key)
    }

    pub fn raw_toxicity(&self, key: &str) -> Option<&RawToxicity> {
        self.safety.raw_toxic.get(key)
    }

    pub fn is_safe_raw_legume(&self, key: &str) -> bool {
        self.safety.safe_raw_legumes.contains(key)
    }

    pub fn grain_needs_pairing(&self, key: &str) -> bool {
        self.safety.grains_needing_pairing.contains(key)
    }

    pub fn grain_pairings(&self, key: &str) -> &[String] {
        self.safety.grain_pairings.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn preparation(&self, key: &str) -> Option<&PreparationNote> {
        self.safety.preparation.get(key)
    }

    /// Missing-category advisories in table order
    pub fn category_advisories(&self) -> &[CategoryAdvisory] {
        &self.safety.category_advisories
    }

    /// Whole-mix composition limits; species without limits are not checked
    pub fn composition(&self, species: Species) -> Option<&CompositionLimits> {
        self.composition.get(&species)
    }

    // ========================================================================
    // HERBS
    // ========================================================================

    pub fn herb(&self, key: &str) -> Option<&Herb> {
        self.herbs.herbs.get(key)
    }

    /// Herb plan for a situation (independent of species)
    pub fn herb_plan(&self, situation: &str) -> Option<&HerbPlan> {
        self.herbs.recommendations.get(situation)
    }
}

fn parse_table<T: DeserializeOwned>(name: &str, contents: &str) -> Result<T> {
    serde_json::from_str(contents).with_context(|| format!("Failed to parse {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> &'static KnowledgeBase {
        KnowledgeBase::shared().unwrap()
    }

    #[test]
    fn test_builtin_loads() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert_eq!(kb.species().len(), 6);
        assert!(kb.ingredient("wheat").is_some());
    }

    #[test]
    fn test_ingredient_keys_filled_from_table() {
        let wheat = kb().ingredient("wheat").unwrap();
        assert_eq!(wheat.key, "wheat");
        assert_eq!(wheat.category, Category::Grain);
        assert_eq!(kb().ingredient("peas_green").unwrap().display_name(), "peas green");
    }

    #[test]
    fn test_every_species_has_profiles() {
        for species in Species::ALL {
            assert!(
                !kb().profiles_for(species).is_empty(),
                "{} should have at least one profile",
                species
            );
        }
    }

    #[test]
    fn test_profile_order_preserved() {
        let first = &kb().profiles_for(Species::Pigeon)[0];
        assert_eq!(first.situation, "maintenance");
        assert_eq!(kb().profiles_for(Species::Chicken)[0].situation, "pet");
    }

    #[test]
    fn test_resolve_profile_fallback() {
        let exact = kb().resolve_profile(Species::Pigeon, "racing");
        assert_eq!(exact.situation, "racing");

        // Parrots have no racing profile: first parrot profile wins
        let fallback = kb().resolve_profile(Species::Parrot, "racing");
        assert_eq!(fallback.situation, "pet");
    }

    #[test]
    fn test_direct_toxicity_lookup() {
        let record = kb().toxicity(Species::Pigeon, "kidney_beans").unwrap();
        assert_eq!(record.severity, Severity::Critical);
        assert!(kb().toxicity(Species::Pigeon, "wheat").is_none());
        assert!(kb().toxicity(Species::Parrot, "kidney_beans").is_none());
    }

    #[test]
    fn test_composition_limits_pigeon_only() {
        let limits = kb().composition(Species::Pigeon).unwrap();
        assert_eq!(limits.min_ingredients, 3);
        assert!(limits
            .situation_rules
            .iter()
            .any(|r| r.situation == "racing" && r.metric == MixMetric::LegumeShare));
        assert!(kb().composition(Species::Parrot).is_none());
    }

    #[test]
    fn test_herb_plan_lookup() {
        let plan = kb().herb_plan("molting").unwrap();
        assert!(plan.recommended.iter().any(|h| h == "brewers_yeast"));
        assert!(kb().herb_plan("hibernation").is_none());
    }

    #[test]
    fn test_from_dir_reads_shipped_tables() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let kb = KnowledgeBase::from_dir(&dir).unwrap();
        assert_eq!(kb.ingredient_keys(), KnowledgeBase::builtin().unwrap().ingredient_keys());
    }

    #[test]
    fn test_from_dir_missing_directory_errors() {
        let err = KnowledgeBase::from_dir(Path::new("/nonexistent/knowledge")).unwrap_err();
        assert!(format!("{:#}", err).contains("species.json"));
    }

    #[test]
    fn test_from_dir_requires_every_data_file() {
        let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let dir = std::env::temp_dir().join(format!("bird_mix_kb_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for name in DATA_FILES.iter().filter(|&&name| name != "composition.json") {
            fs::copy(source.join(name), dir.join(name)).unwrap();
        }

        let err = KnowledgeBase::from_dir(&dir).unwrap_err();
        fs::remove_dir_all(&dir).unwrap();
        assert!(format!("{:#}", err).contains("composition.json"));
    }
}
