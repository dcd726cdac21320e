//! Mix Calculator
//!
//! Binds an inventory, a species and a situation to a knowledge base, then
//! computes a [`MixResult`] for a target batch weight.
//!
//! Pipeline per `calculate` call:
//! 1. Empty inventory short-circuits to a single warning
//! 2. Score and allocate ([`allocation`])
//! 3. Aggregate nutrition and category shares ([`analysis`])
//! 4. Warnings, missing categories, composition limits, suggestions, herbs
//!    ([`advisories`])
//!
//! The calculator holds no mutable state; repeated calls with the same
//! target weight return equal results.

pub mod advisories;
pub mod allocation;
pub mod analysis;
pub mod inventory;
pub mod policy;
pub mod result;

pub use analysis::{CategoryTotals, NutritionTotals};
pub use inventory::Inventory;
pub use policy::ScoringPolicy;
pub use result::{HerbRecommendation, MissingCategory, MixResult, MixWarning};

use crate::error::MixError;
use crate::knowledge::{KnowledgeBase, Species, SpeciesProfile};
use std::collections::BTreeMap;

pub struct MixCalculator<'kb> {
    kb: &'kb KnowledgeBase,
    inventory: Inventory,
    species: Species,
    /// Situation as given by the caller (herb lookup key)
    situation: String,
    profile: &'kb SpeciesProfile,
    policy: ScoringPolicy,
}

impl<'kb> MixCalculator<'kb> {
    /// Resolve species and profile; unknown identifiers fall back, never fail
    pub fn new(kb: &'kb KnowledgeBase, inventory: Inventory, situation: &str, species: &str) -> Self {
        Self::with_species(kb, inventory, situation, Species::resolve(species))
    }

    pub fn with_species(kb: &'kb KnowledgeBase, inventory: Inventory, situation: &str, species: Species) -> Self {
        let situation = situation.trim().to_lowercase();
        let profile = kb.resolve_profile(species, &situation);
        if profile.situation != situation {
            tracing::warn!(
                "Unknown situation '{}' for {}, using '{}'",
                situation,
                species,
                profile.situation
            );
        }

        Self {
            kb,
            inventory,
            species,
            situation,
            profile,
            policy: ScoringPolicy::default(),
        }
    }

    /// Single-species entry point for pigeon lofts
    pub fn for_pigeons(kb: &'kb KnowledgeBase, inventory: Inventory, situation: &str) -> Self {
        Self::with_species(kb, inventory, situation, Species::Pigeon)
    }

    /// Replace the default scoring policy
    pub fn with_policy(mut self, policy: ScoringPolicy) -> Result<Self, MixError> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn profile(&self) -> &'kb SpeciesProfile {
        self.profile
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn calculate(&self, target_weight: f64) -> Result<MixResult, MixError> {
        if !target_weight.is_finite() || target_weight <= 0.0 {
            return Err(MixError::InvalidTargetWeight(target_weight));
        }

        if self.inventory.is_empty() {
            return Ok(self.empty_result());
        }

        let kb = self.kb;
        let scored = allocation::score_inventory(kb, &self.inventory, self.profile, self.species, &self.policy);
        let allocation = allocation::allocate(&scored, target_weight, &self.policy);
        tracing::debug!(
            "Allocated {} of {} inventory entries (total score {:.3})",
            allocation.mix.len(),
            self.inventory.len(),
            allocation.total_score
        );

        let (nutrition, categories) = analysis::analyze(kb, &allocation.mix);

        let mut warnings = advisories::compatibility_warnings(kb, self.species, &allocation.mix);
        warnings.extend(advisories::stock_warnings(&allocation));

        let missing = advisories::missing_categories(kb, &self.inventory);
        warnings.extend(missing.iter().map(advisories::missing_category_warning));

        let limits = kb.composition(self.species);
        if let Some(limits) = limits {
            warnings.extend(advisories::composition_warnings(
                limits,
                &allocation.mix,
                &nutrition,
                &categories,
            ));
        }

        let mut suggestions = advisories::nutrient_suggestions(self.profile, &nutrition);
        suggestions.extend(advisories::grain_diversity_suggestion(kb, &allocation.mix));
        if let Some(limits) = limits.filter(|_| allocation.mix.values().any(|&grams| grams > 0.0)) {
            suggestions.extend(advisories::situation_suggestions(
                limits,
                &self.profile.situation,
                &nutrition,
                &categories,
            ));
        }

        let (herb_recommendations, herb_purpose) =
            advisories::herb_recommendations(kb, &self.situation, target_weight);
        let preparation = advisories::preparation_notes(kb, &allocation.mix);

        Ok(MixResult {
            species: self.species,
            situation: self.profile.situation.clone(),
            profile_name: self.profile.name.clone(),
            mix: allocation.mix,
            nutrition,
            categories,
            warnings,
            suggestions,
            herb_recommendations,
            herb_purpose,
            missing_ingredients: (!missing.is_empty()).then_some(missing),
            feeding_notes: self.profile.feeding_notes.clone(),
            preparation,
        })
    }

    fn empty_result(&self) -> MixResult {
        MixResult {
            species: self.species,
            situation: self.profile.situation.clone(),
            profile_name: self.profile.name.clone(),
            mix: BTreeMap::new(),
            nutrition: NutritionTotals::default(),
            categories: CategoryTotals::default(),
            warnings: vec![MixWarning::warning(advisories::EMPTY_INVENTORY_MESSAGE)],
            suggestions: Vec::new(),
            herb_recommendations: Vec::new(),
            herb_purpose: String::new(),
            missing_ingredients: None,
            feeding_notes: self.profile.feeding_notes.clone(),
            preparation: Vec::new(),
        }
    }
}
