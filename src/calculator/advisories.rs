//! Advisories
//!
//! Everything the calculator says about a mix beyond the numbers: toxicity
//! and compatibility warnings, stock warnings, missing categories, composition
//! limits, nutrient and situation suggestions, grain diversity, herbs and
//! preparation notes.

use super::allocation::Allocation;
use super::analysis::{CategoryTotals, NutritionTotals};
use super::inventory::Inventory;
use super::result::{HerbRecommendation, MissingCategory, MixWarning};
use crate::knowledge::{
    Category, CompositionLimits, KnowledgeBase, MixMetric, PreparationNote, Species, SpeciesProfile,
};
use crate::safety;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

pub const EMPTY_INVENTORY_MESSAGE: &str = "Add ingredients to your inventory to calculate a mix";

const CORN_ONLY_SUGGESTION: &str = "Corn is the only grain in your mix. Consider adding wheat, barley, or oats for better nutritional balance and essential nutrients.";

fn display_key(key: &str) -> String {
    key.replace('_', " ")
}

// ============================================================================
// WARNINGS
// ============================================================================

/// Toxicity and compatibility scan over allocated ingredients
///
/// Both checks may fire for the same ingredient.
pub fn compatibility_warnings(
    kb: &KnowledgeBase,
    species: Species,
    mix: &BTreeMap<String, f64>,
) -> Vec<MixWarning> {
    let mut warnings = Vec::new();

    for (key, &grams) in mix {
        if grams <= 0.0 {
            continue;
        }

        if let Some(record) = safety::toxicity_for(kb, species, key) {
            warnings.push(MixWarning {
                level: record.severity,
                message: format!("{} contains {}. {}", record.name, record.toxin, record.message),
            });
        }

        if !safety::is_compatible(kb, key, species) {
            warnings.push(MixWarning::warning(format!(
                "{} is not recommended for {}. Consider using compatible alternatives.",
                display_key(key),
                display_key(species.id())
            )));
        }
    }

    warnings
}

/// Overflow and shortfall warnings from the allocation step
pub fn stock_warnings(allocation: &Allocation) -> Vec<MixWarning> {
    let mut warnings: Vec<MixWarning> = allocation
        .overflows
        .iter()
        .map(|o| {
            MixWarning::warning(format!(
                "Allocated {}g of {} but only {}g in stock",
                o.allocated,
                display_key(&o.key),
                o.stock
            ))
        })
        .collect();

    if let Some(missing) = allocation.shortfall {
        warnings.push(MixWarning::warning(format!(
            "Not enough stock to reach the target weight: {:.0}g short",
            missing
        )));
    }

    warnings
}

// ============================================================================
// MISSING CATEGORIES
// ============================================================================

/// Categories with no ingredient at all in the raw inventory
///
/// Zero-stock entries still count as present.
pub fn missing_categories(kb: &KnowledgeBase, inventory: &Inventory) -> Vec<MissingCategory> {
    let present: FxHashSet<Category> = inventory
        .iter()
        .filter_map(|(key, _)| kb.category_of(key))
        .collect();

    kb.category_advisories()
        .iter()
        .filter(|advisory| !present.contains(&advisory.category))
        .map(|advisory| MissingCategory {
            category: advisory.category,
            label: advisory.label.clone(),
            reason: advisory.reason.clone(),
            recommendations: advisory.recommendations.clone(),
        })
        .collect()
}

pub fn missing_category_warning(missing: &MissingCategory) -> MixWarning {
    let names: Vec<String> = missing.recommendations.iter().map(|k| display_key(k)).collect();
    MixWarning::warning(format!(
        "Missing {}: {}. Consider adding: {}",
        missing.label.to_lowercase(),
        missing.reason,
        names.join(", ")
    ))
}

// ============================================================================
// COMPOSITION
// ============================================================================

/// Whole-mix limit checks over the allocated mix
///
/// Only ingredients allocated a positive weight count toward diversity. A mix
/// with nothing allocated is not checked.
pub fn composition_warnings(
    limits: &CompositionLimits,
    mix: &BTreeMap<String, f64>,
    nutrition: &NutritionTotals,
    categories: &CategoryTotals,
) -> Vec<MixWarning> {
    let allocated = mix.values().filter(|&&grams| grams > 0.0).count();
    if allocated == 0 {
        return Vec::new();
    }

    let mut warnings = Vec::new();

    if categories.legume < limits.min_legume_share {
        warnings.push(MixWarning::critical(format!(
            "Legumes are only {:.1}% of the mix - at least {:.0}% needed for protein and vitamins",
            categories.legume, limits.min_legume_share
        )));
    }

    if categories.grain < limits.min_grain_share {
        warnings.push(MixWarning::critical(format!(
            "Insufficient grains ({:.1}%) - at least {:.0}% needed for energy",
            categories.grain, limits.min_grain_share
        )));
    }

    if nutrition.protein < limits.min_protein {
        warnings.push(MixWarning::critical(format!(
            "Protein too low ({:.1}%) - minimum {:.0}% needed",
            nutrition.protein, limits.min_protein
        )));
    } else if nutrition.protein > limits.max_protein {
        warnings.push(MixWarning::critical(format!(
            "Protein too high ({:.1}%) - can stress kidneys",
            nutrition.protein
        )));
    }

    if nutrition.fiber > limits.max_fiber {
        warnings.push(MixWarning::critical(format!(
            "Fiber too high ({:.1}%) - maximum {:.0}%, fiber is poorly utilized",
            nutrition.fiber, limits.max_fiber
        )));
    }

    if allocated < limits.min_ingredients {
        warnings.push(MixWarning::critical(format!(
            "Very limited diversity ({} ingredients) - need at least {}-{} ingredients",
            allocated, limits.min_ingredients, limits.recommended_ingredients
        )));
    } else if allocated < limits.recommended_ingredients {
        warnings.push(MixWarning::warning(format!(
            "Limited diversity ({} ingredients) - consider adding more ingredients",
            allocated
        )));
    }

    warnings
}

/// Situation-specific suggestions, in table order
pub fn situation_suggestions(
    limits: &CompositionLimits,
    situation: &str,
    nutrition: &NutritionTotals,
    categories: &CategoryTotals,
) -> Vec<String> {
    limits
        .situation_rules
        .iter()
        .filter(|rule| rule.situation == situation)
        .filter(|rule| metric_value(rule.metric, nutrition, categories) < rule.below)
        .map(|rule| rule.suggestion.clone())
        .collect()
}

fn metric_value(metric: MixMetric, nutrition: &NutritionTotals, categories: &CategoryTotals) -> f64 {
    match metric {
        MixMetric::Protein => nutrition.protein,
        MixMetric::Carbs => nutrition.carbs,
        MixMetric::Fat => nutrition.fat,
        MixMetric::Fiber => nutrition.fiber,
        MixMetric::GrainShare => categories.get(Category::Grain),
        MixMetric::LegumeShare => categories.get(Category::Legume),
        MixMetric::SeedShare => categories.get(Category::Seed),
    }
}

// ============================================================================
// SUGGESTIONS
// ============================================================================

/// Compare aggregates against the profile; fixed order protein, carbs, fat
pub fn nutrient_suggestions(profile: &SpeciesProfile, nutrition: &NutritionTotals) -> Vec<String> {
    let mut suggestions = Vec::new();

    if nutrition.protein < profile.protein.min {
        suggestions.push(format!(
            "Protein is below target ({:.1}% vs {:.1}% minimum). Add more legumes.",
            nutrition.protein, profile.protein.min
        ));
    }

    if nutrition.carbs < profile.carbs.min {
        suggestions.push(format!(
            "Carbohydrates are below target ({:.1}% vs {:.1}% minimum). Add more grains.",
            nutrition.carbs, profile.carbs.min
        ));
    }

    if nutrition.fat > profile.fat.max {
        suggestions.push(format!(
            "Fat is above target ({:.1}% vs {:.1}% maximum). Reduce oil seeds.",
            nutrition.fat, profile.fat.max
        ));
    }

    suggestions
}

/// Corn (or maize) as the sole allocated grain
pub fn grain_diversity_suggestion(kb: &KnowledgeBase, mix: &BTreeMap<String, f64>) -> Option<String> {
    let grains: Vec<&str> = mix
        .iter()
        .filter(|&(key, &grams)| grams > 0.0 && kb.category_of(key) == Some(Category::Grain))
        .map(|(key, _)| key.as_str())
        .collect();

    match grains.as_slice() {
        [only] => {
            let lower = only.to_lowercase();
            (lower.contains("corn") || lower.contains("maize")).then(|| CORN_ONLY_SUGGESTION.to_string())
        }
        _ => None,
    }
}

// ============================================================================
// HERBS & PREPARATION
// ============================================================================

/// Herbs for a situation, with dosages scaled to the batch
///
/// Returns an empty list and purpose for situations without a plan.
pub fn herb_recommendations(
    kb: &KnowledgeBase,
    situation: &str,
    batch_weight: f64,
) -> (Vec<HerbRecommendation>, String) {
    let Some(plan) = kb.herb_plan(situation) else {
        return (Vec::new(), String::new());
    };

    let herbs = plan
        .recommended
        .iter()
        .filter_map(|key| {
            let herb = kb.herb(key)?;
            Some(HerbRecommendation {
                key: key.clone(),
                name: display_key(key),
                benefits: herb.benefits.clone(),
                dosage: herb.dosage_per_kg.clone(),
                frequency: herb.frequency.clone(),
                notes: herb.notes.clone(),
                batch_amount: scale_dosage(&herb.dosage_per_kg, batch_weight),
            })
        })
        .collect();

    (herbs, plan.notes.clone())
}

/// Scale a "<number>g" or "<number>ml" per-kg dosage to a batch weight in grams
pub fn scale_dosage(dosage: &str, batch_weight: f64) -> Option<String> {
    let dosage = dosage.trim();
    let (amount, unit) = if let Some(amount) = dosage.strip_suffix("ml") {
        (amount, "ml")
    } else if let Some(amount) = dosage.strip_suffix('g') {
        (amount, "g")
    } else {
        return None;
    };

    let per_kg: f64 = amount.trim_end().parse().ok()?;
    if !per_kg.is_finite() || batch_weight <= 0.0 {
        return None;
    }
    Some(format!("{:.1}{}", per_kg * batch_weight / 1000.0, unit))
}

/// Preparation notes for ingredients allocated a positive weight, in mix order
pub fn preparation_notes(kb: &KnowledgeBase, mix: &BTreeMap<String, f64>) -> Vec<PreparationNote> {
    mix.iter()
        .filter(|&(_, &grams)| grams > 0.0)
        .filter_map(|(key, _)| safety::preparation_for(kb, key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::allocation::StockOverflow;
    use crate::knowledge::Severity;

    fn kb() -> &'static KnowledgeBase {
        KnowledgeBase::shared().unwrap()
    }

    fn mix(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_toxicity_warning_text() {
        let warnings = compatibility_warnings(kb(), Species::Pigeon, &mix(&[("kidney_beans", 100.0)]));
        // Toxic for pigeons and listed incompatible
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].level, Severity::Critical);
        assert!(warnings[0].message.contains("contains"));
        assert_eq!(
            warnings[1].message,
            "kidney beans is not recommended for pigeon. Consider using compatible alternatives."
        );
    }

    #[test]
    fn test_safe_mix_has_no_warnings() {
        let warnings = compatibility_warnings(kb(), Species::Pigeon, &mix(&[("wheat", 500.0), ("lentils", 500.0)]));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_stock_warning_text() {
        let allocation = Allocation {
            overflows: vec![StockOverflow {
                key: "peas_green".to_string(),
                allocated: 420.0,
                stock: 300.0,
            }],
            ..Default::default()
        };
        let warnings = stock_warnings(&allocation);
        assert_eq!(warnings[0].message, "Allocated 420g of peas green but only 300g in stock");
    }

    #[test]
    fn test_missing_categories_from_raw_inventory() {
        let inventory = Inventory::from_pairs([("sunflower_seeds", 100.0), ("wheat", 0.0)]).unwrap();
        let missing = missing_categories(kb(), &inventory);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].label, "Legumes");

        let warning = missing_category_warning(&missing[0]);
        assert!(warning.message.starts_with("Missing legumes: "));
        assert!(warning.message.contains("Consider adding: peas green, lentils"));
    }

    #[test]
    fn test_nutrient_suggestions_order() {
        let profile = kb().resolve_profile(Species::Pigeon, "maintenance");
        let nutrition = NutritionTotals {
            protein: 10.04,
            carbs: 10.0,
            fat: 9.0,
            fiber: 1.0,
        };
        let suggestions = nutrient_suggestions(profile, &nutrition);
        assert_eq!(suggestions.len(), 3);
        assert_eq!(
            suggestions[0],
            "Protein is below target (10.0% vs 13.5% minimum). Add more legumes."
        );
        assert!(suggestions[1].starts_with("Carbohydrates"));
        assert!(suggestions[2].ends_with("Reduce oil seeds."));
    }

    #[test]
    fn test_corn_only_grain() {
        let suggestion = grain_diversity_suggestion(kb(), &mix(&[("corn_yellow", 600.0), ("lentils", 400.0)]));
        assert_eq!(suggestion.as_deref(), Some(CORN_ONLY_SUGGESTION));

        assert!(grain_diversity_suggestion(kb(), &mix(&[("wheat", 600.0)])).is_none());
        assert!(grain_diversity_suggestion(kb(), &mix(&[("corn_yellow", 600.0), ("wheat", 100.0)])).is_none());
    }

    #[test]
    fn test_scale_dosage() {
        assert_eq!(scale_dosage("10g", 1500.0).as_deref(), Some("15.0g"));
        assert_eq!(scale_dosage("5ml", 1000.0).as_deref(), Some("5.0ml"));
        assert_eq!(scale_dosage("Free choice", 1000.0), None);
        assert_eq!(scale_dosage("15ml per liter of water", 1000.0), None);
    }

    #[test]
    fn test_herbs_by_situation() {
        let (herbs, purpose) = herb_recommendations(kb(), "molting", 1000.0);
        assert!(herbs.iter().any(|h| h.key == "brewers_yeast" && h.name == "brewers yeast"));
        assert!(!purpose.is_empty());

        let (herbs, purpose) = herb_recommendations(kb(), "hibernation", 1000.0);
        assert!(herbs.is_empty());
        assert!(purpose.is_empty());
    }

    #[test]
    fn test_preparation_notes_for_allocated_only() {
        let notes = preparation_notes(kb(), &mix(&[("safflower_seeds", 100.0), ("wheat", 900.0)]));
        assert_eq!(notes.len(), 1);

        let notes = preparation_notes(kb(), &mix(&[("safflower_seeds", 0.0), ("wheat", 900.0)]));
        assert!(notes.is_empty());
    }

    fn pigeon_limits() -> &'static CompositionLimits {
        kb().composition(Species::Pigeon).unwrap()
    }

    #[test]
    fn test_seed_only_mix_fails_composition() {
        let nutrition = NutritionTotals {
            protein: 19.0,
            carbs: 40.0,
            fat: 30.0,
            fiber: 9.0,
        };
        let categories = CategoryTotals {
            grain: 0.0,
            legume: 0.0,
            seed: 100.0,
        };
        let warnings = composition_warnings(
            pigeon_limits(),
            &mix(&[("sunflower_seeds", 500.0), ("safflower_seeds", 500.0)]),
            &nutrition,
            &categories,
        );

        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(warnings.len(), 4, "{:?}", messages);
        assert!(warnings.iter().all(|w| w.level == Severity::Critical));
        assert!(messages[0].starts_with("Legumes are only 0.0%"));
        assert!(messages[1].starts_with("Insufficient grains"));
        assert!(messages[2].starts_with("Fiber too high (9.0%)"));
        assert!(messages[3].starts_with("Very limited diversity (2 ingredients)"));
    }

    #[test]
    fn test_balanced_mix_passes_composition() {
        let nutrition = NutritionTotals {
            protein: 14.0,
            carbs: 65.0,
            fat: 4.0,
            fiber: 4.0,
        };
        let categories = CategoryTotals {
            grain: 60.0,
            legume: 30.0,
            seed: 10.0,
        };
        let balanced = mix(&[("wheat", 400.0), ("barley", 200.0), ("peas_green", 300.0), ("hemp_seeds", 100.0)]);
        assert!(composition_warnings(pigeon_limits(), &balanced, &nutrition, &categories).is_empty());

        // Zero-gram entries do not count toward diversity
        let thin = mix(&[("wheat", 600.0), ("barley", 0.0), ("peas_green", 300.0), ("hemp_seeds", 100.0)]);
        let warnings = composition_warnings(pigeon_limits(), &thin, &nutrition, &categories);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, Severity::Warning);
        assert!(warnings[0].message.starts_with("Limited diversity (3 ingredients)"));
    }

    #[test]
    fn test_empty_allocation_skips_composition() {
        let warnings = composition_warnings(
            pigeon_limits(),
            &mix(&[("wheat", 0.0)]),
            &NutritionTotals::default(),
            &CategoryTotals::default(),
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_situation_suggestions_follow_rules() {
        let nutrition = NutritionTotals {
            protein: 13.0,
            carbs: 65.0,
            fat: 3.0,
            fiber: 4.0,
        };
        let categories = CategoryTotals {
            grain: 80.0,
            legume: 20.0,
            seed: 0.0,
        };

        let molting = situation_suggestions(pigeon_limits(), "molting", &nutrition, &categories);
        assert_eq!(molting, vec!["For molting, increase protein to 16%+ with more legumes"]);

        let racing = situation_suggestions(pigeon_limits(), "racing", &nutrition, &categories);
        assert_eq!(racing.len(), 1);
        assert!(racing[0].starts_with("For racing"));

        let winter = situation_suggestions(pigeon_limits(), "winter", &nutrition, &categories);
        assert!(winter[0].starts_with("For winter"));

        assert!(situation_suggestions(pigeon_limits(), "maintenance", &nutrition, &categories).is_empty());
    }
}
