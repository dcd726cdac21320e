//! Knowledge Base Validation
//!
//! Structural checks applied once at load time so the calculator can rely on
//! the tables without re-checking them per call.

use super::{KnowledgeBase, NutrientRange, Species};
use anyhow::{bail, Result};
use rustc_hash::FxHashSet;

/// Validate a freshly parsed knowledge base
pub fn validate(kb: &KnowledgeBase) -> Result<()> {
    validate_species(kb)?;
    validate_ingredients(kb)?;
    validate_profiles(kb)?;
    validate_compatibility(kb)?;
    validate_safety(kb)?;
    validate_herbs(kb)?;
    validate_composition(kb)?;
    Ok(())
}

fn validate_species(kb: &KnowledgeBase) -> Result<()> {
    for species in Species::ALL {
        if kb.species_info(species).is_none() {
            bail!("species.json has no entry for '{}'", species);
        }
    }
    Ok(())
}

fn validate_ingredients(kb: &KnowledgeBase) -> Result<()> {
    for ingredient in kb.ingredients.values() {
        for (nutrient, value) in [
            ("protein", ingredient.protein),
            ("carbs", ingredient.carbs),
            ("fat", ingredient.fat),
            ("fiber", ingredient.fiber),
        ] {
            if !is_percentage(value) {
                bail!(
                    "Ingredient '{}' has invalid {} percentage: {}",
                    ingredient.key,
                    nutrient,
                    value
                );
            }
        }
    }
    Ok(())
}

fn validate_profiles(kb: &KnowledgeBase) -> Result<()> {
    for species in Species::ALL {
        let profiles = kb.profiles_for(species);
        if profiles.is_empty() {
            bail!("No profiles defined for species '{}'", species);
        }

        let mut seen = FxHashSet::default();
        for profile in profiles {
            if !seen.insert(profile.situation.as_str()) {
                bail!("Duplicate situation '{}' for species '{}'", profile.situation, species);
            }

            let ratios = &profile.category_ratios;
            let ranges = profile.nutrient_ranges().into_iter().chain([
                ("grain ratio", &ratios.grain),
                ("legume ratio", &ratios.legume),
                ("seed ratio", &ratios.seed),
            ]);

            for (name, range) in ranges {
                check_range(range).map_err(|reason| {
                    anyhow::anyhow!(
                        "Profile '{}/{}' has invalid {} range [{}, {}]: {}",
                        species,
                        profile.situation,
                        name,
                        range.min,
                        range.max,
                        reason
                    )
                })?;
            }
        }
    }
    Ok(())
}

fn validate_compatibility(kb: &KnowledgeBase) -> Result<()> {
    for (key, record) in &kb.compatibility {
        if let Some(species) = record
            .compatible_with
            .iter()
            .find(|s| record.incompatible_with.contains(*s))
        {
            bail!(
                "Compatibility record '{}' lists '{}' as both compatible and incompatible",
                key,
                species
            );
        }
    }
    Ok(())
}

fn validate_safety(kb: &KnowledgeBase) -> Result<()> {
    let mut categories = FxHashSet::default();
    for advisory in kb.category_advisories() {
        if !categories.insert(advisory.category) {
            bail!("Duplicate missing-category advisory for '{}'", advisory.category.id());
        }
        for key in &advisory.recommendations {
            if kb.ingredient(key).is_none() {
                bail!(
                    "Missing-category advisory '{}' recommends unknown ingredient '{}'",
                    advisory.label,
                    key
                );
            }
        }
    }

    for key in kb.safety.preparation.keys() {
        if kb.ingredient(key).is_none() {
            bail!("Preparation note for unknown ingredient '{}'", key);
        }
    }
    Ok(())
}

fn validate_herbs(kb: &KnowledgeBase) -> Result<()> {
    for (situation, plan) in &kb.herbs.recommendations {
        for herb in &plan.recommended {
            if kb.herb(herb).is_none() {
                bail!("Herb plan '{}' recommends unknown herb '{}'", situation, herb);
            }
        }
    }
    Ok(())
}

fn validate_composition(kb: &KnowledgeBase) -> Result<()> {
    for (species, limits) in &kb.composition {
        for (name, value) in [
            ("min_legume_share", limits.min_legume_share),
            ("min_grain_share", limits.min_grain_share),
            ("min_protein", limits.min_protein),
            ("max_protein", limits.max_protein),
            ("max_fiber", limits.max_fiber),
        ] {
            if !is_percentage(value) {
                bail!("Composition limits for '{}' have invalid {}: {}", species, name, value);
            }
        }
        if limits.min_protein > limits.max_protein {
            bail!("Composition limits for '{}' have min_protein above max_protein", species);
        }
        if limits.min_ingredients > limits.recommended_ingredients {
            bail!(
                "Composition limits for '{}' have min_ingredients above recommended_ingredients",
                species
            );
        }

        for rule in &limits.situation_rules {
            if kb.profile(*species, &rule.situation).is_none() {
                bail!(
                    "Composition rule for '{}' names unknown situation '{}'",
                    species,
                    rule.situation
                );
            }
            if !is_percentage(rule.below) {
                bail!(
                    "Composition rule '{}/{}' has invalid threshold: {}",
                    species,
                    rule.situation,
                    rule.below
                );
            }
        }
    }
    Ok(())
}

fn is_percentage(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

fn check_range(range: &NutrientRange) -> std::result::Result<(), &'static str> {
    if !is_percentage(range.min) || !is_percentage(range.max) {
        return Err("bounds must be finite percentages");
    }
    if range.min > range.max {
        return Err("min exceeds max");
    }
    Ok(())
}
