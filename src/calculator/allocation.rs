//! Allocation
//!
//! Scores every known inventory ingredient and splits the target batch weight
//! across them in proportion to score. Single pass, closed form; the optional
//! stock cap is the only iterative step.

use super::inventory::Inventory;
use super::policy::ScoringPolicy;
use crate::knowledge::{Ingredient, KnowledgeBase, Species, SpeciesProfile};
use crate::safety;
use std::collections::BTreeMap;

/// One inventory entry after scoring
#[derive(Debug, Clone)]
pub struct ScoredIngredient<'kb> {
    pub ingredient: &'kb Ingredient,
    pub stock: f64,
    pub score: f64,
}

/// Allocated weight that exceeds the declared stock
#[derive(Debug, Clone, PartialEq)]
pub struct StockOverflow {
    pub key: String,
    pub allocated: f64,
    pub stock: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Allocation {
    /// Ingredient key → allocated grams, one entry per positively scored
    /// ingredient even when its share rounds to 0 g
    pub mix: BTreeMap<String, f64>,
    pub total_score: f64,
    pub overflows: Vec<StockOverflow>,
    /// Grams missing from the target when capped stock cannot fill it
    pub shortfall: Option<f64>,
}

/// Score known inventory ingredients in key order
///
/// Unknown keys are skipped. Toxic or incompatible ingredients score zero.
pub fn score_inventory<'kb>(
    kb: &'kb KnowledgeBase,
    inventory: &Inventory,
    profile: &SpeciesProfile,
    species: Species,
    policy: &ScoringPolicy,
) -> Vec<ScoredIngredient<'kb>> {
    let target_protein = profile.protein.midpoint();
    let mut scored = Vec::with_capacity(inventory.len());

    for (key, stock) in inventory.iter() {
        let Some(ingredient) = kb.ingredient(key) else {
            tracing::warn!("Skipping unknown ingredient '{}'", key);
            continue;
        };

        let excluded = safety::toxicity_for(kb, species, key).is_some()
            || !safety::is_compatible(kb, key, species);

        let score = if excluded {
            tracing::debug!("{}: excluded for {}", key, species);
            0.0
        } else {
            let score = policy.category_weight(ingredient.category)
                * policy.protein_factor(ingredient.protein, target_protein)
                * stock;
            tracing::debug!(
                "{}: category={} protein={:.1} stock={} score={:.3}",
                key,
                ingredient.category.id(),
                ingredient.protein,
                stock,
                score
            );
            score
        };

        scored.push(ScoredIngredient {
            ingredient,
            stock,
            score,
        });
    }

    scored
}

/// Split `target_weight` across scored ingredients
pub fn allocate(scored: &[ScoredIngredient<'_>], target_weight: f64, policy: &ScoringPolicy) -> Allocation {
    let total_score: f64 = scored.iter().map(|s| s.score).sum();
    if total_score <= 0.0 {
        return Allocation::default();
    }

    let mut allocation = if policy.cap_to_stock {
        allocate_capped(scored, target_weight)
    } else {
        allocate_proportional(scored, target_weight, total_score)
    };
    allocation.total_score = total_score;
    allocation
}

fn allocate_proportional(scored: &[ScoredIngredient<'_>], target_weight: f64, total_score: f64) -> Allocation {
    let mut allocation = Allocation::default();

    for entry in scored.iter().filter(|s| s.score > 0.0) {
        let grams = (target_weight * entry.score / total_score).round();
        if grams > entry.stock {
            allocation.overflows.push(StockOverflow {
                key: entry.ingredient.key.clone(),
                allocated: grams,
                stock: entry.stock,
            });
        }
        allocation.mix.insert(entry.ingredient.key.clone(), grams);
    }

    allocation
}

/// Proportional split with clamp-and-redistribute
///
/// Ingredients whose share exceeds their stock are pinned at their stock and
/// the remainder is re-split across the rest, until nothing overflows. Stock
/// is counted in whole grams so a capped entry never rounds up past it.
fn allocate_capped(scored: &[ScoredIngredient<'_>], target_weight: f64) -> Allocation {
    let mut allocation = Allocation::default();
    let live: Vec<&ScoredIngredient<'_>> = scored.iter().filter(|s| s.score > 0.0).collect();

    let total_stock: f64 = live.iter().map(|s| whole_grams(s)).sum();
    if total_stock <= target_weight {
        for entry in &live {
            allocation.mix.insert(entry.ingredient.key.clone(), whole_grams(entry));
        }
        let missing = target_weight - total_stock;
        if missing > 0.0 {
            allocation.shortfall = Some(missing);
        }
        return allocation;
    }

    let mut shares: BTreeMap<&str, f64> = BTreeMap::new();
    let mut active = live;
    let mut remaining = target_weight;

    while !active.is_empty() {
        let active_score: f64 = active.iter().map(|s| s.score).sum();
        let (over, under): (Vec<_>, Vec<_>) = active
            .into_iter()
            .partition(|s| remaining * s.score / active_score > whole_grams(s));

        if over.is_empty() {
            for entry in &under {
                shares.insert(&entry.ingredient.key, remaining * entry.score / active_score);
            }
            break;
        }

        for entry in over {
            let stock = whole_grams(entry);
            tracing::debug!("{}: capped at stock {}", entry.ingredient.key, stock);
            shares.insert(&entry.ingredient.key, stock);
            remaining -= stock;
        }
        active = under;
    }

    for entry in scored.iter().filter(|s| s.score > 0.0) {
        let Some(&share) = shares.get(entry.ingredient.key.as_str()) else {
            continue;
        };
        let grams = share.round().min(whole_grams(entry));
        allocation.mix.insert(entry.ingredient.key.clone(), grams);
    }

    allocation
}

fn whole_grams(entry: &ScoredIngredient<'_>) -> f64 {
    entry.stock.floor()
}
