//! Weight-weighted nutrition and category aggregates over an allocated mix

use crate::knowledge::{Category, KnowledgeBase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate macro-nutrient percentages
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

/// Share of the mix weight per category, in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub grain: f64,
    pub legume: f64,
    pub seed: f64,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Grain => self.grain,
            Category::Legume => self.legume,
            Category::Seed => self.seed,
        }
    }

    fn add(&mut self, category: Category, amount: f64) {
        match category {
            Category::Grain => self.grain += amount,
            Category::Legume => self.legume += amount,
            Category::Seed => self.seed += amount,
        }
    }

    pub fn sum(&self) -> f64 {
        self.grain + self.legume + self.seed
    }
}

/// Aggregate a mix; an empty or zero-weight mix yields all zeros
pub fn analyze(kb: &KnowledgeBase, mix: &BTreeMap<String, f64>) -> (NutritionTotals, CategoryTotals) {
    let mut nutrition = NutritionTotals::default();
    let mut categories = CategoryTotals::default();
    let mut total_weight = 0.0;

    for (key, &grams) in mix {
        let Some(ingredient) = kb.ingredient(key) else {
            continue;
        };
        total_weight += grams;
        nutrition.protein += ingredient.protein * grams;
        nutrition.carbs += ingredient.carbs * grams;
        nutrition.fat += ingredient.fat * grams;
        nutrition.fiber += ingredient.fiber * grams;
        categories.add(ingredient.category, grams);
    }

    if total_weight <= 0.0 {
        return (NutritionTotals::default(), CategoryTotals::default());
    }

    nutrition.protein /= total_weight;
    nutrition.carbs /= total_weight;
    nutrition.fat /= total_weight;
    nutrition.fiber /= total_weight;

    let to_percent = |grams: f64| grams / total_weight * 100.0;
    categories.grain = to_percent(categories.grain);
    categories.legume = to_percent(categories.legume);
    categories.seed = to_percent(categories.seed);

    (nutrition, categories)
}
