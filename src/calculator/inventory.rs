//! Validated ingredient inventory
//!
//! Maps ingredient key to available stock in grams. Keys are normalized on
//! insert ("Peas Green" -> "peas_green") and entries are kept sorted so every
//! pass over the inventory visits ingredients in the same order.

use crate::error::MixError;
use crate::safety;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ingredient key → available weight (grams, finite, >= 0)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct Inventory {
    stock: BTreeMap<String, f64>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (key, grams) pairs, rejecting the first invalid entry
    pub fn from_pairs<K, I>(pairs: I) -> Result<Self, MixError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut inventory = Self::new();
        for (key, grams) in pairs {
            inventory.insert(key, grams)?;
        }
        Ok(inventory)
    }

    /// Set the stock for an ingredient, replacing any previous amount
    ///
    /// Keys differing only in case or spacing name the same entry.
    pub fn insert(&mut self, key: impl Into<String>, grams: f64) -> Result<(), MixError> {
        let key = safety::normalize_key(&key.into());
        if key.is_empty() {
            return Err(MixError::EmptyIngredientKey);
        }
        if !grams.is_finite() || grams < 0.0 {
            return Err(MixError::InvalidWeight {
                ingredient: key,
                weight: grams,
            });
        }
        self.stock.insert(key, grams);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.stock.get(&safety::normalize_key(key)).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.stock.contains_key(&safety::normalize_key(key))
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.stock.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.stock.values().sum()
    }
}

impl TryFrom<BTreeMap<String, f64>> for Inventory {
    type Error = MixError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_pairs(map)
    }
}

impl From<Inventory> for BTreeMap<String, f64> {
    fn from(inventory: Inventory) -> Self {
        inventory.stock
    }
}
