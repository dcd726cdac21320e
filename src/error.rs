//! Input Validation Errors
//!
//! Bad caller input is rejected at the boundary instead of flowing into the
//! scoring arithmetic as NaN or negative weights. Unknown species, situations
//! and ingredient names are NOT errors; they degrade to documented fallbacks.

use thiserror::Error;

/// Errors raised while validating calculator input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MixError {
    #[error("Invalid stock weight for '{ingredient}': {weight} (must be finite and >= 0)")]
    InvalidWeight { ingredient: String, weight: f64 },

    #[error("Inventory contains an empty ingredient key")]
    EmptyIngredientKey,

    #[error("Invalid target weight: {0} (must be finite and > 0)")]
    InvalidTargetWeight(f64),

    #[error("Invalid scoring policy: {0}")]
    InvalidPolicy(String),
}
