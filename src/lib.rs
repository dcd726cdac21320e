//! Bird Feed-Mix Calculator
//!
//! Allocates a target batch weight across an ingredient inventory for a bird
//! species and situation, then reports the resulting nutrition, category
//! ratios, safety warnings and feeding advice.
//!
//! - `knowledge/`: Static reference tables (JSON under `data/`), loaded once
//! - `safety`: Compatibility and toxicity lookups
//! - `calculator/`: Scoring, allocation, aggregation and advisories
//! - `formatters/`: JSON and plain-text recipe card output

pub mod calculator;
pub mod error;
pub mod formatters;
pub mod knowledge;
pub mod safety;

// Re-export commonly used types
pub use calculator::{Inventory, MixCalculator, MixResult, MixWarning, ScoringPolicy};
pub use error::MixError;
pub use formatters::{JsonFormatter, RecipeCardFormatter};
pub use knowledge::{Category, KnowledgeBase, Severity, Species, SpeciesProfile};
