//! Compatibility & Safety Lookup
//!
//! Total, side-effect free questions asked of the knowledge base:
//! "is this ingredient compatible with / toxic for this species?", plus the
//! species-independent raw-toxicity, pairing and preparation advice.
//!
//! None of these functions fail. Missing records resolve to the open-world
//! default (compatible, non-toxic, no advice).

use crate::knowledge::{KnowledgeBase, PreparationNote, RawToxicity, Species, ToxicityRecord};

/// Normalize a human-typed ingredient name ("Kidney Beans" -> "kidney_beans")
pub fn normalize_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

// ============================================================================
// SPECIES COMPATIBILITY
// ============================================================================

/// True if no compatibility record exists, else true iff the species is listed
/// as compatible
pub fn is_compatible(kb: &KnowledgeBase, ingredient: &str, species: Species) -> bool {
    match kb.compatibility(ingredient) {
        None => true,
        Some(record) => record.compatible_with.contains(&species),
    }
}

/// True iff a record explicitly lists the species as incompatible
pub fn is_flagged_incompatible(kb: &KnowledgeBase, ingredient: &str, species: Species) -> bool {
    kb.compatibility(ingredient)
        .is_some_and(|record| record.incompatible_with.contains(&species))
}

/// Record note, only when the species is explicitly incompatible
pub fn incompatibility_reason<'a>(
    kb: &'a KnowledgeBase,
    ingredient: &str,
    species: Species,
) -> Option<&'a str> {
    kb.compatibility(ingredient)
        .filter(|record| record.incompatible_with.contains(&species))
        .and_then(|record| record.notes.as_deref())
}

// ============================================================================
// TOXICITY
// ============================================================================

/// Species toxicity lookup with a normalized-name retry
pub fn toxicity_for<'a>(
    kb: &'a KnowledgeBase,
    species: Species,
    ingredient: &str,
) -> Option<&'a ToxicityRecord> {
    kb.toxicity(species, ingredient).or_else(|| {
        let normalized = normalize_key(ingredient);
        if normalized == ingredient {
            return None;
        }
        kb.toxicity(species, &normalized)
    })
}

/// Ingredients that must never be fed raw, regardless of species
pub fn raw_toxicity_for<'a>(kb: &'a KnowledgeBase, ingredient: &str) -> Option<&'a RawToxicity> {
    kb.raw_toxicity(ingredient)
        .or_else(|| kb.raw_toxicity(&normalize_key(ingredient)))
}

pub fn is_safe_raw(kb: &KnowledgeBase, ingredient: &str) -> bool {
    kb.is_safe_raw_legume(ingredient) || kb.is_safe_raw_legume(&normalize_key(ingredient))
}

// ============================================================================
// PAIRING & PREPARATION
// ============================================================================

/// Grains that should accompany a nutritionally incomplete grain
///
/// Empty when the grain stands on its own.
pub fn pairing_suggestions<'a>(kb: &'a KnowledgeBase, grain: &str) -> &'a [String] {
    if kb.grain_needs_pairing(grain) {
        kb.grain_pairings(grain)
    } else {
        &[]
    }
}

/// Preparation advice for an ingredient
///
/// Falls back to the raw-toxicity table so legumes that must be cooked always
/// come with instructions.
pub fn preparation_for(kb: &KnowledgeBase, ingredient: &str) -> Option<PreparationNote> {
    if let Some(note) = kb.preparation(ingredient) {
        return Some(note.clone());
    }

    raw_toxicity_for(kb, ingredient).map(|raw| PreparationNote {
        name: raw.name.clone(),
        preparation: raw.preparation.clone(),
        notes: raw.message.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::Severity;

    fn kb() -> &'static KnowledgeBase {
        KnowledgeBase::shared().unwrap()
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Kidney Beans"), "kidney_beans");
        assert_eq!(normalize_key("  peas   green "), "peas_green");
        assert_eq!(normalize_key("wheat"), "wheat");
    }

    #[test]
    fn test_unknown_ingredient_is_compatible() {
        assert!(is_compatible(kb(), "dragonfruit", Species::Canary));
        assert!(incompatibility_reason(kb(), "dragonfruit", Species::Canary).is_none());
    }

    #[test]
    fn test_listed_compatibility() {
        assert!(is_compatible(kb(), "wheat", Species::Pigeon));
        assert!(!is_compatible(kb(), "kidney_beans", Species::Pigeon));
        assert!(is_compatible(kb(), "peanuts", Species::Parrot));
        assert!(!is_compatible(kb(), "peanuts", Species::Budgie));
    }

    #[test]
    fn test_incompatibility_reason_only_when_listed_incompatible() {
        let reason = incompatibility_reason(kb(), "peanuts", Species::Canary);
        assert!(reason.is_some(), "peanuts should carry a note for canaries");
        assert!(incompatibility_reason(kb(), "peanuts", Species::Parrot).is_none());
        assert!(is_flagged_incompatible(kb(), "kidney_beans", Species::Chicken));
        assert!(!is_flagged_incompatible(kb(), "wheat", Species::Chicken));
    }

    #[test]
    fn test_toxicity_normalized_fallback() {
        let direct = toxicity_for(kb(), Species::Pigeon, "kidney_beans").unwrap();
        let typed = toxicity_for(kb(), Species::Pigeon, "Kidney Beans").unwrap();
        assert_eq!(direct, typed);
        assert_eq!(direct.severity, Severity::Critical);

        assert!(toxicity_for(kb(), Species::Pigeon, "wheat").is_none());
        assert!(toxicity_for(kb(), Species::Parrot, "Avocado").is_some());
    }

    #[test]
    fn test_raw_toxicity_and_safe_legumes() {
        assert!(raw_toxicity_for(kb(), "lima_beans").is_some());
        assert!(raw_toxicity_for(kb(), "peas_green").is_none());
        assert!(is_safe_raw(kb(), "Peas Green"));
        assert!(!is_safe_raw(kb(), "kidney_beans"));
    }

    #[test]
    fn test_corn_needs_pairing() {
        let pairings = pairing_suggestions(kb(), "corn_yellow");
        assert!(pairings.iter().any(|g| g == "wheat"));
        assert!(pairing_suggestions(kb(), "wheat").is_empty());
    }

    #[test]
    fn test_preparation_falls_back_to_raw_table() {
        let note = preparation_for(kb(), "black_beans").unwrap();
        assert!(note.preparation.contains("cooked") || note.preparation.contains("Boil"));
        assert!(preparation_for(kb(), "unobtainium").is_none());
    }
}
