use crate::calculator::MixResult;
use crate::knowledge::{Category, SpeciesProfile};

const WIDTH: usize = 70;

/// Plain-text printable recipe card
pub struct RecipeCardFormatter;

impl RecipeCardFormatter {
    /// Format result as a recipe card without a date line
    pub fn format(result: &MixResult, profile: &SpeciesProfile) -> String {
        Self::render(result, profile, None)
    }

    /// Format result as a recipe card stamped with `date`
    pub fn format_dated(result: &MixResult, profile: &SpeciesProfile, date: &str) -> String {
        Self::render(result, profile, Some(date))
    }

    fn render(result: &MixResult, profile: &SpeciesProfile, date: Option<&str>) -> String {
        let mut card = String::with_capacity(4096);
        let heavy = "═".repeat(WIDTH);

        // Header
        card.push_str(&format!("{}\n", heavy));
        card.push_str(&format!("{:^width$}\n", "BIRD SEED MIX RECIPE CARD", width = WIDTH));
        card.push_str(&format!("{}\n\n", heavy));
        card.push_str(&format!("Species: {}\n", title_case(result.species.id())));
        card.push_str(&format!("Situation: {}\n", result.profile_name));
        card.push_str(&format!("Total Batch Size: {:.0}g\n", result.total_weight()));
        if let Some(date) = date {
            card.push_str(&format!("Date: {}\n", date));
        }
        card.push('\n');

        Self::format_ingredients(&mut card, result);
        Self::format_nutrition(&mut card, result, profile);
        Self::format_categories(&mut card, result, profile);

        // Feeding instructions
        section(&mut card, "FEEDING INSTRUCTIONS:");
        for sentence in profile.feeding_notes.split(". ") {
            let sentence = sentence.trim();
            if !sentence.is_empty() {
                card.push_str(&format!("  • {}\n", sentence));
            }
        }

        Self::format_herbs(&mut card, result);
        Self::format_notes(&mut card, result);

        card.push('\n');
        card.push_str(&format!("{}\n", heavy));
        card
    }

    fn format_ingredients(card: &mut String, result: &MixResult) {
        section(card, "INGREDIENTS:");
        card.push_str(&format!("  {:<30} {:>12} {:>12}\n", "Ingredient", "Amount", "Percentage"));
        card.push_str(&format!("{}\n", "─".repeat(WIDTH)));

        let total = result.total_weight();
        for (key, grams) in result.sorted_mix().into_iter().filter(|&(_, grams)| grams > 0.0) {
            let percentage = if total > 0.0 { grams / total * 100.0 } else { 0.0 };
            card.push_str(&format!(
                "  {:<30} {:>10.0}g {:>11.1}%\n",
                title_case(key),
                grams,
                percentage
            ));
        }
    }

    fn format_nutrition(card: &mut String, result: &MixResult, profile: &SpeciesProfile) {
        card.push('\n');
        section(card, "NUTRITIONAL ANALYSIS:");

        let n = &result.nutrition;
        let rows = [
            ("Protein:", n.protein, &profile.protein),
            ("Carbohydrates:", n.carbs, &profile.carbs),
            ("Fat:", n.fat, &profile.fat),
            ("Fiber:", n.fiber, &profile.fiber),
        ];
        for (label, actual, target) in rows {
            card.push_str(&format!(
                "  {:<15} {:>6.1}%    (Target: {:.1}-{:.1}%)\n",
                label, actual, target.min, target.max
            ));
        }
    }

    fn format_categories(card: &mut String, result: &MixResult, profile: &SpeciesProfile) {
        card.push('\n');
        section(card, "CATEGORY BREAKDOWN:");

        for category in Category::ALL {
            let target = profile.category_ratios.for_category(category);
            card.push_str(&format!(
                "  {:<15} {:>6.1}%    (Target: {:.0}-{:.0}%)\n",
                format!("{}:", category.label()),
                result.categories.get(category),
                target.min,
                target.max
            ));
        }
    }

    fn format_herbs(card: &mut String, result: &MixResult) {
        if result.herb_recommendations.is_empty() {
            return;
        }

        card.push('\n');
        section(card, "HERB & SUPPLEMENT RECOMMENDATIONS:");
        card.push_str(&format!("  Purpose: {}\n\n", result.herb_purpose));

        for herb in &result.herb_recommendations {
            card.push_str(&format!("  • {}\n", title_case(&herb.key)));
            card.push_str(&format!("    Benefits: {}\n", herb.benefits.join(", ")));
            match &herb.batch_amount {
                Some(amount) => card.push_str(&format!(
                    "    Dosage: {} per kg of mix ({} for this batch)\n",
                    herb.dosage, amount
                )),
                None => card.push_str(&format!("    Dosage: {}\n", herb.dosage)),
            }
            card.push_str(&format!("    Frequency: {}\n", herb.frequency));
            card.push_str(&format!("    Notes: {}\n\n", herb.notes));
        }
    }

    fn format_notes(card: &mut String, result: &MixResult) {
        if result.warnings.is_empty() && result.suggestions.is_empty() && result.preparation.is_empty() {
            return;
        }

        card.push('\n');
        section(card, "NOTES:");

        for warning in &result.warnings {
            card.push_str(&format!("  {}: {}\n", warning.level.display_text(), warning.message));
        }

        if !result.preparation.is_empty() {
            card.push_str("\n  Preparation:\n");
            for note in &result.preparation {
                card.push_str(&format!("  • {}: {}\n", note.name, note.preparation));
            }
        }

        if !result.suggestions.is_empty() {
            card.push_str("\n  Suggestions for improvement:\n");
            for suggestion in &result.suggestions {
                card.push_str(&format!("  • {}\n", suggestion));
            }
        }
    }
}

fn section(card: &mut String, title: &str) {
    card.push_str(&format!("{}\n{}\n", title, "─".repeat(WIDTH)));
}

/// "peas_green" -> "Peas Green"
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Inventory, MixCalculator};
    use crate::knowledge::KnowledgeBase;

    fn card_for(pairs: &[(&str, f64)], situation: &str) -> String {
        let kb = KnowledgeBase::shared().unwrap();
        let inventory = Inventory::from_pairs(pairs.iter().copied()).unwrap();
        let calc = MixCalculator::for_pigeons(kb, inventory, situation);
        let result = calc.calculate(1000.0).unwrap();
        RecipeCardFormatter::format_dated(&result, calc.profile(), "2024-05-01")
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("peas_green"), "Peas Green");
        assert_eq!(title_case("wheat"), "Wheat");
    }

    #[test]
    fn test_card_sections() {
        let card = card_for(
            &[("wheat", 5000.0), ("peas_green", 2000.0), ("safflower_seeds", 500.0)],
            "maintenance",
        );

        assert!(card.contains("BIRD SEED MIX RECIPE CARD"));
        assert!(card.contains("Situation: Maintenance/Rest"));
        assert!(card.contains("Date: 2024-05-01"));
        assert!(card.contains("Total Batch Size: 1000g"));
        assert!(card.contains("NUTRITIONAL ANALYSIS:"));
        assert!(card.contains("CATEGORY BREAKDOWN:"));
        assert!(card.contains("HERB & SUPPLEMENT RECOMMENDATIONS:"));
    }

    #[test]
    fn test_ingredients_sorted_by_weight() {
        let card = card_for(
            &[("wheat", 5000.0), ("peas_green", 2000.0), ("safflower_seeds", 500.0)],
            "maintenance",
        );
        let wheat = card.find("Wheat").unwrap();
        let peas = card.find("Peas Green").unwrap();
        let safflower = card.find("Safflower Seeds").unwrap();
        assert!(wheat < peas && peas < safflower);
    }

    #[test]
    fn test_warnings_and_suggestions_listed() {
        let card = card_for(&[("corn_yellow", 1000.0)], "maintenance");
        assert!(card.contains("Warning: Missing legumes"));
        assert!(card.contains("CRITICAL: Very limited diversity"));
        assert!(card.contains("Corn is the only grain"));
    }

    #[test]
    fn test_zero_gram_entries_not_listed() {
        let card = card_for(&[("wheat", 100_000.0), ("lentils", 1.0)], "maintenance");
        assert!(card.contains("Wheat"));
        assert!(!card.contains("Lentils "));
    }
}
