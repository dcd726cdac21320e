use crate::calculator::MixResult;

/// JSON formatter for mix results
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format result as pretty-printed JSON
    pub fn format(result: &MixResult) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(result)
    }

    /// Format result as compact JSON (no whitespace)
    pub fn format_compact(result: &MixResult) -> Result<String, serde_json::Error> {
        serde_json::to_string(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Inventory, MixCalculator};
    use crate::knowledge::KnowledgeBase;

    fn sample() -> MixResult {
        let kb = KnowledgeBase::shared().unwrap();
        let inventory = Inventory::from_pairs([("wheat", 5000.0), ("peas_green", 2000.0)]).unwrap();
        MixCalculator::for_pigeons(kb, inventory, "maintenance")
            .calculate(1000.0)
            .unwrap()
    }

    #[test]
    fn test_format_json() {
        let json = JsonFormatter::format(&sample()).unwrap();

        assert!(json.contains("\"species\": \"pigeon\""));
        assert!(json.contains("\"herbRecommendations\""));
        assert!(json.contains("\"wheat\""));
    }

    #[test]
    fn test_format_compact() {
        let json = JsonFormatter::format_compact(&sample()).unwrap();

        assert!(!json.contains('\n'));
        assert!(json.contains("\"situation\":\"maintenance\""));
    }
}
