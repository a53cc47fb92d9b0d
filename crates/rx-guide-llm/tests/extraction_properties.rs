//! Property tests for defensive response parsing.

use proptest::prelude::*;
use rx_guide_core::MedicineInfo;
use rx_guide_llm::{parse_medicine_info, parse_prescription};

proptest! {
    /// Text without any braces can never produce real medicine info.
    #[test]
    fn prop_brace_free_text_falls_back(text in "[^{}]{0,200}") {
        prop_assert_eq!(parse_medicine_info(&text), MedicineInfo::fallback());
    }

    /// Truncating a valid response anywhere inside the object falls back.
    #[test]
    fn prop_truncated_json_falls_back(cut in 1usize..60) {
        let full = r#"{"usage": ["Pain relief"], "drug_class": "NSAID", "side_effects": ["Nausea"]}"#;
        let truncated = &full[..cut.min(full.len() - 1)];
        prop_assert!(parse_medicine_info(truncated).is_fallback());
    }

    /// Prose and code fences around a valid object do not matter.
    #[test]
    fn prop_surrounding_prose_is_ignored(
        before in "[a-zA-Z .:]{0,40}",
        after in "[a-zA-Z .:]{0,40}",
        name in "[A-Za-z][A-Za-z0-9 ]{0,20}",
    ) {
        let response = format!(
            "{before}\n```json\n{{\"prescription\": [{{\"Medicine Name\": \"{name}\"}}]}}\n```\n{after}"
        );
        let rx = parse_prescription(&response).unwrap();
        prop_assert_eq!(rx.items.len(), 1);
        prop_assert_eq!(&rx.items[0].medicine_name, &name);
    }
}
