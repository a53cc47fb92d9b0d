//! Prompts for prescription transcription, clinical notes and translation.
//!
//! Each prompt asks for bare JSON; responses still go through the defensive
//! parsing in [`crate::extraction`] because models wrap or annotate JSON anyway.

use rx_guide_core::Language;

/// Prompt sent with the prescription image.
///
/// Names and instructions stay in English so the interaction check and the
/// alarm heuristic see the original wording; translation happens afterwards.
pub const EXTRACTION_PROMPT: &str = r#"You are a medical prescription analyzer.
Extract ALL information from this prescription image.
Keep ALL medicine names and dosage instructions in English.
Return ONLY valid JSON, no other text:
{
    "patient_info": {
        "name": "patient name",
        "age": "age",
        "sex": "sex",
        "date": "date",
        "known_allergies": "allergies mentioned or None"
    },
    "doctor_info": {
        "name": "doctor name",
        "license": "license number or N/A"
    },
    "prescription": [
        {
            "Medicine Name": "medicine brand name with strength in English",
            "Dosage Details": "strength and form e.g. 625mg tablet",
            "Frequency/Instructions": "full dosage instructions in English",
            "Dosage Pattern": "pattern like 1-0-1",
            "Duration": "e.g. 5 days"
        }
    ]
}"#;

/// Language rule for the clinical prompt.
fn language_instruction(language: Language) -> String {
    if language.is_english() {
        return "Write ALL text values in English.".to_string();
    }
    let lang = language.name();
    format!(
        "IMPORTANT: Write ALL text values (usage, side_effects, general_warnings, \
         interaction notes, allergy message, overall_interaction_summary) in {lang} language. \
         You MUST use {lang} script. Do NOT write in English for these fields. \
         Only keep medicine brand/generic names and drug_class in English."
    )
}

/// Clinical notes for one medicine, written directly in the output language.
pub fn medicine_info_prompt(
    medicine: &str,
    all_medicines: &[String],
    allergies: Option<&str>,
    language: Language,
) -> String {
    let current = medicine.to_lowercase();
    let others: Vec<&str> = all_medicines
        .iter()
        .map(String::as_str)
        .filter(|m| m.to_lowercase() != current)
        .collect();
    let others = if others.is_empty() {
        "None".to_string()
    } else {
        others.join(", ")
    };
    let lang = language.name();

    format!(
        r#"You are an expert clinical pharmacist.

Medicine: {medicine}
Other medicines in same prescription: {others}
Patient allergies: {allergies}

{instruction}

Return ONLY this valid JSON, no markdown, no extra text:
{{
  "usage": [
    "first use or condition treated, in {lang}",
    "mechanism of action, in {lang}",
    "another key benefit, in {lang}"
  ],
  "side_effects": [
    "side effect 1 in {lang}",
    "side effect 2 in {lang}",
    "side effect 3 in {lang}",
    "side effect 4 in {lang}"
  ],
  "drug_class": "pharmacological class in English only",
  "interaction_with_prescribed": [
    {{
      "medicine": "other medicine name in English",
      "safe": true,
      "note": "interaction note in {lang}"
    }}
  ],
  "general_warnings": [
    "warning 1 in {lang}",
    "warning 2 in {lang}"
  ],
  "allergy_alert": {{
    "triggered": false,
    "message": "allergy message in {lang} if triggered, else empty string"
  }},
  "overall_interaction_summary": "one line summary in {lang}"
}}

Rules:
- Set allergy_alert.triggered = true ONLY if patient allergy matches drug class of {medicine}
- Set safe = false if known moderate or major interaction exists
- Return ONLY valid JSON"#,
        allergies = allergies.unwrap_or("None"),
        instruction = language_instruction(language),
    )
}

/// One call translating many short texts, answered as a JSON array in the same order.
pub fn batch_translation_prompt(texts: &[&str], language: Language) -> String {
    let lang = language.name();
    let numbered: Vec<String> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}. {}", i + 1, text))
        .collect();

    format!(
        r#"Translate each numbered text below into {lang} language.

RULES:
- You MUST translate into {lang}. Do NOT return English text.
- Keep medicine names, numbers, mg values, and patterns like 1-0-1 in English.
- Return ONLY a JSON array with the translated texts in the same order.
- Format: ["translation 1", "translation 2", ...]
- No explanation, no markdown, just the JSON array.

Texts to translate:
{numbered}

JSON array of {lang} translations:"#,
        numbered = numbered.join("\n"),
    )
}

/// Free-text translation, used for the safety report.
pub fn text_translation_prompt(text: &str, language: Language) -> String {
    format!(
        "Translate the following medical text to {lang}.\n\
         Keep medical terms accurate and clear. Keep the Markdown formatting.\n\n\
         Text: {text}\n\n\
         Return ONLY the translated text, nothing else.",
        lang = language.name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_schema() {
        assert!(EXTRACTION_PROMPT.contains("\"Medicine Name\""));
        assert!(EXTRACTION_PROMPT.contains("\"known_allergies\""));
        assert!(EXTRACTION_PROMPT.contains("\"Dosage Pattern\""));
    }

    #[test]
    fn test_medicine_prompt_lists_other_medicines() {
        let all = vec!["Augmentin 625mg".to_string(), "Eroflam".to_string()];
        let prompt = medicine_info_prompt("Augmentin 625mg", &all, Some("Penicillin"), Language::English);
        assert!(prompt.contains("Medicine: Augmentin 625mg"));
        assert!(prompt.contains("Other medicines in same prescription: Eroflam"));
        assert!(prompt.contains("Patient allergies: Penicillin"));
        assert!(prompt.contains("Write ALL text values in English."));
        assert!(prompt.contains("\"interaction_with_prescribed\""));
    }

    #[test]
    fn test_medicine_prompt_alone_in_target_script() {
        let all = vec!["Eroflam".to_string()];
        let prompt = medicine_info_prompt("EROFLAM", &all, None, Language::Telugu);
        assert!(prompt.contains("Other medicines in same prescription: None"));
        assert!(prompt.contains("Patient allergies: None"));
        assert!(prompt.contains("You MUST use Telugu script."));
    }

    #[test]
    fn test_medicine_prompt_excludes_self_beyond_ascii() {
        let all = vec!["Ácido Fólico".to_string(), "Eroflam".to_string()];
        let prompt = medicine_info_prompt("ÁCIDO FÓLICO", &all, None, Language::Spanish);
        assert!(prompt.contains("Other medicines in same prescription: Eroflam\n"));
    }

    #[test]
    fn test_batch_translation_numbering() {
        let prompt = batch_translation_prompt(&["Twice daily", "625mg tablet"], Language::Hindi);
        assert!(prompt.contains("1. Twice daily\n2. 625mg tablet"));
        assert!(prompt.contains("JSON array of Hindi translations:"));
    }
}
