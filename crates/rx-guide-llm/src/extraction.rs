//! Defensive parsing of model output.
//!
//! Models wrap JSON in Markdown fences or add a sentence before or after it,
//! so every parser strips fences and slices out the outermost JSON value first.

use rx_guide_core::{ExtractedPrescription, MedicineInfo};
use thiserror::Error;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Remove Markdown code fences (```json ... ```) and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    text.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

fn outermost<'a>(text: &'a str, open: char, close: char) -> ExtractionResult<&'a str> {
    let start = text.find(open).ok_or_else(|| {
        ExtractionError::InvalidFormat(format!("No '{open}' found in response"))
    })?;
    let end = text.rfind(close).ok_or_else(|| {
        ExtractionError::InvalidFormat(format!("No closing '{close}' found in response"))
    })?;
    if end < start {
        return Err(ExtractionError::InvalidFormat(format!(
            "'{close}' appears before '{open}'"
        )));
    }
    Ok(&text[start..=end])
}

/// Slice from the first `{` to the last `}`.
pub fn json_object_slice(text: &str) -> ExtractionResult<&str> {
    outermost(text, '{', '}')
}

/// Slice from the first `[` to the last `]`.
pub fn json_array_slice(text: &str) -> ExtractionResult<&str> {
    outermost(text, '[', ']')
}

/// Parse the transcription response into patient, doctor and medicines.
///
/// Failure here is fatal for the analysis run.
pub fn parse_prescription(response: &str) -> ExtractionResult<ExtractedPrescription> {
    let cleaned = strip_code_fences(response);
    let json = json_object_slice(&cleaned)?;
    Ok(serde_json::from_str(json)?)
}

/// Parse a clinical-notes response, falling back to the placeholder on any problem.
pub fn parse_medicine_info(response: &str) -> MedicineInfo {
    try_parse_medicine_info(response).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Unusable medicine info response, using fallback");
        MedicineInfo::fallback()
    })
}

fn try_parse_medicine_info(response: &str) -> ExtractionResult<MedicineInfo> {
    let cleaned = strip_code_fences(response);
    let json = json_object_slice(&cleaned)?;
    Ok(serde_json::from_str(json)?)
}

/// Parse a batched translation response.
///
/// Entries that are not strings come back as `None` so positions stay aligned.
pub fn parse_translations(response: &str) -> ExtractionResult<Vec<Option<String>>> {
    let cleaned = strip_code_fences(response);
    let json = json_array_slice(&cleaned)?;
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(values
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"```json
{
  "patient_info": {"name": "Ravi", "age": "42", "sex": "M", "date": "12/03/2025", "known_allergies": "Penicillin"},
  "doctor_info": {"name": "Dr. Meena", "license": "KMC 1234"},
  "prescription": [
    {"Medicine Name": "Augmentin 625mg", "Dosage Details": "625mg tablet",
     "Frequency/Instructions": "Twice daily after food", "Dosage Pattern": "1-0-1", "Duration": "5 days"},
    {"Medicine Name": "Eroflam"}
  ]
}
```"#;

    #[test]
    fn test_parse_prescription_with_fences() {
        let rx = parse_prescription(RESPONSE).unwrap();
        assert_eq!(rx.patient.as_ref().unwrap().known_allergies, "Penicillin");
        assert_eq!(rx.doctor.as_ref().unwrap().license, "KMC 1234");
        assert_eq!(rx.items.len(), 2);
        assert_eq!(rx.items[0].pattern.as_deref(), Some("1-0-1"));
        assert_eq!(rx.items[1].dosage, "N/A");
    }

    #[test]
    fn test_parse_prescription_with_prose() {
        let response = r#"Here is the extracted information:
{"prescription": [{"Medicine Name": "Amoxicillin"}]}
Let me know if you need anything else."#;
        let rx = parse_prescription(response).unwrap();
        assert_eq!(rx.medicine_names(), vec!["Amoxicillin"]);
    }

    #[test]
    fn test_parse_prescription_failures() {
        assert!(matches!(
            parse_prescription("I cannot read this image."),
            Err(ExtractionError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_prescription("{\"prescription\": [}"),
            Err(ExtractionError::JsonParse(_))
        ));
        assert!(matches!(
            parse_prescription("} oops {"),
            Err(ExtractionError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_medicine_info_fallback() {
        assert!(parse_medicine_info("not json").is_fallback());
        assert!(parse_medicine_info("{\"allergy_alert\": \"should be an object\"}").is_fallback());

        let info = parse_medicine_info("```json\n{\"drug_class\": \"NSAID\"}\n```");
        assert_eq!(info.drug_class, "NSAID");
    }

    #[test]
    fn test_medicine_info_with_null_fields_is_kept() {
        let response = r#"```json
{"usage": ["Pain and swelling"], "side_effects": ["Acidity"], "drug_class": "NSAID",
 "interaction_with_prescribed": [], "general_warnings": ["Take after food"],
 "allergy_alert": {"triggered": false, "message": null},
 "overall_interaction_summary": "No major interactions."}
```"#;
        let info = parse_medicine_info(response);
        assert!(!info.is_fallback());
        assert_eq!(info.usage, vec!["Pain and swelling"]);
        assert_eq!(info.drug_class, "NSAID");
        assert_eq!(info.allergy_alert.message, "");
    }

    #[test]
    fn test_parse_translations() {
        let parsed = parse_translations("Sure:\n[\"दिन में दो बार\", \"\", 5]").unwrap();
        assert_eq!(parsed, vec![Some("दिन में दो बार".to_string()), None, None]);
        assert!(parse_translations("no array").is_err());
    }
}
