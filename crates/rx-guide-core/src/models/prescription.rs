//! Prescription models produced from the model's transcription.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder used for any required field the transcription left out.
pub const NOT_AVAILABLE: &str = "N/A";

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn no_allergies() -> String {
    "None".to_string()
}

/// Accept strings, numbers and booleans for a text field; null becomes "N/A".
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => not_available(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Like [`lenient_text`], but null and blank strings become `None`.
pub(crate) fn lenient_optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// One medicine line read off the prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionItem {
    /// Brand or generic name, possibly with strength (e.g., "Augmentin 625mg")
    #[serde(
        rename = "Medicine Name",
        default = "not_available",
        deserialize_with = "lenient_text"
    )]
    pub medicine_name: String,
    /// Strength and form (e.g., "625mg tablet")
    #[serde(
        rename = "Dosage Details",
        default = "not_available",
        deserialize_with = "lenient_text"
    )]
    pub dosage: String,
    /// Free-text frequency and instructions
    #[serde(
        rename = "Frequency/Instructions",
        default = "not_available",
        deserialize_with = "lenient_text"
    )]
    pub instructions: String,
    /// Daily pattern such as "1-0-1"
    #[serde(
        rename = "Dosage Pattern",
        default,
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern: Option<String>,
    /// Course length such as "5 days"
    #[serde(
        rename = "Duration",
        default,
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,
}

impl PrescriptionItem {
    /// Create an item with the three required fields.
    pub fn new(
        medicine_name: impl Into<String>,
        dosage: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            medicine_name: medicine_name.into(),
            dosage: dosage.into(),
            instructions: instructions.into(),
            pattern: None,
            duration: None,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }
}

/// Patient details printed on the prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientInfo {
    #[serde(default = "not_available", deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default = "not_available", deserialize_with = "lenient_text")]
    pub age: String,
    #[serde(default = "not_available", deserialize_with = "lenient_text")]
    pub sex: String,
    #[serde(default = "not_available", deserialize_with = "lenient_text")]
    pub date: String,
    /// Allergies noted on the prescription, "None" when absent
    #[serde(default = "no_allergies", deserialize_with = "lenient_text")]
    pub known_allergies: String,
}

impl Default for PatientInfo {
    fn default() -> Self {
        Self {
            name: not_available(),
            age: not_available(),
            sex: not_available(),
            date: not_available(),
            known_allergies: no_allergies(),
        }
    }
}

impl PatientInfo {
    /// Allergies worth passing on to the clinical prompt, if any.
    pub fn allergies(&self) -> Option<&str> {
        let allergies = self.known_allergies.trim();
        match allergies.to_lowercase().as_str() {
            "" | "none" | "n/a" | "nil" => None,
            _ => Some(allergies),
        }
    }
}

/// Prescriber details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorInfo {
    #[serde(default = "not_available", deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default = "not_available", deserialize_with = "lenient_text")]
    pub license: String,
}

impl Default for DoctorInfo {
    fn default() -> Self {
        Self {
            name: not_available(),
            license: not_available(),
        }
    }
}

/// Everything the transcription step returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractedPrescription {
    #[serde(rename = "patient_info", default)]
    pub patient: Option<PatientInfo>,
    #[serde(rename = "doctor_info", default)]
    pub doctor: Option<DoctorInfo>,
    #[serde(rename = "prescription", default)]
    pub items: Vec<PrescriptionItem>,
}

impl ExtractedPrescription {
    /// Medicine names in prescription order.
    pub fn medicine_names(&self) -> Vec<String> {
        self.items.iter().map(|i| i.medicine_name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_na() {
        let item: PrescriptionItem =
            serde_json::from_str(r#"{"Medicine Name": "Augmentin 625mg"}"#).unwrap();
        assert_eq!(item.medicine_name, "Augmentin 625mg");
        assert_eq!(item.dosage, "N/A");
        assert_eq!(item.instructions, "N/A");
        assert_eq!(item.pattern, None);
        assert_eq!(item.duration, None);
    }

    #[test]
    fn test_null_and_numeric_fields() {
        let item: PrescriptionItem = serde_json::from_str(
            r#"{"Medicine Name": null, "Dosage Details": 500, "Dosage Pattern": "", "Duration": "5 days"}"#,
        )
        .unwrap();
        assert_eq!(item.medicine_name, "N/A");
        assert_eq!(item.dosage, "500");
        assert_eq!(item.pattern, None);
        assert_eq!(item.duration.as_deref(), Some("5 days"));
    }

    #[test]
    fn test_patient_defaults() {
        let patient: PatientInfo = serde_json::from_str(r#"{"name": "Ravi", "age": 42}"#).unwrap();
        assert_eq!(patient.name, "Ravi");
        assert_eq!(patient.age, "42");
        assert_eq!(patient.sex, "N/A");
        assert_eq!(patient.known_allergies, "None");
        assert_eq!(patient.allergies(), None);
    }

    #[test]
    fn test_allergies_present() {
        let patient = PatientInfo {
            known_allergies: "Penicillin".into(),
            ..Default::default()
        };
        assert_eq!(patient.allergies(), Some("Penicillin"));
    }

    #[test]
    fn test_sections_absent() {
        let rx: ExtractedPrescription = serde_json::from_str(r#"{"prescription": []}"#).unwrap();
        assert!(rx.patient.is_none());
        assert!(rx.doctor.is_none());
        assert!(rx.items.is_empty());
    }
}
