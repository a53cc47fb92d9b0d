//! Per-medicine clinical notes returned by the model.
//!
//! Models often answer `null` for a field they have nothing to say about, so
//! every field here treats `null` like a missing key instead of rejecting
//! the whole answer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn assume_safe() -> bool {
    true
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Null becomes an empty string; numbers and booleans are stringified.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(value) => value_text(value),
    })
}

/// Null becomes an empty list, a lone string a one-item list; null entries are dropped.
fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values
            .into_iter()
            .filter(|v| !v.is_null())
            .map(value_text)
            .collect(),
        Some(value) => vec![value_text(value)],
    })
}

/// Only an explicit `false` (or "false") marks a combination unsafe.
fn safe_unless_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(safe)) => safe,
        Some(Value::String(s)) => !s.trim().eq_ignore_ascii_case("false"),
        _ => true,
    })
}

/// Null behaves like a missing value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// How one prescribed medicine gets along with another on the same prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescribedInteraction {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub medicine: String,
    #[serde(default = "assume_safe", deserialize_with = "safe_unless_false")]
    pub safe: bool,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub note: String,
}

/// Allergy match against the patient's known allergies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AllergyAlert {
    #[serde(default, deserialize_with = "null_as_default")]
    pub triggered: bool,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub message: String,
}

/// Clinical notes for a single medicine, already in the output language.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MedicineInfo {
    #[serde(default, deserialize_with = "text_list")]
    pub usage: Vec<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub side_effects: Vec<String>,
    /// Pharmacological class, kept in English
    #[serde(default, deserialize_with = "text_or_empty")]
    pub drug_class: String,
    #[serde(
        rename = "interaction_with_prescribed",
        default,
        deserialize_with = "null_as_default"
    )]
    pub interactions: Vec<PrescribedInteraction>,
    #[serde(default, deserialize_with = "text_list")]
    pub general_warnings: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub allergy_alert: AllergyAlert,
    #[serde(
        rename = "overall_interaction_summary",
        default,
        deserialize_with = "text_or_empty"
    )]
    pub summary: String,
}

impl MedicineInfo {
    /// Placeholder shown when the model's answer could not be used.
    pub fn fallback() -> Self {
        Self {
            usage: vec!["Information not available".into()],
            side_effects: vec!["Information not available".into()],
            drug_class: "Unknown".into(),
            interactions: Vec::new(),
            general_warnings: Vec::new(),
            allergy_alert: AllergyAlert::default(),
            summary: "Could not retrieve data.".into(),
        }
    }

    /// Whether this is the fallback placeholder.
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }

    /// Medicines flagged as unsafe to combine with this one.
    pub fn unsafe_combinations(&self) -> impl Iterator<Item = &PrescribedInteraction> {
        self.interactions.iter().filter(|i| !i.safe)
    }
}
