//! Translation of extracted fields and of the safety report.
//!
//! Translation never fails the analysis: on any problem the English text stays.

use rx_guide_core::models::NOT_AVAILABLE;
use rx_guide_core::{Language, PrescriptionItem};

use crate::client::{GenerateRequest, GenerativeModel};
use crate::extraction::parse_translations;
use crate::prompts::{batch_translation_prompt, text_translation_prompt};

#[derive(Clone, Copy)]
enum Field {
    Instructions,
    Dosage,
}

fn worth_translating(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text != NOT_AVAILABLE
}

/// Translate every item's instructions and dosage in one model call.
///
/// Translations are applied by position. A reply with the wrong number of
/// entries is discarded; blank entries keep the original. Returns the number
/// of fields replaced.
pub fn translate_dosage_fields(
    items: &mut [PrescriptionItem],
    language: Language,
    model: &dyn GenerativeModel,
) -> usize {
    if language.is_english() {
        return 0;
    }

    let mut targets: Vec<(usize, Field)> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if worth_translating(&item.instructions) {
            targets.push((i, Field::Instructions));
        }
        if worth_translating(&item.dosage) {
            targets.push((i, Field::Dosage));
        }
    }
    if targets.is_empty() {
        return 0;
    }

    let texts: Vec<&str> = targets
        .iter()
        .map(|&(i, field)| match field {
            Field::Instructions => items[i].instructions.as_str(),
            Field::Dosage => items[i].dosage.as_str(),
        })
        .collect();
    let prompt = batch_translation_prompt(&texts, language);

    let translations = match model
        .generate(&GenerateRequest::text(&prompt))
        .map_err(|e| e.to_string())
        .and_then(|response| parse_translations(&response).map_err(|e| e.to_string()))
    {
        Ok(translations) => translations,
        Err(error) => {
            tracing::warn!(language = language.name(), %error, "Field translation failed, keeping English");
            return 0;
        }
    };

    if translations.len() != targets.len() {
        tracing::warn!(
            expected = targets.len(),
            received = translations.len(),
            "Translation count mismatch, keeping English"
        );
        return 0;
    }

    let mut replaced = 0;
    for (&(i, field), translation) in targets.iter().zip(translations) {
        let Some(text) = translation else { continue };
        match field {
            Field::Instructions => items[i].instructions = text,
            Field::Dosage => items[i].dosage = text,
        }
        replaced += 1;
    }
    replaced
}

/// Translate free text, returning the original when the call fails.
pub fn translate_text(text: &str, language: Language, model: &dyn GenerativeModel) -> String {
    if language.is_english() || text.trim().is_empty() {
        return text.to_string();
    }
    let prompt = text_translation_prompt(text, language);
    match model.generate(&GenerateRequest::text(&prompt)) {
        Ok(translated) if !translated.trim().is_empty() => translated.trim().to_string(),
        Ok(_) => text.to_string(),
        Err(e) => {
            tracing::warn!(language = language.name(), error = %e, "Text translation failed, keeping English");
            text.to_string()
        }
    }
}
