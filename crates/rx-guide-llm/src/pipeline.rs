//! End-to-end analysis of one prescription photo.
//!
//! ```text
//! image ─► transcription (JSON mode, plain retry) ─► parse ─┬─► header
//!                                                           ├─► field translation
//!                                                           ├─► per-medicine notes ─► cards
//!                                                           └─► interaction check ─► report
//! ```
//!
//! Only an unreadable transcription stops the run; every later step degrades
//! to English text or placeholder notes.

use rx_guide_core::interactions::InteractionTable;
use rx_guide_core::{
    check_interactions, normalize_drug_names, render_report, AnalysisOutcome, Language,
    PrescriptionDocument, SessionContext,
};
use thiserror::Error;

use crate::client::{GenerateRequest, GenerativeModel, ModelError};
use crate::extraction::{parse_medicine_info, parse_prescription, ExtractionError};
use crate::image::ImageInput;
use crate::prompts::{medicine_info_prompt, EXTRACTION_PROMPT};
use crate::translate::{translate_dosage_fields, translate_text};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Could not parse prescription. Try a clearer image.")]
    UnreadablePrescription(#[source] ExtractionError),

    #[error("Extraction error: {0}")]
    Model(#[from] ModelError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Runs the analysis against one model and one interaction table.
pub struct Analyzer<'a> {
    model: &'a dyn GenerativeModel,
    table: InteractionTable,
}

impl<'a> Analyzer<'a> {
    /// Analyzer using the built-in interaction table.
    pub fn new(model: &'a dyn GenerativeModel) -> Self {
        Self::with_table(model, InteractionTable::builtin())
    }

    pub fn with_table(model: &'a dyn GenerativeModel, table: InteractionTable) -> Self {
        Self { model, table }
    }

    /// Analyze `image`, record the outcome in `session` and return a copy of it.
    pub fn analyze(
        &self,
        image: &ImageInput,
        language: Language,
        session: &mut SessionContext,
    ) -> AnalysisResult<AnalysisOutcome> {
        session.begin_analysis();
        let outcome = self.build_outcome(image, language)?;
        session.record_analysis(outcome.clone());
        Ok(outcome)
    }

    fn transcribe(&self, image: &ImageInput) -> AnalysisResult<String> {
        let request = GenerateRequest::text(EXTRACTION_PROMPT).with_image(image);
        match self.model.generate(&request.json()) {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!(error = %e, "JSON-mode transcription failed, retrying without it");
                Ok(self.model.generate(&request)?)
            }
        }
    }

    fn build_outcome(&self, image: &ImageInput, language: Language) -> AnalysisResult<AnalysisOutcome> {
        let response = self.transcribe(image)?;
        let mut prescription =
            parse_prescription(&response).map_err(AnalysisError::UnreadablePrescription)?;
        tracing::info!(medicines = prescription.items.len(), "Prescription transcribed");

        let mut document =
            PrescriptionDocument::new(prescription.patient.as_ref(), prescription.doctor.as_ref());

        translate_dosage_fields(&mut prescription.items, language, self.model);

        let names = prescription.medicine_names();
        let allergies = prescription.patient.as_ref().and_then(|p| p.allergies());
        for (i, item) in prescription.items.iter().enumerate() {
            tracing::info!(
                medicine = %item.medicine_name,
                progress = %format!("{}/{}", i + 1, names.len()),
                "Analyzing medicine"
            );
            let prompt = medicine_info_prompt(&item.medicine_name, &names, allergies, language);
            let info = match self.model.generate(&GenerateRequest::text(&prompt)) {
                Ok(response) => parse_medicine_info(&response),
                Err(e) => {
                    tracing::warn!(medicine = %item.medicine_name, error = %e, "Medicine info call failed, using fallback");
                    rx_guide_core::MedicineInfo::fallback()
                }
            };
            let flagged: Vec<&str> = info
                .unsafe_combinations()
                .map(|i| i.medicine.as_str())
                .collect();
            if !flagged.is_empty() {
                tracing::info!(medicine = %item.medicine_name, with = ?flagged, "Model flagged unsafe combinations");
            }
            document.push_card(item, &info);
        }

        let interactions = check_interactions(&normalize_drug_names(&names), &self.table);
        let english_report = render_report(&interactions);
        let interaction_report = translate_text(&english_report, language, self.model);

        Ok(AnalysisOutcome {
            language,
            prescription,
            document,
            interactions,
            interaction_report,
        })
    }
}
