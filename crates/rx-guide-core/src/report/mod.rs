//! Prescription document formatting.
//!
//! Section order is fixed: patient info → doctor info → medicine cards → disclaimer.

mod card;
mod parse;

pub use card::{disclaimer, medicine_card, patient_header};
pub use parse::*;

use serde::{Deserialize, Serialize};

use crate::models::{DoctorInfo, MedicineInfo, PatientInfo, PrescriptionItem};

/// A rendered card, kept per medicine so each can be spoken separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineCard {
    pub name: String,
    pub text: String,
}

/// The assembled analysis document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionDocument {
    /// Title with patient and doctor blocks
    pub header: String,
    pub cards: Vec<MedicineCard>,
}

impl PrescriptionDocument {
    pub fn new(patient: Option<&PatientInfo>, doctor: Option<&DoctorInfo>) -> Self {
        Self {
            header: patient_header(patient, doctor),
            cards: Vec::new(),
        }
    }

    /// Render and append the next card; numbering follows insertion order.
    pub fn push_card(&mut self, item: &PrescriptionItem, info: &MedicineInfo) -> &MedicineCard {
        let index = self.cards.len() + 1;
        self.cards.push(MedicineCard {
            name: item.medicine_name.clone(),
            text: medicine_card(index, item, info),
        });
        &self.cards[index - 1]
    }

    /// All cards concatenated.
    pub fn medicine_text(&self) -> String {
        self.cards.iter().map(|c| c.text.as_str()).collect()
    }

    /// Header followed by the cards.
    pub fn full_text(&self) -> String {
        format!("{}{}", self.header, self.medicine_text())
    }

    /// The complete document, disclaimer included.
    pub fn render(&self) -> String {
        format!("{}---\n\n{}\n", self.full_text(), disclaimer())
    }
}
