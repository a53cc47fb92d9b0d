//! Per-session state for one user of the guide.
//!
//! Holds the latest analysis and the reminder list. Nothing here is persisted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interactions::InteractionCheck;
use crate::models::{
    AlarmTime, ExtractedPrescription, Language, PrescriptionItem, Reminder, ReminderDraft,
};
use crate::report::PrescriptionDocument;
use crate::schedule::{alarm_plan, MAX_ALARMS};

/// Characters of the instructions copied into a new reminder's note.
const NOTE_PREFIX_CHARS: usize = 50;

/// Reminder errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    #[error("Unknown medicine: {0}")]
    UnknownMedicine(String),

    #[error("This reminder already exists")]
    Duplicate,

    #[error("Reminder not found: {0}")]
    NotFound(String),

    #[error("A reminder needs between 1 and 4 alarms, got {0}")]
    AlarmCount(usize),
}

pub type ReminderResult<T> = Result<T, ReminderError>;

/// Everything one analysis run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub language: Language,
    /// Transcription, with dosage fields translated when not English
    pub prescription: ExtractedPrescription,
    pub document: PrescriptionDocument,
    pub interactions: InteractionCheck,
    /// Safety report in the output language
    pub interaction_report: String,
}

/// Explicit replacement for UI-global session state.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    reminders: Vec<Reminder>,
    medicines: Vec<PrescriptionItem>,
    outcome: Option<AnalysisOutcome>,
    /// (medicine, slot) → time picked by the user
    alarm_overrides: HashMap<(String, usize), AlarmTime>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset inputs derived from the previous run before a new analysis.
    pub fn begin_analysis(&mut self) {
        self.alarm_overrides.clear();
    }

    /// Store a completed analysis.
    ///
    /// Medicines are keyed by name; a repeated name replaces the earlier entry in place.
    pub fn record_analysis(&mut self, outcome: AnalysisOutcome) {
        self.medicines.clear();
        for item in &outcome.prescription.items {
            match self
                .medicines
                .iter_mut()
                .find(|m| m.medicine_name == item.medicine_name)
            {
                Some(existing) => *existing = item.clone(),
                None => self.medicines.push(item.clone()),
            }
        }
        self.outcome = Some(outcome);
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        self.outcome.as_ref()
    }

    pub fn medicines(&self) -> &[PrescriptionItem] {
        &self.medicines
    }

    pub fn medicine_names(&self) -> Vec<&str> {
        self.medicines.iter().map(|m| m.medicine_name.as_str()).collect()
    }

    pub fn medicine(&self, name: &str) -> Option<&PrescriptionItem> {
        self.medicines.iter().find(|m| m.medicine_name == name)
    }

    /// Header plus cards of the latest analysis.
    pub fn full_prescription(&self) -> Option<String> {
        self.outcome.as_ref().map(|o| o.document.full_text())
    }

    pub fn interaction_report(&self) -> Option<&str> {
        self.outcome.as_ref().map(|o| o.interaction_report.as_str())
    }

    /// Remember a user-chosen time for one alarm slot of a medicine.
    pub fn set_alarm_override(
        &mut self,
        medicine: &str,
        slot: usize,
        time: AlarmTime,
    ) -> ReminderResult<()> {
        if self.medicine(medicine).is_none() {
            return Err(ReminderError::UnknownMedicine(medicine.to_string()));
        }
        if slot >= MAX_ALARMS {
            return Err(ReminderError::AlarmCount(slot + 1));
        }
        self.alarm_overrides.insert((medicine.to_string(), slot), time);
        Ok(())
    }

    /// Prefilled reminder for a medicine with `alarm_count` alarms.
    ///
    /// Times come from the instructions unless the user overrode a slot.
    pub fn reminder_draft(&self, medicine: &str, alarm_count: usize) -> ReminderResult<ReminderDraft> {
        let item = self
            .medicine(medicine)
            .ok_or_else(|| ReminderError::UnknownMedicine(medicine.to_string()))?;
        if !(1..=MAX_ALARMS).contains(&alarm_count) {
            return Err(ReminderError::AlarmCount(alarm_count));
        }

        let times = alarm_plan(&item.instructions, alarm_count)
            .into_iter()
            .enumerate()
            .map(|(slot, suggested)| {
                self.alarm_overrides
                    .get(&(medicine.to_string(), slot))
                    .copied()
                    .unwrap_or(suggested)
            })
            .collect();

        Ok(ReminderDraft {
            medicine_name: item.medicine_name.clone(),
            times,
            note: item.instructions.chars().take(NOTE_PREFIX_CHARS).collect(),
        })
    }

    /// Add a reminder unless an identical one exists.
    pub fn add_reminder(&mut self, draft: ReminderDraft) -> ReminderResult<&Reminder> {
        if !(1..=MAX_ALARMS).contains(&draft.times.len()) {
            return Err(ReminderError::AlarmCount(draft.times.len()));
        }
        if self.reminders.iter().any(|r| r.matches(&draft)) {
            return Err(ReminderError::Duplicate);
        }
        self.reminders.push(Reminder::from_draft(draft));
        Ok(&self.reminders[self.reminders.len() - 1])
    }

    pub fn remove_reminder(&mut self, id: &str) -> ReminderResult<Reminder> {
        let pos = self
            .reminders
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ReminderError::NotFound(id.to_string()))?;
        Ok(self.reminders.remove(pos))
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }
}
