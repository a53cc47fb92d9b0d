//! Rx Guide Core Library
//!
//! Local logic behind the prescription guide. Reading the prescription image,
//! writing clinical notes and speaking them are delegated to hosted services
//! (see `rx-guide-llm`); this crate holds everything that stays on device.
//!
//! # Architecture
//!
//! ```text
//! Prescription photo → [model] → ExtractedPrescription
//!                                      │
//!              ┌───────────────────────┼────────────────────────┐
//!              ▼                       ▼                        ▼
//!     normalize_drug_name        per-medicine notes       suggest_times
//!     check_interactions           [model]                 alarm_plan
//!     render_report                  │                        │
//!              │                     ▼                        ▼
//!              │            PrescriptionDocument        ReminderDraft
//!              │                     │                        │
//!              └─────────────► SessionContext ◄───────────────┘
//!                                    │
//!                           clean_for_speech → chunk_for_speech → [speech]
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (PrescriptionItem, MedicineInfo, Reminder, Language)
//! - [`schedule`]: Alarm time suggestions from dosing instructions
//! - [`interactions`]: Static interaction table, checker and safety report
//! - [`report`]: Patient header, medicine cards and disclaimer
//! - [`speech`]: Text cleanup and chunking for speech synthesis
//! - [`session`]: Per-session analysis results and reminders

pub mod interactions;
pub mod models;
pub mod report;
pub mod schedule;
pub mod session;
pub mod speech;

// Re-export commonly used types
pub use interactions::{
    check_interactions, normalize_drug_name, normalize_drug_names, render_report,
    InteractionCheck, InteractionTable,
};
pub use models::{
    AlarmTime, DoctorInfo, ExtractedPrescription, Language, MedicineInfo, PatientInfo,
    PrescriptionItem, Reminder, ReminderDraft,
};
pub use report::{MedicineCard, PrescriptionDocument};
pub use schedule::{alarm_plan, suggest_times};
pub use session::{AnalysisOutcome, ReminderError, SessionContext};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum RxGuideError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Reminder error: {0}")]
    Reminder(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Session error: {0}")]
    SessionError(String),
}

impl From<ReminderError> for RxGuideError {
    fn from(e: ReminderError) -> Self {
        match e {
            ReminderError::UnknownMedicine(_) | ReminderError::NotFound(_) => {
                RxGuideError::NotFound(e.to_string())
            }
            _ => RxGuideError::Reminder(e.to_string()),
        }
    }
}

impl From<models::AlarmTimeError> for RxGuideError {
    fn from(e: models::AlarmTimeError) -> Self {
        RxGuideError::InvalidInput(e.to_string())
    }
}

impl From<models::UnknownLanguage> for RxGuideError {
    fn from(e: models::UnknownLanguage) -> Self {
        RxGuideError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for RxGuideError {
    fn from(e: serde_json::Error) -> Self {
        RxGuideError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for RxGuideError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        RxGuideError::SessionError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Stateless Functions (exported to FFI)
// =========================================================================

/// Languages offered in the output-language picker.
#[uniffi::export]
pub fn supported_languages() -> Vec<FfiLanguage> {
    Language::ALL.into_iter().map(FfiLanguage::from).collect()
}

/// Suggested HH:MM alarm times for dosing instructions.
#[uniffi::export]
pub fn suggest_alarm_times(instructions: String) -> Vec<String> {
    suggest_times(&instructions)
        .into_iter()
        .map(|t| t.to_string())
        .collect()
}

/// Check raw medicine names against the built-in interaction table.
#[uniffi::export]
pub fn check_medicine_interactions(medicine_names: Vec<String>) -> Vec<FfiInteractionFinding> {
    let drugs = normalize_drug_names(&medicine_names);
    check_interactions(&drugs, &InteractionTable::builtin())
        .findings
        .into_iter()
        .map(FfiInteractionFinding::from)
        .collect()
}

/// English Markdown safety report for raw medicine names.
#[uniffi::export]
pub fn interaction_report(medicine_names: Vec<String>) -> String {
    let drugs = normalize_drug_names(&medicine_names);
    render_report(&check_interactions(&drugs, &InteractionTable::builtin()))
}

/// Speech-ready pieces of a Markdown text.
#[uniffi::export]
pub fn speech_chunks(text: String) -> Vec<String> {
    speech::chunk_for_speech(&speech::clean_for_speech(&text), speech::SPEECH_CHUNK_CHARS)
}

/// Create an empty session.
#[uniffi::export]
pub fn new_session() -> Arc<RxGuideSession> {
    Arc::new(RxGuideSession {
        session: Arc::new(Mutex::new(SessionContext::new())),
    })
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct RxGuideSession {
    session: Arc<Mutex<SessionContext>>,
}

#[uniffi::export]
impl RxGuideSession {
    // =========================================================================
    // Analysis
    // =========================================================================

    /// Clear per-run inputs before starting a new analysis.
    pub fn begin_analysis(&self) -> Result<(), RxGuideError> {
        self.session.lock()?.begin_analysis();
        Ok(())
    }

    /// Store an analysis outcome produced elsewhere (JSON-encoded `AnalysisOutcome`).
    pub fn record_analysis_json(&self, outcome_json: String) -> Result<(), RxGuideError> {
        let outcome: AnalysisOutcome = serde_json::from_str(&outcome_json)?;
        self.session.lock()?.record_analysis(outcome);
        Ok(())
    }

    /// Names of the medicines from the latest analysis.
    pub fn medicine_names(&self) -> Result<Vec<String>, RxGuideError> {
        let session = self.session.lock()?;
        Ok(session.medicine_names().into_iter().map(String::from).collect())
    }

    /// Header and cards of the latest analysis.
    pub fn full_prescription(&self) -> Result<Option<String>, RxGuideError> {
        Ok(self.session.lock()?.full_prescription())
    }

    pub fn interaction_report(&self) -> Result<Option<String>, RxGuideError> {
        Ok(self.session.lock()?.interaction_report().map(String::from))
    }

    // =========================================================================
    // Reminders
    // =========================================================================

    /// Prefilled reminder with suggested (or user-overridden) alarm times.
    pub fn reminder_draft(
        &self,
        medicine: String,
        alarm_count: u32,
    ) -> Result<FfiReminderDraft, RxGuideError> {
        let session = self.session.lock()?;
        Ok(session.reminder_draft(&medicine, alarm_count as usize)?.into())
    }

    /// Override one alarm slot with a user-chosen HH:MM time.
    pub fn set_alarm_time(
        &self,
        medicine: String,
        slot: u32,
        time: String,
    ) -> Result<(), RxGuideError> {
        let time: AlarmTime = time.parse()?;
        self.session
            .lock()?
            .set_alarm_override(&medicine, slot as usize, time)?;
        Ok(())
    }

    pub fn add_reminder(&self, draft: FfiReminderDraft) -> Result<FfiReminder, RxGuideError> {
        let draft = ReminderDraft::try_from(draft)?;
        let mut session = self.session.lock()?;
        let reminder = session.add_reminder(draft)?;
        Ok(reminder.clone().into())
    }

    pub fn remove_reminder(&self, id: String) -> Result<FfiReminder, RxGuideError> {
        let removed = self.session.lock()?.remove_reminder(&id)?;
        Ok(removed.into())
    }

    pub fn reminders(&self) -> Result<Vec<FfiReminder>, RxGuideError> {
        let session = self.session.lock()?;
        Ok(session.reminders().iter().cloned().map(|r| r.into()).collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe language option.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLanguage {
    pub label: String,
    pub name: String,
    pub code: String,
}

impl From<Language> for FfiLanguage {
    fn from(lang: Language) -> Self {
        Self {
            label: lang.label().to_string(),
            name: lang.name().to_string(),
            code: lang.code().to_string(),
        }
    }
}

/// FFI-safe interaction finding.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInteractionFinding {
    pub drug: String,
    pub other: String,
    pub severity: String,
    pub kind: String,
    pub effect: String,
    pub recommendation: String,
}

impl From<interactions::InteractionFinding> for FfiInteractionFinding {
    fn from(finding: interactions::InteractionFinding) -> Self {
        Self {
            drug: finding.drug,
            other: finding.other,
            severity: finding.detail.severity.to_string(),
            kind: finding.detail.kind.to_string(),
            effect: finding.detail.effect,
            recommendation: finding.detail.recommendation,
        }
    }
}

/// FFI-safe reminder draft.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReminderDraft {
    pub medicine_name: String,
    /// HH:MM strings
    pub times: Vec<String>,
    pub note: String,
}

impl From<ReminderDraft> for FfiReminderDraft {
    fn from(draft: ReminderDraft) -> Self {
        Self {
            medicine_name: draft.medicine_name,
            times: draft.times.iter().map(|t| t.to_string()).collect(),
            note: draft.note,
        }
    }
}

impl TryFrom<FfiReminderDraft> for ReminderDraft {
    type Error = RxGuideError;

    fn try_from(draft: FfiReminderDraft) -> Result<Self, Self::Error> {
        let times = draft
            .times
            .iter()
            .map(|t| t.parse::<AlarmTime>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReminderDraft {
            medicine_name: draft.medicine_name,
            times,
            note: draft.note,
        })
    }
}

/// FFI-safe active reminder.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReminder {
    pub id: String,
    pub medicine_name: String,
    pub times: Vec<String>,
    pub note: String,
    pub summary: String,
    pub created_at: String,
}

impl From<Reminder> for FfiReminder {
    fn from(reminder: Reminder) -> Self {
        Self {
            summary: reminder.summary(),
            id: reminder.id,
            medicine_name: reminder.medicine_name,
            times: reminder.times.iter().map(|t| t.to_string()).collect(),
            note: reminder.note,
            created_at: reminder.created_at,
        }
    }
}
