//! Patient header and per-medicine card templates.

use std::borrow::Cow;
use std::fmt::Write;

use crate::models::{DoctorInfo, MedicineInfo, PatientInfo, PrescriptionItem};

pub(crate) const TITLE: &str = "## 🧾 AI Smart Prescription Guide";
pub(crate) const PATIENT_HEADING: &str = "### 👤 Patient Information";
pub(crate) const DOCTOR_HEADING: &str = "### 👨‍⚕️ Doctor Information";
pub(crate) const CARD_HEADING: &str = "### 💊 ";
pub(crate) const DOSAGE_LABEL: &str = "💊 **Dosage:** ";
pub(crate) const DURATION_PREFIX: &str = "- Duration: **";
pub(crate) const PATTERN_PREFIX: &str = "- **(";
pub(crate) const PATTERN_SUFFIX: &str = " pattern)**";

pub(crate) const NAME_FIELD: &str = "- **Name:** ";
pub(crate) const AGE_FIELD: &str = "- **Age:** ";
pub(crate) const SEX_FIELD: &str = "- **Sex:** ";
pub(crate) const DATE_FIELD: &str = "- **Date:** ";
pub(crate) const ALLERGIES_FIELD: &str = "- **Known Allergies:** ";
pub(crate) const LICENSE_FIELD: &str = "- **License:** ";

const DISCLAIMER: &str = "⚠️ **Important Disclaimer:** This AI analysis is for informational \
purposes only. Always consult your doctor or pharmacist for comprehensive medical advice. \
Do not modify your prescription based solely on this report.";

/// Fold a multi-line value onto one line so each field stays one Markdown line.
fn one_line(value: &str) -> Cow<'_, str> {
    if !value.contains(['\n', '\r']) {
        return Cow::Borrowed(value);
    }
    let parts: Vec<&str> = value
        .lines()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    Cow::Owned(parts.join(" "))
}

/// Title plus the patient and doctor blocks, each only when present.
pub fn patient_header(patient: Option<&PatientInfo>, doctor: Option<&DoctorInfo>) -> String {
    let mut md = format!("{TITLE}\n\n");

    if let Some(patient) = patient {
        let _ = write!(
            md,
            "{PATIENT_HEADING}\n\
             {NAME_FIELD}{}\n\
             {AGE_FIELD}{}\n\
             {SEX_FIELD}{}\n\
             {DATE_FIELD}{}\n\
             {ALLERGIES_FIELD}{}\n\n",
            one_line(&patient.name),
            one_line(&patient.age),
            one_line(&patient.sex),
            one_line(&patient.date),
            one_line(&patient.known_allergies)
        );
    }

    if let Some(doctor) = doctor {
        let _ = write!(
            md,
            "{DOCTOR_HEADING}\n{NAME_FIELD}{}\n{LICENSE_FIELD}{}\n\n",
            one_line(&doctor.name),
            one_line(&doctor.license)
        );
    }

    md
}

/// Strip list markers the model sometimes leaves on bullet text.
fn bullet_text(point: &str) -> &str {
    point
        .trim()
        .trim_start_matches('-')
        .trim_start_matches('*')
        .trim()
}

fn push_bullets(md: &mut String, heading: &str, points: &[String]) {
    md.push_str(heading);
    md.push('\n');
    for point in points.iter().map(|p| bullet_text(p)).filter(|p| !p.is_empty()) {
        let _ = writeln!(md, "- {point}");
    }
    md.push('\n');
}

/// Markdown card for one medicine (1-based `index`).
pub fn medicine_card(index: usize, item: &PrescriptionItem, info: &MedicineInfo) -> String {
    let name = one_line(&item.medicine_name);
    let mut md = format!("---\n{CARD_HEADING}{index}. {name}\n\n");

    push_bullets(&mut md, "✅ **Usage:**", &info.usage);

    let _ = writeln!(md, "{DOSAGE_LABEL}{}", one_line(&item.dosage));
    let _ = writeln!(md, "- {}", one_line(&item.instructions));
    if let Some(pattern) = &item.pattern {
        let _ = writeln!(md, "{PATTERN_PREFIX}{}{PATTERN_SUFFIX}", one_line(pattern));
    }
    if let Some(duration) = &item.duration {
        let _ = writeln!(md, "{DURATION_PREFIX}{}**", one_line(duration));
    }
    md.push('\n');

    push_bullets(&mut md, "⚠️ **Common Side Effects:**", &info.side_effects);

    if info.allergy_alert.triggered {
        let drug_class = if info.drug_class.is_empty() {
            "this drug class"
        } else {
            info.drug_class.as_str()
        };
        md.push_str("🚨 **Drug Interaction & Allergy Check:**\n");
        let _ = writeln!(md, "❌ **ALERT:** {}", info.allergy_alert.message);
        let _ = writeln!(md, "⚠ **{name}** belongs to **{drug_class}**");
        md.push_str(
            "👉 **Recommendation: Consult doctor immediately before taking this medicine.**\n\n",
        );
    } else {
        md.push_str("🔎 **Drug Interaction Check:**\n");
        for interaction in &info.interactions {
            if interaction.safe {
                let _ = write!(md, "✔ Safe with **{}**", interaction.medicine);
                if !interaction.note.is_empty() {
                    let _ = write!(md, " - {}", interaction.note);
                }
                md.push('\n');
            } else {
                let _ = writeln!(
                    md,
                    "⚠ Use cautiously with **{}** - {}",
                    interaction.medicine, interaction.note
                );
            }
        }

        for warning in info.general_warnings.iter().map(|w| w.trim()) {
            if !warning.is_empty() {
                let _ = writeln!(md, "⚠ {warning}");
            }
        }

        if !info.summary.is_empty() {
            let _ = writeln!(md, "\n📋 *{}*", info.summary);
        }
    }

    md.push('\n');
    md
}

/// Fixed closing disclaimer.
pub fn disclaimer() -> &'static str {
    DISCLAIMER
}
