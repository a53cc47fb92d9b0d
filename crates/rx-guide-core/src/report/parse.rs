//! Read fields back out of rendered headers and cards.
//!
//! Only the deterministic parts of the templates are recovered; model-written
//! sections (usage, side effects, interaction notes) are left alone.

use super::card::*;
use crate::models::{DoctorInfo, PatientInfo, PrescriptionItem};

/// Fields recovered from a medicine card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardFields {
    pub index: usize,
    pub item: PrescriptionItem,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Patient,
    Doctor,
}

/// Recover patient and doctor details from a header made by [`patient_header`].
pub fn parse_patient_header(text: &str) -> (Option<PatientInfo>, Option<DoctorInfo>) {
    let mut patient: Option<PatientInfo> = None;
    let mut doctor: Option<DoctorInfo> = None;
    let mut section = Section::None;

    for line in text.lines() {
        if line == PATIENT_HEADING {
            section = Section::Patient;
            patient.get_or_insert_with(PatientInfo::default);
            continue;
        }
        if line == DOCTOR_HEADING {
            section = Section::Doctor;
            doctor.get_or_insert_with(DoctorInfo::default);
            continue;
        }
        if line.starts_with('#') {
            section = Section::None;
            continue;
        }

        match (section, patient.as_mut(), doctor.as_mut()) {
            (Section::Patient, Some(p), _) => {
                let field = [
                    (NAME_FIELD, &mut p.name),
                    (AGE_FIELD, &mut p.age),
                    (SEX_FIELD, &mut p.sex),
                    (DATE_FIELD, &mut p.date),
                    (ALLERGIES_FIELD, &mut p.known_allergies),
                ]
                .into_iter()
                .find_map(|(prefix, slot)| line.strip_prefix(prefix).map(|v| (v, slot)));
                if let Some((value, slot)) = field {
                    *slot = value.to_string();
                }
            }
            (Section::Doctor, _, Some(d)) => {
                if let Some(value) = line.strip_prefix(NAME_FIELD) {
                    d.name = value.to_string();
                } else if let Some(value) = line.strip_prefix(LICENSE_FIELD) {
                    d.license = value.to_string();
                }
            }
            _ => {}
        }
    }

    (patient, doctor)
}

/// Recover the prescription fields from a card made by [`medicine_card`].
///
/// Multi-line values were folded onto one line when the card was rendered,
/// so they come back joined with single spaces. Returns `None` when the text
/// has no card heading.
pub fn parse_medicine_card(text: &str) -> Option<CardFields> {
    let mut lines = text.lines();

    let heading = lines.find_map(|l| l.strip_prefix(CARD_HEADING))?;
    let (index, name) = heading.split_once(". ")?;
    let index = index.parse().ok()?;

    let dosage = lines.find_map(|l| l.strip_prefix(DOSAGE_LABEL))?;
    let instructions = lines.next()?.strip_prefix("- ")?;
    let mut item = PrescriptionItem::new(name, dosage, instructions);

    for line in lines.by_ref() {
        if line.is_empty() {
            break;
        }
        if let Some(pattern) = line
            .strip_prefix(PATTERN_PREFIX)
            .and_then(|l| l.strip_suffix(PATTERN_SUFFIX))
        {
            item.pattern = Some(pattern.to_string());
        } else if let Some(duration) = line
            .strip_prefix(DURATION_PREFIX)
            .and_then(|l| l.strip_suffix("**"))
        {
            item.duration = Some(duration.to_string());
        }
    }

    Some(CardFields { index, item })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MedicineInfo;

    #[test]
    fn test_header_round_trip() {
        let patient = PatientInfo {
            name: "Ravi Kumar".into(),
            age: "42".into(),
            sex: "Male".into(),
            date: "12/03/2025".into(),
            known_allergies: "Penicillin".into(),
        };
        let doctor = DoctorInfo {
            name: "Dr. Meena".into(),
            license: "KMC 1234".into(),
        };
        let text = patient_header(Some(&patient), Some(&doctor));
        assert_eq!(parse_patient_header(&text), (Some(patient), Some(doctor)));
    }

    #[test]
    fn test_header_without_sections() {
        assert_eq!(parse_patient_header(&patient_header(None, None)), (None, None));
    }

    #[test]
    fn test_card_round_trip() {
        let item = PrescriptionItem::new("Eroflam", "100mg tablet", "Once daily after food")
            .with_duration("3 days");
        let card = medicine_card(3, &item, &MedicineInfo::fallback());
        let fields = parse_medicine_card(&card).unwrap();
        assert_eq!(fields.index, 3);
        assert_eq!(fields.item, item);
    }

    #[test]
    fn test_card_round_trip_folds_multiline_values() {
        let item = PrescriptionItem::new("Eroflam", "100mg\ntablet", "Once daily\nafter food")
            .with_pattern("1-0-1");
        let card = medicine_card(1, &item, &MedicineInfo::fallback());
        let fields = parse_medicine_card(&card).unwrap();
        assert_eq!(fields.item.dosage, "100mg tablet");
        assert_eq!(fields.item.instructions, "Once daily after food");
        assert_eq!(fields.item.pattern.as_deref(), Some("1-0-1"));
    }

    #[test]
    fn test_not_a_card() {
        assert!(parse_medicine_card("just some text").is_none());
    }
}
