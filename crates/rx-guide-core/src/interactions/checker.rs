//! Pairwise and per-drug interaction lookup.

use serde::{Deserialize, Serialize};

use super::table::{InteractionDetail, InteractionTable};

/// A flagged relationship between a prescribed drug and another substance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionFinding {
    /// Drug whose table entry lists the interaction
    pub drug: String,
    /// The other drug, food or substance
    pub other: String,
    pub detail: InteractionDetail,
}

/// Disease advisory attached to a prescribed drug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseWarning {
    pub drug: String,
    pub disease: String,
    pub advisory: String,
}

/// Result of checking one prescription against the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionCheck {
    /// Normalized names that were checked, in input order
    pub drugs: Vec<String>,
    /// Pair findings first, then per-drug findings
    pub findings: Vec<InteractionFinding>,
    pub disease_warnings: Vec<DiseaseWarning>,
}

impl InteractionCheck {
    /// True when there was nothing to check.
    pub fn no_medicines(&self) -> bool {
        self.drugs.is_empty()
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Check already-normalized drug names against the table.
///
/// Every unordered pair is looked up in both directions, so a pair that only one
/// side lists is found whatever the input order. A pair listed on both sides
/// produces two findings. Substances listed for a drug but not prescribed are
/// reported per drug after all pairs.
pub fn check_interactions(drugs: &[String], table: &InteractionTable) -> InteractionCheck {
    let mut check = InteractionCheck {
        drugs: drugs.to_vec(),
        ..Default::default()
    };
    if drugs.is_empty() {
        return check;
    }

    for (i, first) in drugs.iter().enumerate() {
        for second in &drugs[i + 1..] {
            for (drug, other) in [(first, second), (second, first)] {
                let detail = table
                    .get(drug)
                    .and_then(|entry| entry.interaction_with(other));
                if let Some(detail) = detail {
                    check.findings.push(InteractionFinding {
                        drug: drug.clone(),
                        other: other.clone(),
                        detail: detail.clone(),
                    });
                }
            }
        }
    }

    for drug in drugs {
        let Some(entry) = table.get(drug) else {
            continue;
        };

        for (substance, detail) in &entry.interactions {
            if !drugs.contains(substance) {
                check.findings.push(InteractionFinding {
                    drug: drug.clone(),
                    other: substance.clone(),
                    detail: detail.clone(),
                });
            }
        }

        for (disease, advisory) in &entry.disease_interactions {
            check.disease_warnings.push(DiseaseWarning {
                drug: drug.clone(),
                disease: disease.clone(),
                advisory: advisory.clone(),
            });
        }
    }

    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactions::table::{InteractionEntry, InteractionKind, Severity};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn pair_findings<'a>(check: &'a InteractionCheck, a: &str, b: &str) -> Vec<&'a InteractionFinding> {
        check
            .findings
            .iter()
            .filter(|f| (f.drug == a && f.other == b) || (f.drug == b && f.other == a))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let check = check_interactions(&[], &InteractionTable::builtin());
        assert!(check.no_medicines());
        assert!(check.findings.is_empty());
        assert!(check.disease_warnings.is_empty());
    }

    #[test]
    fn test_one_sided_pair_found_in_either_order() {
        let table = InteractionTable::builtin();

        let forward = check_interactions(&names(&["Augmentin", "Warfarin"]), &table);
        let reverse = check_interactions(&names(&["Warfarin", "Augmentin"]), &table);

        assert_eq!(pair_findings(&forward, "Augmentin", "Warfarin").len(), 1);
        assert_eq!(pair_findings(&reverse, "Augmentin", "Warfarin").len(), 1);
        assert_eq!(reverse.findings[0].drug, "Augmentin");
    }

    #[test]
    fn test_prescribed_substance_not_repeated_as_singleton() {
        let check = check_interactions(
            &names(&["Augmentin", "Warfarin"]),
            &InteractionTable::builtin(),
        );
        // Warfarin pair + Alcohol singleton
        assert_eq!(check.findings.len(), 2);
        assert_eq!(check.findings[0].other, "Warfarin");
        assert_eq!(check.findings[1].other, "Alcohol");
        assert_eq!(check.disease_warnings.len(), 1);
        assert_eq!(check.disease_warnings[0].disease, "Kidney Disease");
    }

    fn listing(other: &str, effect: &str) -> InteractionEntry {
        InteractionEntry {
            interactions: vec![(
                other.to_string(),
                InteractionDetail {
                    severity: Severity::Moderate,
                    kind: InteractionKind::DrugDrug,
                    effect: effect.to_string(),
                    recommendation: "Monitor".to_string(),
                },
            )],
            disease_interactions: Vec::new(),
        }
    }

    #[test]
    fn test_mutual_listing_is_not_deduplicated() {
        let mut table = InteractionTable::default();
        table.insert("Adrug", listing("Bdrug", "from A"));
        table.insert("Bdrug", listing("Adrug", "from B"));

        let check = check_interactions(&names(&["Adrug", "Bdrug"]), &table);
        assert_eq!(check.findings.len(), 2);
        assert_eq!(check.findings[0].detail.effect, "from A");
        assert_eq!(check.findings[1].detail.effect, "from B");
    }

    #[test]
    fn test_pairs_before_singletons_in_input_order() {
        let check = check_interactions(
            &names(&["Eroflam", "Amoxicillin", "Aspirin"]),
            &InteractionTable::builtin(),
        );
        let order: Vec<(&str, &str)> = check
            .findings
            .iter()
            .map(|f| (f.drug.as_str(), f.other.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Eroflam", "Aspirin"),
                ("Eroflam", "Alcohol"),
                ("Amoxicillin", "Methotrexate"),
            ]
        );
    }

    #[test]
    fn test_unknown_drugs_produce_nothing() {
        let check = check_interactions(&names(&["Paracetamol", "Cetirizine"]), &InteractionTable::builtin());
        assert!(!check.no_medicines());
        assert!(!check.has_findings());
    }
}
