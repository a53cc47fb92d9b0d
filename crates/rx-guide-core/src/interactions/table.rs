//! Static drug interaction table.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious an interaction is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Moderate,
    Major,
}

impl Severity {
    /// Label with the traffic-light marker used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Major => "🔴 Major",
            Severity::Moderate => "🟡 Moderate",
            Severity::Minor => "🟢 Minor",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the drug interacts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    DrugDrug,
    DrugFood,
    DrugDisease,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InteractionKind::DrugDrug => "Drug-Drug Interaction",
            InteractionKind::DrugFood => "Drug-Food Interaction",
            InteractionKind::DrugDisease => "Drug-Disease Interaction",
        })
    }
}

/// A known interaction between a drug and another substance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionDetail {
    pub severity: Severity,
    pub kind: InteractionKind,
    pub effect: String,
    pub recommendation: String,
}

/// Everything known about one drug.
///
/// Both maps keep insertion order so reports list entries the way the table defines them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionEntry {
    /// Interacting substance → detail
    pub interactions: Vec<(String, InteractionDetail)>,
    /// Disease → advisory
    pub disease_interactions: Vec<(String, String)>,
}

impl InteractionEntry {
    /// Detail for a substance, if listed.
    pub fn interaction_with(&self, substance: &str) -> Option<&InteractionDetail> {
        self.interactions
            .iter()
            .find(|(name, _)| name == substance)
            .map(|(_, detail)| detail)
    }

    fn interaction(
        mut self,
        substance: &str,
        severity: Severity,
        kind: InteractionKind,
        effect: &str,
        recommendation: &str,
    ) -> Self {
        self.interactions.push((
            substance.to_string(),
            InteractionDetail {
                severity,
                kind,
                effect: effect.to_string(),
                recommendation: recommendation.to_string(),
            },
        ));
        self
    }

    fn disease(mut self, disease: &str, advisory: &str) -> Self {
        self.disease_interactions
            .push((disease.to_string(), advisory.to_string()));
        self
    }
}

/// Immutable lookup from title-cased drug name to its interactions.
#[derive(Debug, Clone, Default)]
pub struct InteractionTable {
    entries: HashMap<String, InteractionEntry>,
}

impl InteractionTable {
    /// Build a table from entries. Later duplicates of a name replace earlier ones.
    pub fn new(entries: impl IntoIterator<Item = (String, InteractionEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// The table shipped with the app.
    pub fn builtin() -> Self {
        use InteractionKind::*;
        use Severity::*;

        let augmentin = InteractionEntry::default()
            .interaction(
                "Warfarin",
                Major,
                DrugDrug,
                "Increased risk of bleeding",
                "Monitor INR levels closely. Consult doctor immediately.",
            )
            .interaction(
                "Alcohol",
                Moderate,
                DrugFood,
                "May reduce effectiveness and cause stomach upset",
                "Avoid alcohol during treatment period.",
            )
            .disease(
                "Kidney Disease",
                "🟡 Use with caution - dose adjustment may be needed",
            );

        let eroflam = InteractionEntry::default()
            .interaction(
                "Aspirin",
                Moderate,
                DrugDrug,
                "Increased risk of gastric bleeding",
                "Take with food. Monitor for stomach pain.",
            )
            .interaction(
                "Alcohol",
                Major,
                DrugFood,
                "Severe liver damage risk",
                "Strictly avoid alcohol consumption.",
            )
            .disease(
                "High Blood Pressure",
                "🟡 May increase blood pressure in some patients",
            );

        let amoxicillin = InteractionEntry::default().interaction(
            "Methotrexate",
            Major,
            DrugDrug,
            "Increased methotrexate toxicity",
            "Avoid combination or monitor closely.",
        );

        Self::new([
            ("Augmentin".to_string(), augmentin),
            ("Eroflam".to_string(), eroflam),
            ("Amoxicillin".to_string(), amoxicillin),
        ])
    }

    pub fn get(&self, drug: &str) -> Option<&InteractionEntry> {
        self.entries.get(drug)
    }

    pub fn contains(&self, drug: &str) -> bool {
        self.entries.contains_key(drug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add or replace an entry (used to extend the built-in table).
    pub fn insert(&mut self, drug: impl Into<String>, entry: InteractionEntry) {
        self.entries.insert(drug.into(), entry);
    }
}
