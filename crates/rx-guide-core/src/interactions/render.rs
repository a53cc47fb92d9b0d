//! Markdown safety report for an interaction check.

use std::fmt::Write;

use super::checker::InteractionCheck;

/// Shown instead of findings when the prescription yielded no medicine names.
pub const NO_MEDICINES_FOUND: &str = "No medicines found for interaction check.";

const INTRO: &str = "## Drug Interaction Safety Report\n\n\
### What Is a Drug Interaction Check?\n\
A drug interaction check analyzes whether medicines prescribed together might react in ways \
that could harm the patient, reduce effectiveness, or cause adverse side effects.\n\n\
---\n\n";

const INTERACTION_TYPES: &str = "### Types of Drug Interactions\n\n\
1. **Drug-Drug Interaction**: Two medicines react with each other\n\
2. **Drug-Food Interaction**: Some foods affect medicine absorption\n\
3. **Drug-Disease Interaction**: A drug worsens an existing condition\n\n\
---\n\n";

const IMPORTANT: &str = "### ⚠️ IMPORTANT\n\n\
This is a basic safety check. Always consult your doctor or pharmacist for comprehensive analysis.\n";

/// Render the English safety report.
pub fn render_report(check: &InteractionCheck) -> String {
    let mut report = String::from(INTRO);

    if check.no_medicines() {
        report.push_str(NO_MEDICINES_FOUND);
        return report;
    }

    // Writing into a String cannot fail.
    let _ = writeln!(
        report,
        "### Medicines Being Checked: {}\n\n---\n",
        check.drugs.join(", ")
    );

    if check.has_findings() {
        report.push_str("### ⚠️ POTENTIAL INTERACTIONS FOUND\n\n");
        for (idx, finding) in check.findings.iter().enumerate() {
            let detail = &finding.detail;
            let _ = write!(
                report,
                "**{}. {} ↔ {}**\n\n\
                 - Severity: {}\n\
                 - Type: {}\n\
                 - Effect: {}\n\
                 - Recommendation: {}\n\n",
                idx + 1,
                finding.drug,
                finding.other,
                detail.severity,
                detail.kind,
                detail.effect,
                detail.recommendation,
            );
        }
    } else {
        report.push_str("### ✅ No Known Drug-Drug Interactions\n\n");
        report.push_str("No major flagged interactions found between the prescribed medicines.\n\n");
    }

    if !check.disease_warnings.is_empty() {
        report.push_str("---\n\n### Drug-Disease Considerations\n\n");
        for warning in &check.disease_warnings {
            let _ = write!(
                report,
                "**{}** - {}: {}\n\n",
                warning.drug, warning.disease, warning.advisory
            );
        }
    }

    report.push_str("---\n\n");
    report.push_str(INTERACTION_TYPES);
    report.push_str(IMPORTANT);
    report
}
