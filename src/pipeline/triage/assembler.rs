//! Local triage assembler: classifier + content generators → `TriageReport`.
//!
//! This is the offline path and also the reference shape remote answers are
//! coerced into. No I/O, no failure path.

use crate::models::PatientInput;

use super::classify::classify;
use super::content;
use super::types::{Assessment, ReportSummary, TriageReport};

/// Lower-cased symptom text with image findings appended, as used for every
/// classification and keyword lookup.
pub fn symptom_text(input: &PatientInput) -> String {
    let mut text = input.symptoms.to_lowercase();
    if let Some(findings) = input.image_findings() {
        text.push_str(" image findings: ");
        text.push_str(&findings.to_lowercase());
    }
    text
}

/// Build the full 7-level report from patient input alone.
pub fn assemble(input: &PatientInput) -> TriageReport {
    let symptoms = symptom_text(input);
    let tier = classify(&symptoms, &input.vitals, input.age);

    TriageReport {
        reassurance: content::reassurance(tier).to_string(),
        assessment: Assessment {
            severity: tier,
            description: content::assessment_description(tier).to_string(),
        },
        possibilities: content::possible_conditions(&symptoms),
        first_aid: content::first_aid(&symptoms),
        danger_signs: content::danger_signs(input.age),
        vitals_analysis: content::vitals_analysis(&input.vitals),
        summary: ReportSummary {
            summary: content::summary(tier),
            next_action: content::next_action(tier).to_string(),
        },
    }
}
