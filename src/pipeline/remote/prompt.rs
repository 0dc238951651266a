//! Prompt construction for the remote triage model.

use std::fmt::Write as _;

use crate::models::PatientInput;

/// Default instruction sent with an uploaded image when the caller gives none.
pub const DEFAULT_IMAGE_PROMPT: &str = "What do you see in this medical image? \
Describe any symptoms, conditions, rashes, wounds, or medical findings visible. \
Focus on medically relevant observations.";

const PROMPT_PREAMBLE: &str = "You are an expert medical triage AI assistant. \
Analyze the following patient information and provide a comprehensive 7-level triage assessment.";

const PROMPT_LEVELS: &str = r#"
Please provide a comprehensive medical assessment in the following 7 levels:

**Level 1 - Reassurance Level**: Provide reassurance for mild symptoms and general advice.

**Level 2 - Initial Assessment**: Classify the condition severity (mild/moderate/severe/emergency).

**Level 3 - Pathological Possibilities**: List the 3-5 most likely medical conditions based on symptoms.

**Level 4 - First Aid Measures**: Provide specific first aid instructions that can be done at home.

**Level 5 - Danger Signs Alert**: List critical warning signs that require immediate medical attention.

**Level 6 - Vital Signs Analysis**: Analyze any provided vital signs and their implications.

**Level 7 - Summary Report & Next Action**: Provide a concise summary and specific next steps.

Format your response as a JSON object with these exact keys:
{
  "level_1_reassurance": "string",
  "level_2_assessment": {"severity": "mild|moderate|severe|emergency", "description": "string"},
  "level_3_possibilities": ["condition1", "condition2", "condition3"],
  "level_4_first_aid": ["step1", "step2", "step3"],
  "level_5_danger_signs": ["sign1", "sign2", "sign3"],
  "level_6_vitals_analysis": "string",
  "level_7_summary": {"summary": "string", "next_action": "string"}
}

Be precise, medically accurate, and prioritize patient safety."#;

/// Build the triage prompt for one patient.
///
/// Optional lines (temperature, heart rate, image analysis) appear only when
/// the value is present.
pub fn build_triage_prompt(input: &PatientInput) -> String {
    let mut prompt = String::with_capacity(PROMPT_PREAMBLE.len() + PROMPT_LEVELS.len() + 256);
    prompt.push_str(PROMPT_PREAMBLE);
    prompt.push_str("\n\nPatient Information:\n");

    // Writing to a String cannot fail.
    let _ = writeln!(prompt, "- Age: {} years", input.age);
    let _ = writeln!(prompt, "- Sex: {}", input.sex);
    let _ = writeln!(prompt, "- Symptoms: {}", input.symptoms);
    let _ = writeln!(prompt, "- Duration: {}", input.duration);

    if let Some(t) = input.vitals.temperature {
        let _ = writeln!(prompt, "- Temperature: {t}°C");
    }
    if let Some(hr) = input.vitals.heart_rate {
        let _ = writeln!(prompt, "- Heart Rate: {hr} BPM");
    }
    if let Some(findings) = input.image_findings() {
        let _ = writeln!(prompt, "- Image Analysis: {findings}");
    }

    prompt.push_str(PROMPT_LEVELS);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sex, Vitals};

    fn input() -> PatientInput {
        PatientInput {
            age: 34,
            sex: Sex::Female,
            symptoms: "headache and nausea".into(),
            duration: "2 days".into(),
            vitals: Vitals::default(),
            image_findings: None,
        }
    }

    #[test]
    fn patient_block_is_included() {
        let prompt = build_triage_prompt(&input());
        assert!(prompt.starts_with("You are an expert medical triage AI assistant."));
        assert!(prompt.contains("- Age: 34 years\n"));
        assert!(prompt.contains("- Sex: female\n"));
        assert!(prompt.contains("- Symptoms: headache and nausea\n"));
        assert!(prompt.contains("- Duration: 2 days\n"));
    }

    #[test]
    fn absent_vitals_and_findings_are_omitted() {
        let prompt = build_triage_prompt(&input());
        assert!(!prompt.contains("Temperature:"));
        assert!(!prompt.contains("Heart Rate:"));
        assert!(!prompt.contains("Image Analysis:"));
    }

    #[test]
    fn present_vitals_and_findings_are_listed() {
        let mut patient = input();
        patient.vitals = Vitals {
            temperature: Some(38.5),
            heart_rate: Some(110.0),
        };
        patient.image_findings = Some("  swollen left ankle ".into());
        let prompt = build_triage_prompt(&patient);
        assert!(prompt.contains("- Temperature: 38.5°C\n"));
        assert!(prompt.contains("- Heart Rate: 110 BPM\n"));
        assert!(prompt.contains("- Image Analysis: swollen left ankle\n"));
    }

    #[test]
    fn prompt_lists_every_report_key() {
        let prompt = build_triage_prompt(&input());
        for key in [
            "level_1_reassurance",
            "level_2_assessment",
            "level_3_possibilities",
            "level_4_first_aid",
            "level_5_danger_signs",
            "level_6_vitals_analysis",
            "level_7_summary",
        ] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.ends_with("prioritize patient safety."));
    }
}
