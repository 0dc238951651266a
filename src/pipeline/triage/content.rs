//! Content generators for the rule-based triage report.
//!
//! Every generator is a pure function of the risk tier, the lower-cased
//! symptom text, age or vitals. Keyword lookups are static ordered tables;
//! matching is plain substring matching, so "pain" also matches "painful".

use crate::models::{RiskTier, Vitals};

use super::types::MAX_POSSIBILITIES;

// ──────────────────────────────────────────────
// Tables
// ──────────────────────────────────────────────

/// Keyword → candidate conditions, checked in this order.
pub const CONDITION_TABLE: &[(&str, &[&str])] = &[
    ("fever", &["Viral infection", "Bacterial infection", "Flu"]),
    ("cough", &["Common cold", "Bronchitis", "COVID-19", "Pneumonia"]),
    ("headache", &["Tension headache", "Migraine", "Sinus infection", "Dehydration"]),
    ("stomach", &["Gastroenteritis", "Food poisoning", "Stomach flu"]),
    ("chest", &["Muscle strain", "Anxiety", "Heartburn", "Respiratory infection"]),
    ("pain", &["Muscle strain", "Inflammation", "Injury", "Infection"]),
    ("nausea", &["Gastroenteritis", "Food poisoning", "Motion sickness"]),
    ("diarrhea", &["Gastroenteritis", "Food poisoning", "Viral infection"]),
    ("anxiety", &["Anxiety disorder", "Panic attacks", "Acute stress response"]),
    ("depression", &["Major depressive episode", "Seasonal depression", "Situational depression"]),
    ("stress", &["Acute stress reaction", "Work-related stress", "Life stress"]),
    ("other", &["Unspecified condition", "Multiple symptom complex", "Requires further evaluation"]),
];

/// Used when no keyword in `CONDITION_TABLE` matches.
pub const DEFAULT_CONDITIONS: [&str; 3] = ["Viral illness", "General fatigue", "Stress-related symptoms"];

pub const BASELINE_FIRST_AID: [&str; 3] = [
    "Rest and avoid strenuous activities",
    "Stay hydrated with water or clear fluids",
    "Monitor symptoms for changes",
];

/// Keyword → extra first-aid steps, appended in this order.
pub const FIRST_AID_TABLE: &[(&str, &[&str])] = &[
    (
        "fever",
        &[
            "Use cool compresses or lukewarm bath",
            "Take fever reducers if available (acetaminophen/ibuprofen)",
        ],
    ),
    (
        "pain",
        &[
            "Apply cold or warm compress to affected area",
            "Take pain relievers if available",
        ],
    ),
    (
        "cough",
        &[
            "Use honey in warm tea (avoid for children <1 year)",
            "Use humidifier or steam inhalation",
        ],
    ),
    (
        "anxiety",
        &[
            "Practice deep breathing exercises",
            "Find a quiet, safe space to relax",
            "Consider talking to someone you trust",
        ],
    ),
    (
        "depression",
        &[
            "Maintain regular sleep schedule",
            "Engage in gentle physical activity",
            "Reach out to mental health professional if needed",
        ],
    ),
    (
        "stress",
        &[
            "Practice stress-reduction techniques",
            "Take breaks from stressful activities",
            "Ensure adequate sleep and nutrition",
        ],
    ),
];

pub const BASELINE_DANGER_SIGNS: [&str; 5] = [
    "Difficulty breathing or shortness of breath",
    "Severe or worsening pain",
    "High fever (>39.5°C or 103°F)",
    "Confusion or altered mental state",
    "Inability to keep fluids down",
];

pub const CHILD_DANGER_SIGNS: [&str; 3] = [
    "High fever in children (>38.5°C or 101.3°F)",
    "Refusing to eat or drink",
    "Unusual sleepiness or irritability",
];

pub const NO_VITALS_MESSAGE: &str = "No vitals provided for analysis";

/// Children under this age get the extra danger signs.
const CHILD_DANGER_SIGNS_BELOW_AGE: u32 = 5;

// ──────────────────────────────────────────────
// Generators
// ──────────────────────────────────────────────

pub fn reassurance(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => {
            "These symptoms appear to be mild and likely self-limiting. Most people recover \
             within a few days with proper rest and home care."
        }
        RiskTier::Moderate => {
            "These symptoms warrant attention but don't appear immediately life-threatening. \
             Monitoring and timely medical consultation are recommended."
        }
        RiskTier::High | RiskTier::Emergency => {
            "These symptoms require prompt medical evaluation to ensure your safety and proper \
             treatment."
        }
    }
}

pub fn assessment_description(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Emergency => "Critical condition requiring immediate emergency care",
        RiskTier::High => "High risk condition - seek medical care within hours",
        RiskTier::Moderate => "Moderate concern - monitor closely and consider medical evaluation",
        RiskTier::Low => "Low risk condition - likely self-limiting, monitor symptoms",
    }
}

/// Up to three unique conditions, in order of first appearance across the
/// keyword table.
pub fn possible_conditions(symptoms: &str) -> Vec<String> {
    let mut conditions: Vec<String> = Vec::with_capacity(MAX_POSSIBILITIES);

    'table: for (keyword, conds) in CONDITION_TABLE {
        if !symptoms.contains(keyword) {
            continue;
        }
        for cond in conds.iter() {
            if conditions.len() == MAX_POSSIBILITIES {
                break 'table;
            }
            if !conditions.iter().any(|c| c == cond) {
                conditions.push((*cond).to_string());
            }
        }
    }

    if conditions.is_empty() {
        return DEFAULT_CONDITIONS.iter().map(|c| c.to_string()).collect();
    }
    conditions
}

/// Baseline steps plus every matching keyword block. Duplicates are kept.
pub fn first_aid(symptoms: &str) -> Vec<String> {
    let mut steps: Vec<String> = BASELINE_FIRST_AID.iter().map(|s| s.to_string()).collect();
    for (keyword, block) in FIRST_AID_TABLE {
        if symptoms.contains(keyword) {
            steps.extend(block.iter().map(|s| s.to_string()));
        }
    }
    steps
}

pub fn danger_signs(age: u32) -> Vec<String> {
    let mut signs: Vec<String> = BASELINE_DANGER_SIGNS.iter().map(|s| s.to_string()).collect();
    if age < CHILD_DANGER_SIGNS_BELOW_AGE {
        signs.extend(CHILD_DANGER_SIGNS.iter().map(|s| s.to_string()));
    }
    signs
}

pub fn vitals_analysis(vitals: &Vitals) -> String {
    if vitals.is_empty() {
        return NO_VITALS_MESSAGE.to_string();
    }

    let mut parts = Vec::with_capacity(2);

    if let Some(temp) = vitals.temperature {
        let label = if temp > 39.0 {
            "High fever - monitor closely"
        } else if temp > 37.5 {
            "Mild fever"
        } else if temp < 36.0 {
            "Low - possible hypothermia"
        } else {
            "Normal range"
        };
        parts.push(format!("Temperature {temp}°C → {label}"));
    }

    if let Some(hr) = vitals.heart_rate {
        let label = if hr > 100.0 {
            "Elevated - possible fever/stress"
        } else if hr < 60.0 {
            "Low - monitor for symptoms"
        } else {
            "Normal range"
        };
        parts.push(format!("Heart rate {hr} bpm → {label}"));
    }

    parts.join("; ")
}

pub fn summary(tier: RiskTier) -> String {
    format!(
        "Based on the symptoms provided, this appears to be a {tier} risk situation. {}.",
        assessment_description(tier)
    )
}

pub fn next_action(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Emergency => "Call emergency services immediately (911/999)",
        RiskTier::High => "Contact healthcare provider within 2-4 hours or visit urgent care",
        RiskTier::Moderate => "Schedule appointment with doctor within 24-48 hours",
        RiskTier::Low => "Continue home care and contact doctor if symptoms worsen",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reassurance_groups_high_and_emergency() {
        assert_eq!(reassurance(RiskTier::High), reassurance(RiskTier::Emergency));
        assert_ne!(reassurance(RiskTier::Low), reassurance(RiskTier::Moderate));
        assert_ne!(reassurance(RiskTier::Moderate), reassurance(RiskTier::High));
    }

    #[test]
    fn each_tier_has_its_own_description() {
        let mut seen: Vec<&str> = RiskTier::ALL.iter().map(|t| assessment_description(*t)).collect();
        seen.dedup();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn conditions_keep_first_appearance_order() {
        let conds = possible_conditions("fever and cough");
        assert_eq!(conds, vec!["Viral infection", "Bacterial infection", "Flu"]);
    }

    #[test]
    fn conditions_are_unique_across_keywords() {
        // "stomach" then "nausea" share Gastroenteritis and Food poisoning.
        let conds = possible_conditions("nausea and stomach upset");
        assert_eq!(conds, vec!["Gastroenteritis", "Food poisoning", "Stomach flu"]);

        // "chest" and "pain" share Muscle strain.
        let conds = possible_conditions("chest pain");
        assert_eq!(conds, vec!["Muscle strain", "Anxiety", "Heartburn"]);
    }

    #[test]
    fn conditions_are_capped_at_three() {
        let conds = possible_conditions("headache, cough, fever, stress, anxiety");
        assert_eq!(conds.len(), 3);
    }

    #[test]
    fn conditions_default_when_nothing_matches() {
        assert_eq!(
            possible_conditions("tired"),
            vec!["Viral illness", "General fatigue", "Stress-related symptoms"]
        );
    }

    #[test]
    fn substring_matching_is_broad() {
        // "painful" contains "pain".
        assert_eq!(possible_conditions("painful knee")[0], "Muscle strain");
    }

    #[test]
    fn first_aid_baseline_only() {
        assert_eq!(first_aid("mild headache for two days"), BASELINE_FIRST_AID.to_vec());
    }

    #[test]
    fn first_aid_blocks_follow_table_order() {
        // Text mentions stress before fever; blocks still come fever first.
        let steps = first_aid("stress and fever");
        assert_eq!(steps.len(), 3 + 2 + 3);
        assert_eq!(steps[3], "Use cool compresses or lukewarm bath");
        assert_eq!(steps[5], "Practice stress-reduction techniques");
    }

    #[test]
    fn first_aid_keeps_all_matching_blocks() {
        let steps = first_aid("fever, pain, cough, anxiety, depression, stress");
        assert_eq!(steps.len(), 3 + 2 + 2 + 2 + 3 + 3 + 3);
    }

    #[test]
    fn danger_signs_add_child_block_under_five() {
        assert_eq!(danger_signs(30).len(), 5);
        assert_eq!(danger_signs(5).len(), 5);
        let child = danger_signs(3);
        assert_eq!(child.len(), 8);
        assert_eq!(child[5], "High fever in children (>38.5°C or 101.3°F)");
    }

    #[test]
    fn vitals_without_readings() {
        assert_eq!(vitals_analysis(&Vitals::default()), NO_VITALS_MESSAGE);
    }

    #[test]
    fn vitals_buckets() {
        let text = vitals_analysis(&Vitals {
            temperature: Some(40.1),
            heart_rate: Some(95.0),
        });
        assert_eq!(
            text,
            "Temperature 40.1°C → High fever - monitor closely; Heart rate 95 bpm → Normal range"
        );

        let text = vitals_analysis(&Vitals {
            temperature: Some(38.2),
            heart_rate: Some(110.0),
        });
        assert!(text.contains("Mild fever"));
        assert!(text.contains("Elevated"));

        let text = vitals_analysis(&Vitals {
            temperature: Some(35.5),
            heart_rate: Some(55.0),
        });
        assert!(text.contains("possible hypothermia"));
        assert!(text.contains("Low - monitor for symptoms"));

        let text = vitals_analysis(&Vitals {
            temperature: Some(36.8),
            heart_rate: None,
        });
        assert_eq!(text, "Temperature 36.8°C → Normal range");
    }

    #[test]
    fn vitals_boundaries_use_strict_comparisons() {
        let temp = |t: f64| {
            vitals_analysis(&Vitals {
                temperature: Some(t),
                heart_rate: None,
            })
        };
        assert_eq!(temp(39.0), "Temperature 39°C → Mild fever");
        assert_eq!(temp(37.5), "Temperature 37.5°C → Normal range");
        assert_eq!(temp(36.0), "Temperature 36°C → Normal range");

        let hr = |h: f64| {
            vitals_analysis(&Vitals {
                temperature: None,
                heart_rate: Some(h),
            })
        };
        assert_eq!(hr(100.0), "Heart rate 100 bpm → Normal range");
        assert_eq!(hr(60.0), "Heart rate 60 bpm → Normal range");
    }

    #[test]
    fn summary_embeds_tier_and_description() {
        let s = summary(RiskTier::Moderate);
        assert!(s.contains("moderate risk situation"));
        assert!(s.ends_with("consider medical evaluation."));
    }

    #[test]
    fn next_action_per_tier() {
        let mut actions: Vec<&str> = RiskTier::ALL.iter().map(|t| next_action(*t)).collect();
        actions.dedup();
        assert_eq!(actions.len(), 4);
    }
}
