//! Rule-based risk classifier.
//!
//! Checks run in strict precedence order and the first match wins:
//! emergency phrase → severity word → out-of-range vitals → age → duration → low.

use crate::models::{RiskTier, Vitals};

/// Phrases that make a report an emergency regardless of anything else.
pub const EMERGENCY_PHRASES: &[&str] = &[
    "chest pain",
    "heart attack",
    "stroke",
    "difficulty breathing",
    "severe bleeding",
    "unconscious",
    "seizure",
    "allergic reaction",
    "anaphylaxis",
    "poisoning",
    "broken bone",
    "severe burn",
    "choking",
    "drowning",
    "electrocution",
];

/// Intensity words that raise a report to high.
pub const SEVERITY_WORDS: &[&str] = &["severe", "intense", "extreme", "unbearable", "worst"];

/// Words suggesting a long-running complaint.
pub const DURATION_WORDS: &[&str] = &["week", "month"];

pub const TEMP_HIGH_ABOVE_C: f64 = 39.0;
pub const TEMP_HIGH_BELOW_C: f64 = 35.0;
pub const HEART_RATE_HIGH_ABOVE: f64 = 120.0;
pub const HEART_RATE_HIGH_BELOW: f64 = 50.0;
pub const YOUNG_CHILD_BELOW_AGE: u32 = 5;
pub const OLDER_ADULT_ABOVE_AGE: u32 = 65;

/// Classify symptom text, vitals and age into a risk tier.
///
/// Matching is case-insensitive substring matching. Absent vitals never match.
pub fn classify(symptoms: &str, vitals: &Vitals, age: u32) -> RiskTier {
    let text = symptoms.to_lowercase();

    if contains_any(&text, EMERGENCY_PHRASES) {
        return RiskTier::Emergency;
    }

    if contains_any(&text, SEVERITY_WORDS) {
        return RiskTier::High;
    }

    if vitals_out_of_range(vitals) {
        return RiskTier::High;
    }

    if age < YOUNG_CHILD_BELOW_AGE || age > OLDER_ADULT_ABOVE_AGE {
        return RiskTier::Moderate;
    }

    if contains_any(&text, DURATION_WORDS) {
        return RiskTier::Moderate;
    }

    RiskTier::Low
}

/// Emergency phrases present in the text, in table order.
pub fn detect_emergency_phrases(symptoms: &str) -> Vec<&'static str> {
    let text = symptoms.to_lowercase();
    EMERGENCY_PHRASES
        .iter()
        .copied()
        .filter(|phrase| text.contains(phrase))
        .collect()
}

pub(crate) fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn vitals_out_of_range(vitals: &Vitals) -> bool {
    let temp_trip = vitals
        .temperature
        .is_some_and(|t| t > TEMP_HIGH_ABOVE_C || t < TEMP_HIGH_BELOW_C);
    let hr_trip = vitals
        .heart_rate
        .is_some_and(|hr| hr > HEART_RATE_HIGH_ABOVE || hr < HEART_RATE_HIGH_BELOW);
    temp_trip || hr_trip
}
