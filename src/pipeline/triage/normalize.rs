//! Remote-response normalizer.
//!
//! Turns free text from a remote model into a `TriageReport`. Candidates are
//! tried from strictest to most permissive: the whole text, a ```json fenced
//! block, the first balanced `{...}` span, then the widest `{...}` span. The
//! first candidate that validates wins. `normalize` never fails: anything
//! unusable becomes the fixed fallback report.

use serde::Deserialize;
use thiserror::Error;

use crate::models::RiskTier;

use super::types::{Assessment, ReportSummary, TriageReport, MAX_POSSIBILITIES};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("No JSON object found in response")]
    NoObject,

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Response does not match report schema: {0}")]
    Schema(String),

    #[error("Unrecognized severity: '{0}'")]
    Severity(String),

    #[error("Field '{0}' is empty")]
    EmptyField(&'static str),
}

/// Normalize remote model output, falling back to `fallback_report()`.
pub fn normalize(raw_text: &str) -> TriageReport {
    match try_normalize(raw_text) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(error = %e, response_len = raw_text.len(), "Remote triage response rejected, using fallback report");
            fallback_report()
        }
    }
}

/// Normalize remote model output, reporting why it was rejected.
pub fn try_normalize(raw_text: &str) -> Result<TriageReport, NormalizeError> {
    let trimmed = raw_text.trim();
    if !trimmed.contains('{') {
        return Err(NormalizeError::NoObject);
    }

    let mut last_err = NormalizeError::NoObject;
    for candidate in candidates(trimmed) {
        match parse_candidate(candidate) {
            Ok(report) => return Ok(report),
            Err(e) => last_err = e,
        }
    }
    Err(last_err)
}

/// Fixed report used whenever a remote answer cannot be validated.
pub fn fallback_report() -> TriageReport {
    TriageReport {
        reassurance: "Unable to provide detailed analysis. Please consult a healthcare professional."
            .to_string(),
        assessment: Assessment {
            severity: RiskTier::Moderate,
            description: "Unable to assess - requires professional evaluation".to_string(),
        },
        possibilities: vec!["Requires medical assessment".to_string()],
        first_aid: vec![
            "Monitor symptoms".to_string(),
            "Stay hydrated".to_string(),
            "Rest".to_string(),
        ],
        danger_signs: vec![
            "Severe worsening".to_string(),
            "Difficulty breathing".to_string(),
            "Loss of consciousness".to_string(),
        ],
        vitals_analysis: "Unable to analyze vitals without complete information".to_string(),
        summary: ReportSummary {
            summary: "Analysis incomplete - seek medical advice".to_string(),
            next_action: "Contact healthcare provider for proper assessment".to_string(),
        },
    }
}

// ──────────────────────────────────────────────
// Candidate extraction
// ──────────────────────────────────────────────

fn candidates(text: &str) -> Vec<&str> {
    let mut out = vec![text];

    if let Some(block) = fenced_json_block(text) {
        out.push(block);
    }
    if let Some(span) = first_balanced_object(text) {
        out.push(span);
    }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            out.push(&text[start..=end]);
        }
    }

    out.dedup();
    out
}

/// Contents of the first ```json ... ``` fence.
fn fenced_json_block(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let end = text[start..].find("```")?;
    Some(text[start..start + end].trim())
}

/// First `{...}` span whose braces balance, ignoring braces inside strings.
/// `None` when the object is truncated.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

// ──────────────────────────────────────────────
// Validation
// ──────────────────────────────────────────────

#[derive(Deserialize)]
struct RawReport {
    level_1_reassurance: String,
    level_2_assessment: RawAssessment,
    level_3_possibilities: Vec<String>,
    level_4_first_aid: Vec<String>,
    level_5_danger_signs: Vec<String>,
    level_6_vitals_analysis: String,
    level_7_summary: RawSummary,
}

#[derive(Deserialize)]
struct RawAssessment {
    severity: String,
    description: String,
}

#[derive(Deserialize)]
struct RawSummary {
    summary: String,
    next_action: String,
}

fn parse_candidate(candidate: &str) -> Result<TriageReport, NormalizeError> {
    let value: serde_json::Value = serde_json::from_str(candidate)
        .map_err(|e| NormalizeError::JsonParsing(e.to_string()))?;
    if !value.is_object() {
        return Err(NormalizeError::Schema("top-level value is not an object".into()));
    }
    let raw: RawReport =
        serde_json::from_value(value).map_err(|e| NormalizeError::Schema(e.to_string()))?;
    validate(raw)
}

fn validate(raw: RawReport) -> Result<TriageReport, NormalizeError> {
    let severity = RiskTier::from_remote_label(&raw.level_2_assessment.severity)
        .ok_or_else(|| NormalizeError::Severity(raw.level_2_assessment.severity.clone()))?;

    let mut possibilities = Vec::with_capacity(MAX_POSSIBILITIES);
    for item in clean_list(raw.level_3_possibilities) {
        if possibilities.len() == MAX_POSSIBILITIES {
            break;
        }
        if !possibilities.contains(&item) {
            possibilities.push(item);
        }
    }

    Ok(TriageReport {
        reassurance: required_text("level_1_reassurance", raw.level_1_reassurance)?,
        assessment: Assessment {
            severity,
            description: required_text("level_2_assessment.description", raw.level_2_assessment.description)?,
        },
        possibilities: required_list("level_3_possibilities", possibilities)?,
        first_aid: required_list("level_4_first_aid", clean_list(raw.level_4_first_aid))?,
        danger_signs: required_list("level_5_danger_signs", clean_list(raw.level_5_danger_signs))?,
        vitals_analysis: required_text("level_6_vitals_analysis", raw.level_6_vitals_analysis)?,
        summary: ReportSummary {
            summary: required_text("level_7_summary.summary", raw.level_7_summary.summary)?,
            next_action: required_text("level_7_summary.next_action", raw.level_7_summary.next_action)?,
        },
    })
}

fn required_text(field: &'static str, value: String) -> Result<String, NormalizeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NormalizeError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

fn required_list(field: &'static str, items: Vec<String>) -> Result<Vec<String>, NormalizeError> {
    if items.is_empty() {
        return Err(NormalizeError::EmptyField(field));
    }
    Ok(items)
}

/// Trim entries and drop blank ones.
fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
