use serde::{Deserialize, Serialize};

use crate::models::RiskTier;

/// Canonical 7-level triage report.
///
/// Field names on the wire are the `level_N_*` keys the remote model is asked
/// to produce, so a validated remote answer and a locally assembled report
/// share one shape. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageReport {
    #[serde(rename = "level_1_reassurance")]
    pub reassurance: String,
    #[serde(rename = "level_2_assessment")]
    pub assessment: Assessment,
    /// At most 3 unique condition names.
    #[serde(rename = "level_3_possibilities")]
    pub possibilities: Vec<String>,
    #[serde(rename = "level_4_first_aid")]
    pub first_aid: Vec<String>,
    #[serde(rename = "level_5_danger_signs")]
    pub danger_signs: Vec<String>,
    #[serde(rename = "level_6_vitals_analysis")]
    pub vitals_analysis: String,
    #[serde(rename = "level_7_summary")]
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub severity: RiskTier,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub summary: String,
    pub next_action: String,
}

/// Maximum number of entries in `TriageReport::possibilities`.
pub const MAX_POSSIBILITIES: usize = 3;

/// Which path produced a report. Used for logging only; never exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    /// Remote model answer that passed validation.
    Remote,
    /// Remote model answered but the answer was unusable.
    RemoteFallback,
    /// Local rule-based engine.
    Local,
}

impl std::fmt::Display for ReportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::RemoteFallback => write!(f, "remote_fallback"),
            Self::Local => write!(f, "local"),
        }
    }
}
