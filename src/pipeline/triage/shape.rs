//! Response shaper: internal `TriageReport` → external `ApiResponse`.

use serde::{Deserialize, Serialize};

use crate::models::RiskTier;

use super::types::TriageReport;

/// Flattened response body returned by `POST /api/analyze`.
///
/// Identical in structure whichever backend produced the report. The two
/// image fields are present only when image findings were part of the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub risk_level: RiskTier,
    pub risk_assessment: String,
    pub possible_conditions: Vec<String>,
    pub first_aid_measures: Vec<String>,
    pub immediate_actions: Vec<String>,
    pub danger_signs: Vec<String>,
    pub vitals_analysis: Vec<String>,
    pub timeline_recommendations: TimelineRecommendations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_analysis_included: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_findings: Option<String>,
}

/// Fixed follow-up guidance, independent of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRecommendations {
    #[serde(rename = "Next 24 hours")]
    pub next_24_hours: Vec<String>,
    #[serde(rename = "Next 48 hours")]
    pub next_48_hours: Vec<String>,
    #[serde(rename = "Next week")]
    pub next_week: Vec<String>,
}

impl Default for TimelineRecommendations {
    fn default() -> Self {
        Self {
            next_24_hours: vec![
                "Monitor symptoms closely".to_string(),
                "Follow recommended first aid measures".to_string(),
            ],
            next_48_hours: vec![
                "Reassess condition".to_string(),
                "Contact healthcare provider if needed".to_string(),
            ],
            next_week: vec![
                "Follow up as recommended".to_string(),
                "Complete any prescribed treatments".to_string(),
            ],
        }
    }
}

/// Project a report into the API shape, echoing image findings verbatim when
/// they are not blank.
pub fn shape(report: TriageReport, echo_image_findings: Option<&str>) -> ApiResponse {
    let findings = echo_image_findings
        .filter(|f| !f.trim().is_empty())
        .map(str::to_string);

    ApiResponse {
        risk_level: report.assessment.severity,
        risk_assessment: report.assessment.description,
        possible_conditions: report.possibilities,
        first_aid_measures: report.first_aid,
        immediate_actions: vec![report.summary.next_action],
        danger_signs: report.danger_signs,
        vitals_analysis: vec![report.vitals_analysis],
        timeline_recommendations: TimelineRecommendations::default(),
        image_analysis_included: findings.as_ref().map(|_| true),
        image_findings: findings,
    }
}
