//! Shared types for the HTTP layer.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;

use super::error::ApiError;
use crate::models::{PatientInput, Sex, Vitals};
use crate::triage_service::TriageService;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub service: Arc<TriageService>,
    pub started_at: Instant,
}

impl ApiContext {
    pub fn new(service: Arc<TriageService>) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Request bodies
// ═══════════════════════════════════════════════════════════

/// Body of `POST /api/analyze`. Every field is optional on the wire so a
/// missing one is reported by name rather than as a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub symptoms: Option<String>,
    pub duration: Option<String>,
    #[serde(default)]
    pub vitals: Option<VitalsBody>,
    #[serde(default)]
    pub image_analysis: Option<String>,
}

/// Vitals as sent by the frontend; either reading may be `null`.
#[derive(Debug, Default, Deserialize)]
pub struct VitalsBody {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub heart_rate: Option<f64>,
}

impl AnalyzeRequest {
    /// Check required fields in order and build the domain input.
    pub fn into_input(self) -> Result<PatientInput, ApiError> {
        let age = self.age.ok_or_else(|| missing("age"))?;
        let sex = self.sex.ok_or_else(|| missing("sex"))?;
        let symptoms = self.symptoms.ok_or_else(|| missing("symptoms"))?;
        let duration = self.duration.ok_or_else(|| missing("duration"))?;

        let vitals = self
            .vitals
            .map(|v| Vitals {
                temperature: v.temperature,
                heart_rate: v.heart_rate,
            })
            .unwrap_or_default();

        Ok(PatientInput {
            age,
            sex: Sex::from_request(&sex),
            symptoms,
            duration,
            vitals,
            image_findings: self.image_analysis,
        })
    }
}

fn missing(field: &str) -> ApiError {
    ApiError::BadRequest(format!("Missing required field: {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AnalyzeRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn complete_request_builds_input() {
        let input = parse(
            r#"{"age": 70, "sex": "Male", "symptoms": "cough", "duration": "3 days",
                "vitals": {"temperature": 38.2, "heart_rate": null},
                "image_analysis": "no visible findings"}"#,
        )
        .into_input()
        .unwrap();
        assert_eq!(input.age, 70);
        assert_eq!(input.sex, Sex::Male);
        assert_eq!(input.vitals.temperature, Some(38.2));
        assert_eq!(input.vitals.heart_rate, None);
        assert_eq!(input.image_findings(), Some("no visible findings"));
    }

    #[test]
    fn missing_fields_are_reported_in_order() {
        let err = parse(r#"{"symptoms": "cough"}"#).into_input().unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: Missing required field: age");

        let err = parse(r#"{"age": 30, "sex": "female", "symptoms": "cough"}"#)
            .into_input()
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: Missing required field: duration");
    }

    #[test]
    fn absent_vitals_default_to_empty() {
        let input = parse(r#"{"age": 30, "sex": "", "symptoms": "", "duration": ""}"#)
            .into_input()
            .unwrap();
        assert!(input.vitals.is_empty());
        assert_eq!(input.sex, Sex::Unknown);
        assert_eq!(input.image_findings(), None);
    }
}
