use serde::{Deserialize, Serialize};

use super::enums::Sex;

/// Vital signs reported with the request. Either reading may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Body temperature in °C.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Heart rate in beats per minute.
    #[serde(default)]
    pub heart_rate: Option<f64>,
}

impl Vitals {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.heart_rate.is_none()
    }
}

/// One patient's triage request, validated at the HTTP boundary.
/// Built once per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    pub age: u32,
    pub sex: Sex,
    pub symptoms: String,
    pub duration: String,
    #[serde(default)]
    pub vitals: Vitals,
    /// Findings text produced by the image-analysis step, if an image was sent.
    #[serde(default)]
    pub image_findings: Option<String>,
}

impl PatientInput {
    /// Image findings with surrounding whitespace removed; `None` when blank.
    pub fn image_findings(&self) -> Option<&str> {
        self.image_findings
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}
