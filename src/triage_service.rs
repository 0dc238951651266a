//! Triage service: single entry point for symptom and image analysis.
//!
//! Owns the optional remote collaborators. The text path always produces a
//! report: a configured model is tried once, and anything short of an answer
//! drops to the local rule-based engine. The image path needs the vision
//! collaborator and reports its failures in the response body instead of
//! raising.

use std::sync::Arc;

use serde::Serialize;

use crate::config::AppConfig;
use crate::models::PatientInput;
use crate::pipeline::image::{preprocess_image, ImageError, ImageInfo};
use crate::pipeline::remote::{
    build_triage_prompt, ChatCompletionsClient, GeminiVisionClient, LlmClient, VisionClient,
    DEFAULT_IMAGE_PROMPT,
};
use crate::pipeline::triage::classify::detect_emergency_phrases;
use crate::pipeline::triage::{
    assemble, fallback_report, shape, symptom_text, normalize, ApiResponse, ReportSource,
    TriageReport,
};

/// Shown to the client when the vision collaborator fails.
pub const IMAGE_FALLBACK_ANALYSIS: &str = "Please describe visible symptoms manually.";

/// Name reported for the rule-based engine in health output.
pub const LOCAL_ENGINE_NAME: &str = "local-rules";

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Outcome of one image analysis. Absent fields are omitted from JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageAnalysis {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_info: Option<ImageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_analysis: Option<String>,
}

/// Errors that stop an image analysis before the collaborator is called.
#[derive(Debug, thiserror::Error)]
pub enum ImageAnalysisError {
    #[error("Image analysis service not available")]
    VisionUnavailable,
    #[error(transparent)]
    Image(#[from] ImageError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollaboratorStatus {
    pub available: bool,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicesHealth {
    pub ai_service: CollaboratorStatus,
    pub image_service: CollaboratorStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
    pub message: String,
    pub version: &'static str,
    pub services: ServicesHealth,
}

// ═══════════════════════════════════════════════════════════
// TriageService
// ═══════════════════════════════════════════════════════════

pub struct TriageService {
    llm: Option<Arc<dyn LlmClient>>,
    vision: Option<Arc<dyn VisionClient>>,
}

impl TriageService {
    pub fn new(llm: Option<Arc<dyn LlmClient>>, vision: Option<Arc<dyn VisionClient>>) -> Self {
        Self { llm, vision }
    }

    /// Rule-based engine only, no image analysis.
    pub fn local_only() -> Self {
        Self::new(None, None)
    }

    /// Build collaborators from configuration. A collaborator that cannot be
    /// constructed is left out and the service degrades instead of failing.
    pub fn from_config(config: &AppConfig) -> Self {
        let llm: Option<Arc<dyn LlmClient>> = config.llm.as_ref().and_then(|cfg| {
            match ChatCompletionsClient::new(cfg) {
                Ok(client) => {
                    tracing::info!(model = %cfg.model, base_url = %cfg.base_url, "Remote triage model configured");
                    Some(Arc::new(client) as Arc<dyn LlmClient>)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Remote triage model unavailable, using local engine");
                    None
                }
            }
        });
        if config.llm.is_none() {
            tracing::info!("No remote triage model configured, using local engine");
        }

        let vision: Option<Arc<dyn VisionClient>> = config.vision.as_ref().and_then(|cfg| {
            match GeminiVisionClient::new(cfg) {
                Ok(client) => {
                    tracing::info!(model = %cfg.model, "Image analysis configured");
                    Some(Arc::new(client) as Arc<dyn VisionClient>)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Image analysis unavailable");
                    None
                }
            }
        });
        if config.vision.is_none() {
            tracing::info!("No image analysis configured");
        }

        Self::new(llm, vision)
    }

    pub fn has_vision(&self) -> bool {
        self.vision.is_some()
    }

    /// Analyze one patient. Always returns a complete response.
    pub fn analyze(&self, input: &PatientInput) -> ApiResponse {
        let start = std::time::Instant::now();
        let (report, source) = self.report(input);

        tracing::info!(
            source = %source,
            risk_level = %report.assessment.severity,
            emergency_phrases = detect_emergency_phrases(&symptom_text(input)).len(),
            symptoms_len = input.symptoms.len(),
            image_findings = input.image_findings().is_some(),
            elapsed_ms = %start.elapsed().as_millis(),
            "Triage complete"
        );

        shape(report, input.image_findings.as_deref())
    }

    /// Produce the internal report and record which path produced it.
    pub fn report(&self, input: &PatientInput) -> (TriageReport, ReportSource) {
        let Some(llm) = &self.llm else {
            return (assemble(input), ReportSource::Local);
        };

        let prompt = build_triage_prompt(input);
        match llm.complete(&prompt) {
            Ok(text) => {
                let report = normalize(&text);
                let source = if report == fallback_report() {
                    ReportSource::RemoteFallback
                } else {
                    ReportSource::Remote
                };
                (report, source)
            }
            Err(e) => {
                tracing::warn!(model = %llm.model(), error = %e, "Remote triage failed, using local engine");
                (assemble(input), ReportSource::Local)
            }
        }
    }

    /// Describe an uploaded image. Collaborator failures are reported in the
    /// returned value; only a missing collaborator or an undecodable image
    /// is an error.
    pub fn analyze_image(
        &self,
        bytes: &[u8],
        prompt: Option<&str>,
    ) -> Result<ImageAnalysis, ImageAnalysisError> {
        let vision = self
            .vision
            .as_ref()
            .ok_or(ImageAnalysisError::VisionUnavailable)?;

        let processed = preprocess_image(bytes)?;
        let prompt = prompt
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_IMAGE_PROMPT);

        match vision.describe(&processed.jpeg, prompt) {
            Ok(analysis) => {
                tracing::info!(
                    model = %vision.model(),
                    width = processed.width,
                    height = processed.height,
                    file_size_kb = processed.file_size_kb,
                    "Image analyzed"
                );
                Ok(ImageAnalysis {
                    success: true,
                    analysis: Some(analysis),
                    model: Some(vision.model().to_string()),
                    image_info: Some(processed.info()),
                    error: None,
                    fallback_analysis: None,
                })
            }
            Err(e) => {
                tracing::warn!(model = %vision.model(), error = %e, "Image analysis failed");
                Ok(ImageAnalysis {
                    success: false,
                    analysis: None,
                    model: None,
                    image_info: None,
                    error: Some(format!("Image analysis error: {e}")),
                    fallback_analysis: Some(IMAGE_FALLBACK_ANALYSIS.to_string()),
                })
            }
        }
    }

    /// Collaborator availability. The local engine keeps triage available
    /// even without a remote model, so the overall status is always healthy.
    pub fn health(&self) -> ServiceHealth {
        let ai_model = self
            .llm
            .as_ref()
            .map(|c| c.model().to_string())
            .unwrap_or_else(|| LOCAL_ENGINE_NAME.to_string());
        let image_model = self.vision.as_ref().map(|c| c.model().to_string());

        let message = if image_model.is_some() {
            "Primary AI service ready with image analysis"
        } else {
            "Primary AI service ready (image analysis unavailable)"
        };

        ServiceHealth {
            status: "healthy",
            message: message.to_string(),
            version: crate::config::APP_VERSION,
            services: ServicesHealth {
                ai_service: CollaboratorStatus {
                    available: true,
                    model: Some(ai_model),
                },
                image_service: CollaboratorStatus {
                    available: image_model.is_some(),
                    model: image_model,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskTier, Sex, Vitals};
    use crate::pipeline::remote::{MockLlmClient, MockVisionClient};
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;

    const REMOTE_JSON: &str = r#"Here is the assessment:
{
  "level_1_reassurance": "This is likely manageable at home.",
  "level_2_assessment": {"severity": "mild", "description": "Mild cold symptoms"},
  "level_3_possibilities": ["Common cold", "Allergic rhinitis"],
  "level_4_first_aid": ["Rest", "Fluids"],
  "level_5_danger_signs": ["High fever"],
  "level_6_vitals_analysis": "Normal",
  "level_7_summary": {"summary": "Mild illness", "next_action": "Rest at home"}
}"#;

    fn patient(symptoms: &str) -> PatientInput {
        PatientInput {
            age: 30,
            sex: Sex::Female,
            symptoms: symptoms.into(),
            duration: "1 day".into(),
            vitals: Vitals::default(),
            image_findings: None,
        }
    }

    fn png() -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255u8, 0, 0])))
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn without_remote_uses_local_engine() {
        let service = TriageService::local_only();
        let (report, source) = service.report(&patient("crushing chest pain"));
        assert_eq!(source, ReportSource::Local);
        assert_eq!(report.assessment.severity, RiskTier::Emergency);
    }

    #[test]
    fn remote_answer_is_normalized() {
        let llm = Arc::new(MockLlmClient::new(REMOTE_JSON));
        let service = TriageService::new(Some(llm.clone()), None);
        let (report, source) = service.report(&patient("runny nose"));
        assert_eq!(source, ReportSource::Remote);
        assert_eq!(report.assessment.severity, RiskTier::Low);
        assert_eq!(report.possibilities, vec!["Common cold", "Allergic rhinitis"]);
        assert_eq!(llm.calls(), 1);
    }

    #[test]
    fn unusable_remote_answer_yields_fallback_report() {
        let llm = Arc::new(MockLlmClient::new("I cannot help with that."));
        let service = TriageService::new(Some(llm), None);
        let (report, source) = service.report(&patient("crushing chest pain"));
        assert_eq!(source, ReportSource::RemoteFallback);
        assert_eq!(report, fallback_report());
    }

    #[test]
    fn remote_failure_falls_back_to_local_engine() {
        let llm = Arc::new(MockLlmClient::failing());
        let service = TriageService::new(Some(llm.clone()), None);
        let (report, source) = service.report(&patient("crushing chest pain"));
        assert_eq!(source, ReportSource::Local);
        assert_eq!(report.assessment.severity, RiskTier::Emergency);
        assert_eq!(llm.calls(), 1);
    }

    #[test]
    fn analyze_echoes_image_findings() {
        let service = TriageService::local_only();
        let mut input = patient("itchy skin");
        input.image_findings = Some("Red circular rash".into());
        let response = service.analyze(&input);
        assert_eq!(response.image_analysis_included, Some(true));
        assert_eq!(response.image_findings.as_deref(), Some("Red circular rash"));
    }

    #[test]
    fn padded_image_findings_are_echoed_unchanged() {
        let service = TriageService::local_only();
        let mut input = patient("itchy skin");
        input.image_findings = Some("  Red circular rash\n".into());
        let response = service.analyze(&input);
        assert_eq!(response.image_findings.as_deref(), Some("  Red circular rash\n"));
    }

    #[test]
    fn image_analysis_requires_vision() {
        let service = TriageService::local_only();
        assert!(matches!(
            service.analyze_image(&png(), None),
            Err(ImageAnalysisError::VisionUnavailable)
        ));
    }

    #[test]
    fn image_analysis_success_reports_info() {
        let vision = Arc::new(MockVisionClient::new("Small red rash"));
        let service = TriageService::new(None, Some(vision.clone()));
        let result = service.analyze_image(&png(), Some("  ")).unwrap();
        assert!(result.success);
        assert_eq!(result.analysis.as_deref(), Some("Small red rash"));
        assert_eq!(result.model.as_deref(), Some("mock-vision"));
        let info = result.image_info.unwrap();
        assert_eq!(info.format, "JPEG");
        assert_eq!(info.size, "8x8");
        assert_eq!(vision.calls(), 1);
    }

    #[test]
    fn image_analysis_failure_is_reported_not_raised() {
        let vision = Arc::new(MockVisionClient::failing_with_status(500));
        let service = TriageService::new(None, Some(vision));
        let result = service.analyze_image(&png(), None).unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("500"));
        assert_eq!(result.fallback_analysis.as_deref(), Some(IMAGE_FALLBACK_ANALYSIS));

        let json = serde_json::to_value(ImageAnalysis {
            success: false,
            analysis: None,
            model: None,
            image_info: None,
            error: Some("x".into()),
            fallback_analysis: None,
        })
        .unwrap();
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn undecodable_image_is_an_error() {
        let vision = Arc::new(MockVisionClient::new("unused"));
        let service = TriageService::new(None, Some(vision.clone()));
        assert!(matches!(
            service.analyze_image(b"not an image", None),
            Err(ImageAnalysisError::Image(ImageError::Decode(_)))
        ));
        assert_eq!(vision.calls(), 0);
    }

    #[test]
    fn health_reports_collaborators() {
        let local = TriageService::local_only().health();
        assert_eq!(local.status, "healthy");
        assert!(local.services.ai_service.available);
        assert_eq!(local.services.ai_service.model.as_deref(), Some(LOCAL_ENGINE_NAME));
        assert!(!local.services.image_service.available);
        assert!(local.message.contains("image analysis unavailable"));

        let full = TriageService::new(
            Some(Arc::new(MockLlmClient::new("{}"))),
            Some(Arc::new(MockVisionClient::new("ok"))),
        )
        .health();
        assert_eq!(full.services.ai_service.model.as_deref(), Some("mock-llm"));
        assert_eq!(full.services.image_service.model.as_deref(), Some("mock-vision"));
        assert!(full.message.ends_with("with image analysis"));
    }
}
