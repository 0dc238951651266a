//! Symptom triage engine.
//!
//! `assemble` builds a report locally from rules; `normalize` coerces a remote
//! model's answer into the same report; `shape` projects either into the
//! external response.

pub mod assembler;
pub mod classify;
pub mod content;
pub mod normalize;
pub mod shape;
pub mod types;

pub use assembler::{assemble, symptom_text};
pub use classify::classify;
pub use normalize::{fallback_report, normalize, try_normalize, NormalizeError};
pub use shape::{shape, ApiResponse, TimelineRecommendations};
pub use types::{Assessment, ReportSource, ReportSummary, TriageReport};
