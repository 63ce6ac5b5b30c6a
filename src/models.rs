// src/models.rs
use serde::Serialize;

/// Raw field text pulled out of a model reply, before any coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFields {
    pub disease_type: String,
    pub severity_level: String,
    pub affected_area_percentage: String,
    pub crop_type: String,
}

/// Normalized diagnosis. `severity_level` is within 1..=10 and
/// `affected_area_percentage` within 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub disease_type: String,
    pub severity_level: i64,
    pub affected_area_percentage: f64,
    pub crop_type: String,
}

impl Diagnosis {
    pub const FALLBACK_DISEASE: &'static str = "Analysis Failed";

    /// Sentinel returned when a received reply cannot be interpreted.
    pub fn fallback() -> Self {
        Self {
            disease_type: Self::FALLBACK_DISEASE.to_string(),
            severity_level: 1,
            affected_area_percentage: 0.0,
            crop_type: "Unknown".to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.disease_type == Self::FALLBACK_DISEASE
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub diagnosis: Diagnosis,
    pub filename: String,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
    pub openrouter_configured: bool,
    pub max_file_size_mb: u64,
}
