// src/services/crop_analyzer.rs
use crate::config::Config;
use crate::errors::{AnalyzerError, ReplyError};
use crate::models::Diagnosis;
use crate::services::{normalizer, response_parser};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use log::{debug, error, info, warn};
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const MODEL: &str = "openai/gpt-4o-mini";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const TEMPERATURE: f64 = 0.1;
pub const MAX_TOKENS: u32 = 300;

const CLIENT_REFERER: &str = "http://localhost:3000";
const CLIENT_TITLE: &str = "AI Crop Disease Analyzer";

const SYSTEM_PROMPT: &str = r#"You are an agricultural plant pathologist who diagnoses crop diseases from photographs.

Examine the crop image and report your assessment using exactly this tag structure:

<analysis>
    <disease_type>disease_name_or_healthy</disease_type>
    <severity_level>1-10</severity_level>
    <affected_area_percentage>0-100</affected_area_percentage>
    <crop_type>crop_name</crop_type>
</analysis>

Field rules:

1. disease_type: the specific disease name (for example "Late Blight", "Powdery Mildew", "Rust",
   "Bacterial Spot", "Mosaic Virus"), or "Healthy" when no disease is visible.

2. severity_level: an integer from 1 to 10.
   - 1-2: very mild, minimal impact
   - 3-4: mild, early stage
   - 5-6: moderate, visible damage
   - 7-8: severe, significant damage
   - 9-10: critical damage
   Use 1 for a healthy plant.

3. affected_area_percentage: the share of the visible plant area showing symptoms, from 0 to 100.
   Use 0 for a healthy plant.

4. crop_type: the crop species (for example "Tomato", "Wheat", "Corn", "Potato", "Rice", "Soybean", "Apple").

Look for leaf spots, discoloration, wilting, fungal growth or mold, deformed growth, and tell insect
damage apart from disease symptoms.

Reply with the tag structure only, without any other text."#;

/// Anything that can turn an uploaded crop image into a [`Diagnosis`].
#[async_trait]
pub trait DiagnosisProvider: Send + Sync {
    async fn analyze(&self, image_data: &[u8], filename: &str) -> Result<Diagnosis, AnalyzerError>;
}

/// Diagnoses crop images through an OpenAI-compatible chat completions API
/// (OpenRouter by default).
pub struct CropAnalyzer {
    config: Arc<Config>,
    client: Client,
    timeout: Duration,
}

impl CropAnalyzer {
    pub fn new(config: Arc<Config>) -> Result<Self, AnalyzerError> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(config: Arc<Config>, timeout: Duration) -> Result<Self, AnalyzerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalyzerError::Configuration(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            config,
            client,
            timeout,
        })
    }

    pub fn build_request_body(image_data: &[u8], filename: &str) -> Value {
        let base64_image = general_purpose::STANDARD.encode(image_data);
        let user_prompt = format!(
            "Please analyze this crop image for disease detection. Filename: {}",
            filename
        );

        json!({
            "model": MODEL,
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": user_prompt
                        },
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:image/jpeg;base64,{}", base64_image)
                            }
                        }
                    ]
                }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS
        })
    }

    /// Turns a received 2xx reply body into a diagnosis.
    pub fn diagnose_reply(body: &str) -> Result<Diagnosis, ReplyError> {
        let result: Value = serde_json::from_str(body)?;

        let content = result["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ReplyError::MissingContent)?;

        Ok(normalizer::normalize(response_parser::parse(content.trim())))
    }

    fn diagnose_or_fallback(body: &str, request_id: Uuid) -> Diagnosis {
        match Self::diagnose_reply(body) {
            Ok(diagnosis) => diagnosis,
            Err(e) => {
                warn!("[{}] AI returned an unusable reply ({}): {}", request_id, e, body);
                Diagnosis::fallback()
            }
        }
    }
}

#[async_trait]
impl DiagnosisProvider for CropAnalyzer {
    async fn analyze(&self, image_data: &[u8], filename: &str) -> Result<Diagnosis, AnalyzerError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AnalyzerError::Configuration("OpenRouter API key not configured".to_string())
        })?;

        let request_id = Uuid::new_v4();
        debug!(
            "[{}] Sending {} bytes ({}) to {}",
            request_id,
            image_data.len(),
            filename,
            self.config.api_url
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("HTTP-Referer", CLIENT_REFERER)
            .header("X-Title", CLIENT_TITLE)
            .json(&Self::build_request_body(image_data, filename))
            .send()
            .await
            .map_err(|e| {
                error!("[{}] OpenRouter request failed: {}", request_id, e);
                let detail = if e.is_timeout() {
                    format!("OpenRouter request timed out after {:?}", self.timeout)
                } else {
                    format!("OpenRouter request failed: {}", e)
                };
                AnalyzerError::upstream(e.status().map(|s| s.as_u16()), detail)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "[{}] OpenRouter API HTTP error: {} - {}",
                request_id, status, error_text
            );
            return Err(AnalyzerError::upstream(
                Some(status.as_u16()),
                format!("OpenRouter API error: {}", status.as_u16()),
            ));
        }

        let body = response.text().await.map_err(|e| {
            error!("[{}] Failed to read OpenRouter response: {}", request_id, e);
            AnalyzerError::upstream(
                Some(status.as_u16()),
                format!("Failed to read OpenRouter response: {}", e),
            )
        })?;

        let diagnosis = Self::diagnose_or_fallback(&body, request_id);
        info!(
            "[{}] Diagnosis for {}: {} ({}), severity {}, affected {}%",
            request_id,
            filename,
            diagnosis.disease_type,
            diagnosis.crop_type,
            diagnosis.severity_level,
            diagnosis.affected_area_percentage
        );

        Ok(diagnosis)
    }
}
