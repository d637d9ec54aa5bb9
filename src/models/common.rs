use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub status: String,
    pub image_url: String,
    pub qr_code_base64: String,
}

impl From<GenerationOutcome> for GenerateResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            status: "success".to_string(),
            image_url: outcome.image_url,
            qr_code_base64: outcome.qr_code_base64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub image_url: String,
    pub qr_code_base64: String,
}
