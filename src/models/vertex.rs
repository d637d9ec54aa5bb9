use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::{
    error::{PipelineError, Result},
    models::{Candidate, ContentPart, GenerationResponse, ResponsePart},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCandidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

impl From<&ContentPart> for Part {
    fn from(part: &ContentPart) -> Self {
        match part {
            ContentPart::Text(text) => Part {
                text: Some(text.clone()),
                ..Default::default()
            },
            ContentPart::Binary { data, mime_type } => Part {
                inline_data: Some(Blob {
                    mime_type: mime_type.clone(),
                    data: STANDARD.encode(data),
                }),
                ..Default::default()
            },
        }
    }
}

impl GenerateContentRequest {
    pub fn new(parts: &[ContentPart], aspect_ratio: &str, search_grounding: bool) -> Self {
        let tools = if search_grounding {
            vec![Tool {
                google_search: Some(GoogleSearch {}),
            }]
        } else {
            Vec::new()
        };

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: parts.iter().map(Part::from).collect(),
            }],
            tools,
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                image_config: Some(ImageConfig {
                    aspect_ratio: aspect_ratio.to_string(),
                }),
            },
        }
    }
}

impl GenerateContentResponse {
    fn fallback_text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|part| part.thought != Some(true))
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        if !text.is_empty() {
            return Some(text);
        }

        self.prompt_feedback.as_ref().and_then(|feedback| {
            match (&feedback.block_reason, &feedback.block_reason_message) {
                (_, Some(message)) => Some(message.clone()),
                (Some(reason), None) => Some(format!("Prompt blocked: {}", reason)),
                (None, None) => None,
            }
        })
    }
}

impl TryFrom<GenerateContentResponse> for GenerationResponse {
    type Error = PipelineError;

    fn try_from(wire: GenerateContentResponse) -> Result<Self> {
        let fallback_text = wire.fallback_text();

        let candidates = wire
            .candidates
            .into_iter()
            .map(|candidate| {
                let parts = candidate
                    .content
                    .map(|content| content.parts)
                    .unwrap_or_default()
                    .into_iter()
                    .map(ResponsePart::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Candidate { parts })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GenerationResponse {
            candidates,
            fallback_text,
        })
    }
}

impl TryFrom<Part> for ResponsePart {
    type Error = PipelineError;

    fn try_from(part: Part) -> Result<Self> {
        if let Some(blob) = part.inline_data {
            let data = STANDARD.decode(blob.data.as_bytes()).map_err(|e| {
                PipelineError::GenerationFailed(format!("Invalid inline image data: {}", e))
            })?;
            return Ok(ResponsePart::InlineData {
                data,
                mime_type: blob.mime_type,
            });
        }

        match part.text {
            Some(text) => Ok(ResponsePart::Text(text)),
            None => Ok(ResponsePart::Other),
        }
    }
}
