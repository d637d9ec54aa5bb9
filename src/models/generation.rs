pub const DEFAULT_ATTACHMENT_MIME: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

impl ImageAttachment {
    pub fn new(data: Vec<u8>, mime_type: Option<String>) -> Self {
        Self { data, mime_type }
    }

    pub fn mime_type_or_default(&self) -> &str {
        self.mime_type
            .as_deref()
            .map(str::trim)
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_ATTACHMENT_MIME)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub primary_image: Option<ImageAttachment>,
    pub reference_image: Option<ImageAttachment>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            primary_image: None,
            reference_image: None,
        }
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.primary_image = Some(image);
        self
    }

    pub fn with_reference_image(mut self, image: ImageAttachment) -> Self {
        self.reference_image = Some(image);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    Binary { data: Vec<u8>, mime_type: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePart {
    InlineData { data: Vec<u8>, mime_type: String },
    Text(String),
    Other,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    pub candidates: Vec<Candidate>,
    pub fallback_text: Option<String>,
}

impl GenerationResponse {
    pub fn with_image(data: Vec<u8>, mime_type: &str) -> Self {
        Self {
            candidates: vec![Candidate {
                parts: vec![ResponsePart::InlineData {
                    data,
                    mime_type: mime_type.to_string(),
                }],
            }],
            fallback_text: None,
        }
    }
}
