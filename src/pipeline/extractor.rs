use crate::{
    error::{PipelineError, Result},
    models::{GenerationResponse, ResponsePart},
};

pub const NO_IMAGE_TEXT: &str = "No image generated.";

/// Returns the first inline payload of the first candidate. Later candidates are
/// never inspected, even if they carry an image.
pub fn extract_image(response: &GenerationResponse) -> Result<Vec<u8>> {
    let found = response
        .candidates
        .first()
        .filter(|candidate| !candidate.parts.is_empty())
        .and_then(|candidate| {
            candidate.parts.iter().find_map(|part| match part {
                ResponsePart::InlineData { data, .. } => Some(data),
                ResponsePart::Text(_) | ResponsePart::Other => None,
            })
        });

    match found {
        Some(data) => Ok(data.clone()),
        None => Err(PipelineError::NoImageReturned(
            response
                .fallback_text
                .clone()
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| NO_IMAGE_TEXT.to_string()),
        )),
    }
}
