use crate::{
    error::{PipelineError, Result},
    models::{ContentPart, ImageAttachment},
};

pub fn assemble(
    prompt: &str,
    primary_image: Option<ImageAttachment>,
    reference_image: Option<ImageAttachment>,
) -> Result<Vec<ContentPart>> {
    if prompt.trim().is_empty() {
        return Err(PipelineError::InvalidRequest(
            "Field 'prompt' must not be empty".into(),
        ));
    }

    let mut parts = vec![ContentPart::Text(prompt.to_string())];
    for image in [primary_image, reference_image].into_iter().flatten() {
        let mime_type = image.mime_type_or_default().to_string();
        parts.push(ContentPart::Binary {
            data: image.data,
            mime_type,
        });
    }

    Ok(parts)
}
