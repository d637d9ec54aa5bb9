pub mod assembler;
pub mod extractor;
pub mod qr;
pub mod uploader;

use crate::{
    error::Result,
    logger,
    models::{GenerationOutcome, GenerationRequest},
    storage::BlobStore,
    vertex::ImageGenerator,
};
use std::{fmt, sync::Arc};
use uuid::Uuid;

pub use assembler::assemble;
pub use extractor::extract_image;
pub use qr::encode_qr;
pub use uploader::BlobUploader;

pub const STORED_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Assembled,
    Generated,
    Extracted,
    Stored,
    Encoded,
    Responded,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Received => "received",
            PipelineStage::Assembled => "assembled",
            PipelineStage::Generated => "generated",
            PipelineStage::Extracted => "extracted",
            PipelineStage::Stored => "stored",
            PipelineStage::Encoded => "encoded",
            PipelineStage::Responded => "responded",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
pub struct Pipeline {
    generator: Arc<dyn ImageGenerator>,
    uploader: BlobUploader,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn ImageGenerator>, store: Arc<dyn BlobStore>) -> Self {
        Self {
            generator,
            uploader: BlobUploader::new(store),
        }
    }

    pub async fn run(&self, request: GenerationRequest) -> Result<GenerationOutcome> {
        self.run_traced(request).await.1
    }

    /// Like `run`, plus every stage passed through, ending in `Responded` or `Failed`.
    pub async fn run_traced(
        &self,
        request: GenerationRequest,
    ) -> (Vec<PipelineStage>, Result<GenerationOutcome>) {
        let request_id = Uuid::new_v4().simple().to_string();
        let mut trace = vec![PipelineStage::Received];

        let result = self.run_stages(&request_id, request, &mut trace).await;
        match &result {
            Ok(_) => trace.push(PipelineStage::Responded),
            Err(e) => {
                if let Some(stage) = trace.last() {
                    log::error!("[req:{}] ❌ Failed after stage '{}': {}", request_id, stage, e);
                }
                trace.push(PipelineStage::Failed);
            }
        }
        (trace, result)
    }

    async fn run_stages(
        &self,
        request_id: &str,
        request: GenerationRequest,
        trace: &mut Vec<PipelineStage>,
    ) -> Result<GenerationOutcome> {
        let mut total = logger::timer(&format!("[req:{}] pipeline", request_id));

        let parts = assemble(
            &request.prompt,
            request.primary_image,
            request.reference_image,
        )?;
        trace.push(PipelineStage::Assembled);
        log::debug!("[req:{}] Assembled {} content part(s)", request_id, parts.len());

        let mut generation = logger::timer(&format!(
            "[req:{}] generation with {}",
            request_id,
            self.generator.model_name()
        ));
        let response = self.generator.generate(parts).await?;
        generation.stop();
        trace.push(PipelineStage::Generated);

        let image = extract_image(&response)?;
        trace.push(PipelineStage::Extracted);
        log::debug!("[req:{}] Extracted {} image bytes", request_id, image.len());

        let artifact = self.uploader.store(image, STORED_CONTENT_TYPE).await?;
        trace.push(PipelineStage::Stored);
        log::info!("[req:{}] 📦 Stored {}", request_id, artifact.public_url);

        log::info!("[req:{}] Generating QR code...", request_id);
        let qr_code_base64 = encode_qr(&artifact.public_url)?;
        trace.push(PipelineStage::Encoded);
        log::info!("[req:{}] ✅ QR code generated successfully", request_id);

        total.stop();
        Ok(GenerationOutcome {
            image_url: artifact.public_url,
            qr_code_base64,
        })
    }
}
