use actix_cors::Cors;
use actix_multipart::{Field, Multipart};
use actix_web::{get, post, web, HttpResponse};
use futures::TryStreamExt;

use crate::{
    error::{PipelineError, Result},
    models::{GenerateResponse, GenerationRequest, HealthResponse, ImageAttachment},
    pipeline::Pipeline,
};

#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_upload_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

pub fn cors() -> Cors {
    Cors::permissive()
}

pub fn configure(
    pipeline: Pipeline,
    limits: UploadLimits,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(pipeline))
            .app_data(web::Data::new(limits))
            .service(generate)
            .service(health);
    }
}

#[post("/generate")]
pub async fn generate(
    payload: Multipart,
    pipeline: web::Data<Pipeline>,
    limits: web::Data<UploadLimits>,
) -> std::result::Result<HttpResponse, PipelineError> {
    let request = read_generation_form(payload, limits.max_upload_bytes)
        .await
        .map_err(|e| {
            log::warn!("❌ Rejected form: {}", e);
            e
        })?;
    let outcome = pipeline.run(request).await?;
    Ok(HttpResponse::Ok().json(GenerateResponse::from(outcome)))
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn multipart_error(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::InvalidRequest(format!("Malformed multipart body: {}", e))
}

async fn read_field(field: &mut Field, budget: &mut usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if chunk.len() > *budget {
            return Err(PipelineError::InvalidRequest(
                "Upload exceeds the maximum allowed size".into(),
            ));
        }
        *budget -= chunk.len();
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn read_generation_form(
    mut payload: Multipart,
    max_upload_bytes: usize,
) -> Result<GenerationRequest> {
    let mut budget = max_upload_bytes;
    let mut prompt = None;
    let mut primary_image = None;
    let mut reference_image = None;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let mime_type = field.content_type().map(|mime| mime.essence_str().to_string());
        let data = read_field(&mut field, &mut budget).await?;

        match name.as_str() {
            "prompt" => {
                let text = String::from_utf8(data).map_err(|_| {
                    PipelineError::InvalidRequest("Field 'prompt' must be UTF-8 text".into())
                })?;
                prompt = Some(text);
            }
            "image" if !data.is_empty() => {
                primary_image = Some(ImageAttachment::new(data, mime_type));
            }
            "reference_image" if !data.is_empty() => {
                reference_image = Some(ImageAttachment::new(data, mime_type));
            }
            "image" | "reference_image" => {}
            other => log::debug!("Ignoring unexpected form field '{}'", other),
        }
    }

    let prompt =
        prompt.ok_or_else(|| PipelineError::InvalidRequest("Field 'prompt' is required".into()))?;

    Ok(GenerationRequest {
        prompt,
        primary_image,
        reference_image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{ContentPart, GenerationResponse},
        pipeline::testing::{decode_qr, DeniedStore, FakeGenerator, FAKE_PNG},
        storage::{BlobStore, MemoryBlobStore},
        vertex::ImageGenerator,
    };
    use actix_web::{http::header, http::StatusCode, test, App};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::Value;
    use std::sync::Arc;
    use uuid::Uuid;

    const BOUNDARY: &str = "genframe-test-boundary";

    struct FormPart<'a> {
        name: &'a str,
        file: Option<(&'a str, Option<&'a str>)>,
        data: &'a [u8],
    }

    fn text(name: &'static str, value: &'static str) -> FormPart<'static> {
        FormPart {
            name,
            file: None,
            data: value.as_bytes(),
        }
    }

    fn multipart_body(parts: &[FormPart]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part.file {
                Some((filename, content_type)) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                            part.name, filename
                        )
                        .as_bytes(),
                    );
                    if let Some(content_type) = content_type {
                        body.extend_from_slice(
                            format!("Content-Type: {}\r\n", content_type).as_bytes(),
                        );
                    }
                }
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name)
                        .as_bytes(),
                ),
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(part.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    async fn post_form(
        generator: Arc<dyn ImageGenerator>,
        store: Arc<dyn BlobStore>,
        parts: &[FormPart<'_>],
    ) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .wrap(cors())
                .configure(configure(Pipeline::new(generator, store), UploadLimits::default())),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/generate")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body(parts))
            .to_request();

        let response = test::call_service(&app, request).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }

    fn image_generator() -> Arc<FakeGenerator> {
        Arc::new(FakeGenerator::returning(Ok(GenerationResponse::with_image(
            FAKE_PNG.to_vec(),
            "image/png",
        ))))
    }

    #[actix_web::test]
    async fn test_prompt_only_success() {
        let store = Arc::new(MemoryBlobStore::default());
        let (status, body) = post_form(
            image_generator(),
            store.clone(),
            &[text("prompt", "skyline at night")],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");

        let image_url = body["image_url"].as_str().unwrap();
        let key = image_url
            .strip_prefix("https://storage.googleapis.com/created-images/")
            .unwrap();
        assert!(Uuid::parse_str(key.strip_suffix(".png").unwrap()).is_ok());
        assert_eq!(store.get(key).await.unwrap().data, FAKE_PNG);

        let png = STANDARD
            .decode(body["qr_code_base64"].as_str().unwrap())
            .unwrap();
        assert_eq!(decode_qr(&png), image_url);
    }

    #[actix_web::test]
    async fn test_uploaded_images_reach_model_in_order() {
        let generator = image_generator();
        let (status, _) = post_form(
            generator.clone(),
            Arc::new(MemoryBlobStore::default()),
            &[
                text("prompt", "driver on the podium"),
                FormPart {
                    name: "reference_image",
                    file: Some(("brand.webp", Some("image/webp"))),
                    data: b"ref",
                },
                FormPart {
                    name: "image",
                    file: Some(("selfie.png", Some("image/png"))),
                    data: b"selfie",
                },
            ],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let seen = generator.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            vec![
                ContentPart::Text("driver on the podium".into()),
                ContentPart::Binary {
                    data: b"selfie".to_vec(),
                    mime_type: "image/png".into()
                },
                ContentPart::Binary {
                    data: b"ref".to_vec(),
                    mime_type: "image/webp".into()
                },
            ]
        );
    }

    #[actix_web::test]
    async fn test_empty_file_part_is_absent() {
        let generator = image_generator();
        let (status, _) = post_form(
            generator.clone(),
            Arc::new(MemoryBlobStore::default()),
            &[
                text("prompt", "skyline at night"),
                FormPart {
                    name: "image",
                    file: Some(("", Some("application/octet-stream"))),
                    data: b"",
                },
            ],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(generator.seen.lock().unwrap()[0].len(), 1);
    }

    #[actix_web::test]
    async fn test_zero_candidates_is_500() {
        let generator = Arc::new(FakeGenerator::returning(Ok(GenerationResponse::default())));
        let (status, body) = post_form(
            generator,
            Arc::new(MemoryBlobStore::default()),
            &[text("prompt", "skyline at night")],
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("did not return an image"));
    }

    #[actix_web::test]
    async fn test_storage_permission_error_is_500_without_qr() {
        let (status, body) = post_form(
            image_generator(),
            Arc::new(DeniedStore),
            &[text("prompt", "skyline at night")],
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("does not have storage.objects.create access"));
        assert!(body.get("qr_code_base64").is_none());
        assert!(body.get("image_url").is_none());
    }

    #[actix_web::test]
    async fn test_missing_prompt_is_500() {
        let generator = image_generator();
        let (status, body) = post_form(
            generator.clone(),
            Arc::new(MemoryBlobStore::default()),
            &[FormPart {
                name: "image",
                file: Some(("selfie.png", Some("image/png"))),
                data: b"selfie",
            }],
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Invalid request: Field 'prompt' is required");
        assert!(generator.seen.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_oversized_upload_rejected() {
        let app = test::init_service(App::new().configure(configure(
            Pipeline::new(image_generator(), Arc::new(MemoryBlobStore::default())),
            UploadLimits {
                max_upload_bytes: 8,
            },
        )))
        .await;

        let request = test::TestRequest::post()
            .uri("/generate")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body(&[text("prompt", "a prompt longer than eight bytes")]))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(response).await;
        assert!(body["detail"].as_str().unwrap().contains("maximum allowed size"));
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().service(health)).await;
        let response =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "genframe");
    }

    #[actix_web::test]
    async fn test_cors_preflight_allows_any_origin() {
        let app = test::init_service(App::new().wrap(cors()).service(health)).await;
        let request = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/generate")
            .insert_header((header::ORIGIN, "https://kiosk.example"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert!(response.status().is_success());
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://kiosk.example"
        );
    }
}
