//! Client for the remote `/ocr/` service.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use medocr_protocol::{OcrResponse, OutputFormat};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use super::{BackendKind, OcrBackend, OcrOutcome};
use crate::error::ScanError;
use crate::upload::ImageUpload;

/// Posts images to `{base_url}/ocr/` as multipart uploads.
pub struct RemoteBackend {
    client: Client,
    base_url: String,
}

impl RemoteBackend {
    /// Create a client for the backend at `base_url`.
    ///
    /// `timeout` of `None` waits for as long as the backend takes.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ScanError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ScanError::BackendUnreachable(e.to_string()))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        info!("OCR backend configured: {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn ocr_url(&self) -> String {
        format!("{}/ocr/", self.base_url)
    }

    /// Check that the backend is up by fetching its OpenAPI document.
    pub async fn health(&self) -> bool {
        match self
            .client
            .get(format!("{}/openapi.json", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Backend health check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl OcrBackend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn recognize(
        &self,
        image: &ImageUpload,
        format: OutputFormat,
    ) -> Result<OcrOutcome, ScanError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)
            .map_err(|e| ScanError::ImageUnreadable {
                path: image.path.clone(),
                reason: e.to_string(),
            })?;
        let form = Form::new().part("file", part);

        let url = self.ocr_url();
        debug!("POST {}?output={} ({} bytes)", url, format, image.bytes.len());

        let response = self
            .client
            .post(&url)
            .query(&[("output", format.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| ScanError::BackendUnreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScanError::BackendUnreachable(e.to_string()))?;

        if status != StatusCode::OK {
            let message = serde_json::from_str::<OcrResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| body.trim().to_string());
            warn!("OCR backend returned {}: {}", status, message);
            return Err(ScanError::BackendStatus {
                status: status.as_u16(),
                message,
            });
        }

        let payload: OcrResponse =
            serde_json::from_str(&body).map_err(|e| ScanError::InvalidResponse(e.to_string()))?;

        let pdf = if format.wants_pdf() {
            payload
                .pdf_base64
                .as_deref()
                .map(|encoded| base64::engine::general_purpose::STANDARD.decode(encoded))
                .transpose()
                .map_err(|e| ScanError::InvalidResponse(format!("pdf_base64: {}", e)))?
        } else {
            None
        };

        debug!(
            "Backend returned {} chars, {} entities, {} segments, pdf={}",
            payload.text.len(),
            payload.entities.len(),
            payload.segments.len(),
            pdf.is_some()
        );

        Ok(OcrOutcome {
            text: payload.text,
            entities: payload.entities,
            segments: payload.segments,
            pdf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    use axum::extract::{Multipart, Query};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use medocr_protocol::{Entity, Segment};

    fn upload() -> ImageUpload {
        ImageUpload {
            path: PathBuf::from("note.jpg"),
            file_name: "note.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Fake backend mirroring the real endpoint's shape.
    fn fake_backend() -> Router {
        Router::new()
            .route(
                "/ocr/",
                post(
                    |Query(query): Query<HashMap<String, String>>, mut multipart: Multipart| async move {
                        let mut file_name = String::new();
                        let mut size = 0;
                        while let Some(field) = multipart.next_field().await.unwrap() {
                            if field.name() == Some("file") {
                                file_name = field.file_name().unwrap_or_default().to_string();
                                size = field.bytes().await.unwrap().len();
                            }
                        }

                        let output = query.get("output").cloned().unwrap_or_default();
                        let pdf_base64 = (output == "pdf" || output == "both").then(|| {
                            base64::engine::general_purpose::STANDARD.encode(b"%PDF-1.4 fake")
                        });

                        Json(OcrResponse {
                            text: format!("{} {}", file_name, size),
                            entities: vec![Entity {
                                text: "aspirin".to_string(),
                                entity: "Drug".to_string(),
                                score: 0.9,
                                ..Default::default()
                            }],
                            segments: vec![Segment::from_rect("line", 0, 0, 10, 10)],
                            pdf_base64,
                            error: None,
                        })
                    },
                ),
            )
            .route("/openapi.json", get(|| async { "{}" }))
    }

    #[tokio::test]
    async fn test_text_request() {
        let url = serve(fake_backend()).await;
        let backend = RemoteBackend::new(&format!("{}/", url), None).unwrap();
        assert_eq!(backend.base_url(), url);

        let outcome = backend.recognize(&upload(), OutputFormat::Text).await.unwrap();
        assert_eq!(outcome.text, "note.jpg 4");
        assert_eq!(outcome.entities.len(), 1);
        assert_eq!(outcome.entities[0].entity, "Drug");
        assert_eq!(outcome.segments.len(), 1);
        assert!(outcome.pdf.is_none());
    }

    #[tokio::test]
    async fn test_both_request_decodes_pdf() {
        let url = serve(fake_backend()).await;
        let backend = RemoteBackend::new(&url, Some(Duration::from_secs(5))).unwrap();

        let outcome = backend.recognize(&upload(), OutputFormat::Both).await.unwrap();
        assert_eq!(outcome.text, "note.jpg 4");
        assert_eq!(outcome.pdf.as_deref(), Some(&b"%PDF-1.4 fake"[..]));
    }

    #[tokio::test]
    async fn test_error_status_uses_error_field() {
        let app = Router::new().route(
            "/ocr/",
            post(|| async {
                (
                    AxumStatus::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "cannot identify image file"})),
                )
            }),
        );
        let url = serve(app).await;
        let backend = RemoteBackend::new(&url, None).unwrap();

        let err = backend.recognize(&upload(), OutputFormat::Text).await.unwrap_err();
        match err {
            ScanError::BackendStatus { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "cannot identify image file");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_200_success_status_is_failure() {
        let app = Router::new().route(
            "/ocr/",
            post(|| async { (AxumStatus::CREATED, Json(OcrResponse::default())) }),
        );
        let url = serve(app).await;
        let backend = RemoteBackend::new(&url, None).unwrap();

        let err = backend.recognize(&upload(), OutputFormat::Text).await.unwrap_err();
        assert!(matches!(err, ScanError::BackendStatus { status: 201, .. }));
    }

    #[tokio::test]
    async fn test_invalid_pdf_payload() {
        let app = Router::new().route(
            "/ocr/",
            post(|| async {
                Json(serde_json::json!({"text": "x", "pdf_base64": "not base64!!"}))
            }),
        );
        let url = serve(app).await;
        let backend = RemoteBackend::new(&url, None).unwrap();

        let err = backend.recognize(&upload(), OutputFormat::Pdf).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidResponse(_)));

        // The payload is ignored when no PDF was asked for.
        let outcome = backend.recognize(&upload(), OutputFormat::Text).await.unwrap();
        assert_eq!(outcome.text, "x");
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = RemoteBackend::new(&format!("http://{}", addr), None).unwrap();
        let err = backend.recognize(&upload(), OutputFormat::Text).await.unwrap_err();
        assert!(matches!(err, ScanError::BackendUnreachable(_)));
        assert!(!backend.health().await);
    }

    #[tokio::test]
    async fn test_health() {
        let url = serve(fake_backend()).await;
        let backend = RemoteBackend::new(&url, None).unwrap();
        assert!(backend.health().await);
    }
}
