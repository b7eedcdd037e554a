//! On-device engine: ocrs for recognition, local PDF assembly.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use medocr_protocol::OutputFormat;
use tracing::debug;

use super::{BackendKind, OcrBackend, OcrOutcome};
use crate::error::ScanError;
use crate::layout::join_lines;
use crate::ocr::OcrService;
use crate::pdf::render_text_pdf;
use crate::upload::ImageUpload;

/// Runs OCR on this machine.
///
/// Entity detection needs the backend's NER model, so local results never
/// carry entities.
pub struct LocalBackend {
    service: Arc<OcrService>,
}

impl LocalBackend {
    /// Load the detection and recognition models from `models_dir`.
    pub fn new(models_dir: &Path) -> Result<Self, ScanError> {
        let service =
            OcrService::new(models_dir).map_err(|e| ScanError::ModelsNotFound(format!("{:#}", e)))?;
        Ok(Self {
            service: Arc::new(service),
        })
    }
}

#[async_trait]
impl OcrBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn recognize(
        &self,
        image: &ImageUpload,
        format: OutputFormat,
    ) -> Result<OcrOutcome, ScanError> {
        let service = Arc::clone(&self.service);
        let bytes = image.bytes.clone();

        // Recognition is CPU-bound.
        tokio::task::spawn_blocking(move || -> Result<OcrOutcome, ScanError> {
            let segments = service
                .read_lines(&bytes)
                .map_err(|e| ScanError::Ocr(format!("{:#}", e)))?;
            let text = join_lines(&segments);

            let pdf = if format.wants_pdf() {
                Some(render_text_pdf(&text)?.bytes)
            } else {
                None
            };

            debug!("Local OCR read {} lines", segments.len());

            Ok(OcrOutcome {
                text,
                entities: Vec::new(),
                segments,
                pdf,
            })
        })
        .await
        .map_err(|e| ScanError::Ocr(e.to_string()))?
    }
}
