//! State of a scan: the selected image and whatever the last run produced.

use std::path::{Path, PathBuf};

use medocr_protocol::{Entity, ErrorCode, OutputFormat, ScanReport, Segment};
use tracing::{debug, info, warn};

use crate::backend::{OcrBackend, OcrOutcome};
use crate::error::ScanError;
use crate::upload::ImageUpload;

/// Holds one selected image and the result of processing it.
///
/// Results are replaced whole on every run. A failed run leaves only the
/// error message behind.
#[derive(Debug, Default)]
pub struct ScanSession {
    pub image: Option<ImageUpload>,
    pub format: OutputFormat,
    pub engine: Option<String>,
    pub text: String,
    pub entities: Vec<Entity>,
    pub segments: Vec<Segment>,
    pub pdf_path: Option<PathBuf>,
    pub loading: bool,
    pub error: Option<String>,
    pub error_code: Option<ErrorCode>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the image to process next.
    ///
    /// On failure the previous selection and results stay as they were and
    /// the error message is recorded.
    pub fn select_image(&mut self, path: impl AsRef<Path>) -> Result<(), ScanError> {
        match ImageUpload::from_path(path) {
            Ok(upload) => {
                self.image = Some(upload);
                self.clear_error();
                Ok(())
            }
            Err(e) => {
                warn!("Image selection failed: {}", e);
                self.set_error(&e);
                Err(e)
            }
        }
    }

    /// The selected image, or the "please select an image first" error.
    pub fn ensure_image(&mut self) -> Result<ImageUpload, ScanError> {
        match &self.image {
            Some(image) => Ok(image.clone()),
            None => {
                let e = ScanError::NoImageSelected;
                self.set_error(&e);
                Err(e)
            }
        }
    }

    /// Run the selected image through `backend`.
    ///
    /// When `format` asks for a PDF and the backend produced one, it is
    /// written to `pdf_target`.
    pub async fn process(
        &mut self,
        backend: &dyn OcrBackend,
        format: OutputFormat,
        pdf_target: &Path,
    ) -> Result<(), ScanError> {
        let image = self.ensure_image()?;

        self.loading = true;
        self.clear_error();
        self.format = format;
        self.engine = Some(backend.kind().to_string());

        debug!("Processing {:?} with {} engine ({})", image.path, backend.kind(), format);

        let result = match backend.recognize(&image, format).await {
            Ok(outcome) => save_outcome(outcome, format, pdf_target),
            Err(e) => Err(e),
        };

        self.loading = false;

        match result {
            Ok((outcome, pdf_path)) => {
                self.text = outcome.text;
                self.entities = outcome.entities;
                self.segments = outcome.segments;
                self.pdf_path = pdf_path;
                Ok(())
            }
            Err(e) => {
                warn!("Processing failed: {}", e);
                self.text.clear();
                self.entities.clear();
                self.segments.clear();
                self.pdf_path = None;
                self.set_error(&e);
                Err(e)
            }
        }
    }

    /// Snapshot of the current results.
    pub fn report(&self) -> ScanReport {
        ScanReport {
            image: self
                .image
                .as_ref()
                .map(|i| i.path.display().to_string())
                .unwrap_or_default(),
            engine: self.engine.clone().unwrap_or_default(),
            format: self.format,
            text: self.text.clone(),
            entities: self.entities.clone(),
            segments: self.segments.clone(),
            pdf_path: self.pdf_path.as_ref().map(|p| p.display().to_string()),
        }
    }

    fn set_error(&mut self, error: &ScanError) {
        self.error = Some(error.to_string());
        self.error_code = Some(error.code());
    }

    fn clear_error(&mut self) {
        self.error = None;
        self.error_code = None;
    }
}

fn save_outcome(
    mut outcome: OcrOutcome,
    format: OutputFormat,
    pdf_target: &Path,
) -> Result<(OcrOutcome, Option<PathBuf>), ScanError> {
    let pdf = outcome.pdf.take().filter(|_| format.wants_pdf());
    let Some(bytes) = pdf else {
        return Ok((outcome, None));
    };

    if let Some(parent) = pdf_target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ScanError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(pdf_target, &bytes).map_err(|source| ScanError::Io {
        path: pdf_target.to_path_buf(),
        source,
    })?;

    info!("PDF saved to {:?} ({} bytes)", pdf_target, bytes.len());
    Ok((outcome, Some(pdf_target.to_path_buf())))
}
