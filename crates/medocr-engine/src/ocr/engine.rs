//! OCR engine wrapper using the ocrs library.

use anyhow::{Context, Result};
use medocr_protocol::Segment;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams, TextItem};
use rten::Model;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

pub const DETECTION_MODEL: &str = "text-detection.rten";
pub const RECOGNITION_MODEL: &str = "text-recognition.rten";

/// OCR service for text detection and recognition.
pub struct OcrService {
    engine: OcrEngine,
}

impl OcrService {
    /// Create a new OCR service by loading models from the given directory.
    pub fn new(models_dir: &Path) -> Result<Self> {
        let detection_path = models_dir.join(DETECTION_MODEL);
        let recognition_path = models_dir.join(RECOGNITION_MODEL);

        debug!("Loading OCR detection model from {:?}", detection_path);
        let detection_model = Model::load_file(&detection_path)
            .with_context(|| format!("Failed to load detection model from {:?}", detection_path))?;

        debug!("Loading OCR recognition model from {:?}", recognition_path);
        let recognition_model = Model::load_file(&recognition_path)
            .with_context(|| format!("Failed to load recognition model from {:?}", recognition_path))?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .context("Failed to create OCR engine")?;

        debug!("OCR engine initialized successfully");
        Ok(Self { engine })
    }

    /// Recognise every text line in a document photo.
    ///
    /// Lines come back in reading order with their pixel bounding boxes.
    /// Blank lines are skipped.
    pub fn read_lines(&self, image_data: &[u8]) -> Result<Vec<Segment>> {
        let img = image::load_from_memory(image_data)
            .context("Failed to decode image")?
            .into_rgb8();

        let (width, height) = (img.width(), img.height());
        trace!("Image loaded: {}x{}", width, height);

        let img_source = ImageSource::from_bytes(img.as_raw(), (width, height))
            .context("Failed to create image source")?;

        let ocr_input = self
            .engine
            .prepare_input(img_source)
            .context("Failed to prepare OCR input")?;

        let word_rects = self
            .engine
            .detect_words(&ocr_input)
            .context("Failed to detect words")?;

        trace!("Detected {} word regions", word_rects.len());

        let line_rects = self.engine.find_text_lines(&ocr_input, &word_rects);

        let line_texts = self
            .engine
            .recognize_text(&ocr_input, &line_rects)
            .context("Failed to recognize text")?;

        let mut lines = Vec::new();

        for line in line_texts.iter().flatten() {
            let text = line.to_string();
            if text.trim().is_empty() {
                continue;
            }

            let mut words = line.words().peekable();
            if words.peek().is_none() {
                continue;
            }

            let mut min_x = i32::MAX;
            let mut min_y = i32::MAX;
            let mut max_x = i32::MIN;
            let mut max_y = i32::MIN;

            for word in words {
                let rect = word.bounding_rect();
                min_x = min_x.min(rect.left() as i32);
                min_y = min_y.min(rect.top() as i32);
                max_x = max_x.max((rect.left() + rect.width()) as i32);
                max_y = max_y.max((rect.top() + rect.height()) as i32);
            }

            let mut segment = Segment::from_rect(text.trim(), min_x, min_y, max_x - min_x, max_y - min_y);
            segment.kind = Some("Text".to_string());
            lines.push(segment);
        }

        debug!("Detected {} text lines", lines.len());

        Ok(lines)
    }
}

/// Find the OCR models directory.
///
/// Checked in order:
/// - `explicit`, when given (from `--models-dir` or `MEDOCR_MODELS_DIR`)
/// - `bin/../models` relative to the executable
/// - `<data dir>/medocr/models` (e.g. `~/.local/share/medocr/models`)
pub fn find_models_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        if has_models(dir) {
            debug!("Using models directory {:?}", dir);
            return Ok(dir.to_path_buf());
        }
        anyhow::bail!(
            "{:?} does not contain {} and {}",
            dir,
            DETECTION_MODEL,
            RECOGNITION_MODEL
        );
    }

    let mut candidates = Vec::new();

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(root) = exe_path.parent().and_then(|p| p.parent()) {
            candidates.push(root.join("models"));
        }
    }

    if let Some(data_dir) = dirs::data_dir() {
        candidates.push(data_dir.join("medocr").join("models"));
    }

    for dir in &candidates {
        if has_models(dir) {
            debug!("Found models directory at {:?}", dir);
            return Ok(dir.clone());
        }
    }

    anyhow::bail!(
        "Could not find OCR models (looked in {:?}). Download {} and {} from the ocrs-models release.",
        candidates,
        DETECTION_MODEL,
        RECOGNITION_MODEL
    )
}

fn has_models(dir: &Path) -> bool {
    dir.join(DETECTION_MODEL).exists() && dir.join(RECOGNITION_MODEL).exists()
}
