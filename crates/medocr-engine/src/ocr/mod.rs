//! On-device OCR.
//!
//! Provides text detection and recognition from document photos using the ocrs library.

mod engine;

pub use engine::{find_models_dir, OcrService, DETECTION_MODEL, RECOGNITION_MODEL};
