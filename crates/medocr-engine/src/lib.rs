//! OCR engines and scan state for medocr.
//!
//! A scan takes one selected image through an [`OcrBackend`] (the remote
//! `/ocr/` service or the on-device `ocrs` engine) and records the outcome
//! in a [`ScanSession`].

pub mod backend;
pub mod error;
pub mod layout;
pub mod ocr;
pub mod pdf;
pub mod scan;
pub mod upload;

pub use backend::{BackendKind, LocalBackend, OcrBackend, OcrOutcome, RemoteBackend};
pub use error::ScanError;
pub use scan::ScanSession;
pub use upload::ImageUpload;

use std::path::{Path, PathBuf};

/// Default location for the PDF produced from `image`.
///
/// `<out_dir>/<image stem>_ocr.pdf`
pub fn default_pdf_path(image: &Path, out_dir: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("scan");
    out_dir.join(format!("{}_ocr.pdf", stem))
}
