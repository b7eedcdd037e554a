//! Scan failures.
//!
//! Every failure a scan can hit ends up shown to the user as a single
//! string, so the `Display` text of each variant is the user-facing message.

use std::path::PathBuf;

use medocr_protocol::ErrorCode;
use thiserror::Error;

/// Message shown when processing is requested with nothing selected.
pub const NO_IMAGE_MESSAGE: &str = "please select an image first";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("please select an image first")]
    NoImageSelected,

    #[error("failed to read image {path:?}: {reason}")]
    ImageUnreadable { path: PathBuf, reason: String },

    #[error("{path:?} is not an image ({mime})")]
    NotAnImage { path: PathBuf, mime: String },

    #[error("could not reach OCR backend: {0}")]
    BackendUnreachable(String),

    #[error("OCR backend returned {status}{}", format_detail(.message))]
    BackendStatus { status: u16, message: String },

    #[error("invalid response from OCR backend: {0}")]
    InvalidResponse(String),

    #[error("OCR models not found: {0}")]
    ModelsNotFound(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("failed to build PDF: {0}")]
    Pdf(String),

    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_detail(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

impl ScanError {
    /// Structured code for the JSON envelope.
    pub fn code(&self) -> ErrorCode {
        match self {
            ScanError::NoImageSelected => ErrorCode::NoImageSelected,
            ScanError::ImageUnreadable { .. } | ScanError::NotAnImage { .. } => {
                ErrorCode::ImageUnreadable
            }
            ScanError::BackendUnreachable(_) => ErrorCode::BackendUnreachable,
            ScanError::BackendStatus { .. } => ErrorCode::BackendStatus,
            ScanError::InvalidResponse(_) => ErrorCode::InvalidResponse,
            ScanError::ModelsNotFound(_) => ErrorCode::ModelsNotFound,
            ScanError::Ocr(_) => ErrorCode::OcrFailed,
            ScanError::Pdf(_) => ErrorCode::PdfFailed,
            ScanError::Io { .. } => ErrorCode::IoError,
        }
    }
}
