//! Envelope printed by the CLI in `--json` mode.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Entity, OutputFormat, Segment};

/// Result of a CLI command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Response data on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,

    /// Error details on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl Response {
    /// Create a successful response with data.
    pub fn success(data: ResponseData) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorInfo {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Response data variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseData {
    /// Outcome of a scan.
    Scan(ScanReport),

    /// Backend reachability.
    Health {
        /// Probed backend URL.
        url: String,
        /// Whether the backend answered.
        reachable: bool,
    },

    /// A locally rendered PDF.
    Pdf {
        /// Where the file was written.
        path: String,
        /// Number of pages.
        pages: u32,
    },
}

/// What a scan produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScanReport {
    /// Path of the scanned image.
    pub image: String,

    /// Engine that produced the result (`remote` or `local`).
    pub engine: String,

    /// Requested output format.
    pub format: OutputFormat,

    /// Extracted text.
    pub text: String,

    /// Detected entities.
    pub entities: Vec<Entity>,

    /// Text segments with bounding boxes.
    pub segments: Vec<Segment>,

    /// Where the PDF was saved, if one was produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_path: Option<String>,
}

/// Error information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
}

/// Error codes for structured error handling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Error)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Processing was requested before an image was selected.
    #[error("no image selected")]
    NoImageSelected,

    /// The selected image could not be read.
    #[error("image unreadable")]
    ImageUnreadable,

    /// Invalid command arguments.
    #[error("invalid request")]
    InvalidRequest,

    /// The OCR backend could not be reached.
    #[error("backend unreachable")]
    BackendUnreachable,

    /// The OCR backend answered with a non-200 status.
    #[error("backend status")]
    BackendStatus,

    /// The OCR backend answered with an unusable body.
    #[error("invalid response")]
    InvalidResponse,

    /// On-device recognition failed.
    #[error("ocr failed")]
    OcrFailed,

    /// On-device OCR models are missing.
    #[error("models not found")]
    ModelsNotFound,

    /// PDF assembly failed.
    #[error("pdf failed")]
    PdfFailed,

    /// Reading or writing a local file failed.
    #[error("io error")]
    IoError,

    /// Anything else.
    #[error("internal error")]
    InternalError,
}
