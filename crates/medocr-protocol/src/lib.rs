//! Protocol types for medocr.
//!
//! This crate defines the JSON payloads exchanged with the OCR backend and
//! the envelope the CLI prints in `--json` mode.

mod format;
mod ocr;
mod response;

pub use format::*;
pub use ocr::*;
pub use response::*;
