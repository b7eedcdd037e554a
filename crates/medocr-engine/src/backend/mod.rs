//! OCR backends.
//!
//! A backend turns one image into text, entities, segments and optionally
//! PDF bytes. [`RemoteBackend`] posts to the `/ocr/` service;
//! [`LocalBackend`] runs ocrs on this machine and assembles the PDF itself.

mod local;
mod remote;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use medocr_protocol::{Entity, OutputFormat, Segment};

use crate::error::ScanError;
use crate::upload::ImageUpload;

/// Which engine produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Remote,
    Local,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Remote => "remote",
            BackendKind::Local => "local",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(BackendKind::Remote),
            "local" => Ok(BackendKind::Local),
            other => Err(format!("unknown engine '{}' (expected remote or local)", other)),
        }
    }
}

/// What an engine returned for one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrOutcome {
    pub text: String,
    pub entities: Vec<Entity>,
    pub segments: Vec<Segment>,
    /// Decoded PDF bytes, when one was requested and produced.
    pub pdf: Option<Vec<u8>>,
}

/// An engine that can read an image.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Run OCR on `image`, producing a PDF as well when `format` asks for one.
    async fn recognize(
        &self,
        image: &ImageUpload,
        format: OutputFormat,
    ) -> Result<OcrOutcome, ScanError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("remote".parse::<BackendKind>().unwrap(), BackendKind::Remote);
        assert_eq!("LOCAL".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert!("cloud".parse::<BackendKind>().is_err());
        assert!("device".parse::<BackendKind>().is_err());
    }
}
