//! The image selected for a scan.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ScanError;

/// An image read from disk, ready to be sent to an OCR engine.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Read the image at `path`.
    ///
    /// The MIME type is guessed from the extension once the file has been
    /// read; files that do not look like images are rejected before anything
    /// is sent.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| ScanError::ImageUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_().as_str() != "image" {
            return Err(ScanError::NotAnImage {
                path: path.to_path_buf(),
                mime: mime.essence_str().to_string(),
            });
        }

        if bytes.is_empty() {
            return Err(ScanError::ImageUnreadable {
                path: path.to_path_buf(),
                reason: "file is empty".to_string(),
            });
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        debug!("Selected {:?} ({}, {} bytes)", path, mime, bytes.len());

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime: mime.essence_str().to_string(),
            bytes,
        })
    }
}
