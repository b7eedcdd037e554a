//! Requested output format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the caller wants back from a scan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Extracted text only.
    #[default]
    Text,
    /// A PDF rendering of the text.
    Pdf,
    /// Text and PDF.
    Both,
}

impl OutputFormat {
    /// Query-string value understood by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Both => "both",
        }
    }

    /// Whether a PDF should be produced.
    pub fn wants_pdf(&self) -> bool {
        matches!(self, OutputFormat::Pdf | OutputFormat::Both)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an output format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown output format '{0}' (expected text, pdf or both)")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "pdf" => Ok(OutputFormat::Pdf),
            "both" => Ok(OutputFormat::Both),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("PDF".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!(" both ".parse::<OutputFormat>().unwrap(), OutputFormat::Both);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "docx".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("docx"));
    }

    #[test]
    fn test_wants_pdf() {
        assert!(!OutputFormat::Text.wants_pdf());
        assert!(OutputFormat::Pdf.wants_pdf());
        assert!(OutputFormat::Both.wants_pdf());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Both).unwrap();
        assert_eq!(json, "\"both\"");
    }
}
