//! CLI command definitions using clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

pub mod commands;

/// Extract text, medical entities and PDFs from document photos.
#[derive(Parser)]
#[command(name = "medocr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the OCR backend
    #[arg(
        long,
        default_value = "http://localhost:8000",
        env = "MEDOCR_BACKEND_URL",
        global = true
    )]
    pub backend_url: String,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Request timeout in milliseconds (0 = wait indefinitely)
    #[arg(long, default_value = "120000", global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_millis(self.timeout))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run OCR on an image
    Scan(ScanArgs),

    /// Check that the OCR backend is reachable
    Health,

    /// Render a text file to PDF, one paragraph per page
    Pdf(PdfArgs),
}

/// Scan command arguments.
#[derive(Parser)]
pub struct ScanArgs {
    /// Image to process
    pub image: Option<String>,

    /// Output format: text, pdf or both
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Engine: remote (OCR backend) or local (on-device)
    #[arg(long, short = 'e', default_value = "remote", env = "MEDOCR_ENGINE")]
    pub engine: String,

    /// Where to save the PDF (default: <out-dir>/<image>_ocr.pdf)
    #[arg(long)]
    pub pdf_out: Option<String>,

    /// Directory for generated files
    #[arg(long, default_value = ".", env = "MEDOCR_OUT_DIR")]
    pub out_dir: String,

    /// Directory holding the on-device OCR models
    #[arg(long, env = "MEDOCR_MODELS_DIR")]
    pub models_dir: Option<String>,

    /// Open the saved PDF with the system viewer
    #[arg(long)]
    pub open: bool,
}

/// PDF command arguments.
#[derive(Parser)]
pub struct PdfArgs {
    /// Text file to render
    pub input: String,

    /// Save to file path (default: input with a .pdf extension)
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

/// Expand `~` and environment variables in a path argument.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan() {
        let cli = Cli::try_parse_from([
            "medocr",
            "--json",
            "scan",
            "note.jpg",
            "--format",
            "both",
            "--engine",
            "local",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.image.as_deref(), Some("note.jpg"));
                assert_eq!(args.format, "both");
                assert_eq!(args.engine, "local");
                assert!(!args.open);
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_scan_image_is_optional() {
        let cli = Cli::try_parse_from(["medocr", "scan"]).unwrap();
        match cli.command {
            Commands::Scan(args) => assert!(args.image.is_none()),
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_timeout_zero_disables() {
        let cli = Cli::try_parse_from(["medocr", "health", "--timeout", "0"]).unwrap();
        assert_eq!(cli.timeout(), None);

        let cli = Cli::try_parse_from(["medocr", "health", "--timeout", "1500"]).unwrap();
        assert_eq!(cli.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("out/file.pdf"), PathBuf::from("out/file.pdf"));
    }
}
