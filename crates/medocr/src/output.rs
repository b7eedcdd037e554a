//! Output formatting for CLI responses.

use std::fmt::Write;

use medocr_protocol::{ErrorCode, Response, ResponseData, ScanReport};

/// Output formatter.
pub struct Output {
    json: bool,
}

impl Output {
    /// Create a new output formatter.
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print a response.
    pub fn print_response(&self, response: &Response) {
        if self.json {
            if let Ok(json) = serde_json::to_string(response) {
                println!("{}", json);
            }
        } else if response.success {
            if let Some(ref data) = response.data {
                print!("{}", render_data(data));
            } else {
                println!("OK");
            }
        } else if let Some(ref error) = response.error {
            eprintln!("Error [{}]: {}", error.code, error.message);
        }
    }

    /// Print an error message.
    pub fn print_error(&self, code: ErrorCode, message: &str) {
        self.print_response(&Response::error(code, message));
    }
}

/// Human-readable rendering of response data.
fn render_data(data: &ResponseData) -> String {
    match data {
        ResponseData::Scan(report) => render_scan(report),
        ResponseData::Health { url, reachable } => {
            if *reachable {
                format!("Backend {} is reachable\n", url)
            } else {
                format!("Backend {} is not reachable\n", url)
            }
        }
        ResponseData::Pdf { path, pages } => {
            format!("PDF saved to {} ({} pages)\n", path, pages)
        }
    }
}

/// Text first, then entities, then where the PDF went.
pub fn render_scan(report: &ScanReport) -> String {
    let mut out = String::new();

    if report.text.is_empty() {
        out.push_str("(no text detected)\n");
    } else {
        out.push_str(&report.text);
        if !report.text.ends_with('\n') {
            out.push('\n');
        }
    }

    if !report.entities.is_empty() {
        let _ = writeln!(out, "\nEntities ({}):", report.entities.len());
        let width = report
            .entities
            .iter()
            .map(|e| e.entity.chars().count())
            .max()
            .unwrap_or(0);
        for entity in &report.entities {
            let _ = writeln!(
                out,
                "  {:<width$}  {:.2}  {}",
                entity.entity,
                entity.score,
                entity.text,
                width = width
            );
        }
    }

    if !report.segments.is_empty() {
        let _ = writeln!(out, "\n{} segment(s) from {} engine", report.segments.len(), report.engine);
    }

    if let Some(ref path) = report.pdf_path {
        let _ = writeln!(out, "\nPDF saved to {}", path);
    }

    out
}
