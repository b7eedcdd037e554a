//! PDF command implementation.

use std::path::{Path, PathBuf};

use medocr_engine::pdf::render_text_pdf;
use medocr_engine::ScanError;
use medocr_protocol::{ErrorCode, Response, ResponseData};
use tracing::info;

use super::Failure;
use crate::cli::{expand_path, PdfArgs};
use crate::output::Output;

pub fn run(args: PdfArgs, output: &Output) -> anyhow::Result<bool> {
    let input = expand_path(&args.input);
    let text = match std::fs::read_to_string(&input) {
        Ok(text) => text,
        Err(e) => {
            let message = format!("failed to read {:?}: {}", input, e);
            return Failure::new(ErrorCode::IoError, message).report(output);
        }
    };

    let path = args
        .output
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(|| default_output(&input));

    let (path, pages) = match write_pdf(&text, &path) {
        Ok(written) => written,
        Err(e) => return Failure::from(e).report(output),
    };

    output.print_response(&Response::success(ResponseData::Pdf {
        path: path.display().to_string(),
        pages,
    }));

    Ok(true)
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}

/// Render `text` and write it to `path`, returning the path and page count.
fn write_pdf(text: &str, path: &Path) -> Result<(PathBuf, u32), ScanError> {
    let pdf = render_text_pdf(text)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ScanError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, &pdf.bytes).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("PDF saved to {:?} ({} pages)", path, pdf.pages);
    Ok((path.to_path_buf(), pdf.pages))
}
