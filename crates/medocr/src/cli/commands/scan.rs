//! Scan command implementation.

use std::time::Duration;

use medocr_engine::ocr::find_models_dir;
use medocr_engine::{
    default_pdf_path, BackendKind, LocalBackend, OcrBackend, RemoteBackend, ScanError,
    ScanSession,
};
use medocr_protocol::{ErrorCode, OutputFormat, Response, ResponseData};
use tracing::{info, warn};

use super::Failure;
use crate::cli::{expand_path, ScanArgs};
use crate::output::Output;

pub async fn run(
    backend_url: &str,
    args: ScanArgs,
    output: &Output,
    timeout: Option<Duration>,
) -> anyhow::Result<bool> {
    let session = match scan(backend_url, &args, timeout).await {
        Ok(session) => session,
        Err(failure) => return failure.report(output),
    };

    output.print_response(&Response::success(ResponseData::Scan(session.report())));

    if args.open {
        if let Some(ref path) = session.pdf_path {
            info!("Opening {:?}", path);
            if let Err(e) = open::that(path) {
                warn!("Failed to open {:?}: {}", path, e);
            }
        }
    }

    Ok(true)
}

/// Validate the arguments, then select, process and save.
async fn scan(
    backend_url: &str,
    args: &ScanArgs,
    timeout: Option<Duration>,
) -> Result<ScanSession, Failure> {
    let format = args
        .format
        .parse::<OutputFormat>()
        .map_err(|e| Failure::new(ErrorCode::InvalidRequest, e.to_string()))?;
    let kind = args
        .engine
        .parse::<BackendKind>()
        .map_err(|e| Failure::new(ErrorCode::InvalidRequest, e))?;

    let mut session = ScanSession::new();
    if let Some(ref image) = args.image {
        session.select_image(expand_path(image))?;
    }

    // Checked before loading any engine so the message stays the same for both.
    let image = session.ensure_image()?;

    let backend = build_backend(kind, backend_url, args.models_dir.as_deref(), timeout)?;

    let pdf_target = match args.pdf_out {
        Some(ref path) => expand_path(path),
        None => default_pdf_path(&image.path, &expand_path(&args.out_dir)),
    };

    session.process(backend.as_ref(), format, &pdf_target).await?;
    Ok(session)
}

fn build_backend(
    kind: BackendKind,
    backend_url: &str,
    models_dir: Option<&str>,
    timeout: Option<Duration>,
) -> Result<Box<dyn OcrBackend>, ScanError> {
    match kind {
        BackendKind::Remote => Ok(Box::new(RemoteBackend::new(backend_url, timeout)?)),
        BackendKind::Local => {
            let explicit = models_dir.map(expand_path);
            let dir = find_models_dir(explicit.as_deref())
                .map_err(|e| ScanError::ModelsNotFound(format!("{:#}", e)))?;
            Ok(Box::new(LocalBackend::new(&dir)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use tempfile::TempDir;

    fn args(image: Option<&str>) -> ScanArgs {
        ScanArgs {
            image: image.map(str::to_string),
            format: "text".to_string(),
            engine: "remote".to_string(),
            pdf_out: None,
            out_dir: ".".to_string(),
            models_dir: None,
            open: false,
        }
    }

    async fn closed_port_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn write_image(dir: &TempDir) -> String {
        let path = dir.path().join("rx.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path.display().to_string()
    }

    #[tokio::test]
    async fn test_no_image_before_engine() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = args(None);
        args.engine = "local".to_string();
        args.models_dir = Some(temp_dir.path().join("missing").display().to_string());

        let failure = scan("http://localhost:8000", &args, None).await.err().unwrap();
        assert_eq!(failure.code, ErrorCode::NoImageSelected);
        assert_eq!(failure.message, "please select an image first");
    }

    #[tokio::test]
    async fn test_invalid_format_and_engine() {
        let mut bad_format = args(None);
        bad_format.format = "docx".to_string();
        let failure = scan("http://localhost:8000", &bad_format, None).await.err().unwrap();
        assert_eq!(failure.code, ErrorCode::InvalidRequest);

        let mut bad_engine = args(None);
        bad_engine.engine = "cloud".to_string();
        let failure = scan("http://localhost:8000", &bad_engine, None).await.err().unwrap();
        assert_eq!(failure.code, ErrorCode::InvalidRequest);

        let ok = run("http://localhost:8000", bad_engine, &Output::new(true), None)
            .await
            .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let temp_dir = TempDir::new().unwrap();
        let image = write_image(&temp_dir);
        let url = closed_port_url().await;

        let failure = scan(&url, &args(Some(&image)), None).await.err().unwrap();
        assert_eq!(failure.code, ErrorCode::BackendUnreachable);

        let ok = run(&url, args(Some(&image)), &Output::new(true), None)
            .await
            .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_scan_with_pdf() {
        let temp_dir = TempDir::new().unwrap();
        let image = write_image(&temp_dir);
        let app = Router::new().route(
            "/ocr/",
            post(|| async {
                Json(serde_json::json!({
                    "text": "Metformin 500 mg",
                    "entities": [{"text": "Metformin", "entity": "Drug", "score": 0.9}],
                    "segments": [],
                    "pdf_base64": "JVBERi0xLjUK"
                }))
            }),
        );
        let url = serve(app).await;

        let mut args = args(Some(&image));
        args.format = "both".to_string();
        args.out_dir = temp_dir.path().join("out").display().to_string();

        let session = scan(&url, &args, None).await.unwrap();
        assert_eq!(session.text, "Metformin 500 mg");
        assert_eq!(session.entities.len(), 1);

        let expected = temp_dir.path().join("out/rx_ocr.pdf");
        assert_eq!(session.pdf_path.as_deref(), Some(expected.as_path()));
        assert_eq!(std::fs::read(&expected).unwrap(), b"%PDF-1.5\n");
    }
}
