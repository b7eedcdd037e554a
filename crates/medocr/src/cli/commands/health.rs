//! Health command implementation.

use std::time::Duration;

use medocr_engine::RemoteBackend;
use medocr_protocol::{Response, ResponseData};

use super::Failure;
use crate::output::Output;

pub async fn run(
    backend_url: &str,
    output: &Output,
    timeout: Option<Duration>,
) -> anyhow::Result<bool> {
    let backend = match RemoteBackend::new(backend_url, timeout) {
        Ok(backend) => backend,
        Err(e) => return Failure::from(e).report(output),
    };
    let reachable = backend.health().await;

    output.print_response(&Response::success(ResponseData::Health {
        url: backend.base_url().to_string(),
        reachable,
    }));

    Ok(reachable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{Json, Router};

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let ok = run(&format!("http://{}", addr), &Output::new(true), None)
            .await
            .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_reachable_backend() {
        let app = Router::new().route(
            "/openapi.json",
            get(|| async { Json(serde_json::json!({"openapi": "3.1.0"})) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let ok = run(&format!("http://{}", addr), &Output::new(true), None)
            .await
            .unwrap();
        assert!(ok);
    }
}
