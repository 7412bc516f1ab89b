//! Main HTTP Gateway Server.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use labelscan_config::LabelScanConfig;
use labelscan_media::LabelPipeline;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::cors::cors_layer;
use crate::extract_api;
use crate::health_api;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<LabelPipeline>,
    pub config: Arc<LabelScanConfig>,
}

impl GatewayState {
    pub fn new(pipeline: LabelPipeline, config: LabelScanConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
        }
    }
}

/// Build the router with all routes, the upload limit and CORS.
pub fn build_router(state: GatewayState) -> Result<Router> {
    let cors = cors_layer(&state.config.cors)?;
    let body_limit = DefaultBodyLimit::max(state.config.server.max_upload_bytes);

    Ok(Router::new()
        .route("/extract/", post(extract_api::extract_label))
        .route("/extract", post(extract_api::extract_label))
        .route("/api/health", get(health_api::get_health))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// Bind to the configured address and serve until ctrl-c.
#[instrument(skip_all)]
pub async fn start_server(config: LabelScanConfig, pipeline: LabelPipeline) -> Result<()> {
    let addr = config.server.socket_addr();
    let app = build_router(GatewayState::new(pipeline, config))?;

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use labelscan_core::{RecognitionResult, ScriptedRecognizer};
    use reqwest::multipart::{Form, Part};
    use reqwest::{Client, StatusCode};
    use serde_json::Value;
    use std::io::Cursor;

    fn png() -> Vec<u8> {
        let image = RgbImage::from_pixel(48, 32, Rgb([255, 255, 255]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn form(field: &str, data: Vec<u8>) -> Form {
        let part = Part::bytes(data)
            .file_name("label.png")
            .mime_str("image/png")
            .unwrap();
        Form::new().part(field.to_string(), part)
    }

    fn state_with(recognizer: ScriptedRecognizer, config: LabelScanConfig) -> GatewayState {
        GatewayState::new(LabelPipeline::new(Arc::new(recognizer)), config)
    }

    fn label_state() -> GatewayState {
        let detections = vec![
            RecognitionResult::from_edges(2, 2, 40, 10, "Mfg Date 12 JAN 2024", 0.9),
            RecognitionResult::from_edges(2, 14, 40, 22, "Use By 12 JAN 2026", 0.9),
            RecognitionResult::from_edges(2, 24, 40, 30, "Pkd by Foo & Bar", 0.9),
        ];
        state_with(ScriptedRecognizer::new(detections), LabelScanConfig::default())
    }

    /// Serve the router on an ephemeral port and return its base URL.
    async fn spawn(state: GatewayState) -> String {
        let app = build_router(state).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn post_form(base: &str, path: &str, form: Form) -> reqwest::Response {
        Client::new()
            .post(format!("{base}{path}"))
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn extract_returns_fields_text_and_image() {
        let base = spawn(label_state()).await;
        let resp = post_form(&base, "/extract/", form("file", png())).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["manufacturing_date"], "12 JAN 2024");
        assert_eq!(body["expiry_date"], "12 JAN 2026");
        assert_eq!(body["company_name"], "Foo & Bar");
        assert_eq!(body["recognized_text"].as_array().unwrap().len(), 3);
        assert!(!body["ocr_output_image"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unmatched_fields_serialize_as_null() {
        let state = state_with(
            ScriptedRecognizer::new(vec![RecognitionResult::from_edges(1, 1, 9, 9, "hello", 0.5)]),
            LabelScanConfig::default(),
        );
        let base = spawn(state).await;
        let resp = post_form(&base, "/extract", form("file", png())).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert!(body["company_name"].is_null());
        assert!(body["manufacturing_date"].is_null());
        assert!(body["expiry_date"].is_null());
    }

    #[tokio::test]
    async fn missing_file_part_is_bad_request() {
        let base = spawn(label_state()).await;
        let resp = post_form(&base, "/extract/", form("image", png())).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "No image provided");
    }

    #[tokio::test]
    async fn empty_file_never_reaches_the_recognizer() {
        let recognizer = Arc::new(ScriptedRecognizer::new(Vec::new()));
        let state = GatewayState::new(
            LabelPipeline::new(recognizer.clone()),
            LabelScanConfig::default(),
        );
        let base = spawn(state).await;
        let resp = post_form(&base, "/extract/", form("file", Vec::new())).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "No image provided");
        assert_eq!(recognizer.calls(), 0);
    }

    #[tokio::test]
    async fn non_multipart_body_is_bad_request() {
        let base = spawn(label_state()).await;
        let resp = Client::new()
            .post(format!("{base}/extract/"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn undecodable_upload_is_bad_request() {
        let base = spawn(label_state()).await;
        let resp = post_form(&base, "/extract/", form("file", b"not an image".to_vec())).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("could not decode image"));
    }

    #[tokio::test]
    async fn engine_failure_is_server_error() {
        let state = state_with(ScriptedRecognizer::failing("model crashed"), LabelScanConfig::default());
        let base = spawn(state).await;
        let resp = post_form(&base, "/extract/", form("file", png())).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("model crashed"));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let mut config = LabelScanConfig::default();
        config.server.max_upload_bytes = 64;
        let base = spawn(state_with(ScriptedRecognizer::new(Vec::new()), config)).await;

        let resp = post_form(&base, "/extract/", form("file", vec![0u8; 4096])).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn health_reports_service_and_version() {
        let base = spawn(label_state()).await;
        let resp = reqwest::get(format!("{base}/api/health")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "labelscan");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    async fn preflight(base: &str, origin: &str) -> reqwest::Response {
        Client::new()
            .request(reqwest::Method::OPTIONS, format!("{base}/extract/"))
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn allowed_origin_gets_cors_headers() {
        let base = spawn(label_state()).await;
        let resp = preflight(&base, "http://localhost:3000").await;

        let headers = resp.headers();
        assert_eq!(headers["access-control-allow-origin"], "http://localhost:3000");
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn unknown_origin_gets_no_allow_header() {
        let base = spawn(label_state()).await;
        let resp = preflight(&base, "http://evil.example").await;
        assert!(!resp.headers().contains_key("access-control-allow-origin"));
    }
}
