#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use tower::ServiceExt;

use wastetrace_api::config::ServerConfig;
use wastetrace_api::router::build_app_router;
use wastetrace_api::state::AppState;
use wastetrace_db::MemoryStore;
use wastetrace_vision::{VisionClient, VisionError};

/// Reply used by default: two cardboard items and one metal item.
pub const CARDBOARD_REPLY: &str =
    "cardboard: 2\nglass: 0\nmetal: 1\npaper: 0\nplastic: 0\ntrash: 0";

const BOUNDARY: &str = "wastetrace-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses an explicit CORS origin and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        ..ServerConfig::default()
    }
}

/// Vision stub answering every call with fixed text, or failing.
pub struct ScriptedVision {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedVision {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionClient for ScriptedVision {
    async fn describe(&self, _image: &[u8], _mime: &str, _prompt: &str) -> Result<String, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().ok_or(VisionError::EmptyResponse)
    }
}

/// Build the full application router over an in-memory store.
///
/// Uses the same [`build_app_router`] as production so integration tests
/// exercise the real middleware stack.
pub fn build_test_app(vision: Arc<ScriptedVision>) -> Router {
    build_test_app_with(test_config(), vision)
}

pub fn build_test_app_with(config: ServerConfig, vision: Arc<ScriptedVision>) -> Router {
    let state = AppState::new(config.clone(), Arc::new(MemoryStore::new()), vision);
    build_app_router(state, &config)
}

/// A small grayscale PNG whose content varies with `seed`.
pub fn png(seed: u32) -> Vec<u8> {
    let img = GrayImage::from_fn(32, 32, |x, y| Luma([((x * seed + y * 7) % 256) as u8]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Encode a single-file `multipart/form-data` body.
pub fn multipart_body(field: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"photo.png\"\r\n\
             Content-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a request with a JSON body.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    json: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a photo to `/classify-image` under the given multipart field name.
pub async fn upload(app: Router, field: &str, data: &[u8]) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/classify-image")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, data)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
