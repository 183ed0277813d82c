use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::Router;
use tower::ServiceExt;

use necklace_server::app::{AppState, create_app};
use necklace_server::messages::CommandSender;

/// Stands in for the serial port and keeps whatever was written
#[derive(Clone, Default)]
struct CapturedLink(Arc<Mutex<Vec<u8>>>);

impl CapturedLink {
    fn written(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct Unplugged;

impl Write for Unplugged {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "device disconnected"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

fn mock_app() -> (Router, CapturedLink) {
    let link = CapturedLink::default();
    let state = AppState {
        sender: Arc::new(CommandSender::new(link.clone())),
    };
    (create_app(state, static_dir()), link)
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const VALID_SET: &str = "pattern=2&primary_r=255&primary_g=0&primary_b=0\
    &secondary_r=0&secondary_g=0&secondary_b=255&bpm=120&flags=1";

#[tokio::test]
async fn test_control_page() {
    let (app, link) = mock_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(body.to_vec()).unwrap();

    assert!(page.contains(r#"action="/send""#));
    assert!(page.contains(r#"action="/dark""#));
    assert!(page.contains(r#"action="/rssi""#));
    assert!(page.contains(r#"action="/sleep""#));
    assert!(link.written().is_empty());
}

#[tokio::test]
async fn test_send_pattern() {
    let (app, link) = mock_app();

    let response = app.oneshot(form_post("/send", VALID_SET)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert_eq!(link.written(), "SET 2 255 0 0 0 0 255 120 1\n");
}

#[tokio::test]
async fn test_send_rejects_non_integer_bpm() {
    let (app, link) = mock_app();

    let body = VALID_SET.replace("bpm=120", "bpm=fast");
    let response = app.oneshot(form_post("/send", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(link.written().is_empty());
}

#[tokio::test]
async fn test_send_rejects_out_of_range_color() {
    let (app, link) = mock_app();

    let body = VALID_SET.replace("primary_r=255", "primary_r=256");
    let response = app.oneshot(form_post("/send", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(link.written().is_empty());
}

#[tokio::test]
async fn test_send_forwards_any_integer() {
    let (app, link) = mock_app();

    let body = VALID_SET
        .replace("pattern=2", "pattern=300")
        .replace("bpm=120", "bpm=-5")
        .replace("flags=1", "flags=-1");
    let response = app.oneshot(form_post("/send", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(link.written(), "SET 300 255 0 0 0 0 255 -5 -1\n");
}

#[tokio::test]
async fn test_send_rejects_missing_field() {
    let (app, link) = mock_app();

    let response = app
        .oneshot(form_post("/send", "pattern=1&bpm=60&flags=0"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(link.written().is_empty());
}

#[tokio::test]
async fn test_bare_commands() {
    for (uri, line) in [("/dark", "DARK\n"), ("/rssi", "RSSI\n"), ("/sleep", "SLEEP\n")] {
        let (app, link) = mock_app();

        let response = app.oneshot(form_post(uri, "")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(response.headers()[header::LOCATION], "/", "{uri}");
        assert_eq!(link.written(), line, "{uri}");
    }
}

#[tokio::test]
async fn test_write_failure_is_server_error() {
    let state = AppState {
        sender: Arc::new(CommandSender::new(Unplugged)),
    };
    let app = create_app(state, static_dir());

    let response = app.oneshot(form_post("/dark", "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_static_assets() {
    let (app, _) = mock_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/static/style.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_on_action_is_not_allowed() {
    let (app, link) = mock_app();

    let response = app
        .oneshot(Request::builder().uri("/dark").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(link.written().is_empty());
}
