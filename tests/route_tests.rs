// HTTP route tests (router driven in-process, Bria API mocked)
// Author: kelexine (https://github.com/kelexine)

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bria_proxy::bria::BriaClient;
use bria_proxy::config::AppConfig;
use bria_proxy::server::create_router;
use mockito::Matcher;
use serde_json::{json, Value};
use tower::util::ServiceExt;

const BOUNDARY: &str = "bria-proxy-test-boundary";

fn app(base_url: &str) -> Router {
    app_with(base_url, |_| {})
}

fn app_with(base_url: &str, customize: impl FnOnce(&mut AppConfig)) -> Router {
    let mut config = AppConfig::default();
    config.bria.api_base_url = base_url.to_string();
    config.bria.api_token = "test-token".to_string();
    customize(&mut config);

    let client = BriaClient::new(&config.bria).unwrap();
    create_router(config, client).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Build a multipart body from (name, filename, value) triples.
fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
    let mut body = String::new();
    for (name, file_name, value) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                name, file_name
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    let body = multipart_body(parts);

    Request::builder()
        .method("POST")
        .uri("/removebg")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_prompt_route_scenario() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/prompt_enhancer")
        .match_body(Matcher::Json(json!({"prompt": "a cat"})))
        .with_status(200)
        .with_body(r#"{"prompt variations":"a cat sitting on a windowsill"}"#)
        .expect(1)
        .create_async()
        .await;

    let (status, body) = send(app(&server.url()), get("/prompt/a%20cat")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "original_prompt": "a cat",
            "enhanced_prompt": "a cat sitting on a windowsill"
        })
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_oversized_prompt_returns_400_without_upstream_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let long = "a".repeat(2001);
    let (status, body) = send(app(&server.url()), get(&format!("/prompt/{}", long))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Prompt too long! Max length is 2000 characters."})
    );

    let (status, _) = send(app(&server.url()), get(&format!("/image/{}", long))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_image_route_returns_urls() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/text-to-image/base/2.3")
        .with_status(200)
        .with_body(r#"{"result":[{"urls":["https://cdn/fox.png"]}]}"#)
        .create_async()
        .await;

    let (status, body) = send(app(&server.url()), get("/image/a%20red%20fox")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"prompt": "a red fox", "image_urls": ["https://cdn/fox.png"]})
    );
}

#[tokio::test]
async fn test_upstream_failure_is_reported_with_context() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/text-to-image/base/2.3")
        .with_status(401)
        .with_body(r#"{"message":"bad token test-token"}"#)
        .create_async()
        .await;

    let (status, body) = send(app(&server.url()), get("/image/a%20cat")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate image. Please try again.");
    assert!(body["details"].as_str().unwrap().contains("API token"));
    assert!(!body.to_string().contains("test-token"));
}

#[tokio::test]
async fn test_upstream_timeout_is_500() {
    // Accepts connections and never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let app = app_with(&format!("http://{}", addr), |config| {
        config.bria.prompt_timeout_ms = 200;
    });
    let (status, body) = send(app, get("/prompt/a%20cat")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to enhance prompt. Please try again.");
    assert!(body["details"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_configured_prompt_limit_applies_to_routes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;
    let app = app_with(&server.url(), |config| config.limits.max_prompt_chars = 10);

    let (status, body) = send(app.clone(), get("/prompt/eleven%20char")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Prompt too long! Max length is 10 characters."})
    );

    let (status, _) = send(app, get("/image/eleven%20char")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_oversized_upload_is_json_413() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;
    let app = app_with(&server.url(), |config| config.limits.max_upload_bytes = 1);

    let image = "A".repeat(200 * 1024);
    let request = multipart_request(&[("image", Some("cat.png"), &image)]);
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].as_str().unwrap().contains("too large"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_removebg_image_part_without_filename_is_missing_file() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let request = multipart_request(&[("image", None, "PNGDATA")]);
    let (status, body) = send(app(&server.url()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing image file"}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_removebg_uses_first_image_part() {
    let mut server = mockito::Server::new_async().await;
    let second = server
        .mock("POST", "/background/remove")
        .match_body(Matcher::Regex(r#"filename="second.png""#.to_string()))
        .expect(0)
        .create_async()
        .await;
    let first = server
        .mock("POST", "/background/remove")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"filename="first.png""#.to_string()),
            Matcher::Regex("FIRSTDATA".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"result_url":"https://cdn/first.png"}"#)
        .expect(1)
        .create_async()
        .await;

    let request = multipart_request(&[
        ("image", Some("first.png"), "FIRSTDATA"),
        ("image", Some("second.png"), "SECONDDATA"),
    ]);
    let (status, body) = send(app(&server.url()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result_url": "https://cdn/first.png"}));
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_removebg_without_file_returns_400_without_upstream_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let request = multipart_request(&[("sync", None, "true")]);
    let (status, body) = send(app(&server.url()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing image file"}));

    // Not multipart at all
    let request = Request::builder()
        .method("POST")
        .uri("/removebg")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&server.url()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing image file"}));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_removebg_with_empty_filename_returns_400() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let request = multipart_request(&[("image", Some(""), "PNGDATA")]);
    let (status, body) = send(app(&server.url()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No file selected"}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_removebg_forwards_form_flags() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/background/remove")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"filename="cat.png""#.to_string()),
            Matcher::Regex(r#"name="preserve_partial_alpha"\s+true"#.to_string()),
            Matcher::Regex(r#"name="sync"\s+false"#.to_string()),
            Matcher::Regex(r#"name="content_moderation"\s+true"#.to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"result_url":"https://cdn/cutout.png"}"#)
        .expect(1)
        .create_async()
        .await;

    let request = multipart_request(&[
        ("image", Some("cat.png"), "PNGDATA"),
        ("sync", None, "False"),
        ("content_moderation", None, "TRUE"),
    ]);
    let (status, body) = send(app(&server.url()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result_url": "https://cdn/cutout.png"}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_removebg_upstream_error_is_relayed_as_data() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/background/remove")
        .with_status(503)
        .with_body("upstream down")
        .create_async()
        .await;

    let request = multipart_request(&[("image", Some("cat.png"), "PNGDATA")]);
    let (status, body) = send(app(&server.url()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"error": "Bria API error: 503", "details": "upstream down"})
    );
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (status, body) = send(app("http://127.0.0.1:9"), get("/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Endpoint not found"}));
}

#[tokio::test]
async fn test_health_and_request_id() {
    let response = app("http://127.0.0.1:9")
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["checks"]["configuration"]["message"]
        .as_str()
        .unwrap()
        .contains("127.0.0.1:9"));
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_request_counters() {
    let app = app("http://127.0.0.1:9");
    app.clone().oneshot(get("/health")).await.unwrap();

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("requests_total"));
}
