mod common;

use apiprobe::config::GlobalConfig;
use apiprobe::http_client::build_http_client;
use apiprobe::server::build_router;
use apiprobe::service::TestService;
use common::two_users;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    base: String,
    client: reqwest::Client,
}

impl TestApp {
    async fn spawn() -> Self {
        let service = Arc::new(TestService::from_config(&GlobalConfig::default(), true).unwrap());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(service)).await.unwrap();
        });
        Self {
            base: format!("http://{addr}"),
            client: build_http_client(Duration::from_secs(10), Duration::from_secs(5)).unwrap(),
        }
    }

    async fn get(&self, route: &str) -> (u16, Value) {
        let response = self
            .client
            .get(format!("{}{route}", self.base))
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    async fn post(&self, route: &str, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .post(format!("{}{route}", self.base))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }
}

fn users_spec() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Users API", "version": "1.0.0"},
        "paths": {
            "/users": {
                "get": {"responses": {"200": {"description": "Array of users"}}},
                "post": {"responses": {"201": {"description": "Created"}}}
            }
        }
    })
}

async fn target() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_users()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_generate_then_run_by_generation_id() {
    let app = TestApp::spawn().await;
    let target = target().await;

    let (status, generated) = app
        .post("/tests/generate", &json!({"apiSpec": users_spec()}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(generated["summary"]["total"], 2);
    assert_eq!(generated["summary"]["source"], "fallback");
    assert_eq!(generated["summary"]["methods"], json!({"GET": 1, "POST": 1}));
    assert_eq!(generated["testCases"][1]["expectedStatus"], 201);
    let generation_id = generated["id"].as_str().unwrap().to_string();

    let (status, run) = app
        .post(
            "/tests/run",
            &json!({"baseUrl": target.uri(), "generationId": generation_id}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(run["summary"]["total"], 2);
    assert_eq!(run["summary"]["passed"], 2);
    assert_eq!(run["results"][0]["statusCode"], 200);
    assert!(run["config"]["name"]
        .as_str()
        .unwrap()
        .starts_with("Test Run "));

    let suite_id = run["id"].as_str().unwrap();
    let (status, stored) = app.get(&format!("/tests/{suite_id}")).await;
    assert_eq!(status, 200);
    assert_eq!(stored["id"], suite_id);

    let (status, view) = app.get(&format!("/tests/generated/{generation_id}")).await;
    assert_eq!(status, 200);
    assert_eq!(view["testCases"], generated["testCases"]);

    let (_, debug) = app.get("/tests/debug").await;
    assert_eq!(debug["status"], "ok");
    assert_eq!(debug["storedData"]["generatedTestCases"], 1);
    assert_eq!(debug["storedData"]["testResults"], 1);
}

#[tokio::test]
async fn test_run_with_inline_spec() {
    let app = TestApp::spawn().await;
    let target = target().await;

    let (status, run) = app
        .post(
            "/tests/run",
            &json!({"baseUrl": target.uri(), "apiSpec": users_spec()}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(run["summary"]["total"], 2);
}

#[tokio::test]
async fn test_run_failures_are_still_ok() {
    let app = TestApp::spawn().await;

    let (status, run) = app
        .post(
            "/tests/run",
            &json!({"baseUrl": "http://127.0.0.1:1", "apiSpec": users_spec()}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(run["summary"]["failed"], 2);
    assert_eq!(run["results"][0]["statusCode"], 0);
}

#[tokio::test]
async fn test_request_errors() {
    let app = TestApp::spawn().await;

    let (status, body) = app.post("/tests/generate", &json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid request: API specification is required");

    let (status, body) = app
        .post("/tests/generate", &json!({"apiSpec": {"openapi": "3.0.0"}}))
        .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("paths"));

    let (status, body) = app
        .post("/tests/run", &json!({"apiSpec": users_spec()}))
        .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("Base URL is required"));

    let (status, _) = app
        .post("/tests/run", &json!({"baseUrl": "http://localhost"}))
        .await;
    assert_eq!(status, 400);

    let (status, body) = app
        .post(
            "/tests/run",
            &json!({"baseUrl": "http://localhost", "generationId": "nope"}),
        )
        .await;
    assert_eq!(status, 404);
    assert!(body["error"].as_str().unwrap().contains("nope"));

    let (status, _) = app.get("/tests/unknown-suite").await;
    assert_eq!(status, 404);

    let (status, _) = app.get("/tests/generated/unknown").await;
    assert_eq!(status, 404);
}
