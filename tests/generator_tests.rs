mod common;

use apiprobe::config::models::FallbackSettings;
use apiprobe::generation::TestCaseGenerator;
use apiprobe::model::{GenerationSource, HttpMethod};
use apiprobe::provider::{ProviderError, TextGenerator};
use async_trait::async_trait;
use common::{parse_spec, LIST_USERS_SPEC, USERS_SPEC};
use mockall::mock;
use mockall::predicate::*;
use std::sync::Arc;

mock! {
    pub Backend {}

    #[async_trait]
    impl TextGenerator for Backend {
        fn name(&self) -> &'static str;
        async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
    }
}

fn backend_returning(text: &'static str) -> MockBackend {
    let mut backend = MockBackend::new();
    backend.expect_name().return_const("mock");
    backend
        .expect_generate()
        .times(1)
        .returning(move |_| Ok(text.to_string()));
    backend
}

fn generator(backend: MockBackend) -> TestCaseGenerator {
    TestCaseGenerator::with_text_generator(Arc::new(backend), FallbackSettings::default())
}

#[tokio::test]
async fn test_ai_cases_are_used_when_valid() {
    let backend = backend_returning(
        r#"Here are your tests:
```json
[
  {"name": "List users", "endpoint": "/users", "method": "GET", "expectedStatus": 200,
   "assertions": ["status code should be 200", "response should be an array"]},
  {"name": "Missing user", "endpoint": "/users/999", "method": "get", "params": {},
   "expectedStatus": 404, "assertions": ["status code should be 404"]}
]
```"#,
    );

    let generated = generator(backend).generate(&parse_spec(USERS_SPEC)).await;

    assert_eq!(generated.source, GenerationSource::Ai);
    assert_eq!(generated.test_cases.len(), 2);
    assert_eq!(generated.test_cases[1].method, HttpMethod::Get);
    assert_eq!(generated.test_cases[1].expected_status, 404);
}

#[tokio::test]
async fn test_prompt_includes_the_specification() {
    let mut backend = MockBackend::new();
    backend.expect_name().return_const("mock");
    backend
        .expect_generate()
        .with(function(|prompt: &str| {
            prompt.contains("/users/{id}") && prompt.contains("JSON array")
        }))
        .times(1)
        .returning(|_| Ok("[]".to_string()));

    // An empty array yields no valid cases, so the fallback runs
    let generated = generator(backend).generate(&parse_spec(USERS_SPEC)).await;
    assert_eq!(generated.source, GenerationSource::Fallback);
}

#[tokio::test]
async fn test_unparsable_output_falls_back() {
    let backend = backend_returning("I cannot help with that.");

    let generated = generator(backend).generate(&parse_spec(USERS_SPEC)).await;

    assert_eq!(generated.source, GenerationSource::Fallback);
    let endpoints: Vec<_> = generated
        .test_cases
        .iter()
        .map(|c| (c.method, c.endpoint.as_str(), c.expected_status))
        .collect();
    assert_eq!(
        endpoints,
        vec![
            (HttpMethod::Get, "/users", 200),
            (HttpMethod::Post, "/users", 201),
            (HttpMethod::Get, "/users/1", 200),
            (HttpMethod::Delete, "/users/1", 200),
        ]
    );
}

#[tokio::test]
async fn test_provider_error_falls_back() {
    let mut backend = MockBackend::new();
    backend.expect_name().return_const("mock");
    backend.expect_generate().times(1).returning(|_| {
        Err(ProviderError::Backend {
            provider: "mock",
            status: 503,
            message: "overloaded".to_string(),
        })
    });

    let generated = generator(backend)
        .generate(&parse_spec(LIST_USERS_SPEC))
        .await;

    assert_eq!(generated.source, GenerationSource::Fallback);
    assert_eq!(generated.test_cases.len(), 1);
    assert_eq!(
        generated.test_cases[0].assertions,
        vec!["status code should be 200".to_string()]
    );
}

#[tokio::test]
async fn test_malformed_candidates_are_dropped() {
    let backend = backend_returning(
        r#"[
  {"name": "ok", "endpoint": "/users", "method": "GET", "expectedStatus": 200, "assertions": []},
  {"name": "bad method", "endpoint": "/users", "method": "TRACE", "expectedStatus": 200, "assertions": []},
  {"name": "no status", "endpoint": "/users", "method": "GET", "assertions": []},
  {"endpoint": "/users", "method": "GET", "expectedStatus": 200, "assertions": []},
]"#,
    );

    let generated = generator(backend).generate(&parse_spec(USERS_SPEC)).await;

    assert_eq!(generated.source, GenerationSource::Ai);
    assert_eq!(generated.test_cases.len(), 1);
    assert_eq!(generated.test_cases[0].name, "ok");
}

#[tokio::test]
async fn test_all_candidates_invalid_falls_back() {
    let backend = backend_returning(
        r#"[{"name": "bad", "endpoint": "/users", "method": "OPTIONS", "expectedStatus": 200, "assertions": []}]"#,
    );

    let generated = generator(backend).generate(&parse_spec(USERS_SPEC)).await;

    assert_eq!(generated.source, GenerationSource::Fallback);
    assert_eq!(generated.test_cases.len(), 4);
}

#[tokio::test]
async fn test_spec_without_operations_skips_backend() {
    let mut backend = MockBackend::new();
    backend.expect_name().return_const("mock");
    backend.expect_generate().times(0);

    let spec = parse_spec(r#"{"openapi": "3.0.0", "info": {"title": "Empty"}, "paths": {}}"#);
    let generated = generator(backend).generate(&spec).await;

    assert!(generated.test_cases.is_empty());
}

#[tokio::test]
async fn test_generate_from_text_rejects_bad_spec() {
    let generator = TestCaseGenerator::deterministic(FallbackSettings::default());
    let err = generator
        .generate_from_text(r#"{"openapi": "3.0.0"}"#)
        .await
        .unwrap_err();
    assert!(err.is_client_error());
}
