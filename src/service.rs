//! The operations exposed over HTTP, independent of any web framework

use crate::config::models::GlobalConfig;
use crate::engine::{ExecutorConfig, SuiteRunner, TestExecutor};
use crate::error::Error;
use crate::generation::TestCaseGenerator;
use crate::http_client::build_http_client;
use crate::model::{GenerationRecord, GenerationSource, TestCase, TestSuiteConfig, TestSuiteResult};
use crate::provider::GeminiClient;
use crate::spec::{ApiSpecification, SpecValidator};
use crate::store::{InMemoryStore, Store};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// A specification document, or its JSON/YAML text
    pub api_spec: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub base_url: Option<String>,
    pub generation_id: Option<String>,
    pub api_spec: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub id: String,
    pub test_cases: Vec<Arc<TestCase>>,
    pub summary: GenerationSummary,
}

#[derive(Debug, Serialize)]
pub struct GenerationSummary {
    pub total: usize,
    /// Case count per method, in order of first appearance
    pub methods: IndexMap<String, usize>,
    pub source: GenerationSource,
}

impl GenerationSummary {
    #[must_use]
    pub fn of(test_cases: &[Arc<TestCase>], source: GenerationSource) -> Self {
        let mut methods = IndexMap::new();
        for case in test_cases {
            *methods.entry(case.method.to_string()).or_insert(0) += 1;
        }
        Self {
            total: test_cases.len(),
            methods,
            source,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedView {
    pub test_cases: Vec<Arc<TestCase>>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub status: &'static str,
    pub stored_data: StoredData,
    pub routes: Vec<RouteInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredData {
    pub generated_test_cases: usize,
    pub test_results: usize,
}

#[derive(Debug, Serialize)]
pub struct RouteInfo {
    pub path: &'static str,
    pub methods: Vec<&'static str>,
}

/// Generation, execution and lookup over injected stores
pub struct TestService {
    generator: TestCaseGenerator,
    runner: SuiteRunner,
    generations: Arc<dyn Store<Arc<GenerationRecord>>>,
    results: Arc<dyn Store<Arc<TestSuiteResult>>>,
}

impl TestService {
    #[must_use]
    pub fn new(
        generator: TestCaseGenerator,
        runner: SuiteRunner,
        generations: Arc<dyn Store<Arc<GenerationRecord>>>,
        results: Arc<dyn Store<Arc<TestSuiteResult>>>,
    ) -> Self {
        Self {
            generator,
            runner,
            generations,
            results,
        }
    }

    /// Wires a service from configuration with in-memory stores.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built
    pub fn from_config(config: &GlobalConfig, offline: bool) -> Result<Self, Error> {
        let ttl = config.store.ttl_secs.map(Duration::from_secs);
        Ok(Self::new(
            build_generator(config, offline)?,
            build_runner(config)?,
            Arc::new(InMemoryStore::new(ttl)),
            Arc::new(InMemoryStore::new(ttl)),
        ))
    }

    #[must_use]
    pub const fn generator(&self) -> &TestCaseGenerator {
        &self.generator
    }

    /// Generates and retains test cases for a specification.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` when no specification is given, `SpecFormat` or
    /// `SpecSchema` when it is malformed.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, Error> {
        let spec = parse_spec(request.api_spec)?;
        let generated = self.generator.generate(&spec).await;

        let id = uuid::Uuid::new_v4().to_string();
        let summary = GenerationSummary::of(&generated.test_cases, generated.source);
        let record = GenerationRecord {
            timestamp: Utc::now(),
            api_spec: spec,
            test_cases: generated.test_cases.clone(),
            source: generated.source,
        };
        self.generations.insert(id.clone(), Arc::new(record)).await;

        info!(target: "apiprobe::service", %id, total = summary.total, "Stored generation");

        Ok(GenerateResponse {
            id,
            test_cases: generated.test_cases,
            summary,
        })
    }

    /// Runs a suite from a stored generation or a fresh specification.
    ///
    /// A `generationId` takes precedence over `apiSpec`. Failed test cases are
    /// part of a successful result.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` when `baseUrl` or both sources are missing, `NotFound`
    /// for an unknown generation, spec errors for a malformed `apiSpec`.
    pub async fn run(&self, request: RunRequest) -> Result<Arc<TestSuiteResult>, Error> {
        let base_url = request
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::invalid_request("Base URL is required"))?;

        let (api_spec, test_cases) = match (request.generation_id, request.api_spec) {
            (Some(generation_id), _) => {
                let record = self
                    .generations
                    .get(&generation_id)
                    .await
                    .ok_or_else(|| Error::not_found("Generation", generation_id))?;
                (record.api_spec.clone(), record.test_cases.clone())
            }
            (None, Some(document)) => {
                let spec = parse_spec(Some(document))?;
                let generated = self.generator.generate(&spec).await;
                (spec, generated.test_cases)
            }
            (None, None) => {
                return Err(Error::invalid_request(
                    "Either generationId or apiSpec is required",
                ));
            }
        };

        let config = TestSuiteConfig {
            name: format!(
                "Test Run {}",
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
            base_url,
            api_spec,
        };
        let result = Arc::new(self.runner.run(config, &test_cases).await);
        self.results
            .insert(result.id.clone(), Arc::clone(&result))
            .await;
        Ok(result)
    }

    /// # Errors
    ///
    /// `NotFound` when no suite result has this id
    pub async fn suite_result(&self, id: &str) -> Result<Arc<TestSuiteResult>, Error> {
        self.results
            .get(id)
            .await
            .ok_or_else(|| Error::not_found("Test suite", id))
    }

    /// # Errors
    ///
    /// `NotFound` when no generation has this id
    pub async fn generated(&self, id: &str) -> Result<GeneratedView, Error> {
        let record = self
            .generations
            .get(id)
            .await
            .ok_or_else(|| Error::not_found("Generated test cases", id))?;
        Ok(GeneratedView {
            test_cases: record.test_cases.clone(),
            timestamp: record.timestamp,
        })
    }

    pub async fn debug(&self) -> DebugInfo {
        DebugInfo {
            status: "ok",
            stored_data: StoredData {
                generated_test_cases: self.generations.len().await,
                test_results: self.results.len().await,
            },
            routes: crate::server::ROUTES
                .iter()
                .map(|&(path, method)| RouteInfo {
                    path,
                    methods: vec![method],
                })
                .collect(),
        }
    }
}

/// Accepts a parsed document or a string holding JSON/YAML text
fn parse_spec(document: Option<Value>) -> Result<ApiSpecification, Error> {
    match document {
        None | Some(Value::Null) => Err(Error::invalid_request("API specification is required")),
        Some(Value::String(text)) => SpecValidator::new().validate(&text),
        Some(document) => SpecValidator::new().validate_value(document),
    }
}

/// Builds the generator: AI-assisted when enabled and a key is available,
/// deterministic otherwise.
///
/// # Errors
///
/// Returns an error if the generator's HTTP client cannot be built
pub fn build_generator(config: &GlobalConfig, offline: bool) -> Result<TestCaseGenerator, Error> {
    let fallback = config.fallback.clone();
    if offline || !config.generator.enabled {
        return Ok(TestCaseGenerator::deterministic(fallback));
    }

    let client = build_http_client(
        Duration::from_secs(config.generator.timeout_secs),
        Duration::from_secs(config.connect_timeout_secs),
    )?;
    let gemini = GeminiClient::from_settings(client, &config.generator);
    if !gemini.has_api_key() {
        warn!(
            target: "apiprobe::service",
            env = %config.generator.api_key_env,
            "No API key for the text generator, using deterministic generation only"
        );
        return Ok(TestCaseGenerator::deterministic(fallback));
    }
    Ok(TestCaseGenerator::with_text_generator(Arc::new(gemini), fallback))
}

/// Builds a suite runner from the configured timeouts, verdict policy and concurrency
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built
pub fn build_runner(config: &GlobalConfig) -> Result<SuiteRunner, Error> {
    let executor = TestExecutor::new(ExecutorConfig {
        request_timeout: Duration::from_secs(config.request_timeout_secs),
        connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        verdict: config.verdict,
    })?;
    Ok(SuiteRunner::new(executor, config.suite.max_concurrency))
}
