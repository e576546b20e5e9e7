//! Executes one test case against a live target

use super::verdict::VerdictPolicy;
use crate::assertion::{auto_discover, evaluate};
use crate::constants;
use crate::error::Error;
use crate::http_client::build_http_client;
use crate::logging;
use crate::model::{HttpMethod, ResponseSnapshot, TestCase, TestResult};
use indexmap::IndexMap;
use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Why a request produced no HTTP response
#[derive(Debug, Error)]
pub enum TransportFailure {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl TransportFailure {
    fn classify(error: &reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout.as_secs())
        } else if error.is_connect() {
            Self::Connect(error_chain(error))
        } else {
            Self::Request(error_chain(error))
        }
    }
}

/// Flattens an error and its sources into one line
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutorConfig {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub verdict: VerdictPolicy,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(constants::DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
            verdict: VerdictPolicy::default(),
        }
    }
}

/// Issues the request for a test case and judges the response.
///
/// Never retries. Non-2xx statuses are ordinary observations.
#[derive(Debug, Clone)]
pub struct TestExecutor {
    client: reqwest::Client,
    config: ExecutorConfig,
    max_log_body: usize,
}

impl TestExecutor {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: ExecutorConfig) -> Result<Self, Error> {
        let client = build_http_client(config.request_timeout, config.connect_timeout)?;
        Ok(Self::with_client(client, config))
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, config: ExecutorConfig) -> Self {
        Self {
            client,
            config,
            max_log_body: logging::get_max_body_len(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Runs one test case. Transport failures become failed results.
    pub async fn run(&self, test_case: Arc<TestCase>, base_url: &str) -> TestResult {
        let started = Instant::now();
        match self.exchange(&test_case, base_url).await {
            Ok(response) => {
                let duration_ms = elapsed_ms(started);
                let mut assertion_results =
                    auto_discover(&response, test_case.expected_status);
                assertion_results.extend(
                    test_case
                        .assertions
                        .iter()
                        .map(|assertion| evaluate(assertion, &response)),
                );
                let passed = self.config.verdict.judge(
                    response.status,
                    test_case.expected_status,
                    &assertion_results,
                );

                debug!(
                    target: "apiprobe::executor",
                    test = %test_case.name,
                    status = response.status,
                    passed,
                    assertions = assertion_results.len(),
                    "Test case judged"
                );

                TestResult {
                    status_code: response.status,
                    test_case,
                    passed,
                    duration_ms,
                    assertion_results,
                    response_snapshot: response,
                    error: None,
                }
            }
            Err(failure) => {
                debug!(
                    target: "apiprobe::executor",
                    test = %test_case.name,
                    error = %failure,
                    "Transport failure"
                );
                TestResult::transport_failure(test_case, elapsed_ms(started), failure.to_string())
            }
        }
    }

    async fn exchange(
        &self,
        test_case: &TestCase,
        base_url: &str,
    ) -> Result<ResponseSnapshot, TransportFailure> {
        let url = build_url(base_url, test_case)?;

        let mut request = self
            .client
            .request(test_case.method.to_reqwest(), url.clone());
        let body_text = if test_case.method == HttpMethod::Get {
            None
        } else {
            request = request.json(&test_case.params);
            Some(Value::Object(test_case.params.clone()).to_string())
        };

        logging::log_request(&test_case.name, test_case.method, url.as_str(), body_text.as_deref());

        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| TransportFailure::classify(&e, self.config.request_timeout))?;

        let status = response.status();
        let mut headers: IndexMap<String, String> = IndexMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes());
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert_with(|| value.into_owned());
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportFailure::Timeout(self.config.request_timeout.as_secs())
            } else {
                TransportFailure::Body(error_chain(&e))
            }
        })?;

        logging::log_response(
            status.as_u16(),
            elapsed_ms(started),
            headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            &text,
            self.max_log_body,
        );

        Ok(ResponseSnapshot {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: parse_body(&text),
        })
    }
}

/// Concatenates base URL and endpoint, adding GET params as a query string
fn build_url(base_url: &str, test_case: &TestCase) -> Result<Url, TransportFailure> {
    let base = if test_case.endpoint.starts_with('/') {
        base_url.trim_end_matches('/')
    } else {
        base_url
    };
    let raw = format!("{base}{}", test_case.endpoint);

    let mut url = Url::parse(&raw).map_err(|e| TransportFailure::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    if test_case.method == HttpMethod::Get && !test_case.params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &test_case.params {
            match value {
                Value::String(s) => pairs.append_pair(name, s),
                Value::Null => pairs.append_pair(name, ""),
                other => pairs.append_pair(name, &other.to_string()),
            };
        }
    }
    Ok(url)
}

/// JSON when the body parses, the raw text otherwise, null when empty
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
