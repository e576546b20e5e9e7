//! Data types shared by the generator, the execution engine and the service layer

use crate::assertion::AssertionResult;
use crate::constants;
use crate::spec::ApiSpecification;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// HTTP methods a test case may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => constants::HTTP_METHOD_GET,
            Self::Post => constants::HTTP_METHOD_POST,
            Self::Put => constants::HTTP_METHOD_PUT,
            Self::Delete => constants::HTTP_METHOD_DELETE,
            Self::Patch => constants::HTTP_METHOD_PATCH,
        }
    }

    #[must_use]
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Patch => reqwest::Method::PATCH,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Case-insensitive parse of one of the five supported verbs
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            constants::HTTP_METHOD_GET => Ok(Self::Get),
            constants::HTTP_METHOD_POST => Ok(Self::Post),
            constants::HTTP_METHOD_PUT => Ok(Self::Put),
            constants::HTTP_METHOD_DELETE => Ok(Self::Delete),
            constants::HTTP_METHOD_PATCH => Ok(Self::Patch),
            _ => Err(format!("unsupported HTTP method '{s}'")),
        }
    }
}

/// One concrete request scenario. Created once by the generator and shared via `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub name: String,
    pub endpoint: String,
    pub method: HttpMethod,
    /// Sent as query parameters for GET, as a JSON body otherwise
    #[serde(default)]
    pub params: Map<String, Value>,
    pub expected_status: u16,
    #[serde(default)]
    pub assertions: Vec<String>,
}

/// What the target returned, kept as evidence on every result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSnapshot {
    pub status: u16,
    pub status_text: String,
    pub headers: IndexMap<String, String>,
    /// Parsed JSON when possible, the raw text otherwise, null when empty
    pub body: Value,
}

impl ResponseSnapshot {
    /// Snapshot recorded when no HTTP response was obtained
    #[must_use]
    pub fn transport_failure(cause: &str) -> Self {
        Self {
            status: 0,
            status_text: cause.to_string(),
            headers: IndexMap::new(),
            body: Value::Null,
        }
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(constants::HEADER_CONTENT_TYPE_LC))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test_case: Arc<TestCase>,
    pub passed: bool,
    pub duration_ms: u64,
    /// Zero when the request never produced an HTTP response
    pub status_code: u16,
    pub assertion_results: Vec<AssertionResult>,
    pub response_snapshot: ResponseSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestResult {
    /// A failed result for a case whose request never completed
    #[must_use]
    pub fn transport_failure(test_case: Arc<TestCase>, duration_ms: u64, cause: String) -> Self {
        Self {
            test_case,
            passed: false,
            duration_ms,
            status_code: 0,
            assertion_results: Vec::new(),
            response_snapshot: ResponseSnapshot::transport_failure(&cause),
            error: Some(cause),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSuiteConfig {
    pub name: String,
    pub base_url: String,
    pub api_spec: ApiSpecification,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

impl SuiteSummary {
    /// Counts results by verdict; `duration_ms` is the suite's wall-clock span
    #[must_use]
    pub fn from_results(results: &[TestResult], duration_ms: u64) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSuiteResult {
    pub id: String,
    pub config: TestSuiteConfig,
    /// In submission order
    pub results: Vec<TestResult>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub summary: SuiteSummary,
}

/// Which generation stage produced a set of test cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    Ai,
    Fallback,
}

impl fmt::Display for GenerationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ai => f.write_str("ai"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// Generated test cases retained for reuse by later runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    pub timestamp: DateTime<Utc>,
    pub api_spec: ApiSpecification,
    pub test_cases: Vec<Arc<TestCase>>,
    pub source: GenerationSource,
}
