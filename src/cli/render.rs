//! Rendering layer for generated cases and suite results.
//!
//! Converts structured values into user-facing output (stdout) in the
//! requested format (JSON, YAML, table). This module owns all `println!`
//! calls for command output.

use crate::assertion::body::excerpt;
use crate::cli::OutputFormat;
use crate::error::Error;
use crate::model::{TestCase, TestResult, TestSuiteResult};
use crate::service::GenerationSummary;
use serde::Serialize;
use std::sync::Arc;
use tabled::Table;

/// Longest error or detail shown in a table cell
const MAX_DETAIL_CHARS: usize = 60;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedOutput<'a> {
    test_cases: &'a [Arc<TestCase>],
    summary: &'a GenerationSummary,
}

#[derive(tabled::Tabled)]
struct CaseRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Expected")]
    expected: u16,
    #[tabled(rename = "Assertions")]
    assertions: usize,
}

#[derive(tabled::Tabled)]
struct ResultRow {
    #[tabled(rename = "Result")]
    verdict: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Time (ms)")]
    duration_ms: u64,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&TestResult> for ResultRow {
    fn from(result: &TestResult) -> Self {
        let case = &result.test_case;
        let status = if result.status_code == 0 {
            format!("- / {}", case.expected_status)
        } else {
            format!("{} / {}", result.status_code, case.expected_status)
        };
        let detail = result.error.as_deref().map_or_else(
            || {
                let passed = result.assertion_results.iter().filter(|a| a.passed).count();
                format!(
                    "{passed}/{} assertions passed",
                    result.assertion_results.len()
                )
            },
            |error| excerpt(error, MAX_DETAIL_CHARS),
        );
        Self {
            verdict: if result.passed { "PASS" } else { "FAIL" },
            name: case.name.clone(),
            method: case.method.to_string(),
            endpoint: case.endpoint.clone(),
            status,
            duration_ms: result.duration_ms,
            detail,
        }
    }
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        OutputFormat::Json | OutputFormat::Table => Ok(serde_json::to_string_pretty(value)?),
    }
}

/// Formats generated cases with their summary.
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn format_generated(
    test_cases: &[Arc<TestCase>],
    summary: &GenerationSummary,
    format: OutputFormat,
) -> Result<String, Error> {
    if format != OutputFormat::Table {
        return serialize(
            &GeneratedOutput {
                test_cases,
                summary,
            },
            format,
        );
    }

    let rows: Vec<CaseRow> = test_cases
        .iter()
        .map(|case| CaseRow {
            name: case.name.clone(),
            method: case.method.to_string(),
            endpoint: case.endpoint.clone(),
            expected: case.expected_status,
            assertions: case.assertions.len(),
        })
        .collect();
    Ok(format!(
        "{}\n{} test cases ({})",
        Table::new(&rows),
        summary.total,
        summary.source
    ))
}

/// Formats a suite result.
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn format_suite(result: &TestSuiteResult, format: OutputFormat) -> Result<String, Error> {
    if format != OutputFormat::Table {
        return serialize(result, format);
    }

    let rows: Vec<ResultRow> = result.results.iter().map(ResultRow::from).collect();
    let summary = result.summary;
    Ok(format!(
        "{}\n{}: {} passed, {} failed, {} total in {} ms",
        Table::new(&rows),
        result.config.name,
        summary.passed,
        summary.failed,
        summary.total,
        summary.duration_ms
    ))
}

/// Prints generated cases to stdout.
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn print_generated(
    test_cases: &[Arc<TestCase>],
    summary: &GenerationSummary,
    format: OutputFormat,
) -> Result<(), Error> {
    // ast-grep-ignore: no-println
    println!("{}", format_generated(test_cases, summary, format)?);
    Ok(())
}

/// Prints a suite result to stdout.
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn print_suite(result: &TestSuiteResult, format: OutputFormat) -> Result<(), Error> {
    // ast-grep-ignore: no-println
    println!("{}", format_suite(result, format)?);
    Ok(())
}
