//! Handler for `apiprobe run`.

use crate::cli::commands::read_spec;
use crate::cli::render;
use crate::cli::OutputFormat;
use crate::config::GlobalConfig;
use crate::error::Error;
use crate::fs::FileSystem;
use crate::model::TestSuiteConfig;
use crate::service::{build_generator, build_runner};
use chrono::{SecondsFormat, Utc};
use std::path::Path;

/// Generates and runs the suite, returning whether every case passed.
pub async fn execute<F: FileSystem>(
    fs: &F,
    spec_path: &Path,
    base_url: &str,
    offline: bool,
    config: &GlobalConfig,
    format: OutputFormat,
) -> Result<bool, Error> {
    if base_url.trim().is_empty() {
        return Err(Error::invalid_request("Base URL is required"));
    }

    let raw = read_spec(fs, spec_path)?;
    let generator = build_generator(config, offline)?;
    let runner = build_runner(config)?;

    let (api_spec, generated) = generator.generate_from_text(&raw).await?;
    let suite = TestSuiteConfig {
        name: format!(
            "Test Run {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        base_url: base_url.to_string(),
        api_spec,
    };
    let result = runner.run(suite, &generated.test_cases).await;

    render::print_suite(&result, format)?;
    Ok(result.summary.failed == 0)
}
