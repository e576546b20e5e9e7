//! Handler for `apiprobe generate`.

use crate::cli::commands::read_spec;
use crate::cli::render;
use crate::cli::OutputFormat;
use crate::config::GlobalConfig;
use crate::error::Error;
use crate::fs::FileSystem;
use crate::service::{build_generator, GenerationSummary};
use std::path::Path;
use tracing::info;

pub async fn execute<F: FileSystem>(
    fs: &F,
    spec_path: &Path,
    offline: bool,
    config: &GlobalConfig,
    format: OutputFormat,
) -> Result<(), Error> {
    let raw = read_spec(fs, spec_path)?;
    let generator = build_generator(config, offline)?;
    let (_, generated) = generator.generate_from_text(&raw).await?;

    info!(
        target: "apiprobe::cli",
        total = generated.test_cases.len(),
        source = %generated.source,
        "Generated test cases"
    );

    let summary = GenerationSummary::of(&generated.test_cases, generated.source);
    render::print_generated(&generated.test_cases, &summary, format)
}
