//! CLI command handlers.
//!
//! Each submodule handles a top-level command variant from [`Commands`].
//!
//! [`Commands`]: crate::cli::Commands

use crate::error::Error;
use crate::fs::FileSystem;
use std::path::Path;

#[allow(clippy::missing_errors_doc)]
pub mod config;
#[allow(clippy::missing_errors_doc)]
pub mod generate;
#[allow(clippy::missing_errors_doc)]
pub mod run;
#[allow(clippy::missing_errors_doc)]
pub mod serve;

/// Reads a specification file, naming the path in any I/O failure
pub(crate) fn read_spec<F: FileSystem>(fs: &F, path: &Path) -> Result<String, Error> {
    fs.read_to_string(path)
        .map_err(|e| Error::from(e).with_context(&format!("Failed to read {}", path.display())))
}
