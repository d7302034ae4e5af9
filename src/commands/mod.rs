//! Command implementations

pub mod batch;
pub mod chain;
pub mod dispatch;
pub mod init;
pub mod stats;
pub mod tree;

use std::fs;
use std::path::Path;

use upriver_core::error::Result;

/// Write a rendered report to `output` when given, stdout otherwise.
pub(crate) fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            tracing::info!(path = %path.display(), bytes = text.len(), "report_written");
        }
        None => println!("{}", text),
    }
    Ok(())
}
