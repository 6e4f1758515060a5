/*!
 * Common test utilities for the haml-i18n-extract test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

/// Initializes logging for tests; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample Haml template for testing
pub fn create_test_template(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = "\
%h1 Dashboard
%p.lead Welcome back
= \"Job ##{@job.id}\"
- total = 5
/ layout comment
Just plain text
%span= _t('.already_done')
";
    create_test_file(dir, filename, content)
}
