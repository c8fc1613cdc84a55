/*!
 * Common test utilities for the subtrans test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, &sample_subtitle_lines().join("\n"))
}

/// The lines of a small three-block SRT document.
///
/// No trailing blank line: a final `\n`-terminated separator would not
/// survive a write/load round trip, line-splitting treats it as a terminator.
pub fn sample_subtitle_lines() -> Vec<String> {
    [
        "1",
        "00:00:01,000 --> 00:00:04,000",
        "This is a test subtitle.",
        "",
        "2",
        "00:00:05,000 --> 00:00:09,000",
        "It contains multiple entries.",
        "",
        "3",
        "00:00:10,000 --> 00:00:14,000",
        "For testing purposes.",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

/// Generate a larger SRT document with `blocks` dialogue blocks
pub fn generate_subtitle_lines(blocks: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(blocks * 4);
    for i in 0..blocks {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{}", i + 1));
        lines.push(format!(
            "00:00:{:02},000 --> 00:00:{:02},500",
            (i * 2) % 60,
            (i * 2 + 1) % 60
        ));
        lines.push(format!("Dialogue line number {}.", i + 1));
    }
    lines
}
