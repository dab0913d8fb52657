/*!
 * Common test utilities for the qasplit test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use qasplit::segmentation::{segment_images, EngineOptions, PatternLibrary, SegmentedDocument};

/// Route library logs through the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    init_test_logging();
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

/// Build owned images from string slices
pub fn images(pages: &[&[&str]]) -> Vec<Vec<String>> {
    pages
        .iter()
        .map(|page| page.iter().map(|line| line.to_string()).collect())
        .collect()
}

/// Segment with the built-in patterns and default options
pub fn segment(pages: &[&[&str]]) -> SegmentedDocument {
    init_test_logging();
    segment_images(&images(pages), PatternLibrary::builtin(), EngineOptions::default())
}

/// Write one `page-N.txt` file per image into `dir/name`, one line per row
pub fn create_page_directory(dir: &Path, name: &str, pages: &[&[&str]]) -> Result<PathBuf> {
    let page_dir = dir.join(name);
    fs::create_dir_all(&page_dir)?;
    for (index, page) in pages.iter().enumerate() {
        let content: String = page.iter().map(|line| format!("{}\n", line)).collect();
        create_test_file(&page_dir, &format!("page-{}.txt", index + 1), &content)?;
    }
    Ok(page_dir)
}

/// Two-page exam used across tests
pub const SAMPLE_EXAM: &[&[&str]] = &[
    &["Q1. What is", ""],
    &["gravity?", "A1. A force."],
];
