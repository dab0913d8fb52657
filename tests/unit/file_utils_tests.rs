/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::cmp::Ordering;
use std::path::Path;

use qasplit::file_utils::{natural_cmp, FileManager, InputKind};

use crate::common;

#[test]
fn test_generate_output_path_withFile_shouldReplaceExtension() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/exam.json"),
        Path::new("/tmp/output"),
        "qa.txt",
    );
    assert_eq!(output_path, Path::new("/tmp/output/exam.qa.txt"));
}

#[test]
fn test_generate_output_path_withDirectory_shouldKeepName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let pages = common::create_page_directory(temp_dir.path(), "exam.v2", &[&["Q1. x"]])?;

    let output_path = FileManager::generate_output_path(&pages, temp_dir.path(), ".qa.json");
    assert_eq!(output_path, temp_dir.path().join("exam.v2.qa.json"));
    Ok(())
}

#[test]
fn test_findPageFiles_shouldSortNaturallyAndSkipOtherFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    for name in ["page10.txt", "page2.txt", "page1.txt", "notes.md", "sub/page3.txt"] {
        common::create_test_file(temp_dir.path(), name, "x")?;
    }

    let files = FileManager::find_page_files(temp_dir.path(), "txt")?;
    let names: Vec<_> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["page1.txt", "page2.txt", "page10.txt"]);
    Ok(())
}

#[test]
fn test_detectInputKind_shouldFollowShapeAndExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let text = common::create_test_file(temp_dir.path(), "scan.TXT", "x")?;
    let json = common::create_test_file(temp_dir.path(), "scan.json", "[]")?;
    let image = common::create_test_file(temp_dir.path(), "scan.png", "")?;

    assert_eq!(FileManager::detect_input_kind(temp_dir.path()), InputKind::PageDirectory);
    assert_eq!(FileManager::detect_input_kind(&text), InputKind::TextFile);
    assert_eq!(FileManager::detect_input_kind(&json), InputKind::JsonFile);
    assert_eq!(FileManager::detect_input_kind(&image), InputKind::Unknown);
    assert_eq!(FileManager::detect_input_kind(temp_dir.path().join("nope")), InputKind::Unknown);
    Ok(())
}

#[test]
fn test_writeToFile_shouldCreateParentDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested/deeper/report.qa.txt");

    FileManager::write_to_file(&path, "content")?;
    assert_eq!(std::fs::read_to_string(&path)?, "content");
    Ok(())
}

#[test]
fn test_naturalCmp_shouldCompareNumbersByValue() {
    assert_eq!(natural_cmp("page2", "page10"), Ordering::Less);
    assert_eq!(natural_cmp("page10", "page9"), Ordering::Greater);
    assert_eq!(natural_cmp("page007", "page7"), Ordering::Greater);
    assert_eq!(natural_cmp("a", "B"), Ordering::Less);
    assert_eq!(natural_cmp("same1", "same1"), Ordering::Equal);
}
