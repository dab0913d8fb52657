/*!
 * Tests for loading OCR output from disk
 */

use anyhow::Result;

use qasplit::app_config::InputConfig;
use qasplit::errors::InputError;
use qasplit::ocr_input::{discover_documents, load_document, load_page_directory};

use crate::common;

#[tokio::test]
async fn test_loadPageDirectory_shouldKeepNaturalPageOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    for index in 1..=12 {
        common::create_test_file(temp_dir.path(), &format!("p{}.txt", index), &format!("line {}", index))?;
    }

    // Low concurrency and high concurrency must agree on order
    let serial = load_page_directory(temp_dir.path(), 1).await?;
    let parallel = load_page_directory(temp_dir.path(), 8).await?;

    assert_eq!(serial, parallel);
    assert_eq!(serial.len(), 12);
    assert_eq!(serial[1], vec!["line 2".to_string()]);
    assert_eq!(serial[11], vec!["line 12".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_loadDocument_formFeedText_shouldSplitImages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "scan.txt",
        "Q1. What is\n\n\x0cgravity?\nA1. A force.\n\x0c",
    )?;

    let images = load_document(&path, &InputConfig::default()).await?;
    assert_eq!(images, common::images(common::SAMPLE_EXAM));
    Ok(())
}

#[tokio::test]
async fn test_loadDocument_json_shouldMatchTextLayout() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "scan.json",
        r#"{"images": [["Q1. What is", ""], ["gravity?", "A1. A force."]]}"#,
    )?;

    let images = load_document(&path, &InputConfig::default()).await?;
    assert_eq!(images, common::images(common::SAMPLE_EXAM));
    Ok(())
}

#[tokio::test]
async fn test_loadDocument_missingPath_shouldReturnNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let err = load_document(&temp_dir.path().join("missing"), &InputConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<InputError>(), Some(InputError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn test_loadDocument_emptyDirectory_shouldReturnNoPages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let err = load_document(temp_dir.path(), &InputConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<InputError>(), Some(InputError::NoPages(_))));
    Ok(())
}

#[tokio::test]
async fn test_loadDocument_unsupportedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "scan.pdf", "%PDF")?;

    let err = load_document(&path, &InputConfig::default()).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<InputError>(), Some(InputError::Unsupported(_))));
    Ok(())
}

#[test]
fn test_discoverDocuments_shouldListFilesAndPageDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "exam10.json", "[]")?;
    common::create_test_file(temp_dir.path(), "exam2.txt", "Q1. x")?;
    common::create_test_file(temp_dir.path(), "readme.md", "ignored")?;
    common::create_page_directory(temp_dir.path(), "exam3", &[&["Q1. y"]])?;
    std::fs::create_dir(temp_dir.path().join("empty"))?;

    let documents = discover_documents(temp_dir.path(), &["qa.txt"])?;
    let names: Vec<_> = documents
        .iter()
        .map(|d| d.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["exam2.txt", "exam3", "exam10.json"]);
    Ok(())
}

#[test]
fn test_discoverDocuments_earlierReports_shouldBeSkipped() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "exam.txt", "Q1. x")?;
    common::create_test_file(temp_dir.path(), "exam.qa.txt", "report")?;
    common::create_test_file(temp_dir.path(), "exam.QA.JSON", "{}")?;
    common::create_test_file(temp_dir.path(), "exam.report", "custom")?;

    let documents = discover_documents(temp_dir.path(), &["qa.txt", ".qa.json", "report"])?;
    assert_eq!(documents, vec![temp_dir.path().join("exam.txt")]);

    // A bare input extension never hides documents
    let documents = discover_documents(temp_dir.path(), &["txt"])?;
    assert_eq!(documents.len(), 3);
    Ok(())
}

#[test]
fn test_discoverDocuments_missingDirectory_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(discover_documents(&temp_dir.path().join("none"), &[]).is_err());
    Ok(())
}
