/*!
 * Tests for report rendering
 */

use anyhow::Result;

use qasplit::app_config::OutputFormat;
use qasplit::output::{render, render_text};
use qasplit::segmentation::SegmentedDocument;

use crate::common;

#[test]
fn test_render_text_sampleExam_shouldShowMergedQuestion() -> Result<()> {
    let doc = common::segment(common::SAMPLE_EXAM);
    let text = render(&doc, OutputFormat::Text)?;

    assert!(text.contains("Q1. What is gravity?\nA1. A force.\n"));
    assert!(text.starts_with(&"=".repeat(70)));
    Ok(())
}

#[test]
fn test_render_text_unanswered_shouldSayNoAnswer() {
    let doc = common::segment(&[&["Q1. Lonely question"]]);
    assert!(render_text(&doc).contains("Q1. Lonely question\nA: (no answer)\n"));
}

#[test]
fn test_render_json_shouldRoundTripDocument() -> Result<()> {
    let doc = common::segment(&[&["Preamble", "Q1. One", "a) part", "A1. Yes", "A2. Extra"]]);
    let json = render(&doc, OutputFormat::Json)?;
    let parsed: SegmentedDocument = serde_json::from_str(&json)?;

    assert_eq!(parsed, doc);
    Ok(())
}
