use anyhow::{Context, Result};
use std::fmt::Write;

use crate::app_config::OutputFormat;
use crate::segmentation::document::{QuestionRecord, SegmentedDocument, SubdivisionRecord};

// @module: Rendering of segmented documents

const BANNER_WIDTH: usize = 70;

/// Render a document in the requested format
pub fn render(document: &SegmentedDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(document)),
        OutputFormat::Json => render_json(document),
    }
}

/// Pretty-printed JSON, warnings and stats included
pub fn render_json(document: &SegmentedDocument) -> Result<String> {
    serde_json::to_string_pretty(document).context("Failed to serialize segmented document")
}

/// Plain-text report: one section per question, then the warnings
pub fn render_text(document: &SegmentedDocument) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{}", banner);
    let _ = writeln!(out, "QUESTIONS AND ANSWERS");
    let _ = writeln!(out, "{}", banner);

    if document.is_empty() {
        let _ = writeln!(out, "No questions detected");
    }

    for (index, question) in document.questions.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        write_question(&mut out, index + 1, question);
    }

    if !document.warnings.is_empty() {
        let _ = writeln!(out, "\n{}", banner);
        let _ = writeln!(out, "WARNINGS");
        let _ = writeln!(out, "{}", banner);
        for warning in &document.warnings {
            let _ = writeln!(out, "- {}", warning);
        }
    }

    let _ = writeln!(out, "\n{}", banner);
    let _ = writeln!(
        out,
        "{} questions, {} answered, {} images, {} lines",
        document.question_count(),
        document.answered_count(),
        document.stats.images,
        document.stats.lines
    );

    out
}

fn write_question(out: &mut String, ordinal: usize, question: &QuestionRecord) {
    let heading = match &question.label {
        Some(label) => format!("Q{}.", label),
        None => format!("Q({}).", ordinal),
    };
    let _ = writeln!(out, "{} {}", heading, question.body);
    write_subdivisions(out, &question.subdivisions);

    let answer = &question.answer;
    if !answer.is_present() {
        let _ = writeln!(out, "A: (no answer)");
        return;
    }

    let heading = match &answer.label {
        Some(label) => format!("A{}.", label),
        None => "A:".to_string(),
    };
    let _ = writeln!(out, "{} {}", heading, answer.body);
    write_subdivisions(out, &answer.subdivisions);
}

fn write_subdivisions(out: &mut String, subdivisions: &[SubdivisionRecord]) {
    for subdivision in subdivisions {
        let _ = writeln!(out, "    ({}) {}", subdivision.label, subdivision.body);
    }
}
