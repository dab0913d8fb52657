use serde::{Deserialize, Serialize};

use super::line::LineRef;
use super::warnings::SegmentationWarning;

// @module: Assembled question/answer records

/// Labeled sub-block of a question or an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdivisionRecord {
    // @field: Lowercased label, unique within its parent
    pub label: String,

    // @field: Normalized body text
    pub body: String,
}

/// Answer owned by exactly one question
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub label: Option<String>,

    pub body: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subdivisions: Vec<SubdivisionRecord>,

    /// Line that opened the answer; `None` when no answer was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<LineRef>,
}

impl AnswerRecord {
    /// Whether an answer block was ever opened for the question
    pub fn is_present(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.subdivisions.is_empty()
    }
}

/// Top-level unit of a segmented document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    // @field: Marker label, `None` for implicit or unnumbered questions
    pub label: Option<String>,

    // @field: Opened without a question marker
    #[serde(default)]
    pub implicit: bool,

    pub body: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subdivisions: Vec<SubdivisionRecord>,

    pub answer: AnswerRecord,

    // @field: Line that opened the question
    pub source: LineRef,
}

impl QuestionRecord {
    /// Label for display, `?` when the question has none
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("?")
    }
}

/// Line counters for one document run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentStats {
    pub images: usize,
    pub lines: usize,
    pub blank_lines: usize,
    pub skipped_lines: usize,
}

/// Ordered questions plus the warnings raised while building them
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentedDocument {
    pub questions: Vec<QuestionRecord>,

    #[serde(default)]
    pub warnings: Vec<SegmentationWarning>,

    #[serde(default)]
    pub stats: DocumentStats,
}

impl SegmentedDocument {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.answer.is_present()).count()
    }

    /// Question labels in document order
    pub fn labels(&self) -> Vec<Option<&str>> {
        self.questions.iter().map(|q| q.label.as_deref()).collect()
    }

    /// First question carrying the given label
    pub fn find(&self, label: &str) -> Option<&QuestionRecord> {
        self.questions.iter().find(|q| q.label.as_deref() == Some(label))
    }
}
