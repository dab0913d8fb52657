use std::fmt;
use serde::{Deserialize, Serialize};

use super::line::LineRef;

// @module: Non-fatal structural warnings

/// Advisory event raised while segmenting. Never interrupts processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentationWarning {
    /// Answer marker seen before any question; an implicit question was opened
    OrphanAnswer { at: LineRef },

    /// Subdivision marker seen before any question; an implicit question was opened
    OrphanSubdivision { at: LineRef, label: String },

    /// Second answer marker for one question; an implicit question was opened for it
    DuplicateAnswer { at: LineRef, question: Option<String> },

    /// Subdivision label already used under the same parent; kept as prose
    DuplicateSubdivisionLabel { at: LineRef, label: String },

    /// Answer label differs from the label of the question it was attached to
    LabelMismatch { at: LineRef, question: String, answer: String },

    /// Line removed by the noise filter
    NoiseLineSkipped { at: LineRef, text: String },
}

impl SegmentationWarning {
    pub fn at(&self) -> LineRef {
        match self {
            Self::OrphanAnswer { at }
            | Self::OrphanSubdivision { at, .. }
            | Self::DuplicateAnswer { at, .. }
            | Self::DuplicateSubdivisionLabel { at, .. }
            | Self::LabelMismatch { at, .. }
            | Self::NoiseLineSkipped { at, .. } => *at,
        }
    }
}

impl fmt::Display for SegmentationWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::OrphanAnswer { at } => {
                write!(f, "{}: answer marker before any question, opened an unlabeled question", at)
            }
            Self::OrphanSubdivision { at, label } => write!(
                f,
                "{}: subdivision '{}' before any question, opened an unlabeled question",
                at, label
            ),
            Self::DuplicateAnswer { at, question } => write!(
                f,
                "{}: question {} already has an answer, opened an unlabeled question",
                at,
                question.as_deref().unwrap_or("(unlabeled)")
            ),
            Self::DuplicateSubdivisionLabel { at, label } => {
                write!(f, "{}: subdivision '{}' repeated, kept as text", at, label)
            }
            Self::LabelMismatch { at, question, answer } => write!(
                f,
                "{}: answer {} attached to question {}",
                at, answer, question
            ),
            Self::NoiseLineSkipped { at, text } => write!(f, "{}: skipped noise line '{}'", at, text),
        }
    }
}
