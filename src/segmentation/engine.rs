/*!
 * Line classification engine.
 *
 * One line in, one `AppliedTransition` out. The engine owns the pattern
 * library handle, the options and the continuity cursor; it never reorders,
 * batches or revisits a line. Content never produces a hard error: the worst
 * case is a line landing in the wrong open block, and structural oddities are
 * reported as `SegmentationWarning`s.
 */

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::line::Line;
use super::patterns::{clean_line, MarkerKind, MarkerMatch, PatternLibrary};
use super::state::{
    transition, Action, BlockId, ContinuityState, EngineState, Event, Parent, QuestionId,
};
use super::warnings::SegmentationWarning;

/// Opt-in heuristics and filters. The defaults apply markers only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Remove characters other than word characters, whitespace and basic punctuation
    #[serde(default)]
    pub strip_noise_characters: bool,

    /// Skip non-blank lines shorter than this many characters (0 disables)
    #[serde(default)]
    pub min_line_chars: usize,

    /// An unmarked line ending in `?` inside an answer opens a new question
    #[serde(default)]
    pub question_mark_opens_question: bool,

    /// An unmarked line following a blank line inside a question opens its answer
    #[serde(default)]
    pub blank_line_opens_answer: bool,
}

impl EngineOptions {
    /// Every heuristic of the original OCR script turned on
    pub fn original_heuristics() -> Self {
        Self {
            strip_noise_characters: true,
            min_line_chars: 2,
            question_mark_opens_question: true,
            blank_line_opens_answer: true,
        }
    }
}

/// Why a line produced no content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Blank line before any block exists
    LeadingBlank,
    /// Removed by the noise filter
    Noise,
}

/// Decision taken for one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedTransition {
    OpenQuestion {
        id: QuestionId,
        label: Option<String>,
        implicit: bool,
        text: String,
    },
    OpenAnswer {
        question: QuestionId,
        label: Option<String>,
        /// An unlabeled question was opened first to own this answer
        implicit_question: bool,
        text: String,
    },
    OpenSubdivision {
        block: BlockId,
        label: String,
        implicit_question: bool,
        text: String,
    },
    /// Text for an open block; empty for blank lines
    Append { block: BlockId, text: String },
    Skip { reason: SkipReason },
}

impl AppliedTransition {
    /// Block that received the line, if any
    pub fn block(&self) -> Option<BlockId> {
        match self {
            Self::OpenQuestion { id, .. } => Some(BlockId::Question(*id)),
            Self::OpenAnswer { question, .. } => Some(BlockId::Answer(*question)),
            Self::OpenSubdivision { block, .. } | Self::Append { block, .. } => Some(*block),
            Self::Skip { .. } => None,
        }
    }
}

/// Stateful classifier for one document run
pub struct ClassificationEngine {
    library: Arc<PatternLibrary>,
    options: EngineOptions,
    cursor: ContinuityState,
    warnings: Vec<SegmentationWarning>,
}

impl ClassificationEngine {
    pub fn new(library: Arc<PatternLibrary>, options: EngineOptions) -> Self {
        ClassificationEngine {
            library,
            options,
            cursor: ContinuityState::new(),
            warnings: Vec::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.cursor.state
    }

    pub fn cursor(&self) -> &ContinuityState {
        &self.cursor
    }

    pub fn warnings(&self) -> &[SegmentationWarning] {
        &self.warnings
    }

    /// End of document; hands back the collected warnings
    pub fn finish(self) -> Vec<SegmentationWarning> {
        self.warnings
    }

    /// Classify the next line. Call once per line in (image, position) order.
    pub fn advance(&mut self, line: &Line) -> AppliedTransition {
        let location = line.location();
        if let Some(last) = self.cursor.last_line {
            if location <= last {
                warn!("Line at {} advanced after {}", location, last);
            }
        }
        self.cursor.last_line = Some(location);

        let Some(text) = self.prepare(line) else {
            return AppliedTransition::Skip { reason: SkipReason::Noise };
        };

        let marker = self.library.classify_line(&text);
        let marker = self.reject_duplicate_subdivision(line, marker, &text);
        let event = self.event_for(&marker);
        let step = transition(self.cursor.state, event);

        debug!(
            "{}: {:?} in {:?} -> {:?}",
            location, event, self.cursor.state, step.action
        );

        let applied = self.apply(step.action, marker, line);
        self.cursor.state = step.next;
        self.cursor.previous_blank = event == Event::Blank;
        applied
    }

    /// Apply the noise filter. `None` means the line was dropped.
    fn prepare(&mut self, line: &Line) -> Option<String> {
        if line.is_blank() {
            return Some(String::new());
        }

        let text = if self.options.strip_noise_characters {
            clean_line(&line.text)
        } else {
            line.text.clone()
        };

        let too_short = self.options.min_line_chars > 0
            && text.trim().chars().count() < self.options.min_line_chars;

        if text.trim().is_empty() || too_short {
            self.push_warning(SegmentationWarning::NoiseLineSkipped {
                at: line.location(),
                text: line.text.trim().to_string(),
            });
            // A line cleaned down to nothing still separates paragraphs; a short one is transparent
            if text.trim().is_empty() {
                self.cursor.previous_blank = true;
            }
            return None;
        }

        Some(text)
    }

    /// A repeated subdivision label under the same parent is kept as prose
    fn reject_duplicate_subdivision(&mut self, line: &Line, marker: MarkerMatch, text: &str) -> MarkerMatch {
        if marker.kind != MarkerKind::Subdivision || self.cursor.state == EngineState::AwaitingFirstBlock {
            return marker;
        }

        match &marker.label {
            Some(label) if self.cursor.has_subdivision_label(label) => {
                self.push_warning(SegmentationWarning::DuplicateSubdivisionLabel {
                    at: line.location(),
                    label: label.clone(),
                });
                MarkerMatch::none(text)
            }
            _ => marker,
        }
    }

    fn event_for(&self, marker: &MarkerMatch) -> Event {
        match marker.kind {
            MarkerKind::Question => Event::Question,
            MarkerKind::Answer => Event::Answer,
            MarkerKind::Subdivision => Event::Subdivision,
            MarkerKind::None if marker.is_blank() => Event::Blank,
            MarkerKind::None => {
                let after_blank = self.cursor.previous_blank;
                let interrogative =
                    self.options.question_mark_opens_question && marker.remainder.ends_with('?');

                match (interrogative, after_blank) {
                    (true, true) => Event::InterrogativeAfterBlank,
                    (true, false) => Event::Interrogative,
                    (false, true) if self.options.blank_line_opens_answer => Event::ProseAfterBlank,
                    _ => Event::Prose,
                }
            }
        }
    }

    fn apply(&mut self, action: Action, marker: MarkerMatch, line: &Line) -> AppliedTransition {
        let MarkerMatch { label, remainder: text, .. } = marker;

        match action {
            Action::OpenQuestion => {
                let id = self.cursor.open_question(label.clone());
                AppliedTransition::OpenQuestion { id, label, implicit: false, text }
            }
            Action::OpenImplicitQuestion => self.open_implicit_question(text),
            Action::OpenAnswer | Action::OpenImplicitAnswer => self.open_answer(label, text, line),
            Action::OrphanAnswer => {
                self.push_warning(SegmentationWarning::OrphanAnswer { at: line.location() });
                self.open_answer(label, text, line)
            }
            Action::OrphanSubdivision => {
                let label = label.unwrap_or_else(|| self.cursor.next_subdivision_ordinal());
                self.push_warning(SegmentationWarning::OrphanSubdivision {
                    at: line.location(),
                    label: label.clone(),
                });
                self.cursor.open_question(None);
                self.open_subdivision(Parent::Question, label, text, true)
            }
            Action::OpenSubdivision(parent) => {
                let label = label.unwrap_or_else(|| self.cursor.next_subdivision_ordinal());
                self.open_subdivision(parent, label, text, false)
            }
            Action::Append => match self.cursor.active_block() {
                Some(block) => AppliedTransition::Append { block, text },
                None => self.open_implicit_question(text),
            },
            Action::AppendBlank => match self.cursor.active_block() {
                Some(block) => AppliedTransition::Append { block, text: String::new() },
                None => AppliedTransition::Skip { reason: SkipReason::LeadingBlank },
            },
            Action::Ignore => AppliedTransition::Skip { reason: SkipReason::LeadingBlank },
        }
    }

    fn open_implicit_question(&mut self, text: String) -> AppliedTransition {
        let id = self.cursor.open_question(None);
        AppliedTransition::OpenQuestion { id, label: None, implicit: true, text }
    }

    /// Open an answer for the current question, or for a fresh implicit
    /// question when there is none or it is already answered
    fn open_answer(&mut self, label: Option<String>, text: String, line: &Line) -> AppliedTransition {
        let mut implicit_question = false;

        if self.cursor.question.is_none() {
            self.cursor.open_question(None);
            implicit_question = true;
        } else if self.cursor.answered {
            self.push_warning(SegmentationWarning::DuplicateAnswer {
                at: line.location(),
                question: self.cursor.question_label.clone(),
            });
            self.cursor.open_question(None);
            implicit_question = true;
        } else if let (Some(question), Some(answer)) = (&self.cursor.question_label, &label) {
            if question != answer {
                self.push_warning(SegmentationWarning::LabelMismatch {
                    at: line.location(),
                    question: question.clone(),
                    answer: answer.clone(),
                });
            }
        }

        match self.cursor.open_answer() {
            Some(question) => AppliedTransition::OpenAnswer {
                question,
                label,
                implicit_question,
                text,
            },
            None => self.open_implicit_question(text),
        }
    }

    fn open_subdivision(
        &mut self,
        parent: Parent,
        label: String,
        text: String,
        implicit_question: bool,
    ) -> AppliedTransition {
        match self.cursor.open_subdivision(parent, label.clone()) {
            Some(block) => AppliedTransition::OpenSubdivision {
                block,
                label,
                implicit_question,
                text,
            },
            None => self.open_implicit_question(text),
        }
    }

    fn push_warning(&mut self, warning: SegmentationWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}
