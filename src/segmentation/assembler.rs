/*!
 * Document assembler.
 *
 * Folds the (line, transition) stream produced by the classification engine
 * into owned question records. The assembler never reclassifies anything:
 * every transition names the block it targets, so the fold is a lookup plus
 * a push. Bodies stay as raw line lists until `finish`, where they are joined
 * with a single normalizing space.
 */

use log::warn;

use super::document::{
    AnswerRecord, DocumentStats, QuestionRecord, SegmentedDocument, SubdivisionRecord,
};
use super::engine::{AppliedTransition, SkipReason};
use super::line::{Line, LineRef};
use super::state::{BlockId, ParentBlock, QuestionId};
use super::warnings::SegmentationWarning;

#[derive(Debug)]
struct PendingSubdivision {
    label: String,
    lines: Vec<String>,
}

impl PendingSubdivision {
    fn finish(self) -> SubdivisionRecord {
        SubdivisionRecord {
            label: self.label,
            body: normalize_body(&self.lines),
        }
    }
}

#[derive(Debug)]
struct PendingAnswer {
    label: Option<String>,
    source: LineRef,
    lines: Vec<String>,
    subdivisions: Vec<PendingSubdivision>,
}

#[derive(Debug)]
struct PendingQuestion {
    label: Option<String>,
    implicit: bool,
    source: LineRef,
    lines: Vec<String>,
    subdivisions: Vec<PendingSubdivision>,
    answer: Option<PendingAnswer>,
}

impl PendingQuestion {
    fn implicit(source: LineRef) -> Self {
        PendingQuestion {
            label: None,
            implicit: true,
            source,
            lines: Vec::new(),
            subdivisions: Vec::new(),
            answer: None,
        }
    }

    fn finish(self) -> QuestionRecord {
        let answer = match self.answer {
            Some(answer) => AnswerRecord {
                label: answer.label,
                body: normalize_body(&answer.lines),
                subdivisions: answer.subdivisions.into_iter().map(PendingSubdivision::finish).collect(),
                source: Some(answer.source),
            },
            None => AnswerRecord::default(),
        };

        QuestionRecord {
            label: self.label,
            implicit: self.implicit,
            body: normalize_body(&self.lines),
            subdivisions: self.subdivisions.into_iter().map(PendingSubdivision::finish).collect(),
            answer,
            source: self.source,
        }
    }
}

/// Builds a `SegmentedDocument` from engine decisions
#[derive(Debug, Default)]
pub struct DocumentAssembler {
    questions: Vec<PendingQuestion>,
    stats: DocumentStats,
}

impl DocumentAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decision. `line` must be the line the decision was made for.
    pub fn apply(&mut self, line: &Line, transition: &AppliedTransition) {
        self.stats.lines += 1;
        self.stats.images = self.stats.images.max(line.image_index + 1);
        if line.is_blank() {
            self.stats.blank_lines += 1;
        }

        let source = line.location();
        match transition {
            AppliedTransition::OpenQuestion { id, label, implicit, text } => {
                let question = self.ensure_question(*id, source);
                question.label = label.clone();
                question.implicit = *implicit;
                question.lines.push(text.clone());
            }
            AppliedTransition::OpenAnswer { question, label, text, .. } => {
                let question = self.ensure_question(*question, source);
                question.answer = Some(PendingAnswer {
                    label: label.clone(),
                    source,
                    lines: vec![text.clone()],
                    subdivisions: Vec::new(),
                });
            }
            AppliedTransition::OpenSubdivision { block, label, text, .. } => {
                let BlockId::Subdivision { parent, .. } = *block else {
                    warn!("Subdivision opened on non-subdivision block {:?} at {}", block, source);
                    return;
                };
                self.ensure_question(parent.question(), source);

                match self.subdivisions_mut(parent) {
                    Some(subdivisions) => subdivisions.push(PendingSubdivision {
                        label: label.clone(),
                        lines: vec![text.clone()],
                    }),
                    None => warn!("No parent block for subdivision '{}' at {}", label, source),
                }
            }
            AppliedTransition::Append { block, text } => match self.lines_mut(*block) {
                Some(lines) => lines.push(text.clone()),
                None => warn!("Dropped text for unknown block {:?} at {}", block, source),
            },
            AppliedTransition::Skip { reason: SkipReason::Noise } => self.stats.skipped_lines += 1,
            AppliedTransition::Skip { reason: SkipReason::LeadingBlank } => {}
        }
    }

    /// Finalize every body and attach the engine's warnings
    pub fn finish(self, warnings: Vec<SegmentationWarning>) -> SegmentedDocument {
        SegmentedDocument {
            questions: self.questions.into_iter().map(PendingQuestion::finish).collect(),
            warnings,
            stats: self.stats,
        }
    }

    /// Question `id`, creating implicit questions up to it if the engine opened one
    /// without telling us first
    fn ensure_question(&mut self, id: QuestionId, source: LineRef) -> &mut PendingQuestion {
        while self.questions.len() <= id.0 {
            self.questions.push(PendingQuestion::implicit(source));
        }
        &mut self.questions[id.0]
    }

    fn subdivisions_mut(&mut self, parent: ParentBlock) -> Option<&mut Vec<PendingSubdivision>> {
        let question = self.questions.get_mut(parent.question().0)?;
        match parent {
            ParentBlock::Question(_) => Some(&mut question.subdivisions),
            ParentBlock::Answer(_) => question.answer.as_mut().map(|a| &mut a.subdivisions),
        }
    }

    fn lines_mut(&mut self, block: BlockId) -> Option<&mut Vec<String>> {
        match block {
            BlockId::Question(id) => self.questions.get_mut(id.0).map(|q| &mut q.lines),
            BlockId::Answer(id) => self
                .questions
                .get_mut(id.0)?
                .answer
                .as_mut()
                .map(|a| &mut a.lines),
            BlockId::Subdivision { parent, index } => self
                .subdivisions_mut(parent)?
                .get_mut(index)
                .map(|s| &mut s.lines),
        }
    }
}

/// Join accumulated lines into one body: blank lines and runs of whitespace
/// collapse to a single space, leading and trailing space is dropped
pub fn normalize_body(lines: &[String]) -> String {
    lines
        .iter()
        .flat_map(|line| line.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
