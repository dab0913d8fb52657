/*!
 * Line classification and segmentation.
 *
 * This module turns ordered OCR lines into question/answer records:
 * - `patterns`: prioritized marker recognizers
 * - `state`: transition table and the continuity cursor
 * - `engine`: one line in, one decision out
 * - `assembler`: folds decisions into `document` records
 */

use std::sync::Arc;

use log::info;

pub mod assembler;
pub mod document;
pub mod engine;
pub mod line;
pub mod patterns;
pub mod state;
pub mod warnings;

pub use assembler::{normalize_body, DocumentAssembler};
pub use document::{AnswerRecord, DocumentStats, QuestionRecord, SegmentedDocument, SubdivisionRecord};
pub use engine::{AppliedTransition, ClassificationEngine, EngineOptions, SkipReason};
pub use line::{Line, LineRef};
pub use patterns::{MarkerKind, MarkerMatch, PatternLibrary, PatternRule, PatternTable};
pub use state::{BlockId, ContinuityState, EngineState, Parent, ParentBlock, QuestionId};
pub use warnings::SegmentationWarning;

/// Segment a whole document given as images of lines, in reading order
pub fn segment_images(
    images: &[Vec<String>],
    library: Arc<PatternLibrary>,
    options: EngineOptions,
) -> SegmentedDocument {
    let mut engine = ClassificationEngine::new(library, options);
    let mut assembler = DocumentAssembler::new();

    for line in Line::iter_images(images) {
        let transition = engine.advance(&line);
        assembler.apply(&line, &transition);
    }

    let mut document = assembler.finish(engine.finish());
    document.stats.images = images.len();

    info!(
        "Segmented {} lines from {} images into {} questions ({} warnings)",
        document.stats.lines,
        document.stats.images,
        document.question_count(),
        document.warnings.len()
    );

    document
}
