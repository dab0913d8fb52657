/*!
 * Tests for the classification engine and its transition table
 */

use qasplit::segmentation::engine::{AppliedTransition, ClassificationEngine, EngineOptions, SkipReason};
use qasplit::segmentation::state::{transition, Action, BlockId, EngineState, Event, Parent, ParentBlock, QuestionId};
use qasplit::segmentation::{Line, PatternLibrary, SegmentationWarning};

fn advance_all(engine: &mut ClassificationEngine, pages: &[&[&str]]) -> Vec<AppliedTransition> {
    let mut out = Vec::new();
    for (image, page) in pages.iter().enumerate() {
        for (position, text) in page.iter().enumerate() {
            out.push(engine.advance(&Line::new(image, position, *text)));
        }
    }
    out
}

/// Every state/event pair must resolve to a step
#[test]
fn test_transition_fullTable_shouldBeTotal() {
    let states = [
        EngineState::AwaitingFirstBlock,
        EngineState::InQuestion,
        EngineState::InAnswer,
        EngineState::InSubdivision(Parent::Question),
        EngineState::InSubdivision(Parent::Answer),
    ];
    let events = [
        Event::Question,
        Event::Answer,
        Event::Subdivision,
        Event::Prose,
        Event::ProseAfterBlank,
        Event::Interrogative,
        Event::InterrogativeAfterBlank,
        Event::Blank,
    ];

    for state in states {
        for event in events {
            let step = transition(state, event);
            // Only a leading blank keeps the engine waiting
            if step.next == EngineState::AwaitingFirstBlock {
                assert_eq!((state, event), (EngineState::AwaitingFirstBlock, Event::Blank));
                assert_eq!(step.action, Action::Ignore);
            }
        }
    }
}

#[test]
fn test_transition_blankInsideBlocks_shouldKeepState() {
    for state in [
        EngineState::InQuestion,
        EngineState::InAnswer,
        EngineState::InSubdivision(Parent::Answer),
    ] {
        let step = transition(state, Event::Blank);
        assert_eq!(step.action, Action::AppendBlank);
        assert_eq!(step.next, state);
    }
}

#[test]
fn test_advance_markerOnlyLine_shouldOpenEmptyBlock() {
    let mut engine = ClassificationEngine::new(PatternLibrary::builtin(), EngineOptions::default());
    let out = advance_all(&mut engine, &[&["Q5.", "Define entropy"]]);

    assert_eq!(
        out[0],
        AppliedTransition::OpenQuestion {
            id: QuestionId(0),
            label: Some("5".to_string()),
            implicit: false,
            text: String::new(),
        }
    );
    assert_eq!(
        out[1],
        AppliedTransition::Append {
            block: BlockId::Question(QuestionId(0)),
            text: "Define entropy".to_string(),
        }
    );
}

#[test]
fn test_advance_subdivisionLabels_shouldResetPerBlock() {
    let mut engine = ClassificationEngine::new(PatternLibrary::builtin(), EngineOptions::default());
    let out = advance_all(&mut engine, &[&["Q1. List", "a) one", "A1. Sure", "a) again"]]);

    assert!(matches!(
        &out[3],
        AppliedTransition::OpenSubdivision {
            block: BlockId::Subdivision { parent: ParentBlock::Answer(QuestionId(0)), index: 0 },
            ..
        }
    ));
    assert!(engine.warnings().is_empty());
}

#[test]
fn test_advance_orphanSubdivision_shouldOpenImplicitQuestion() {
    let mut engine = ClassificationEngine::new(PatternLibrary::builtin(), EngineOptions::default());
    let out = advance_all(&mut engine, &[&["(a) stray point"]]);

    assert!(matches!(
        &out[0],
        AppliedTransition::OpenSubdivision { implicit_question: true, .. }
    ));
    assert_eq!(engine.state(), EngineState::InSubdivision(Parent::Question));
    assert!(matches!(
        engine.warnings(),
        [SegmentationWarning::OrphanSubdivision { label, .. }] if label == "a"
    ));
}

#[test]
fn test_advance_cursor_shouldTrackLastLine() {
    let mut engine = ClassificationEngine::new(PatternLibrary::builtin(), EngineOptions::default());
    advance_all(&mut engine, &[&["Q1. One"], &["more", ""]]);

    let cursor = engine.cursor();
    assert_eq!(cursor.last_line.map(|l| (l.image, l.position)), Some((1, 1)));
    assert!(cursor.previous_blank);
    assert_eq!(cursor.questions_opened, 1);
}

#[test]
fn test_advance_minLineChars_shouldSkipShortLines() {
    let options = EngineOptions {
        min_line_chars: 3,
        ..EngineOptions::default()
    };
    let mut engine = ClassificationEngine::new(PatternLibrary::builtin(), options);
    let out = advance_all(&mut engine, &[&["Q1. Long enough", "ok", "fine text"]]);

    assert_eq!(out[1], AppliedTransition::Skip { reason: SkipReason::Noise });
    assert!(matches!(out[2], AppliedTransition::Append { .. }));

    let warnings = engine.finish();
    assert!(matches!(
        warnings.as_slice(),
        [SegmentationWarning::NoiseLineSkipped { text, .. }] if text == "ok"
    ));
}

#[test]
fn test_advance_questionMarkHeuristic_onlyWhenEnabled() {
    let lines: &[&[&str]] = &[&["Q1. One", "A1. Yes", "Why though?"]];

    let mut plain = ClassificationEngine::new(PatternLibrary::builtin(), EngineOptions::default());
    let out = advance_all(&mut plain, lines);
    assert!(matches!(out[2], AppliedTransition::Append { block: BlockId::Answer(QuestionId(0)), .. }));

    let options = EngineOptions {
        question_mark_opens_question: true,
        ..EngineOptions::default()
    };
    let mut heuristic = ClassificationEngine::new(PatternLibrary::builtin(), options);
    let out = advance_all(&mut heuristic, lines);
    assert!(matches!(
        &out[2],
        AppliedTransition::OpenQuestion { id: QuestionId(1), implicit: true, .. }
    ));
}

#[test]
fn test_advance_blankLineHeuristic_shouldOpenImplicitAnswer() {
    let options = EngineOptions {
        blank_line_opens_answer: true,
        ..EngineOptions::default()
    };
    let mut engine = ClassificationEngine::new(PatternLibrary::builtin(), options);
    let out = advance_all(&mut engine, &[&["Q1. Define work", "", "Force times distance"]]);

    assert!(matches!(
        &out[2],
        AppliedTransition::OpenAnswer { question: QuestionId(0), label: None, implicit_question: false, .. }
    ));
}

#[test]
fn test_appliedTransition_block_shouldNameTarget() {
    let skip = AppliedTransition::Skip { reason: SkipReason::LeadingBlank };
    assert_eq!(skip.block(), None);

    let open = AppliedTransition::OpenAnswer {
        question: QuestionId(2),
        label: None,
        implicit_question: false,
        text: String::new(),
    };
    assert_eq!(open.block(), Some(BlockId::Answer(QuestionId(2))));
}
