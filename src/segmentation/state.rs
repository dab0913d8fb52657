/*!
 * Continuity state and transition table of the classification engine.
 *
 * `transition` is a pure function of (state, event). The engine derives one
 * event per line and applies the resulting action to the single
 * `ContinuityState` cursor it owns. Nothing here resets at image boundaries.
 */

use serde::{Deserialize, Serialize};

use super::line::LineRef;

/// Top-level block a subdivision hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parent {
    Question,
    Answer,
}

/// Engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    AwaitingFirstBlock,
    InQuestion,
    InAnswer,
    InSubdivision(Parent),
}

/// What one line means to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Question,
    Answer,
    Subdivision,
    Prose,
    /// Prose right after a blank line (only when the blank-line heuristic is on)
    ProseAfterBlank,
    /// Prose ending in `?` (only when the question-mark heuristic is on)
    Interrogative,
    InterrogativeAfterBlank,
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OpenQuestion,
    OpenImplicitQuestion,
    OpenAnswer,
    OpenImplicitAnswer,
    OpenSubdivision(Parent),
    /// Answer with no question yet: implicit question, then the answer
    OrphanAnswer,
    /// Subdivision with no question yet: implicit question, then the subdivision
    OrphanSubdivision,
    Append,
    AppendBlank,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub action: Action,
    pub next: EngineState,
}

fn step(action: Action, next: EngineState) -> Step {
    Step { action, next }
}

/// The transition table
pub fn transition(state: EngineState, event: Event) -> Step {
    use EngineState::*;

    match (state, event) {
        (_, Event::Question) => step(Action::OpenQuestion, InQuestion),

        (AwaitingFirstBlock, Event::Answer) => step(Action::OrphanAnswer, InAnswer),
        (_, Event::Answer) => step(Action::OpenAnswer, InAnswer),

        (AwaitingFirstBlock, Event::Subdivision) => {
            step(Action::OrphanSubdivision, InSubdivision(Parent::Question))
        }
        (InQuestion | InSubdivision(Parent::Question), Event::Subdivision) => step(
            Action::OpenSubdivision(Parent::Question),
            InSubdivision(Parent::Question),
        ),
        (InAnswer | InSubdivision(Parent::Answer), Event::Subdivision) => step(
            Action::OpenSubdivision(Parent::Answer),
            InSubdivision(Parent::Answer),
        ),

        (AwaitingFirstBlock, Event::Blank) => step(Action::Ignore, AwaitingFirstBlock),
        (AwaitingFirstBlock, _) => step(Action::OpenImplicitQuestion, InQuestion),
        (_, Event::Blank) => step(Action::AppendBlank, state),

        (InQuestion | InSubdivision(Parent::Question), Event::ProseAfterBlank) => {
            step(Action::OpenImplicitAnswer, InAnswer)
        }
        (InAnswer | InSubdivision(Parent::Answer), Event::Interrogative) => {
            step(Action::OpenImplicitQuestion, InQuestion)
        }
        (_, Event::InterrogativeAfterBlank) => step(Action::OpenImplicitQuestion, InQuestion),

        (_, Event::Prose | Event::ProseAfterBlank | Event::Interrogative) => step(Action::Append, state),
    }
}

/// Position of a question in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub usize);

/// Concrete parent block of a subdivision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentBlock {
    Question(QuestionId),
    Answer(QuestionId),
}

impl ParentBlock {
    pub fn question(&self) -> QuestionId {
        match self {
            Self::Question(id) | Self::Answer(id) => *id,
        }
    }
}

/// Address of any block that can receive text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockId {
    Question(QuestionId),
    Answer(QuestionId),
    Subdivision { parent: ParentBlock, index: usize },
}

/// The engine's single forward-only cursor
#[derive(Debug, Clone, Default)]
pub struct ContinuityState {
    /// Current state
    pub state: EngineState,

    /// Most recently opened question
    pub question: Option<QuestionId>,

    /// Label of that question
    pub question_label: Option<String>,

    /// Whether that question already owns an answer
    pub answered: bool,

    /// Most recently opened subdivision
    pub subdivision: Option<BlockId>,

    /// Labels used under the innermost parent, in insertion order
    pub subdivision_labels: Vec<String>,

    /// Whether the previous line was blank
    pub previous_blank: bool,

    /// Last line advanced through the engine
    pub last_line: Option<LineRef>,

    /// Questions opened so far
    pub questions_opened: usize,
}

impl ContinuityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a question and reset the subdivision sequence
    pub fn open_question(&mut self, label: Option<String>) -> QuestionId {
        let id = QuestionId(self.questions_opened);
        self.questions_opened += 1;
        self.question = Some(id);
        self.question_label = label;
        self.answered = false;
        self.subdivision = None;
        self.subdivision_labels.clear();
        id
    }

    /// Open the answer of the current question and reset the subdivision sequence.
    /// Returns `None` when no question is open.
    pub fn open_answer(&mut self) -> Option<QuestionId> {
        let id = self.question?;
        self.answered = true;
        self.subdivision = None;
        self.subdivision_labels.clear();
        Some(id)
    }

    /// Block a new subdivision would attach to, given its parent kind
    pub fn parent_block(&self, parent: Parent) -> Option<ParentBlock> {
        let id = self.question?;
        Some(match parent {
            Parent::Question => ParentBlock::Question(id),
            Parent::Answer => ParentBlock::Answer(id),
        })
    }

    pub fn has_subdivision_label(&self, label: &str) -> bool {
        self.subdivision_labels.iter().any(|l| l == label)
    }

    /// Open a subdivision under the current question or its answer
    pub fn open_subdivision(&mut self, parent: Parent, label: String) -> Option<BlockId> {
        let parent = self.parent_block(parent)?;
        let block = BlockId::Subdivision {
            parent,
            index: self.subdivision_labels.len(),
        };
        self.subdivision_labels.push(label);
        self.subdivision = Some(block);
        Some(block)
    }

    /// Label given to a subdivision whose rule captured none
    pub fn next_subdivision_ordinal(&self) -> String {
        (self.subdivision_labels.len() + 1).to_string()
    }

    /// Block that receives unmarked text in the current state
    pub fn active_block(&self) -> Option<BlockId> {
        let question = self.question?;
        match self.state {
            EngineState::AwaitingFirstBlock => None,
            EngineState::InQuestion => Some(BlockId::Question(question)),
            EngineState::InAnswer => Some(BlockId::Answer(question)),
            EngineState::InSubdivision(_) => self.subdivision,
        }
    }
}
