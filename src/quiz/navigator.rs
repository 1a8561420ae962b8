use thiserror::Error;

use crate::quiz::catalog::{Catalog, QUESTIONS_PER_BLOCK};
use crate::quiz::{AnswerSet, MAX_ANSWER_VALUE};

/// What the caller should do after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved,
    /// The last question was answered; the quiz is over.
    Completed,
    /// Went back past the first intro screen.
    ExitToStart,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigatorError {
    #[error("Questions can't be answered on an intro screen")]
    OnIntroScreen,

    #[error("Answer value {0} is out of range")]
    InvalidValue(u8),

    #[error("No question at position {0}")]
    NoQuestion(usize),
}

/// Walks the catalog block by block. Every block of four questions is
/// preceded by an intro screen.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Navigator {
    question_ids: Vec<u32>,
    current_index: usize,
    intro_mode: bool,
    answers: AnswerSet,
}

impl Navigator {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            question_ids: catalog.questions().iter().map(|q| q.id).collect(),
            current_index: 0,
            intro_mode: true,
            answers: AnswerSet::default(),
        }
    }

    pub fn start(&mut self) {
        self.current_index = 0;
        self.intro_mode = true;
        self.answers.clear();
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_intro(&self) -> bool {
        self.intro_mode
    }

    pub fn len(&self) -> usize {
        self.question_ids.len()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn current_question_id(&self) -> Option<u32> {
        self.question_ids.get(self.current_index).copied()
    }

    pub fn is_current_answered(&self) -> bool {
        self.current_question_id()
            .map(|id| self.answers.contains(id))
            .unwrap_or(false)
    }

    /// Screens passed so far, for the progress bar.
    pub fn completed_steps(&self) -> usize {
        self.current_index + usize::from(!self.intro_mode)
    }

    /// Records the answer for the current question. Re-answering overwrites.
    pub fn record_answer(&mut self, value: u8) -> Result<(), NavigatorError> {
        if self.intro_mode {
            return Err(NavigatorError::OnIntroScreen);
        }
        if value > MAX_ANSWER_VALUE {
            return Err(NavigatorError::InvalidValue(value));
        }
        let id = self
            .current_question_id()
            .ok_or(NavigatorError::NoQuestion(self.current_index))?;
        self.answers.insert(id, value);
        Ok(())
    }

    pub fn advance(&mut self) -> Transition {
        if self.intro_mode {
            self.intro_mode = false;
            return Transition::Moved;
        }
        if self.current_index + 1 < self.len() {
            self.current_index += 1;
            if self.current_index % QUESTIONS_PER_BLOCK == 0 {
                self.intro_mode = true;
            }
            return Transition::Moved;
        }
        Transition::Completed
    }

    pub fn retreat(&mut self) -> Transition {
        if self.intro_mode {
            if self.current_index == 0 {
                return Transition::ExitToStart;
            }
            self.intro_mode = false;
            self.current_index -= 1;
            return Transition::Moved;
        }
        if self.current_index % QUESTIONS_PER_BLOCK == 0 {
            self.intro_mode = true;
        } else {
            self.current_index -= 1;
        }
        Transition::Moved
    }
}
