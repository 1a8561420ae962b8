use std::collections::HashSet;
use std::fs::File;

use thiserror::Error;

use crate::quiz::content;
use crate::quiz::scoring::Level;

/// Questions come in blocks of this size, each block introduced by its own
/// intro screen.
pub const QUESTIONS_PER_BLOCK: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Category {
    #[serde(rename = "形象外表", alias = "appearance")]
    Appearance,
    #[serde(rename = "社群形象", alias = "social")]
    SocialPresence,
    #[serde(rename = "行動與互動", alias = "interaction")]
    Interaction,
    #[serde(rename = "心態與習慣", alias = "mindset")]
    Mindset,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Appearance,
        Category::SocialPresence,
        Category::Interaction,
        Category::Mindset,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Appearance => "形象外表",
            Category::SocialPresence => "社群形象",
            Category::Interaction => "行動與互動",
            Category::Mindset => "心態與習慣",
        }
    }

    pub fn description(&self) -> &'static str {
        content::category_description(*self)
    }

    pub fn suggestion(&self, level: Level) -> &'static str {
        content::category_suggestion(*self, level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: u32,
    pub category: Category,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOption {
    pub label: &'static str,
    pub value: u8,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse catalog JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Catalog has no questions")]
    Empty,

    #[error("Question id {0} appears more than once")]
    DuplicateId(u32),

    #[error("Block starting at question #{index} mixes categories")]
    MixedBlock { index: usize },
}

/// The ordered, immutable question list a quiz run walks through.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(CatalogError::DuplicateId(question.id));
            }
        }

        for (block, chunk) in questions.chunks(QUESTIONS_PER_BLOCK).enumerate() {
            let category = chunk[0].category;
            if chunk.iter().any(|q| q.category != category) {
                return Err(CatalogError::MixedBlock {
                    index: block * QUESTIONS_PER_BLOCK,
                });
            }
        }

        Ok(Self { questions })
    }

    /// The sixteen built-in questions.
    pub fn builtin() -> Self {
        Self {
            questions: content::QUESTIONS
                .iter()
                .map(|(id, category, text)| Question {
                    id: *id,
                    category: *category,
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    /// Loads a replacement catalog: a JSON array of `{ id, category, text }`.
    pub fn from_file(file: File) -> Result<Self, CatalogError> {
        let questions: Vec<Question> = serde_json::from_reader(file)?;
        Self::new(questions)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(move |q| q.category == category)
    }

    pub fn options(&self) -> &'static [AnswerOption] {
        &content::OPTIONS
    }

    pub fn option_by_label(&self, label: &str) -> Option<AnswerOption> {
        content::OPTIONS.iter().find(|o| o.label == label).copied()
    }

    pub fn option_by_value(&self, value: u8) -> Option<AnswerOption> {
        content::OPTIONS.iter().find(|o| o.value == value).copied()
    }
}
