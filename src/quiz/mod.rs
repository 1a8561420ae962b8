pub mod ai_helper;
pub mod catalog;
pub mod chart;
pub mod content;
pub mod coordinator;
pub mod navigator;
pub mod persona;
pub mod report;
pub mod scoring;
pub mod session;

use std::collections::BTreeMap;

/// Highest value an option can carry.
pub const MAX_ANSWER_VALUE: u8 = 3;

/// Chosen option value per question id. At most one value per question.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnswerSet {
    values: BTreeMap<u32, u8>,
}

impl AnswerSet {
    pub fn insert(&mut self, question_id: u32, value: u8) {
        self.values.insert(question_id, value);
    }

    pub fn get(&self, question_id: u32) -> Option<u8> {
        self.values.get(&question_id).copied()
    }

    pub fn contains(&self, question_id: u32) -> bool {
        self.values.contains_key(&question_id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
