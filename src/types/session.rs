//! Chat history types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user question and the answer that was shown for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(question: String, answer: String) -> Self {
        Self {
            question,
            answer,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered log of the turns in one session.
///
/// Only complete turns are ever stored: a turn is pushed once both the
/// question and its answer are known.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatHistory {
    turns: Vec<Turn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.push_turn(Turn::new(question.into(), answer.into()));
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
