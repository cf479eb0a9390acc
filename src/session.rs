use crate::error::{QuizError, Result};
use crate::question::Question;

pub const MIN_TABLE: u8 = 2;
pub const MAX_TABLE: u8 = 12;
pub const DEFAULT_QUESTION_COUNT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    table: u8,
    question_count: u32,
}

impl SessionConfig {
    pub fn new(table: u8, question_count: u32) -> Result<Self> {
        if !(MIN_TABLE..=MAX_TABLE).contains(&table) {
            return Err(QuizError::InvalidTable(table));
        }
        if question_count == 0 {
            return Err(QuizError::InvalidQuestionCount);
        }
        Ok(Self {
            table,
            question_count,
        })
    }

    pub fn table(&self) -> u8 {
        self.table
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    /// Same question count, one table up. `None` on the last table.
    pub fn next_table(&self) -> Option<Self> {
        if self.table < MAX_TABLE {
            Some(Self {
                table: self.table + 1,
                question_count: self.question_count,
            })
        } else {
            None
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            table: MIN_TABLE,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Setup,
    AwaitingAnswer,
    Feedback,
    Complete,
}

impl Phase {
    /// A question is on screen and the clock is running
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::AwaitingAnswer | Phase::Feedback)
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub table_index: u8,
    pub questions_asked: u32,
    pub score: u32,
    pub current_question: Option<Question>,
    pub phase: Phase,
    pub started_at_ms: i64,
    pub input_locked: bool,
}

impl SessionState {
    /// Fresh state sitting on the setup screen with `table` pre-selected
    pub fn setup(table_index: u8) -> Self {
        Self {
            table_index,
            questions_asked: 0,
            score: 0,
            current_question: None,
            phase: Phase::Setup,
            started_at_ms: 0,
            input_locked: false,
        }
    }

    pub fn started(table_index: u8, started_at_ms: i64) -> Self {
        Self {
            started_at_ms,
            ..Self::setup(table_index)
        }
    }

    pub fn elapsed_seconds(&self, now_ms: i64) -> u64 {
        (now_ms - self.started_at_ms).max(0) as u64 / 1000
    }

    pub fn invariants_hold(&self, question_count: u32) -> bool {
        let counters = self.score <= self.questions_asked && self.questions_asked <= question_count;
        let question = self.current_question.is_some() == self.phase.is_active();
        let lock = self.input_locked == (self.phase == Phase::Feedback);
        let table = (MIN_TABLE..=MAX_TABLE).contains(&self.table_index);
        counters && question && lock && table
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::setup(MIN_TABLE)
    }
}
