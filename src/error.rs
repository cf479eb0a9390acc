use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuizError>;

#[derive(Debug, Error)]
pub enum QuizError {
    /// Tables run from 2 up to 12
    #[error("table {0} is out of range (2..=12)")]
    InvalidTable(u8),

    #[error("a session needs at least one question")]
    InvalidQuestionCount,

    #[error("feedback delay of {0} ms is out of range (0..=60000)")]
    InvalidFeedbackDelay(u64),

    /// Raised by `advance_table` once the 12's table has been played
    #[error("already on the last table")]
    NoNextTable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
