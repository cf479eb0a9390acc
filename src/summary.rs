use crate::session::MAX_TABLE;

pub const MASTERY_THRESHOLD: f64 = 90.0;
pub const PROFICIENT_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GradeBand {
    Mastery,
    Proficient,
    None,
}

impl GradeBand {
    pub fn classify(percentage: f64) -> Self {
        if percentage >= MASTERY_THRESHOLD {
            GradeBand::Mastery
        } else if percentage >= PROFICIENT_THRESHOLD {
            GradeBand::Proficient
        } else {
            GradeBand::None
        }
    }

    /// Reward line shown above the results; below proficiency there is none
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            GradeBand::Mastery => Some("🌟 Mission Master! 🌟"),
            GradeBand::Proficient => Some("Great Effort! Keep Practicing!"),
            GradeBand::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub table: u8,
    pub score: u32,
    pub question_count: u32,
    pub elapsed_seconds: u64,
    pub percentage: f64,
    pub band: GradeBand,
    pub can_advance: bool,
}

impl SessionSummary {
    pub fn new(table: u8, score: u32, question_count: u32, elapsed_seconds: u64) -> Self {
        let percentage = percentage(score, question_count);
        Self {
            table,
            score,
            question_count,
            elapsed_seconds,
            percentage,
            band: GradeBand::classify(percentage),
            can_advance: table < MAX_TABLE,
        }
    }

    pub fn score_line(&self) -> String {
        format!(
            "You scored {} out of {} ({:.0}%)!",
            self.score, self.question_count, self.percentage
        )
    }

    pub fn time_line(&self) -> String {
        format!("Total time: {} seconds!", self.elapsed_seconds)
    }

    pub fn continue_label(&self) -> Option<String> {
        self.can_advance
            .then(|| format!("Continue to the {}'s Table", self.table + 1))
    }
}

pub fn percentage(score: u32, question_count: u32) -> f64 {
    if question_count == 0 {
        return 0.0;
    }
    100.0 * f64::from(score) / f64::from(question_count)
}
