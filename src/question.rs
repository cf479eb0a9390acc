use rand::Rng;

pub const MIN_MULTIPLIER: u32 = 1;
pub const MAX_MULTIPLIER: u32 = 12;

/// A single "table × multiplier" question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub table: u32,
    pub multiplier: u32,
    pub expected_answer: u32,
}

impl Question {
    pub fn new(table: u32, multiplier: u32) -> Self {
        Self {
            table,
            multiplier,
            expected_answer: table * multiplier,
        }
    }

    /// Draws a fresh multiplier uniformly from 1..=12. Repeats within a
    /// session are allowed.
    pub fn random<R: Rng + ?Sized>(table: u32, rng: &mut R) -> Self {
        Self::new(table, rng.gen_range(MIN_MULTIPLIER..=MAX_MULTIPLIER))
    }

    pub fn is_answered_by(&self, answer: i64) -> bool {
        answer == i64::from(self.expected_answer)
    }

    pub fn prompt(&self, number: u32, question_count: u32) -> String {
        format!(
            "Question {} of {}:\nWhat is {} × {}?",
            number, question_count, self.table, self.multiplier
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn expected_answer_is_the_product() {
        let q = Question::new(7, 8);
        assert_eq!(q.expected_answer, 56);
        assert!(q.is_answered_by(56));
        assert!(!q.is_answered_by(54));
        assert!(!q.is_answered_by(-56));
    }

    #[test]
    fn random_questions_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for table in 2..=12 {
            for _ in 0..200 {
                let q = Question::random(table, &mut rng);
                assert!((MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&q.multiplier));
                assert_eq!(q.expected_answer, table * q.multiplier);
                assert_eq!(q.table, table);
            }
        }
    }

    #[test]
    fn random_questions_cover_every_multiplier() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 12];
        for _ in 0..1000 {
            let q = Question::random(3, &mut rng);
            seen[(q.multiplier - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let qa: Vec<_> = (0..10).map(|_| Question::random(5, &mut a)).collect();
        let qb: Vec<_> = (0..10).map(|_| Question::random(5, &mut b)).collect();
        assert_eq!(qa, qb);
    }

    #[test]
    fn prompt_has_two_lines() {
        let q = Question::new(5, 3);
        assert_eq!(q.prompt(2, 20), "Question 2 of 20:\nWhat is 5 × 3?");
    }
}
