//! The quiz session controller.
//!
//! Owns the [`SessionState`] and both timers, and is the only thing that
//! mutates them. Callers feed it start/submit/reset requests and call
//! [`QuizController::poll`] regularly; everything the player sees goes out
//! through the [`Presentation`] and [`Feedback`] surfaces.

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{QuizError, Result};
use crate::question::Question;
use crate::session::{Phase, SessionConfig, SessionState};
use crate::summary::SessionSummary;
use crate::surface::{Feedback, FeedbackKind, Presentation};
use crate::timers::{Timers, FEEDBACK_DELAY_MS, TICK_INTERVAL_MS};

pub const INVALID_INPUT_MESSAGE: &str = "Please enter a number!";
pub const CORRECT_MESSAGE: &str = "🌟 Correct! Awesome work!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    Correct,
    Incorrect { expected: u32 },
    /// Not a number; the question stays open
    Invalid,
    /// No question was awaiting an answer
    Ignored,
}

pub fn incorrect_message(expected: u32) -> String {
    format!("❌ Incorrect. The answer is {expected}.")
}

pub struct QuizController<P, F, C = SystemClock> {
    presentation: P,
    feedback: F,
    clock: C,
    rng: StdRng,
    config: SessionConfig,
    state: SessionState,
    timers: Timers,
    summary: Option<SessionSummary>,
    feedback_delay_ms: i64,
    tick_interval_ms: i64,
}

impl<P: Presentation, F: Feedback> QuizController<P, F, SystemClock> {
    pub fn with_system_clock(presentation: P, feedback: F) -> Self {
        Self::new(presentation, feedback, SystemClock)
    }
}

impl<P: Presentation, F: Feedback, C: Clock> QuizController<P, F, C> {
    pub fn new(presentation: P, feedback: F, clock: C) -> Self {
        Self {
            presentation,
            feedback,
            clock,
            rng: StdRng::from_entropy(),
            config: SessionConfig::default(),
            state: SessionState::default(),
            timers: Timers::default(),
            summary: None,
            feedback_delay_ms: FEEDBACK_DELAY_MS,
            tick_interval_ms: TICK_INTERVAL_MS,
        }
    }

    /// Fixes the question sequence
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_feedback_delay_ms(mut self, delay_ms: u64) -> Self {
        self.feedback_delay_ms = i64::try_from(delay_ms).unwrap_or(i64::MAX);
        self
    }

    /// Table and question count pre-selected on the setup screen
    pub fn with_setup_defaults(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self.state = SessionState::setup(config.table());
        self
    }

    pub fn start_session(&mut self, config: SessionConfig) {
        self.timers.cancel_all();

        let now = self.clock.now_ms();
        self.config = config;
        self.state = SessionState::started(config.table(), now);
        self.summary = None;
        self.timers.start_ticking(now, self.tick_interval_ms);

        info!(
            table = config.table(),
            question_count = config.question_count(),
            "session started"
        );

        self.presentation.show_active_game();
        self.presentation.render_elapsed(0);
        self.next_question();
    }

    pub fn generate_question(&mut self) -> Question {
        Question::random(u32::from(self.state.table_index), &mut self.rng)
    }

    pub fn advance_to_next_question(&mut self) {
        if !self.state.phase.is_active() {
            warn!(phase = %self.state.phase, "no session to advance");
            return;
        }
        self.next_question();
    }

    fn next_question(&mut self) {
        self.timers.cancel_advance();

        let question_count = self.config.question_count();
        if self.state.questions_asked >= question_count {
            self.presentation.render_progress(1.0);
            self.finish_session();
            return;
        }

        self.state.questions_asked += 1;
        let question = self.generate_question();
        self.state.current_question = Some(question);
        self.state.phase = Phase::AwaitingAnswer;
        self.state.input_locked = false;

        let asked = self.state.questions_asked;
        debug!(
            number = asked,
            multiplier = question.multiplier,
            "question presented"
        );

        self.presentation.clear_feedback();
        self.presentation
            .render_question(&question.prompt(asked, question_count));
        self.presentation
            .render_progress(f64::from(asked) / f64::from(question_count));
        self.presentation.render_score(self.state.score, asked - 1);
        self.check_invariants();
    }

    pub fn submit_answer(&mut self, raw_input: &str) -> SubmitResult {
        let question = match (self.state.phase, self.state.current_question) {
            (Phase::AwaitingAnswer, Some(q)) if !self.state.input_locked => q,
            (phase, _) => {
                warn!(%phase, "answer submitted while no question is open, ignored");
                return SubmitResult::Ignored;
            }
        };

        let answer = match raw_input.trim().parse::<i64>() {
            Ok(answer) => answer,
            Err(_) => {
                debug!(input = raw_input, "answer is not a number");
                self.presentation
                    .render_feedback(INVALID_INPUT_MESSAGE, FeedbackKind::Invalid);
                return SubmitResult::Invalid;
            }
        };

        self.state.phase = Phase::Feedback;
        self.state.input_locked = true;

        let result = if question.is_answered_by(answer) {
            self.state.score += 1;
            self.presentation
                .render_feedback(CORRECT_MESSAGE, FeedbackKind::Correct);
            self.feedback.play_correct_cue();
            SubmitResult::Correct
        } else {
            self.presentation.render_feedback(
                &incorrect_message(question.expected_answer),
                FeedbackKind::Incorrect,
            );
            self.feedback.play_incorrect_cue();
            SubmitResult::Incorrect {
                expected: question.expected_answer,
            }
        };

        debug!(
            answer,
            expected = question.expected_answer,
            ?result,
            "answer submitted"
        );

        self.presentation
            .render_score(self.state.score, self.state.questions_asked);
        self.timers
            .arm_advance(self.clock.now_ms(), self.feedback_delay_ms);
        self.check_invariants();
        result
    }

    pub fn on_timer_tick(&mut self) {
        if !self.state.phase.is_active() {
            return;
        }
        let elapsed = self.state.elapsed_seconds(self.clock.now_ms());
        self.presentation.render_elapsed(elapsed);
    }

    /// Fires whichever timers are due. Returns true when the deferred
    /// advance ran, i.e. the previous question was retired.
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now_ms();
        let advanced = self.timers.take_due_advance(now);
        if advanced {
            self.advance_to_next_question();
        }
        if self.timers.tick_due(now) {
            self.on_timer_tick();
        }
        advanced
    }

    pub fn finish_session(&mut self) -> SessionSummary {
        self.timers.cancel_all();

        let elapsed = self.state.elapsed_seconds(self.clock.now_ms());
        self.state.phase = Phase::Complete;
        self.state.current_question = None;
        self.state.input_locked = false;

        let summary = SessionSummary::new(
            self.state.table_index,
            self.state.score,
            self.config.question_count(),
            elapsed,
        );

        info!(
            table = summary.table,
            score = summary.score,
            question_count = summary.question_count,
            percentage = summary.percentage,
            band = %summary.band,
            elapsed_seconds = summary.elapsed_seconds,
            "session finished"
        );

        self.feedback.play_celebration();
        self.presentation.show_results(&summary);
        self.summary = Some(summary.clone());
        self.check_invariants();
        summary
    }

    pub fn advance_table(&mut self) -> Result<()> {
        let next = self.config.next_table().ok_or(QuizError::NoNextTable)?;
        info!(table = next.table(), "advancing to the next table");
        self.start_session(next);
        Ok(())
    }

    pub fn reset_to_setup(&mut self) {
        self.timers.cancel_all();
        self.state = SessionState::setup(self.state.table_index);
        self.summary = None;
        debug!(table = self.state.table_index, "back to setup");
        self.presentation.show_setup();
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Table the next session starts on by default
    pub fn table(&self) -> u8 {
        self.state.table_index
    }

    pub fn question_count(&self) -> u32 {
        self.config.question_count()
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn is_input_locked(&self) -> bool {
        self.state.input_locked
    }

    pub fn advance_pending(&self) -> bool {
        self.timers.advance_pending()
    }

    pub fn is_ticking(&self) -> bool {
        self.timers.is_ticking()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        if self.state.phase.is_active() {
            self.state.elapsed_seconds(self.clock.now_ms())
        } else {
            self.summary.as_ref().map_or(0, |s| s.elapsed_seconds)
        }
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.state.invariants_hold(self.config.question_count()),
            "session state out of shape: {:?}",
            self.state
        );
    }
}
