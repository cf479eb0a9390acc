use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::quiz::{QuizController, SubmitResult};
use crate::runtime::QuizEvent;
use crate::session::{Phase, SessionConfig, MAX_TABLE, MIN_TABLE};
use crate::view::{TerminalFeedback, TerminalView};

const MAX_ANSWER_LEN: usize = 6;
const MAX_COUNT_LEN: usize = 3;

pub type TerminalQuiz<C = SystemClock> = QuizController<TerminalView, TerminalFeedback, C>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Table,
    QuestionCount,
}

/// State of the setup screen form
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub table: u8,
    pub count_input: String,
    pub focus: SetupField,
    pub error: Option<String>,
}

impl SetupForm {
    pub fn new(table: u8, question_count: u32) -> Self {
        Self {
            table,
            count_input: question_count.to_string(),
            focus: SetupField::Table,
            error: None,
        }
    }

    pub fn session_config(&self) -> Option<SessionConfig> {
        let count = self.count_input.parse::<u32>().ok()?;
        SessionConfig::new(self.table, count).ok()
    }

    fn step_table(&mut self, up: bool) {
        self.table = if up {
            (self.table + 1).min(MAX_TABLE)
        } else {
            self.table.saturating_sub(1).max(MIN_TABLE)
        };
    }

    fn step_count(&mut self, up: bool) {
        let count = self.count_input.parse::<u32>().unwrap_or(0);
        let count = if up {
            (count + 1).min(999)
        } else {
            count.saturating_sub(1).max(1)
        };
        self.count_input = count.to_string();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

pub struct App<C: Clock = SystemClock> {
    pub quiz: TerminalQuiz<C>,
    pub setup: SetupForm,
    pub answer: String,
}

impl App<SystemClock> {
    /// `seed` fixes the question sequence
    pub fn from_config(config: &Config, seed: Option<u64>) -> Self {
        let feedback = TerminalFeedback::new(config.celebration, config.bell);
        let mut quiz = QuizController::with_system_clock(TerminalView::new(), feedback)
            .with_feedback_delay_ms(config.feedback_delay_ms);
        if let Some(seed) = seed {
            quiz = quiz.with_seed(seed);
        }
        match config.session_config() {
            Ok(defaults) => quiz = quiz.with_setup_defaults(defaults),
            Err(e) => warn!(error = %e, "ignoring configured defaults"),
        }
        Self::new(quiz)
    }
}

impl<C: Clock> App<C> {
    pub fn new(quiz: TerminalQuiz<C>) -> Self {
        let setup = SetupForm::new(quiz.table(), quiz.question_count());
        Self {
            quiz,
            setup,
            answer: String::new(),
        }
    }

    pub fn on_event(&mut self, event: QuizEvent) -> AppAction {
        match event {
            QuizEvent::Tick => {
                self.on_tick();
                AppAction::Continue
            }
            QuizEvent::Resize(width, height) => {
                self.quiz.feedback_mut().set_area(width, height);
                AppAction::Continue
            }
            QuizEvent::Key(key) => self.on_key(key),
        }
    }

    pub fn on_tick(&mut self) {
        if self.quiz.poll() {
            self.answer.clear();
        }
        if self.quiz.feedback().is_animating() {
            self.quiz.feedback_mut().update();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }

        match self.quiz.phase() {
            Phase::Setup => self.on_setup_key(key),
            Phase::AwaitingAnswer | Phase::Feedback => self.on_game_key(key),
            Phase::Complete => self.on_results_key(key),
        }
    }

    /// Table and question count of the last session, or the setup defaults
    pub fn last_session(&self) -> SessionConfig {
        self.quiz.config()
    }

    fn on_setup_key(&mut self, key: KeyEvent) -> AppAction {
        let form = &mut self.setup;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Tab | KeyCode::BackTab => {
                form.focus = match form.focus {
                    SetupField::Table => SetupField::QuestionCount,
                    SetupField::QuestionCount => SetupField::Table,
                };
            }
            KeyCode::Up | KeyCode::Down => {
                let up = key.code == KeyCode::Up;
                match form.focus {
                    SetupField::Table => form.step_table(!up),
                    SetupField::QuestionCount => form.step_count(up),
                }
            }
            KeyCode::Left => form.step_count(false),
            KeyCode::Right => form.step_count(true),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if form.focus == SetupField::QuestionCount && form.count_input.len() < MAX_COUNT_LEN
                {
                    form.count_input.push(c);
                }
            }
            KeyCode::Backspace => {
                if form.focus == SetupField::QuestionCount {
                    form.count_input.pop();
                }
            }
            KeyCode::Enter => match form.session_config() {
                Some(config) => {
                    form.error = None;
                    self.answer.clear();
                    self.quiz.start_session(config);
                }
                None => {
                    debug!(count = %form.count_input, "rejected question count");
                    form.error = Some("Enter a question count of at least 1".to_string());
                }
            },
            _ => {}
        }
        AppAction::Continue
    }

    fn on_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => {
                self.quiz.reset_to_setup();
                self.sync_setup();
            }
            _ if self.quiz.is_input_locked() => {}
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                if self.answer.len() < MAX_ANSWER_LEN {
                    self.answer.push(c);
                }
            }
            KeyCode::Backspace => {
                self.answer.pop();
            }
            KeyCode::Enter => {
                if self.quiz.submit_answer(&self.answer) == SubmitResult::Invalid {
                    self.answer.clear();
                }
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn on_results_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Enter | KeyCode::Char('c') => {
                let can_advance = self.quiz.summary().is_some_and(|s| s.can_advance);
                if can_advance {
                    self.answer.clear();
                    if let Err(e) = self.quiz.advance_table() {
                        warn!(error = %e, "could not advance table");
                    }
                }
            }
            KeyCode::Char('n') => {
                self.quiz.reset_to_setup();
                self.sync_setup();
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn sync_setup(&mut self) {
        self.setup = SetupForm::new(self.quiz.table(), self.quiz.question_count());
        self.answer.clear();
    }
}
