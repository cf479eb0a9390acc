//! Terminal-side surfaces. The controller writes into these and the ratatui
//! widgets in `ui` read them back when drawing.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::celebration::{CelebrationAnimation, CelebrationStyle};
use crate::summary::SessionSummary;
use crate::surface::{Feedback, FeedbackKind, Presentation};

const FLASH_DURATION: Duration = Duration::from_millis(300);
const BELL: &[u8] = b"\x07";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Screen {
    Setup,
    Game,
    Results,
}

#[derive(Debug)]
pub struct TerminalView {
    pub screen: Screen,
    pub question: String,
    pub progress: f64,
    pub score: (u32, u32),
    pub elapsed_secs: u64,
    pub feedback: Option<(String, FeedbackKind)>,
    pub summary: Option<SessionSummary>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            screen: Screen::Setup,
            question: String::new(),
            progress: 0.0,
            score: (0, 0),
            elapsed_secs: 0,
            feedback: None,
            summary: None,
        }
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}/{}", self.score.0, self.score.1)
    }

    pub fn time_text(&self) -> String {
        format!("Time: {}s", self.elapsed_secs)
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl Presentation for TerminalView {
    fn show_setup(&mut self) {
        self.screen = Screen::Setup;
        self.feedback = None;
        self.summary = None;
    }

    fn show_active_game(&mut self) {
        self.screen = Screen::Game;
        self.progress = 0.0;
        self.score = (0, 0);
        self.elapsed_secs = 0;
        self.feedback = None;
        self.summary = None;
    }

    fn show_results(&mut self, summary: &SessionSummary) {
        self.screen = Screen::Results;
        self.summary = Some(summary.clone());
    }

    fn render_question(&mut self, prompt: &str) {
        self.question = prompt.to_string();
    }

    fn render_progress(&mut self, ratio: f64) {
        self.progress = ratio.clamp(0.0, 1.0);
    }

    fn render_score(&mut self, score: u32, attempted: u32) {
        self.score = (score, attempted);
    }

    fn render_elapsed(&mut self, seconds: u64) {
        self.elapsed_secs = seconds;
    }

    fn render_feedback(&mut self, message: &str, kind: FeedbackKind) {
        self.feedback = Some((message.to_string(), kind));
    }

    fn clear_feedback(&mut self) {
        self.feedback = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Correct,
    Incorrect,
}

/// Bell, flash and celebration for the terminal
#[derive(Debug)]
pub struct TerminalFeedback {
    pub celebration: CelebrationAnimation,
    bell: bool,
    flash: Option<(Cue, Instant)>,
    area: (u16, u16),
}

impl TerminalFeedback {
    pub fn new(style: CelebrationStyle, bell: bool) -> Self {
        Self {
            celebration: CelebrationAnimation::new(style),
            bell,
            flash: None,
            area: (80, 24),
        }
    }

    /// Size the next celebration is laid out for
    pub fn set_area(&mut self, width: u16, height: u16) {
        self.area = (width, height);
    }

    /// The cue still flashing, if any
    pub fn flash(&self) -> Option<Cue> {
        self.flash
            .filter(|(_, at)| at.elapsed() < FLASH_DURATION)
            .map(|(cue, _)| cue)
    }

    pub fn update(&mut self) {
        self.celebration.update();
        if self.flash.is_some() && self.flash().is_none() {
            self.flash = None;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.celebration.is_active || self.flash.is_some()
    }

    fn cue(&mut self, cue: Cue) {
        self.flash = Some((cue, Instant::now()));
        if self.bell {
            if let Err(e) = ring_bell(&mut io::stdout()) {
                debug!(error = %e, "bell blocked");
            }
        }
    }
}

impl Default for TerminalFeedback {
    fn default() -> Self {
        Self::new(CelebrationStyle::default(), true)
    }
}

impl Feedback for TerminalFeedback {
    fn play_correct_cue(&mut self) {
        self.cue(Cue::Correct);
    }

    fn play_incorrect_cue(&mut self) {
        self.cue(Cue::Incorrect);
    }

    fn play_celebration(&mut self) {
        let (width, height) = self.area;
        self.celebration.start(width, height);
    }
}

fn ring_bell<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(BELL)?;
    out.flush()
}
