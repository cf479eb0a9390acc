use crate::summary::SessionSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum FeedbackKind {
    Correct,
    Incorrect,
    Invalid,
}

/// Where the controller sends everything the player should see
pub trait Presentation {
    fn show_setup(&mut self);
    fn show_active_game(&mut self);
    fn show_results(&mut self, summary: &SessionSummary);
    fn render_question(&mut self, prompt: &str);
    /// `ratio` may exceed 1.0; displays clamp it
    fn render_progress(&mut self, ratio: f64);
    fn render_score(&mut self, score: u32, attempted: u32);
    fn render_elapsed(&mut self, seconds: u64);
    fn render_feedback(&mut self, message: &str, kind: FeedbackKind);
    fn clear_feedback(&mut self);
}

/// Sound and celebration effects. All calls are fire-and-forget.
pub trait Feedback {
    fn play_correct_cue(&mut self);
    fn play_incorrect_cue(&mut self);
    fn play_celebration(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCall {
    ShowSetup,
    ShowActiveGame,
    ShowResults(SessionSummary),
    Question(String),
    Progress(f64),
    Score(u32, u32),
    Elapsed(u64),
    Feedback(String, FeedbackKind),
    ClearFeedback,
}

/// Headless presentation that records every call in order
#[derive(Debug, Default)]
pub struct RecordingPresentation {
    pub calls: Vec<PresentationCall>,
}

impl RecordingPresentation {
    pub fn questions(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PresentationCall::Question(q) => Some(q.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn elapsed(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PresentationCall::Elapsed(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn last_score(&self) -> Option<(u32, u32)> {
        self.calls.iter().rev().find_map(|c| match c {
            PresentationCall::Score(s, a) => Some((*s, *a)),
            _ => None,
        })
    }

    pub fn last_progress(&self) -> Option<f64> {
        self.calls.iter().rev().find_map(|c| match c {
            PresentationCall::Progress(r) => Some(*r),
            _ => None,
        })
    }

    pub fn last_feedback(&self) -> Option<(&str, FeedbackKind)> {
        self.calls.iter().rev().find_map(|c| match c {
            PresentationCall::Feedback(m, k) => Some((m.as_str(), *k)),
            _ => None,
        })
    }

    pub fn results(&self) -> Vec<&SessionSummary> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PresentationCall::ShowResults(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &PresentationCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Presentation for RecordingPresentation {
    fn show_setup(&mut self) {
        self.calls.push(PresentationCall::ShowSetup);
    }

    fn show_active_game(&mut self) {
        self.calls.push(PresentationCall::ShowActiveGame);
    }

    fn show_results(&mut self, summary: &SessionSummary) {
        self.calls.push(PresentationCall::ShowResults(summary.clone()));
    }

    fn render_question(&mut self, prompt: &str) {
        self.calls.push(PresentationCall::Question(prompt.to_string()));
    }

    fn render_progress(&mut self, ratio: f64) {
        self.calls.push(PresentationCall::Progress(ratio));
    }

    fn render_score(&mut self, score: u32, attempted: u32) {
        self.calls.push(PresentationCall::Score(score, attempted));
    }

    fn render_elapsed(&mut self, seconds: u64) {
        self.calls.push(PresentationCall::Elapsed(seconds));
    }

    fn render_feedback(&mut self, message: &str, kind: FeedbackKind) {
        self.calls
            .push(PresentationCall::Feedback(message.to_string(), kind));
    }

    fn clear_feedback(&mut self) {
        self.calls.push(PresentationCall::ClearFeedback);
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordingFeedback {
    pub correct_cues: u32,
    pub incorrect_cues: u32,
    pub celebrations: u32,
}

impl Feedback for RecordingFeedback {
    fn play_correct_cue(&mut self) {
        self.correct_cues += 1;
    }

    fn play_incorrect_cue(&mut self) {
        self.incorrect_cues += 1;
    }

    fn play_celebration(&mut self) {
        self.celebrations += 1;
    }
}
