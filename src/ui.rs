use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, SetupField},
    celebration::{CelebrationAnimation, CONFETTI_COLORS},
    clock::Clock,
    session::{MAX_TABLE, MIN_TABLE},
    summary::GradeBand,
    surface::FeedbackKind,
    view::{Cue, Screen},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const GOLD: Color = Color::Rgb(255, 215, 0);
const ORANGE: Color = Color::Rgb(255, 165, 0);

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.quiz.presentation().screen {
            Screen::Setup => render_setup(self, area, buf),
            Screen::Game => render_game(self, area, buf),
            Screen::Results => render_results(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn legend(items: &[&str]) -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        items.iter().join(" / "),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
}

fn render_setup<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let form = &app.setup;
    let table_rows = u16::from(MAX_TABLE - MIN_TABLE + 1);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3),              // title
            Constraint::Length(table_rows + 2), // table list
            Constraint::Length(3),              // question count
            Constraint::Length(1),              // error
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "Times Tables Mission",
        bold().fg(Color::Cyan),
    ))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let focused = |field: SetupField| {
        if form.focus == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    };

    let tables: Vec<Line> = (MIN_TABLE..=MAX_TABLE)
        .map(|n| {
            let label = format!("The {n}'s Table");
            if n == form.table {
                Line::from(Span::styled(
                    format!("▶ {label}"),
                    bold().fg(Color::Green),
                ))
            } else {
                Line::from(format!("  {label}"))
            }
        })
        .collect();
    Paragraph::new(tables)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focused(SetupField::Table))
                .title("Table"),
        )
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let cursor = if form.focus == SetupField::QuestionCount {
        "_"
    } else {
        ""
    };
    Paragraph::new(format!("{}{}", form.count_input, cursor))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focused(SetupField::QuestionCount))
                .title("Questions"),
        )
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    if let Some(error) = &form.error {
        Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }

    legend(&["(↑/↓) choose", "(tab) switch field", "(enter) start", "(esc)ape"])
        .render(chunks[5], buf);
}

fn render_game<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let view = app.quiz.presentation();
    let flash = app.quiz.feedback().flash();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // score + time
            Constraint::Length(3), // progress
            Constraint::Min(3),    // question
            Constraint::Length(3), // answer
            Constraint::Length(1), // feedback
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);
    Paragraph::new(Span::styled(view.score_text(), bold())).render(header[0], buf);
    Paragraph::new(Span::styled(view.time_text(), bold()))
        .alignment(Alignment::Right)
        .render(header[1], buf);

    Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(view.progress.clamp(0.0, 1.0))
        .render(chunks[1], buf);

    let question: Vec<Line> = view
        .question
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), bold())))
        .collect();
    Paragraph::new(question)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    let locked = app.quiz.is_input_locked();
    let answer_text = if locked {
        app.answer.clone()
    } else {
        format!("{}_", app.answer)
    };
    let box_width = (answer_text.width() as u16 + 4).max(12).min(chunks[3].width);
    let answer_area = Rect {
        x: chunks[3].x + (chunks[3].width - box_width) / 2,
        width: box_width,
        ..chunks[3]
    };
    let answer_style = if locked {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        bold()
    };
    let border_style = flash.map_or(Style::default(), |cue| Style::default().fg(cue_color(cue)));
    Paragraph::new(Span::styled(answer_text, answer_style))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Answer"),
        )
        .alignment(Alignment::Center)
        .render(answer_area, buf);

    if let Some((message, kind)) = &view.feedback {
        let color = match kind {
            FeedbackKind::Correct => Color::Green,
            FeedbackKind::Incorrect => Color::Red,
            FeedbackKind::Invalid => Color::Yellow,
        };
        let mut style = Style::default().fg(color);
        if flash.is_some() {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        Paragraph::new(Span::styled(message.as_str(), style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }

    legend(&["(enter) submit", "(esc) back to setup"]).render(chunks[6], buf);
}

fn render_results<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let Some(summary) = app.quiz.presentation().summary.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // heading
            Constraint::Length(1), // padding
            Constraint::Length(3), // banner
            Constraint::Length(1), // score
            Constraint::Length(1), // time
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled("Mission Complete! 🎉", bold().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    if let Some(banner) = summary.band.banner() {
        let color = match summary.band {
            GradeBand::Mastery => GOLD,
            _ => ORANGE,
        };
        let banner_width = (banner.width() as u16 + 4).min(chunks[3].width);
        let banner_area = Rect {
            x: chunks[3].x + (chunks[3].width - banner_width) / 2,
            width: banner_width,
            ..chunks[3]
        };
        Paragraph::new(Span::styled(banner, bold().fg(color)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .alignment(Alignment::Center)
            .render(banner_area, buf);
    }

    Paragraph::new(Span::styled(summary.score_line(), bold()))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    Paragraph::new(summary.time_line())
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

    let continue_item = summary
        .continue_label()
        .map(|label| format!("(c) {label}"));
    let mut items: Vec<&str> = continue_item.iter().map(String::as_str).collect();
    items.extend(["(n)ew mission", "(esc)ape"]);
    legend(&items).render(chunks[7], buf);

    let celebration = &app.quiz.feedback().celebration;
    if celebration.is_active {
        render_celebration_particles(celebration, area, buf);
    }
}

/// Draws the celebration on top of whatever is already in the buffer
fn render_celebration_particles(celebration: &CelebrationAnimation, area: Rect, buf: &mut Buffer) {
    for particle in celebration.particles.iter().filter(|p| p.is_visible()) {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;
        if x >= area.width || y >= area.height {
            continue;
        }

        let (r, g, b) = CONFETTI_COLORS[particle.color_index % CONFETTI_COLORS.len()];
        let mut style = Style::default().fg(Color::Rgb(r, g, b));
        let left = particle.remaining();
        if left > 0.7 {
            style = style.add_modifier(Modifier::BOLD);
        } else if left < 0.3 {
            style = style.add_modifier(Modifier::DIM);
        }

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}

fn cue_color(cue: Cue) -> Color {
    match cue {
        Cue::Correct => Color::Green,
        Cue::Incorrect => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::celebration::CelebrationStyle;
    use crate::clock::ManualClock;
    use crate::quiz::QuizController;
    use crate::session::SessionConfig;
    use crate::timers::FEEDBACK_DELAY_MS;
    use crate::view::{TerminalFeedback, TerminalView};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn create_test_app(table: u8, count: u32) -> (App<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let quiz = QuizController::new(
            TerminalView::new(),
            TerminalFeedback::new(CelebrationStyle::Confetti, false),
            clock.clone(),
        )
        .with_seed(1)
        .with_setup_defaults(SessionConfig::new(table, count).unwrap());
        (App::new(quiz), clock)
    }

    fn rendered(app: &App<ManualClock>, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn press(app: &mut App<ManualClock>, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn finish(app: &mut App<ManualClock>, clock: &ManualClock, correct: bool) {
        press(app, KeyCode::Enter);
        while app.quiz.state().current_question.is_some() {
            let expected = app.quiz.state().current_question.unwrap().expected_answer;
            let answer = if correct { expected } else { expected + 1 };
            for c in answer.to_string().chars() {
                press(app, KeyCode::Char(c));
            }
            press(app, KeyCode::Enter);
            clock.advance_ms(FEEDBACK_DELAY_MS);
            app.on_tick();
        }
    }

    #[test]
    fn setup_lists_every_table() {
        let (app, _) = create_test_app(5, 20);
        let text = rendered(&app, 80, 30);
        assert!(text.contains("Times Tables Mission"));
        for n in MIN_TABLE..=MAX_TABLE {
            assert!(text.contains(&format!("The {n}'s Table")), "missing {n}");
        }
        assert!(text.contains("▶ The 5's Table"));
        assert!(text.contains("20"));
    }

    #[test]
    fn setup_shows_count_error() {
        let (mut app, _) = create_test_app(5, 20);
        app.setup.error = Some("Enter a question count of at least 1".into());
        let text = rendered(&app, 80, 30);
        assert!(text.contains("Enter a question count of at least 1"));
    }

    #[test]
    fn game_shows_question_score_and_time() {
        let (mut app, clock) = create_test_app(7, 10);
        press(&mut app, KeyCode::Enter);
        clock.advance_ms(3_000);
        app.on_tick();
        press(&mut app, KeyCode::Char('4'));

        let text = rendered(&app, 80, 24);
        assert!(text.contains("Question 1 of 10:"));
        assert!(text.contains("What is 7 ×"));
        assert!(text.contains("Score: 0/0"));
        assert!(text.contains("Time: 3s"));
        assert!(text.contains("4_"));
    }

    #[test]
    fn game_shows_feedback() {
        let (mut app, _) = create_test_app(3, 4);
        press(&mut app, KeyCode::Enter);
        let expected = app.quiz.state().current_question.unwrap().expected_answer;
        for c in (expected + 1).to_string().chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        let text = rendered(&app, 80, 24);
        assert!(text.contains(&format!("Incorrect. The answer is {expected}.")));
        assert!(text.contains("Score: 0/1"));
    }

    #[test]
    fn results_show_banner_and_continue() {
        let (mut app, clock) = create_test_app(5, 2);
        finish(&mut app, &clock, true);
        app.quiz.feedback_mut().celebration.stop();

        let text = rendered(&app, 80, 24);
        assert!(text.contains("Mission Complete!"));
        assert!(text.contains("Mission Master!"));
        assert!(text.contains("You scored 2 out of 2 (100%)!"));
        assert!(text.contains("Continue to the 6's Table"));
    }

    #[test]
    fn results_without_banner_on_low_score() {
        let (mut app, clock) = create_test_app(12, 2);
        finish(&mut app, &clock, false);
        app.quiz.feedback_mut().celebration.stop();

        let text = rendered(&app, 80, 24);
        assert!(text.contains("You scored 0 out of 2 (0%)!"));
        assert!(!text.contains("Mission Master"));
        assert!(!text.contains("Great Effort"));
        assert!(!text.contains("Continue to the"));
    }

    #[test]
    fn celebration_draws_over_results() {
        let (mut app, clock) = create_test_app(4, 1);
        finish(&mut app, &clock, true);
        assert!(app.quiz.feedback().celebration.is_active);
        for p in app.quiz.feedback_mut().celebration.particles.iter_mut() {
            p.delay = 0.0;
        }
        // must not panic, whatever the particle positions
        let _ = rendered(&app, 80, 24);
        let _ = rendered(&app, 10, 5);
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let (mut app, _) = create_test_app(4, 1);
        let _ = rendered(&app, 20, 5);
        press(&mut app, KeyCode::Enter);
        let _ = rendered(&app, 20, 5);
    }

    #[test]
    fn cue_colors() {
        assert_eq!(cue_color(Cue::Correct), Color::Green);
        assert_eq!(cue_color(Cue::Incorrect), Color::Red);
    }
}
