use assert_matches::assert_matches;
use multiquiz::clock::ManualClock;
use multiquiz::session::{Phase, SessionConfig};
use multiquiz::summary::GradeBand;
use multiquiz::surface::{PresentationCall, RecordingFeedback, RecordingPresentation};
use multiquiz::timers::FEEDBACK_DELAY_MS;
use multiquiz::{QuizController, QuizError, SubmitResult};

/// End-to-end controller scenarios through the public API only.

type Quiz = QuizController<RecordingPresentation, RecordingFeedback, ManualClock>;

fn start(table: u8, question_count: u32, seed: u64) -> (Quiz, ManualClock) {
    let clock = ManualClock::new(1_700_000_000_000);
    let mut quiz = QuizController::new(
        RecordingPresentation::default(),
        RecordingFeedback::default(),
        clock.clone(),
    )
    .with_seed(seed);
    quiz.start_session(SessionConfig::new(table, question_count).unwrap());
    (quiz, clock)
}

/// Answers the open question and lets the feedback delay run out
fn play(quiz: &mut Quiz, clock: &ManualClock, correct: bool) -> SubmitResult {
    let expected = quiz.state().current_question.unwrap().expected_answer;
    let guess = if correct { expected } else { expected + 7 };
    let result = quiz.submit_answer(&guess.to_string());
    clock.advance_ms(FEEDBACK_DELAY_MS);
    quiz.poll();
    result
}

#[test]
fn fives_two_right_one_wrong() {
    let (mut quiz, clock) = start(5, 3, 1);

    assert_eq!(play(&mut quiz, &clock, true), SubmitResult::Correct);
    assert_eq!(play(&mut quiz, &clock, true), SubmitResult::Correct);
    assert_matches!(
        play(&mut quiz, &clock, false),
        SubmitResult::Incorrect { .. }
    );

    assert_eq!(quiz.phase(), Phase::Complete);
    let summary = quiz.summary().unwrap();
    assert_eq!(summary.table, 5);
    assert_eq!(summary.score, 2);
    assert_eq!(summary.question_count, 3);
    assert!((summary.percentage - 66.67).abs() < 0.01);
    assert_eq!(summary.band, GradeBand::None);
    assert!(summary.can_advance);
    assert_eq!(quiz.feedback().correct_cues, 2);
    assert_eq!(quiz.feedback().incorrect_cues, 1);
    assert_eq!(quiz.feedback().celebrations, 1);
}

#[test]
fn twelves_single_question() {
    let (mut quiz, clock) = start(12, 1, 2);
    assert_eq!(play(&mut quiz, &clock, true), SubmitResult::Correct);

    let summary = quiz.summary().unwrap();
    assert_eq!(summary.band, GradeBand::Mastery);
    assert!(!summary.can_advance);
    assert_matches!(quiz.advance_table(), Err(QuizError::NoNextTable));
}

#[test]
fn advancing_from_five_to_six() {
    let (mut quiz, clock) = start(5, 4, 3);
    for _ in 0..4 {
        play(&mut quiz, &clock, true);
    }
    assert_eq!(quiz.summary().unwrap().score, 4);

    quiz.advance_table().unwrap();
    assert_eq!(quiz.table(), 6);
    assert_eq!(quiz.state().score, 0);
    assert_eq!(quiz.question_count(), 4);
    assert_eq!(quiz.phase(), Phase::AwaitingAnswer);
    assert!(quiz
        .presentation()
        .questions()
        .last()
        .unwrap()
        .contains("What is 6 ×"));
}

#[test]
fn climbing_every_table() {
    let (mut quiz, clock) = start(2, 2, 4);
    let mut tables = vec![quiz.table()];
    loop {
        play(&mut quiz, &clock, true);
        play(&mut quiz, &clock, true);
        assert_eq!(quiz.phase(), Phase::Complete);
        match quiz.advance_table() {
            Ok(()) => tables.push(quiz.table()),
            Err(QuizError::NoNextTable) => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(tables, (2..=12).collect::<Vec<u8>>());
    assert_eq!(quiz.feedback().celebrations, 11);
}

#[test]
fn deferred_advance_fires_once_per_answer() {
    let (mut quiz, clock) = start(9, 5, 5);
    for asked in 1..=4u32 {
        assert_eq!(quiz.state().questions_asked, asked);
        play(&mut quiz, &clock, asked % 2 == 0);
        // extra polls never advance twice
        clock.advance_ms(FEEDBACK_DELAY_MS * 3);
        quiz.poll();
        assert_eq!(quiz.state().questions_asked, asked + 1);
        assert_eq!(quiz.phase(), Phase::AwaitingAnswer);
    }
    assert_eq!(quiz.presentation().questions().len(), 5);
}

#[test]
fn reset_leaves_nothing_pending() {
    let (mut quiz, clock) = start(4, 5, 6);
    let expected = quiz.state().current_question.unwrap().expected_answer;
    quiz.submit_answer(&expected.to_string());
    quiz.reset_to_setup();

    clock.advance_ms(60_000);
    quiz.poll();
    assert_eq!(quiz.phase(), Phase::Setup);
    assert_eq!(quiz.presentation().questions().len(), 1);
    assert_eq!(
        quiz.presentation().count(&PresentationCall::ShowSetup),
        1
    );

    // a fresh session afterwards starts clean
    quiz.start_session(SessionConfig::new(quiz.table(), quiz.question_count()).unwrap());
    assert_eq!(quiz.state().questions_asked, 1);
    assert_eq!(quiz.state().score, 0);
    assert_eq!(quiz.table(), 4);
}

#[test]
fn invalid_answers_do_not_count() {
    let (mut quiz, clock) = start(3, 2, 7);
    assert_eq!(quiz.submit_answer("three"), SubmitResult::Invalid);
    assert_eq!(quiz.submit_answer(""), SubmitResult::Invalid);
    play(&mut quiz, &clock, true);
    play(&mut quiz, &clock, true);
    let summary = quiz.summary().unwrap();
    assert_eq!(summary.score, 2);
    assert_eq!(summary.question_count, 2);
}

#[test]
fn elapsed_time_in_summary() {
    let (mut quiz, clock) = start(7, 2, 8);
    clock.advance_ms(4_200);
    play(&mut quiz, &clock, true);
    clock.advance_ms(3_000);
    play(&mut quiz, &clock, false);
    // 4.2 + 1.5 + 3.0 + 1.5 seconds
    assert_eq!(quiz.summary().unwrap().elapsed_seconds, 10);
}
