use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use super::*;
use crate::entities::AnswerOption;
use crate::test_helpers::{app, client_for, serve};

fn question(category: &str, text: &str, correct: &str, wrong: &str) -> Question {
    Question {
        id: text.into(),
        category: category.into(),
        question_text: text.into(),
        options: vec![
            AnswerOption { text: wrong.into(), is_correct: false },
            AnswerOption { text: correct.into(), is_correct: true },
        ],
    }
}

fn bank() -> Vec<Question> {
    vec![
        question("СИЗ", "q1", "a", "x"),
        question("Первая помощь", "other", "a", "x"),
        question("СИЗ", "q2", "b", "x"),
        question("СИЗ", "q3", "c", "x"),
    ]
}

fn result(category: &str, percentage: u32, passed: bool) -> TestResult {
    TestResult {
        id: String::new(),
        user_email: "a@b.ru".into(),
        category: category.into(),
        score: 0,
        total_questions: 0,
        percentage,
        passed,
        duration_seconds: 0,
        created_date: None,
    }
}

fn answer_all(session: &mut QuizSession, answers: &[&str], finish: Instant) -> QuizOutcome {
    for (i, answer) in answers.iter().enumerate() {
        session.select(answer);
        let step = session.next_at(finish).unwrap();
        if i + 1 == answers.len() {
            let Step::Completed(outcome) = step else { panic!("expected completion") };
            return outcome;
        }
        assert_eq!(step, Step::Advanced);
    }
    panic!("no answers given");
}

// =========================================================================
// scoring
// =========================================================================

#[test]
fn percentage_rounds_and_pass_mark_is_seventy() {
    assert_eq!(percentage(2, 3), 67);
    assert_eq!(percentage(1, 3), 33);
    assert_eq!(percentage(7, 10), 70);
    assert_eq!(percentage(0, 0), 0);
    assert!(is_passing(70));
    assert!(!is_passing(69));
}

#[test]
fn exact_halves_round_up() {
    assert_eq!(percentage(23, 40), 58);
    assert_eq!(percentage(29, 200), 15);
    assert_eq!(percentage(1, 8), 13);
    assert_eq!(rounded_mean(&[57, 58]), 58);
}

#[test]
fn percentage_matches_integer_rounding() {
    for total in 1..=400_u32 {
        for score in 0..=total {
            let expected = (200 * score + total) / (2 * total);
            assert_eq!(percentage(score, total), expected, "{score}/{total}");
        }
    }
}

#[test]
fn score_requires_exact_text() {
    let questions = vec![question("СИЗ", "q", "Каска", "Кепка")];
    assert_eq!(score_answers(&questions, &[Some("Каска".into())]), 1);
    assert_eq!(score_answers(&questions, &[Some("каска".into())]), 0);
    assert_eq!(score_answers(&questions, &[None]), 0);
}

// =========================================================================
// QuizSession
// =========================================================================

#[test]
fn empty_category_starts_nothing() {
    let err = QuizSession::start("СОУТ", &bank()).unwrap_err();
    assert_eq!(err.display_message(), ERR_NO_QUESTIONS);
}

#[test]
fn start_keeps_only_the_category() {
    let session = QuizSession::start("СИЗ", &bank()).unwrap();
    assert_eq!(session.total(), 3);
    assert_eq!(session.current_question().question_text, "q1");
    assert_eq!(session.progress_percent(), 33);
}

#[test]
fn next_requires_a_selection() {
    let mut session = QuizSession::start("СИЗ", &bank()).unwrap();
    assert!(session.next().unwrap_err().is_validation());
    assert_eq!(session.index(), 0);
}

#[test]
fn previous_restores_recorded_answer() {
    let mut session = QuizSession::start("СИЗ", &bank()).unwrap();
    assert!(!session.previous());

    session.select("a");
    session.next().unwrap();
    assert_eq!(session.selection(), None);

    session.select("x");
    assert!(session.previous());
    assert_eq!(session.index(), 0);
    assert_eq!(session.selection(), Some("a"));
}

#[test]
fn unrecorded_selection_is_lost_on_previous() {
    let mut session = QuizSession::start("СИЗ", &bank()).unwrap();
    session.select("a");
    session.next().unwrap();
    session.select("b");
    session.previous();
    session.next().unwrap();

    assert_eq!(session.index(), 1);
    assert_eq!(session.selection(), None);
}

#[test]
fn completion_scores_and_times_the_run() {
    let started = Instant::now();
    let mut session = QuizSession::start_at("СИЗ", &bank(), started).unwrap();

    let outcome = answer_all(&mut session, &["a", "b", "x"], started + Duration::from_millis(12_900));

    assert_eq!(outcome.score, 2);
    assert_eq!(outcome.total_questions, 3);
    assert_eq!(outcome.percentage, 67);
    assert!(!outcome.passed);
    assert_eq!(outcome.duration_seconds, 12);
    assert!(session.is_finished());
    assert!(matches!(session.next(), Err(TrainingError::InvalidState(_))));
}

#[test]
fn all_correct_passes() {
    let started = Instant::now();
    let mut session = QuizSession::start_at("СИЗ", &bank(), started).unwrap();

    let outcome = answer_all(&mut session, &["a", "b", "c"], started);

    assert_eq!(outcome.percentage, 100);
    assert!(outcome.passed);
    assert_eq!(outcome.duration_seconds, 0);

    let record = outcome.to_new_result("worker@example.com");
    assert_eq!(record.user_email, "worker@example.com");
    assert_eq!(record.category, "СИЗ");
    assert_eq!(record.score, 3);
}

#[test]
fn last_question_is_flagged() {
    let mut session = QuizSession::start("СИЗ", &bank()).unwrap();
    for answer in ["a", "b"] {
        assert!(!session.is_last());
        session.select(answer);
        session.next().unwrap();
    }
    assert!(session.is_last());
    assert_eq!(session.progress_percent(), 100);
}

// =========================================================================
// history
// =========================================================================

#[test]
fn category_stats_uses_newest_result() {
    let results = vec![result("СИЗ", 80, true), result("СОУТ", 40, false), result("СИЗ", 50, false)];

    let stats = category_stats(&results, "СИЗ");
    assert!(stats.attempted);
    assert_eq!(stats.last_score, Some(80));
    assert_eq!(stats.passed, Some(true));

    assert_eq!(category_stats(&results, "СИЗ в быту"), CategoryStats::default());
}

#[test]
fn overview_counts_and_averages() {
    let results = vec![result("СИЗ", 80, true), result("СОУТ", 45, false)];
    assert_eq!(overview(&results), ResultsOverview { taken: 2, passed: 1, average_percentage: 63 });
    assert_eq!(overview(&[]), ResultsOverview::default());
}

#[test]
fn categories_are_fixed() {
    assert_eq!(CATEGORIES.len(), 7);
    assert_eq!(CATEGORIES[0], "Общие требования");
}

#[tokio::test]
async fn save_result_posts_scored_record() {
    let router = app(Router::new().route(
        "/entities/TestResult",
        post(|Json(mut body): Json<Value>| async move {
            body["id"] = json!("r1");
            Json(body)
        }),
    ));
    let origin = serve(router).await;
    let outcome = QuizOutcome {
        category: "СИЗ".into(),
        score: 7,
        total_questions: 10,
        percentage: 70,
        passed: true,
        duration_seconds: 95,
    };

    let saved = save_result(&client_for(&origin, None), &outcome, "a@b.ru").await.unwrap();

    assert_eq!(saved.id, "r1");
    assert_eq!(saved.user_email, "a@b.ru");
    assert!(saved.passed);
    assert_eq!(saved.duration_seconds, 95);
}

#[tokio::test]
async fn cancelled_quiz_leaves_no_saved_result() {
    let store: Arc<Mutex<Vec<Value>>> = Arc::default();
    let (posted, listed) = (Arc::clone(&store), Arc::clone(&store));
    let router = app(Router::new().route(
        "/entities/TestResult",
        post(move |Json(mut body): Json<Value>| async move {
            let mut rows = posted.lock().unwrap();
            body["id"] = json!(format!("r{}", rows.len()));
            rows.push(body.clone());
            Json(body)
        })
        .get(move || async move { Json(Value::Array(listed.lock().unwrap().clone())) }),
    ));
    let client = client_for(&serve(router).await, None);
    let start = Instant::now();

    let mut finished = QuizSession::start_at("СИЗ", &bank(), start).unwrap();
    let outcome = answer_all(&mut finished, &["a", "b", "c"], start);
    save_result(&client, &outcome, "a@b.ru").await.unwrap();

    let mut abandoned = QuizSession::start_at("СИЗ", &bank(), start).unwrap();
    abandoned.select("a");
    abandoned.next_at(start).unwrap();
    abandoned.cancel();

    let saved = load_results(&client, "a@b.ru").await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(store.lock().unwrap().len(), 1);
    assert_eq!(saved[0].score, 3);
}
