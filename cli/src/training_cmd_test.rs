use std::io::Cursor;

use training::chat::ToolCall;
use training::entities::{AnswerOption, Question};

use super::*;

fn bank() -> Vec<Question> {
    ["Каска", "Перчатки"]
        .iter()
        .enumerate()
        .map(|(i, correct)| Question {
            id: format!("q{i}"),
            category: "СИЗ".into(),
            question_text: format!("Вопрос {i}"),
            options: vec![
                AnswerOption { text: "Ничего".into(), is_correct: false },
                AnswerOption { text: (*correct).into(), is_correct: true },
            ],
        })
        .collect()
}

fn run_quiz_with(input: &str) -> (Option<quiz::QuizOutcome>, String) {
    let session = QuizSession::start("СИЗ", &bank()).unwrap();
    let mut out = Vec::new();
    let outcome = take_quiz(session, &mut Cursor::new(input.as_bytes()), &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn quiz_completes_from_numbered_answers() {
    let (outcome, transcript) = run_quiz_with("2\n1\n");

    let outcome = outcome.unwrap();
    assert_eq!(outcome.score, 1);
    assert_eq!(outcome.percentage, 50);
    assert!(!outcome.passed);
    assert!(transcript.contains("[1/2 50%] Вопрос 0"));
    assert!(transcript.contains("[2/2 100%] Вопрос 1"));
}

#[test]
fn quiz_back_shows_previous_selection() {
    let (outcome, transcript) = run_quiz_with("2\nb\n2\n2\n");

    assert_eq!(outcome.unwrap().score, 2);
    assert!(transcript.contains(" *2. Каска"));
}

#[test]
fn quiz_ignores_bad_input_and_cancels() {
    let (outcome, transcript) = run_quiz_with("7\nfoo\nq\n");
    assert!(outcome.is_none());
    assert_eq!(transcript.matches("enter an option number").count(), 2);

    let (outcome, _) = run_quiz_with("2\n");
    assert!(outcome.is_none());
}

#[test]
fn mime_follows_extension() {
    assert_eq!(mime_for("order.PDF"), "application/pdf");
    assert_eq!(mime_for("notes.txt"), "text/plain");
    assert_eq!(mime_for("scan"), "application/octet-stream");
}

#[test]
fn reply_lists_tool_calls_before_text() {
    let reply = ChatMessage {
        role: "assistant".into(),
        content: Some("Каска обязательна.".into()),
        tool_calls: vec![ToolCall {
            name: Some("documents.search".into()),
            status: Some("completed".into()),
            ..ToolCall::default()
        }],
    };

    assert_eq!(render_reply(&reply), "[search documents • done]\nКаска обязательна.");
}
