use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::*;
use crate::test_helpers::{app, client_for, serve};

fn log(email: &str) -> ConversationLog {
    ConversationLog {
        id: String::new(),
        user_email: email.into(),
        question: "?".into(),
        conversation_id: "c".into(),
        created_date: None,
    }
}

fn result(category: &str, percentage: u32, passed: bool) -> TestResult {
    TestResult {
        id: String::new(),
        user_email: "a@b.ru".into(),
        category: category.into(),
        score: 0,
        total_questions: 10,
        percentage,
        passed,
        duration_seconds: 0,
        created_date: None,
    }
}

fn document(kind: &str, status: &str) -> Document {
    Document { title: "d".into(), document_type: kind.into(), status: status.into(), ..Document::default() }
}

#[test]
fn empty_inputs_give_zeros() {
    assert_eq!(Statistics::compute(&[], &[], &[]), Statistics::default());
}

#[test]
fn counts_users_and_questions() {
    let logs = vec![log("a@b.ru"), log("c@d.ru"), log("a@b.ru")];
    let stats = Statistics::compute(&logs, &[], &[]);
    assert_eq!(stats.unique_users, 2);
    assert_eq!(stats.total_questions, 3);
}

#[test]
fn averages_and_pass_rates_round() {
    let results = vec![
        result("СИЗ", 90, true),
        result("СОУТ", 45, false),
        result("СИЗ", 60, false),
    ];

    let stats = Statistics::compute(&[], &results, &[]);

    assert_eq!(stats.tests_taken, 3);
    assert_eq!(stats.average_score, 65);
    assert_eq!(stats.pass_rate, 33);
    assert_eq!(
        stats.categories,
        vec![
            CategoryBreakdown { category: "СИЗ".into(), total: 2, passed: 1, pass_rate: 50 },
            CategoryBreakdown { category: "СОУТ".into(), total: 1, passed: 0, pass_rate: 0 },
        ]
    );
}

#[test]
fn pass_rate_rounds_exact_halves_up() {
    let results: Vec<TestResult> = (0..40).map(|i| result("СИЗ", 80, i < 23)).collect();

    let stats = Statistics::compute(&[], &results, &[]);

    assert_eq!(stats.pass_rate, 58);
    assert_eq!(stats.categories[0].pass_rate, 58);
}

#[test]
fn document_types_count_active_only() {
    let documents = vec![
        document("ГОСТ", "active"),
        document("Приказ", "archived"),
        document("Приказ", "active"),
        document("ГОСТ", "active"),
    ];

    let stats = Statistics::compute(&[], &[], &documents);

    assert_eq!(
        stats.document_types,
        vec![
            TypeCount { document_type: "ГОСТ".into(), count: 2 },
            TypeCount { document_type: "Приказ".into(), count: 1 },
        ]
    );
}

#[tokio::test]
async fn load_fetches_all_three_collections() {
    let router = app(
        Router::new()
            .route(
                "/entities/ConversationLog",
                get(|| async { Json(json!([{ "user_email": "a@b.ru", "question": "q" }])) }),
            )
            .route(
                "/entities/TestResult",
                get(|| async {
                    Json(json!([{
                        "user_email": "a@b.ru", "category": "СИЗ", "score": 8,
                        "total_questions": 10, "percentage": 80, "passed": true
                    }]))
                }),
            )
            .route(
                "/entities/Document",
                get(|| async { Json(json!([{ "title": "t", "document_type": "СанПиН", "status": "active" }])) }),
            ),
    );
    let origin = serve(router).await;

    let stats = Statistics::load(&client_for(&origin, None)).await.unwrap();

    assert_eq!(stats.unique_users, 1);
    assert_eq!(stats.average_score, 80);
    assert_eq!(stats.pass_rate, 100);
    assert_eq!(stats.document_types[0].document_type, "СанПиН");
}
