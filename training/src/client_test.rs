use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use super::*;
use crate::entities::{Document, TestResult};
use crate::test_helpers::{app, client_for, serve};

type Seen = Arc<Mutex<Vec<String>>>;

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_owned()
}

#[tokio::test]
async fn list_sends_sort_and_token() {
    let seen: Seen = Arc::default();
    let recorder = seen.clone();
    let router = app(Router::new().route(
        "/entities/Document",
        get(move |headers: HeaderMap, Query(params): Query<HashMap<String, String>>| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(bearer(&headers));
                recorder.lock().unwrap().push(params.get("sort").cloned().unwrap_or_default());
                Json(json!([{ "id": "d1", "title": "ГОСТ 12.0.004", "document_type": "ГОСТ", "status": "active" }]))
            }
        }),
    ));
    let origin = serve(router).await;
    let client = client_for(&origin, Some("tok"));

    let docs: Vec<Document> = client.list(Some("-created_date")).await.unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "ГОСТ 12.0.004");
    assert!(docs[0].tags.is_empty());
    assert_eq!(*seen.lock().unwrap(), vec!["Bearer tok".to_owned(), "-created_date".to_owned()]);
}

#[tokio::test]
async fn anonymous_client_sends_no_authorization() {
    let seen: Seen = Arc::default();
    let recorder = seen.clone();
    let router = app(Router::new().route(
        "/entities/User/me",
        get(move |headers: HeaderMap| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(bearer(&headers));
                Json(json!({ "id": "u1", "email": "worker@example.com" }))
            }
        }),
    ));
    let origin = serve(router).await;

    let user = client_for(&origin, None).me().await.unwrap();

    assert_eq!(user.email, "worker@example.com");
    assert_eq!(user.full_name, None);
    assert_eq!(*seen.lock().unwrap(), vec!["none".to_owned()]);
}

#[tokio::test]
async fn filter_encodes_query_as_json() {
    let seen: Seen = Arc::default();
    let recorder = seen.clone();
    let router = app(Router::new().route(
        "/entities/TestResult",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(params.get("q").cloned().unwrap_or_default());
                Json(json!([]))
            }
        }),
    ));
    let origin = serve(router).await;
    let client = client_for(&origin, None);

    let results: Vec<TestResult> = client
        .filter(&json!({ "user_email": "a@b.ru" }), Some("-created_date"))
        .await
        .unwrap();

    assert!(results.is_empty());
    let q: Value = serde_json::from_str(&seen.lock().unwrap()[0]).unwrap();
    assert_eq!(q, json!({ "user_email": "a@b.ru" }));
}

#[tokio::test]
async fn update_puts_to_record_path() {
    let router = app(Router::new().route(
        "/entities/Document/{id}",
        put(|Path(id): Path<String>, Json(body): Json<Value>| async move {
            Json(json!({ "id": id, "title": "t", "status": body["status"] }))
        }),
    ));
    let origin = serve(router).await;
    let client = client_for(&origin, None);

    let doc: Document = client.update("d7", &json!({ "status": "archived" })).await.unwrap();

    assert_eq!(doc.id, "d7");
    assert_eq!(doc.status, "archived");
}

#[tokio::test]
async fn error_status_keeps_body() {
    let router = app(Router::new().route(
        "/entities/Question",
        get(|| async { (StatusCode::FORBIDDEN, "not allowed") }),
    ));
    let origin = serve(router).await;

    let err = client_for(&origin, None)
        .list::<crate::entities::Question>(None)
        .await
        .unwrap_err();

    match err {
        TrainingError::ApiStatus { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "not allowed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn upload_returns_file_url() {
    let seen: Seen = Arc::default();
    let recorder = seen.clone();
    let router = app(Router::new().route(
        "/integration-endpoints/Core/UploadFile",
        post(move |mut multipart: Multipart| {
            let recorder = recorder.clone();
            async move {
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_owned();
                    let file_name = field.file_name().unwrap_or_default().to_owned();
                    recorder.lock().unwrap().push(format!("{name}:{file_name}"));
                }
                Json(json!({ "file_url": "https://files.example/doc.pdf" }))
            }
        }),
    ));
    let origin = serve(router).await;
    let upload = Upload { name: "doc.pdf".into(), mime: "application/pdf".into(), bytes: b"%PDF".to_vec() };

    let url = client_for(&origin, None).upload_file(&upload).await.unwrap();

    assert_eq!(url, "https://files.example/doc.pdf");
    assert_eq!(*seen.lock().unwrap(), vec!["file:doc.pdf".to_owned()]);
}

#[tokio::test]
async fn upload_without_link_is_an_error() {
    let router = app(Router::new().route(
        "/integration-endpoints/Core/UploadFile",
        post(|| async { Json(json!({ "file_url": "" })) }),
    ));
    let origin = serve(router).await;
    let upload = Upload { name: "a.txt".into(), mime: "text/plain".into(), bytes: b"a".to_vec() };

    let err = client_for(&origin, None).upload_file(&upload).await.unwrap_err();

    assert!(matches!(err, TrainingError::MissingFileUrl));
}

#[test]
fn base_url_nests_app_id() {
    let client = client_for("http://portal.local/", Some("t"));
    assert_eq!(client.base_url(), "http://portal.local/api/apps/app-test");
    assert_eq!(client.agent_name(), "safety_consultant");
}
