//! In-process mock backend for client tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::Multipart;
use tempfile::TempDir;

use super::client::ApiClient;
use crate::config::{HttpTimeouts, StudioConfig};

/// Serve `router` on an ephemeral local port and return its origin.
pub(crate) async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Client pointed at `origin` with its token file inside `dir`.
pub(crate) fn client_for(origin: &str, dir: &TempDir) -> ApiClient {
    let config = StudioConfig {
        api_url: origin.to_owned(),
        token_path: dir.path().join("storage.json"),
        timeouts: HttpTimeouts { request_secs: 5, connect_secs: 2 },
    };
    ApiClient::new(&config).unwrap()
}

/// A multipart field as the mock server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SeenField {
    pub name: String,
    pub file_name: Option<String>,
    pub value: Vec<u8>,
}

impl SeenField {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

pub(crate) type Recorder = Arc<Mutex<Vec<SeenField>>>;

pub(crate) async fn record_multipart(recorder: &Recorder, mut multipart: Multipart) {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let value = field.bytes().await.unwrap().to_vec();
        recorder.lock().unwrap().push(SeenField { name, file_name, value });
    }
}

pub(crate) fn text_fields(recorder: &Recorder) -> Vec<(String, String)> {
    recorder
        .lock()
        .unwrap()
        .iter()
        .filter(|f| f.file_name.is_none())
        .map(|f| (f.name.clone(), f.text()))
        .collect()
}
