//! In-process portal backend for tests.

use axum::Router;

use crate::client::TrainingClient;
use crate::config::TrainingConfig;

pub(crate) const APP_ID: &str = "app-test";

/// Serve `router` on an ephemeral local port and return its origin.
pub(crate) async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Client for the mock backend, routes nested under `/api/apps/app-test`.
pub(crate) fn client_for(origin: &str, token: Option<&str>) -> TrainingClient {
    let mut config = TrainingConfig::new(origin, APP_ID);
    config.api_token = token.map(str::to_owned);
    config.timeouts.request_secs = 5;
    config.timeouts.connect_secs = 2;
    TrainingClient::new(&config).unwrap()
}

/// Wrap `routes` under the app prefix the client targets.
pub(crate) fn app(routes: Router) -> Router {
    Router::new().nest(&format!("/api/apps/{APP_ID}"), routes)
}
