//! `HttpSignoutClient` against a real local HTTP server.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::any;
use bestbook_lifecycle::{HttpSignoutClient, LifecycleConfig, SignoutClient, SignoutError};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Captured {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: String,
}

#[derive(Clone)]
struct Api {
    seen: Arc<Mutex<Vec<Captured>>>,
    status: StatusCode,
    reply: &'static str,
}

async fn record(
    State(api): State<Api>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, &'static str) {
    api.seen.lock().unwrap().push(Captured {
        method,
        path: uri.path().to_owned(),
        headers,
        body,
    });
    (api.status, api.reply)
}

/// Serves every path on an ephemeral port; returns the base URL.
async fn serve(status: StatusCode, reply: &'static str) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let api = Api {
        seen: Arc::clone(&seen),
        status,
        reply,
    };
    let app = Router::new().fallback(any(record)).with_state(api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), seen)
}

#[tokio::test]
async fn test_sends_post_with_bearer_and_session_headers() {
    let (base, seen) = serve(StatusCode::OK, "{}").await;
    let client = HttpSignoutClient::new(&base, &LifecycleConfig::default()).unwrap();

    client.sign_out("tok.en.sig", "s-42").await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let request = &seen[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/user/signout");
    assert_eq!(request.headers["authorization"], "Bearer tok.en.sig");
    assert_eq!(request.headers["session-id"], "s-42");
    assert_eq!(request.headers["content-type"], "application/json");
    assert!(request.body.is_empty());
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let (base, seen) = serve(StatusCode::NO_CONTENT, "").await;
    let client = HttpSignoutClient::new(&format!("{base}/"), &LifecycleConfig::default()).unwrap();

    client.sign_out("t", "s").await.unwrap();

    assert_eq!(seen.lock().unwrap()[0].path, "/api/user/signout");
}

#[tokio::test]
async fn test_rejection_surfaces_server_message() {
    let (base, _) = serve(StatusCode::UNAUTHORIZED, r#"{"message":"session revoked"}"#).await;
    let client = HttpSignoutClient::new(&base, &LifecycleConfig::default()).unwrap();

    let err = client.sign_out("t", "s").await.unwrap_err();

    match err {
        SignoutError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "session revoked");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejection_with_plain_body_keeps_body() {
    let (base, _) = serve(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
    let client = HttpSignoutClient::new(&base, &LifecycleConfig::default()).unwrap();

    let err = client.sign_out("t", "s").await.unwrap_err();

    assert!(matches!(
        err,
        SignoutError::Status { status: 500, ref message } if message == "boom"
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        HttpSignoutClient::new(&format!("http://{addr}"), &LifecycleConfig::default()).unwrap();

    let err = client.sign_out("t", "s").await.unwrap_err();

    assert!(matches!(err, SignoutError::Request(_)));
}
