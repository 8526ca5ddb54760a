//! Client tests against a local stub server

use axum::{http::StatusCode, routing::post, Json, Router};
use isgpt_cli::IsgptClient;
use serde_json::Value;

/// Serve `app` on an ephemeral port and return its base URL
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn echo(Json(body): Json<Value>) -> String {
    format!(
        "{}|{}",
        body["sentence"].as_str().unwrap_or_default(),
        body["verbose"]
    )
}

#[tokio::test]
async fn test_analyze_posts_sentence_and_verbose() {
    let base = spawn(Router::new().route("/infer", post(echo))).await;
    let client = IsgptClient::new(format!("{}/", base)).unwrap();

    let body = client.analyze("some text", true).await.unwrap();
    assert_eq!(body, "some text|true");

    let body = client.analyze("other", false).await.unwrap();
    assert_eq!(body, "other|false");
}

#[tokio::test]
async fn test_analyze_reports_server_errors() {
    let app = Router::new().route(
        "/infer",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model exploded") }),
    );
    let base = spawn(app).await;
    let client = IsgptClient::new(base).unwrap();

    let err = client.analyze("text", false).await.unwrap_err();
    assert_eq!(err.to_string(), "server returned error 500: model exploded");
}

#[tokio::test]
async fn test_analyze_unreachable_server() {
    // Bind and drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = IsgptClient::new(format!("http://{}", addr)).unwrap();
    let err = client.analyze("text", false).await.unwrap_err();
    assert!(err.to_string().contains("failed to connect to server"));
}
