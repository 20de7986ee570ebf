use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use crm::engages::{EngageCustomerChange, EngagesApi, EngagesError, HttpEngagesClient};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use url::Url;

type Received = Arc<Mutex<Vec<Value>>>;

/// Serve a fake engages service on an ephemeral port and return its base URL.
async fn spawn_engages(received: Received) -> Url {
    let app = Router::new()
        .route("/api/engages/list", get(|| async { Json(json!([{"_id": "e1"}])) }))
        .route(
            "/api/engages/changeCustomer",
            post(
                |State(received): State<Received>, Json(body): Json<Value>| async move {
                    received.lock().await.push(body);
                    Json(json!({"status": "ok"}))
                },
            ),
        )
        .route(
            "/api/engages/send",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        )
        .with_state(received);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Url::parse(&format!("http://{}/api", addr)).unwrap()
}

#[tokio::test]
async fn test_change_customer_posts_camel_case_body() {
    let received = Received::default();
    let base = spawn_engages(received.clone()).await;
    let client = HttpEngagesClient::new(base, Duration::from_secs(5)).unwrap();

    client
        .change_customer(&EngageCustomerChange {
            new_customer_id: "new".to_string(),
            customer_ids: vec!["a".to_string(), "b".to_string()],
        })
        .await
        .unwrap();

    let bodies = received.lock().await;
    assert_eq!(
        bodies.as_slice(),
        &[json!({"newCustomerId": "new", "customerIds": ["a", "b"]})]
    );
}

#[tokio::test]
async fn test_list_decodes_json() {
    let base = spawn_engages(Received::default()).await;
    let client = HttpEngagesClient::new(base, Duration::from_secs(5)).unwrap();

    assert_eq!(client.list().await.unwrap(), json!([{"_id": "e1"}]));
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let base = spawn_engages(Received::default()).await;
    let client = HttpEngagesClient::new(base, Duration::from_secs(5)).unwrap();

    match client.send(json!({"title": "hi"})).await {
        Err(EngagesError::Status { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}
