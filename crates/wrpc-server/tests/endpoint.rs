//! Endpoint behaviour over a raw channel: filtering, concurrency, stamping.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::sync::Notify;

use wrpc_schema::Schema;
use wrpc_server::{Procedure, Router, RouterBuilder, ServerEndpoint};

fn greeting_router() -> Router<()> {
    Router::builder()
        .route(
            "hello",
            Procedure::new(Schema::object([("name", Schema::string())]), |input, _| async move {
                Ok(json!(format!(
                    "Hello {}",
                    input["name"].as_str().unwrap_or_default()
                )))
            }),
        )
        .nest(
            "subRouter",
            RouterBuilder::new().route(
                "subRoute",
                Procedure::new(
                    Schema::object([("ids", Schema::array(Schema::string()))]),
                    |input, _| async move { Ok(json!({"ids": input["ids"]})) },
                ),
            ),
        )
        .build()
}

fn request(id: &str, route: &str, input: Value) -> Value {
    json!({"queryId": id, "route": route, "input": input})
}

#[tokio::test]
async fn test_endpoint_answers_request() {
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let endpoint = ServerEndpoint::new(greeting_router(), (), out_tx);

    endpoint.handle_message(request("q-1", "hello", json!({"name": "John"})));

    let response = out_rx.recv().await.unwrap();
    assert_eq!(response["queryId"], "q-1");
    assert_eq!(response["status"], 200);
    assert_eq!(response["payload"], "Hello John");
}

#[tokio::test]
async fn test_endpoint_ignores_unrelated_traffic() {
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let endpoint = ServerEndpoint::new(greeting_router(), (), out_tx);

    // None of these should produce a response or crash.
    endpoint.handle_message(json!("plain string"));
    endpoint.handle_message(json!({"kind": "metrics", "value": 3}));
    endpoint.handle_message(json!({"queryId": "q", "status": 200}));
    endpoint.handle_message(json!(null));

    endpoint.handle_message(request("q-2", "hello", json!({"name": "Jo"})));
    let response = out_rx.recv().await.unwrap();
    assert_eq!(response["queryId"], "q-2");
    assert!(out_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_responses_carry_their_own_query_ids() {
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let endpoint = ServerEndpoint::new(greeting_router(), (), out_tx);

    endpoint.handle_message(request("q-a", "hello", json!({"name": "A"})));
    endpoint.handle_message(request("q-b", "hello", json!({"name": "B"})));
    endpoint.handle_message(request("q-c", "missing", json!({})));

    let mut seen = Vec::new();
    for _ in 0..3 {
        let response = out_rx.recv().await.unwrap();
        seen.push(response);
    }
    for response in &seen {
        let id = response["queryId"].as_str().unwrap();
        match id {
            "q-a" => assert_eq!(response["payload"], "Hello A"),
            "q-b" => assert_eq!(response["payload"], "Hello B"),
            "q-c" => assert_eq!(response["status"], 404),
            other => panic!("unexpected queryId {}", other),
        }
    }
}

#[tokio::test]
async fn test_slow_handler_does_not_block_later_requests() {
    let gate = Arc::new(Notify::new());
    let release = Arc::clone(&gate);
    let router: Router<()> = Router::builder()
        .route(
            "slow",
            Procedure::new(Schema::any(), move |_, _| {
                let gate = Arc::clone(&gate);
                async move {
                    gate.notified().await;
                    Ok(json!("slow done"))
                }
            }),
        )
        .route(
            "fast",
            Procedure::new(Schema::any(), |_, _| async move { Ok(json!("fast done")) }),
        )
        .build();

    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let endpoint = ServerEndpoint::new(router, (), out_tx);

    endpoint.handle_message(request("q-slow", "slow", json!(null)));
    endpoint.handle_message(request("q-fast", "fast", json!(null)));

    // The fast response overtakes the gated one.
    let first = out_rx.recv().await.unwrap();
    assert_eq!(first["queryId"], "q-fast");

    release.notify_one();
    let second = out_rx.recv().await.unwrap();
    assert_eq!(second["queryId"], "q-slow");
}

#[tokio::test]
async fn test_serve_drains_until_close() {
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let endpoint = ServerEndpoint::new(greeting_router(), (), out_tx);
    let server = tokio::spawn(endpoint.serve(in_rx));

    in_tx
        .send(request("q-1", "subRouter.subRoute", json!({"ids": ["1", "2"]})))
        .unwrap();
    let response = out_rx.recv().await.unwrap();
    assert_eq!(response["payload"], json!({"ids": ["1", "2"]}));

    drop(in_tx);
    tokio::time::timeout(Duration::from_secs(1), server)
        .await
        .expect("serve should stop when the inbound channel closes")
        .unwrap();
}
