//! Hello Worker Example
//!
//! Stands up a router inside a worker task and calls it from the main task
//! over an in-process channel pair: a success, a nested route, a validation
//! failure, and an unknown route.

use serde_json::json;
use wrpc_client::ClientEndpoint;
use wrpc_schema::Schema;
use wrpc_server::{Procedure, Router, RouterBuilder, ServerEndpoint};
use wrpc_wire::channel;

/// Per-deployment context threaded into every handler.
struct AppContext {
    greeting_prefix: String,
}

fn build_router() -> Router<AppContext> {
    Router::builder()
        .route(
            "hello",
            Procedure::new(
                Schema::object([("name", Schema::string())]),
                |input, ctx: std::sync::Arc<AppContext>| async move {
                    let name = input["name"].as_str().unwrap_or_default();
                    Ok(json!(format!("{} {}", ctx.greeting_prefix, name)))
                },
            ),
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

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let (local, remote) = channel::pair();

    // The "worker": a server endpoint draining its half of the channel.
    let ctx = AppContext {
        greeting_prefix: "Hello".to_string(),
    };
    let endpoint = ServerEndpoint::new(build_router(), ctx, remote.sender);
    tokio::spawn(endpoint.serve(remote.receiver));

    // The "main thread": a client endpoint on the other half.
    let client = ClientEndpoint::new(local.sender, local.receiver);

    match client.query("hello", json!({"name": "John"})).await {
        Ok(payload) => println!("hello -> {}", payload),
        Err(error) => println!("hello failed: {}", error),
    }

    match client
        .query("subRouter.subRoute", json!({"ids": ["1", "2"]}))
        .await
    {
        Ok(payload) => println!("subRouter.subRoute -> {}", payload),
        Err(error) => println!("subRouter.subRoute failed: {}", error),
    }

    // Wrong element type: settles with status 400 and the issue list.
    if let Err(error) = client
        .query("subRouter.subRoute", json!({"ids": [1, 2]}))
        .await
    {
        println!("invalid input -> {}", error);
    }

    // Walking past a leaf: settles with status 404.
    if let Err(error) = client.query("hello.notFound", json!({"name": "John"})).await {
        println!("unknown route -> {}", error);
    }
}
