//! # WRPC Server
//!
//! The server half of a WRPC deployment: an immutable tree of named
//! procedures, a dispatcher that resolves dotted route paths against it, and
//! an endpoint that bridges an inbound message channel to the dispatcher.
//!
//! Dispatch is a total function: every failure mode — unresolvable route,
//! input that fails its schema, a handler error, even a handler panic — is
//! converted to a response envelope. Nothing escapes the dispatch boundary as
//! an error or panic.
//!
//! ## Quick Start
//!
//! ```rust
//! use wrpc_server::{Procedure, Router, ServerEndpoint};
//! use wrpc_schema::Schema;
//! use serde_json::{json, Value};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let router: Router<()> = Router::builder()
//!     .route(
//!         "hello",
//!         Procedure::new(Schema::object([("name", Schema::string())]), |input: Value, _ctx| async move {
//!             let name = input["name"].as_str().unwrap_or_default().to_string();
//!             Ok(json!(format!("Hello {}", name)))
//!         }),
//!     )
//!     .build();
//!
//! let reply = router
//!     .dispatch("hello", json!({"name": "John"}), std::sync::Arc::new(()))
//!     .await;
//! assert!(reply.status().is_ok());
//! # }
//! ```

pub mod dispatch;
pub mod endpoint;
pub mod handler;
pub mod router;

pub use dispatch::Reply;
pub use endpoint::ServerEndpoint;
pub use handler::{Handler, HandlerError, HandlerResult};
pub use router::{Procedure, RouteNode, Router, RouterBuilder};
