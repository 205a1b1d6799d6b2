//! Dispatch: resolve a route, validate input, run the handler, map every
//! outcome to a reply.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::debug;

use wrpc_schema::{Issue, SchemaViolation};
use wrpc_wire::{QueryId, ResponseEnvelope, ResponseError, Status};

use crate::router::Router;

/// A response envelope minus the correlation id.
///
/// Produced by [`Router::dispatch`]; the endpoint stamps the `queryId` on
/// before sending.
#[derive(Debug)]
pub struct Reply {
    status: Status,
    payload: Option<Value>,
    error: Option<ResponseError>,
}

impl Reply {
    fn ok(payload: Value) -> Self {
        Self {
            status: Status::Ok,
            payload: Some(payload),
            error: None,
        }
    }

    fn validation_failed(issues: Vec<Issue>) -> Self {
        Self {
            status: Status::InvalidInput,
            payload: None,
            error: Some(ResponseError::Issues(issues)),
        }
    }

    fn not_found(route: &str) -> Self {
        Self {
            status: Status::NotFound,
            payload: None,
            error: Some(ResponseError::Message(format!("Route {} not found", route))),
        }
    }

    fn internal(message: String) -> Self {
        Self {
            status: Status::Internal,
            payload: None,
            error: Some(ResponseError::Message(message)),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn error(&self) -> Option<&ResponseError> {
        self.error.as_ref()
    }

    /// Attach the correlation id, producing the wire envelope.
    pub fn into_envelope(self, query_id: QueryId) -> ResponseEnvelope {
        ResponseEnvelope {
            query_id,
            status: self.status,
            payload: self.payload,
            error: self.error,
        }
    }
}

impl<C: Send + Sync + 'static> Router<C> {
    /// Dispatch one call.
    ///
    /// Total over its failure modes: an unresolvable route, invalid input, a
    /// failing handler, and a panicking handler all come back as a [`Reply`];
    /// this function itself neither errors nor panics.
    ///
    /// The handler only runs if the route resolved and the input passed its
    /// schema. A handler failure that is a [`SchemaViolation`] is reported as
    /// a validation failure; any other failure is internal.
    pub async fn dispatch(&self, route: &str, input: Value, ctx: Arc<C>) -> Reply {
        let Some(procedure) = self.resolve(route) else {
            debug!(route, "route did not resolve");
            return Reply::not_found(route);
        };

        let parsed = match procedure.input_schema().validate(&input) {
            Ok(parsed) => parsed,
            Err(issues) => {
                debug!(route, issues = issues.len(), "input failed validation");
                return Reply::validation_failed(issues);
            }
        };

        match AssertUnwindSafe(procedure.call(parsed, ctx))
            .catch_unwind()
            .await
        {
            Ok(Ok(payload)) => Reply::ok(payload),
            Ok(Err(failure)) => match failure.downcast::<SchemaViolation>() {
                Ok(violation) => Reply::validation_failed(violation.issues),
                Err(other) => {
                    debug!(route, error = %other, "handler failed");
                    Reply::internal(other.to_string())
                }
            },
            Err(panic) => Reply::internal(panic_message(&*panic)),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("handler panicked: {}", message)
    } else {
        "handler panicked".to_string()
    }
}
