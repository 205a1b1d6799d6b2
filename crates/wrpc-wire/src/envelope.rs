use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use wrpc_schema::Issue;

use crate::status::Status;

/// Opaque correlation token minted by the client, one per call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(String);

impl QueryId {
    /// Mint a fresh id, collision-free for the lifetime of any channel.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for QueryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for QueryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A call request as sent client -> server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub query_id: QueryId,
    /// Dot-separated route path, e.g. `"subRouter.subRoute"`.
    pub route: String,
    /// Raw call input; unvalidated until the dispatcher processes it.
    pub input: Value,
}

impl RequestEnvelope {
    pub fn new(query_id: QueryId, route: impl Into<String>, input: Value) -> Self {
        Self {
            query_id,
            route: route.into(),
            input,
        }
    }
}

/// Error body of a non-success response.
///
/// Validation failures carry the ordered issue list; route and handler
/// failures carry a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseError {
    Issues(Vec<Issue>),
    Message(String),
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseError::Issues(issues) => {
                let rendered: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
                f.write_str(&rendered.join("; "))
            }
            ResponseError::Message(message) => f.write_str(message),
        }
    }
}

/// A call response as sent server -> client.
///
/// `payload` is present iff `status == 200`; `error` iff `status != 200`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub query_id: QueryId,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl ResponseEnvelope {
    /// Successful response carrying the handler's return value.
    pub fn ok(query_id: QueryId, payload: Value) -> Self {
        Self {
            query_id,
            status: Status::Ok,
            payload: Some(payload),
            error: None,
        }
    }

    /// The input failed the procedure's schema.
    pub fn validation_failed(query_id: QueryId, issues: Vec<Issue>) -> Self {
        Self {
            query_id,
            status: Status::InvalidInput,
            payload: None,
            error: Some(ResponseError::Issues(issues)),
        }
    }

    /// The route did not resolve to a procedure.
    pub fn not_found(query_id: QueryId, route: &str) -> Self {
        Self {
            query_id,
            status: Status::NotFound,
            payload: None,
            error: Some(ResponseError::Message(format!("Route {} not found", route))),
        }
    }

    /// The handler failed unexpectedly.
    pub fn internal(query_id: QueryId, message: impl Into<String>) -> Self {
        Self {
            query_id,
            status: Status::Internal,
            payload: None,
            error: Some(ResponseError::Message(message.into())),
        }
    }
}

/// Whether a raw channel message looks like a WRPC request envelope.
///
/// Endpoint owners use this to filter relevant traffic before routing, so a
/// shared channel can carry unrelated messages alongside WRPC.
pub fn is_request(raw: &Value) -> bool {
    raw.get("queryId").is_some_and(Value::is_string)
        && raw.get("route").is_some_and(Value::is_string)
}

/// Whether a raw channel message looks like a WRPC response envelope.
pub fn is_response(raw: &Value) -> bool {
    raw.get("queryId").is_some_and(Value::is_string)
        && raw.get("status").is_some_and(Value::is_number)
}
