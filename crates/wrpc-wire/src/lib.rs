//! # WRPC Wire Types
//!
//! The envelope structures exchanged between a client and a server endpoint
//! over a shared message channel, plus the predicates used to pick WRPC
//! traffic out of a channel that also carries unrelated messages.
//!
//! Every call is one request envelope and exactly one response envelope,
//! correlated by an opaque [`QueryId`]; nothing on the wire depends on
//! delivery order across calls.
//!
//! ## Wire shapes
//!
//! ```text
//! request:  { "queryId": "...", "route": "a.b.c", "input": <any> }
//! response: { "queryId": "...", "status": 200, "payload": <any> }
//! response: { "queryId": "...", "status": 400, "error": [ <issues> ] }
//! response: { "queryId": "...", "status": 404, "error": "Route a.b.c not found" }
//! ```

pub mod channel;
pub mod envelope;
pub mod status;

pub use channel::ChannelHalf;
pub use envelope::{QueryId, RequestEnvelope, ResponseEnvelope, ResponseError, is_request, is_response};
pub use status::Status;
