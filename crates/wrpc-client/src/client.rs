//! Client endpoint: issues calls and correlates responses by `queryId`.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use wrpc_wire::{QueryId, RequestEnvelope, ResponseEnvelope, ResponseError, Status, is_response};

use crate::error::{ClientError, ClientResult};

/// Continuations for calls awaiting their response, keyed by `queryId`.
///
/// The only shared mutable state in the protocol. Entries are inserted when a
/// call is issued and removed exactly once: by the demux task on response
/// arrival, by the caller on send failure, or by the drain on channel close.
type PendingCalls = Arc<Mutex<HashMap<QueryId, oneshot::Sender<ResponseEnvelope>>>>;

/// The client half of a WRPC channel.
pub struct ClientEndpoint {
    outbound: UnboundedSender<Value>,
    pending: PendingCalls,
    closed: Arc<AtomicBool>,
    demux: JoinHandle<()>,
}

impl ClientEndpoint {
    /// Create a client over the given channel halves and start its
    /// demultiplexer task.
    pub fn new(outbound: UnboundedSender<Value>, inbound: UnboundedReceiver<Value>) -> Self {
        let pending: PendingCalls = Arc::new(Mutex::new(HashMap::new()));
        let closed = Arc::new(AtomicBool::new(false));
        let demux = tokio::spawn(demux_loop(
            inbound,
            Arc::clone(&pending),
            Arc::clone(&closed),
        ));
        Self {
            outbound,
            pending,
            closed,
            demux,
        }
    }

    /// Issue a call and await its terminal response.
    ///
    /// Mints a fresh `queryId`, registers the continuation, sends the request
    /// envelope, and suspends until the matching response arrives. A
    /// non-success status surfaces as [`ClientError::Call`]; channel teardown
    /// while pending surfaces as [`ClientError::ChannelClosed`]. The pending
    /// entry is removed on every path.
    pub async fn query(&self, route: &str, input: Value) -> ClientResult<Value> {
        let query_id = QueryId::generate();
        let (settle, settled) = oneshot::channel();
        self.pending.lock().insert(query_id.clone(), settle);

        // The demux task flags closure before draining the table, so a call
        // registered after the drain still settles instead of hanging.
        if self.closed.load(Ordering::SeqCst) {
            self.pending.lock().remove(&query_id);
            return Err(ClientError::ChannelClosed);
        }

        let request = RequestEnvelope::new(query_id.clone(), route, input);
        let raw = match serde_json::to_value(&request) {
            Ok(raw) => raw,
            Err(error) => {
                self.pending.lock().remove(&query_id);
                return Err(error.into());
            }
        };
        if self.outbound.send(raw).is_err() {
            self.pending.lock().remove(&query_id);
            return Err(ClientError::ChannelClosed);
        }
        debug!(%query_id, route, "request issued");

        // The sender side is dropped without firing only when the demux loop
        // drains the table on channel close.
        let response = settled.await.map_err(|_| ClientError::ChannelClosed)?;
        match response.status {
            Status::Ok => Ok(response.payload.unwrap_or(Value::Null)),
            status => Err(ClientError::Call {
                status,
                error: response
                    .error
                    .unwrap_or_else(|| ResponseError::Message(format!("status {}", status))),
            }),
        }
    }

    /// Issue a call and deserialize the payload.
    pub async fn query_as<T: DeserializeOwned>(&self, route: &str, input: Value) -> ClientResult<T> {
        let payload = self.query(route, input).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Number of calls currently awaiting a response.
    pub fn in_flight(&self) -> usize {
        self.pending.lock().len()
    }
}

impl Drop for ClientEndpoint {
    fn drop(&mut self) {
        self.demux.abort();
    }
}

/// Drain the inbound channel, settling pending calls by `queryId`.
///
/// Runs until the channel closes, then drains the pending table so every
/// outstanding call settles with a channel-closed error instead of hanging.
async fn demux_loop(
    mut inbound: UnboundedReceiver<Value>,
    pending: PendingCalls,
    closed: Arc<AtomicBool>,
) {
    while let Some(raw) = inbound.recv().await {
        if !is_response(&raw) {
            debug!("ignoring non-response channel message");
            continue;
        }
        let envelope: ResponseEnvelope = match serde_json::from_value(raw) {
            Ok(envelope) => envelope,
            Err(error) => {
                debug!(%error, "ignoring malformed response envelope");
                continue;
            }
        };
        let Some(settle) = pending.lock().remove(&envelope.query_id) else {
            debug!(query_id = %envelope.query_id, "dropping response with unknown queryId");
            continue;
        };
        if settle.send(envelope).is_err() {
            debug!("caller went away before its response arrived");
        }
    }

    closed.store(true, Ordering::SeqCst);
    let orphaned: Vec<_> = pending.lock().drain().collect();
    if !orphaned.is_empty() {
        warn!(
            calls = orphaned.len(),
            "channel closed with calls still pending; rejecting them"
        );
    }
    // Dropping the senders settles every waiter with ChannelClosed.
}
