//! Server endpoint: bridges an inbound message channel to the dispatcher.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use wrpc_wire::{RequestEnvelope, is_request};

use crate::router::Router;

/// The server half of a WRPC channel.
///
/// Owns the route tree, the deployment's opaque context, and the outbound
/// sender. Each inbound request is dispatched on its own task, so handlers
/// run concurrently and responses may be emitted in any order; correlation is
/// solely by `queryId`.
pub struct ServerEndpoint<C> {
    router: Arc<Router<C>>,
    ctx: Arc<C>,
    outbound: UnboundedSender<Value>,
}

impl<C: Send + Sync + 'static> ServerEndpoint<C> {
    pub fn new(router: Router<C>, ctx: C, outbound: UnboundedSender<Value>) -> Self {
        Self {
            router: Arc::new(router),
            ctx: Arc::new(ctx),
            outbound,
        }
    }

    /// Feed one raw inbound message to the endpoint.
    ///
    /// The sole inbound entry point. Messages that do not look like request
    /// envelopes are dropped, so the channel can carry unrelated traffic.
    pub fn handle_message(&self, raw: Value) {
        if !is_request(&raw) {
            debug!("ignoring non-request channel message");
            return;
        }
        let envelope: RequestEnvelope = match serde_json::from_value(raw) {
            Ok(envelope) => envelope,
            Err(error) => {
                debug!(%error, "ignoring malformed request envelope");
                return;
            }
        };

        let router = Arc::clone(&self.router);
        let ctx = Arc::clone(&self.ctx);
        let outbound = self.outbound.clone();
        tokio::spawn(async move {
            debug!(route = %envelope.route, query_id = %envelope.query_id, "dispatching request");
            let reply = router.dispatch(&envelope.route, envelope.input, ctx).await;
            let response = reply.into_envelope(envelope.query_id);
            match serde_json::to_value(&response) {
                Ok(raw) => {
                    if outbound.send(raw).is_err() {
                        warn!(query_id = %response.query_id, "outbound channel closed; response dropped");
                    }
                }
                Err(error) => {
                    warn!(%error, "failed to serialize response envelope");
                }
            }
        });
    }

    /// Drain an inbound receiver through [`Self::handle_message`] until the
    /// channel closes. The canonical way to run the endpoint inside its
    /// execution context.
    pub async fn serve(self, mut inbound: UnboundedReceiver<Value>) {
        while let Some(raw) = inbound.recv().await {
            self.handle_message(raw);
        }
        debug!("inbound channel closed; server endpoint stopping");
    }
}
