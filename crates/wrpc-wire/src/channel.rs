//! In-process duplex channel between two execution contexts.
//!
//! The transport proper is outside this crate's concern; endpoints only
//! assume `send`, `recv`, and observable closure, reliable and in-order per
//! direction. [`pair`] links two halves so a "main task <-> worker task"
//! topology can be stood up without a real transport.

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// One side of a duplex message channel.
///
/// Raw messages are [`serde_json::Value`]s; the channel happily carries
/// non-WRPC traffic, which endpoints filter out with the envelope predicates.
#[derive(Debug)]
pub struct ChannelHalf {
    pub sender: UnboundedSender<Value>,
    pub receiver: UnboundedReceiver<Value>,
}

impl ChannelHalf {
    /// Split into the raw sender/receiver pair.
    pub fn into_parts(self) -> (UnboundedSender<Value>, UnboundedReceiver<Value>) {
        (self.sender, self.receiver)
    }
}

/// Create two linked channel halves.
///
/// Whatever one half sends, the other receives. Dropping a half closes the
/// direction it was receiving on, which the peer observes as channel closure.
pub fn pair() -> (ChannelHalf, ChannelHalf) {
    let (left_tx, left_rx) = mpsc::unbounded_channel();
    let (right_tx, right_rx) = mpsc::unbounded_channel();
    (
        ChannelHalf {
            sender: left_tx,
            receiver: right_rx,
        },
        ChannelHalf {
            sender: right_tx,
            receiver: left_rx,
        },
    )
}
