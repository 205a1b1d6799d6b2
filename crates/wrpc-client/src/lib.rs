//! # WRPC Client
//!
//! The client half of a WRPC channel: issues calls against the procedures the
//! peer exposes and correlates the asynchronous responses back to their
//! callers.
//!
//! A [`ClientEndpoint`] owns the outbound sender and a demultiplexer task that
//! drains the inbound receiver. Any number of calls may be in flight at once
//! over the one shared channel; each is matched to its response solely by
//! `queryId`, never by arrival order. Every issued call settles: with the
//! payload on success, with the status and error body on failure, or with
//! [`ClientError::ChannelClosed`] if the channel goes away first.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wrpc_client::ClientEndpoint;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (local, _remote) = wrpc_wire::channel::pair();
//! let client = ClientEndpoint::new(local.sender, local.receiver);
//!
//! let greeting = client.query("hello", json!({"name": "John"})).await?;
//! println!("{}", greeting);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::ClientEndpoint;
pub use error::{ClientError, ClientResult};
