//! Error types for WRPC client operations.

use thiserror::Error;

use wrpc_wire::{ResponseError, Status};

/// Result type for WRPC client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// How an issued call can fail.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The peer answered with a non-success status.
    ///
    /// Carries the full status and error body so callers can branch on the
    /// status code programmatically.
    #[error("call failed with status {status}: {error}")]
    Call {
        status: Status,
        error: ResponseError,
    },

    /// The channel closed before the call settled.
    ///
    /// Raised both when the request cannot be sent and when the channel is
    /// torn down while the call is pending.
    #[error("message channel closed before the call settled")]
    ChannelClosed,

    /// A payload could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// The response status, if the peer answered at all.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Call { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_error_exposes_status() {
        let error = ClientError::Call {
            status: Status::NotFound,
            error: ResponseError::Message("Route x not found".to_string()),
        };
        assert_eq!(error.status(), Some(Status::NotFound));
        assert!(error.to_string().contains("404"));
        assert!(error.to_string().contains("Route x not found"));
    }

    #[test]
    fn test_channel_closed_has_no_status() {
        assert_eq!(ClientError::ChannelClosed.status(), None);
    }
}
