use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one dispatched call.
///
/// The numbering is part of the wire contract and is never renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Status {
    /// The handler ran and returned a payload.
    Ok,
    /// The input did not match the procedure's schema.
    InvalidInput,
    /// The route did not resolve to a callable procedure.
    NotFound,
    /// The handler failed with an unexpected error.
    Internal,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::InvalidInput => 400,
            Status::NotFound => 404,
            Status::Internal => 500,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl From<Status> for u16 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<u16> for Status {
    type Error = UnknownStatus;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            200 => Ok(Status::Ok),
            400 => Ok(Status::InvalidInput),
            404 => Ok(Status::NotFound),
            500 => Ok(Status::Internal),
            other => Err(UnknownStatus(other)),
        }
    }
}

/// A status code outside the fixed wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown status code {0}")]
pub struct UnknownStatus(pub u16);

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Ok.code(), 200);
        assert_eq!(Status::InvalidInput.code(), 400);
        assert_eq!(Status::NotFound.code(), 404);
        assert_eq!(Status::Internal.code(), 500);
    }

    #[test]
    fn test_status_serializes_as_number() {
        assert_eq!(serde_json::to_value(Status::Ok).unwrap(), serde_json::json!(200));
        let status: Status = serde_json::from_value(serde_json::json!(404)).unwrap();
        assert_eq!(status, Status::NotFound);
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(serde_json::from_value::<Status>(serde_json::json!(418)).is_err());
    }
}
